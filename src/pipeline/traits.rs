use std::path::Path;

use crate::error::{DeserializeError, EvalError};
use crate::types::{RawCorpus, SmatchScore};

/// Sequence-to-graph model collaborator. Implementations own the device and
/// checkpoint; the pipeline only sees text in, beam candidates out.
pub trait GraphModel: Send + Sync {
    /// One candidate list per submitted sentence, in submission order, best
    /// candidate first, at most `num_beams` candidates each.
    fn generate_batch(
        &self,
        sentences: &[String],
        num_beams: usize,
    ) -> Result<Vec<Vec<String>>, EvalError>;

    fn device_label(&self) -> String {
        "cpu".to_string()
    }
}

/// Graph serialization collaborator. `deserialize` validates a candidate
/// text and returns the graph string to persist, or the routine failure the
/// generator turns into a placeholder.
pub trait GraphCodec: Send + Sync {
    fn deserialize(&self, text: &str) -> Result<String, DeserializeError>;
}

/// Reference-corpus format collaborator, producing the three parallel arrays
/// the loader zips and validates.
pub trait CorpusFormat: Send + Sync {
    fn load(&self, path: &Path) -> Result<RawCorpus, EvalError>;
}

/// Structural-comparison collaborator: one global score over two equal-length
/// entry lists, accumulated from per-pair match statistics.
pub trait SmatchBackend: Send + Sync {
    fn compute(
        &self,
        test_entries: &[String],
        gold_entries: &[String],
    ) -> Result<SmatchScore, EvalError>;
}
