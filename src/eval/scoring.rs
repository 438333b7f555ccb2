use std::path::Path;

use crate::error::EvalError;
use crate::eval::persist::read_entries;
use crate::pipeline::traits::SmatchBackend;
use crate::types::SmatchScore;

/// Reload both persisted files and hand the two equal-length entry lists to
/// the scoring backend for one global corpus-level score.
///
/// A length mismatch here should be unreachable given the writer's contract;
/// it is treated as a fatal integrity failure rather than truncated away.
pub fn score(
    backend: &dyn SmatchBackend,
    pred_path: &Path,
    gold_path: &Path,
) -> Result<SmatchScore, EvalError> {
    let pred_entries = read_entries(pred_path)?;
    let gold_entries = read_entries(gold_path)?;
    if pred_entries.len() != gold_entries.len() {
        return Err(EvalError::scoring(format!(
            "persisted files disagree: {} pred entries vs {} gold entries",
            pred_entries.len(),
            gold_entries.len()
        )));
    }
    if pred_entries.is_empty() {
        return Err(EvalError::scoring("nothing to score: both files are empty"));
    }
    backend.compute(&pred_entries, &gold_entries)
}
