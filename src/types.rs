/// One reference example. The three fields come from parallel arrays that
/// share the same index; the loader enforces equal lengths before zipping.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusEntry {
    /// Reference graph text as it appears in the corpus file, metadata included.
    pub graph: String,
    /// Linearized single-line form of the graph (the model's target format).
    pub serial: String,
    /// Source sentence the model parses.
    pub sentence: String,
}

/// Raw collaborator output from a [`crate::pipeline::traits::CorpusFormat`],
/// before the parallel-length invariant has been checked.
#[derive(Debug, Clone, Default)]
pub struct RawCorpus {
    pub graphs: Vec<String>,
    pub serials: Vec<String>,
    pub sentences: Vec<String>,
}

/// Per-sentence generation result. `Failed` means no beam candidate
/// deserialized into a valid graph; it is routine, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated(String),
    Failed,
}

impl GenerationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Reference/generated graph pair at one corpus index. `generated` holds the
/// placeholder text when generation failed for that index.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    pub reference: String,
    pub generated: String,
}

/// Output of alignment repair. `failure_count` is returned explicitly rather
/// than accumulated in shared state.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    pub pairs: Vec<AlignedPair>,
    pub failure_count: usize,
}

/// Corpus-level structural-similarity score, each component in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmatchScore {
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
}

impl SmatchScore {
    pub fn from_counts(matched: usize, test_total: usize, gold_total: usize) -> Self {
        let precision = if test_total == 0 {
            0.0
        } else {
            matched as f64 / test_total as f64
        };
        let recall = if gold_total == 0 {
            0.0
        } else {
            matched as f64 / gold_total as f64
        };
        let f_score = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Self {
            precision,
            recall,
            f_score,
        }
    }
}

/// Terminal pipeline output returned by [`crate::pipeline::runtime::Evaluator::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct EvalReport {
    pub score: SmatchScore,
    /// How many corpus entries fell back to the placeholder graph.
    pub failure_count: usize,
    pub corpus_size: usize,
    pub gold_path: std::path::PathBuf,
    pub pred_path: std::path::PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smatch_score_from_counts() {
        let score = SmatchScore::from_counts(6, 8, 12);
        assert!((score.precision - 0.75).abs() < 1e-12);
        assert!((score.recall - 0.5).abs() < 1e-12);
        assert!((score.f_score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn smatch_score_zero_totals() {
        let score = SmatchScore::from_counts(0, 0, 0);
        assert_eq!(score.precision, 0.0);
        assert_eq!(score.recall, 0.0);
        assert_eq!(score.f_score, 0.0);
    }

    #[test]
    fn generation_outcome_is_failed() {
        assert!(GenerationOutcome::Failed.is_failed());
        assert!(!GenerationOutcome::Generated("(a / alpha)".to_string()).is_failed());
    }
}
