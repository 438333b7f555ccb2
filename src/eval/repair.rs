use crate::error::EvalError;
use crate::types::{AlignedPair, CorpusEntry, GenerationOutcome, RepairOutcome};

/// Stand-in for a failed generation: a minimal valid graph under a sentinel
/// comment, so the pair still scores (as a near-total miss) and failures are
/// visible when inspecting the prediction file.
pub const PLACEHOLDER_GRAPH: &str =
    "# ::snt placeholder for deserialization failure\n(d / deserialization-failure)";

/// Pair every reference with its generation, substituting the placeholder for
/// failures. Dropping failed indices instead would silently shrink and
/// misalign the comparison set against the gold standard.
pub fn repair(
    references: &[CorpusEntry],
    generations: Vec<GenerationOutcome>,
) -> Result<RepairOutcome, EvalError> {
    if references.len() != generations.len() {
        return Err(EvalError::alignment(format!(
            "{} references but {} generations",
            references.len(),
            generations.len()
        )));
    }
    let mut failure_count = 0usize;
    let pairs = references
        .iter()
        .zip(generations)
        .map(|(entry, outcome)| {
            let generated = match outcome {
                GenerationOutcome::Generated(text) => text,
                GenerationOutcome::Failed => {
                    failure_count += 1;
                    PLACEHOLDER_GRAPH.to_string()
                }
            };
            AlignedPair {
                reference: entry.graph.clone(),
                generated,
            }
        })
        .collect();
    Ok(RepairOutcome {
        pairs,
        failure_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(i: usize) -> CorpusEntry {
        CorpusEntry {
            graph: format!("(g{i} / graph-{i})"),
            serial: format!("(g{i} / graph-{i})"),
            sentence: format!("sentence {i}"),
        }
    }

    #[test]
    fn failed_generation_maps_to_placeholder() {
        let references = vec![entry(0), entry(1), entry(2)];
        let generations = vec![
            GenerationOutcome::Generated("(a / alpha)".to_string()),
            GenerationOutcome::Failed,
            GenerationOutcome::Generated("(b / beta)".to_string()),
        ];
        let outcome = repair(&references, generations).unwrap();
        assert_eq!(outcome.pairs.len(), 3);
        assert_eq!(outcome.failure_count, 1);
        assert_eq!(outcome.pairs[0].generated, "(a / alpha)");
        assert_eq!(outcome.pairs[1].generated, PLACEHOLDER_GRAPH);
        assert_eq!(outcome.pairs[2].generated, "(b / beta)");
        for (i, pair) in outcome.pairs.iter().enumerate() {
            assert_eq!(pair.reference, references[i].graph);
        }
    }

    #[test]
    fn all_present_means_zero_failures() {
        let references = vec![entry(0), entry(1)];
        let generations = vec![
            GenerationOutcome::Generated("(a / alpha)".to_string()),
            GenerationOutcome::Generated("(b / beta)".to_string()),
        ];
        let outcome = repair(&references, generations).unwrap();
        assert_eq!(outcome.failure_count, 0);
    }

    #[test]
    fn all_failed_still_aligns() {
        let references = vec![entry(0), entry(1)];
        let generations = vec![GenerationOutcome::Failed, GenerationOutcome::Failed];
        let outcome = repair(&references, generations).unwrap();
        assert_eq!(outcome.pairs.len(), 2);
        assert_eq!(outcome.failure_count, 2);
        assert!(outcome.pairs.iter().all(|p| p.generated == PLACEHOLDER_GRAPH));
    }

    #[test]
    fn length_mismatch_is_fatal() {
        let references = vec![entry(0), entry(1)];
        let generations = vec![GenerationOutcome::Failed];
        assert!(matches!(
            repair(&references, generations),
            Err(EvalError::Alignment { .. })
        ));
    }

    #[test]
    fn placeholder_is_a_valid_graph() {
        assert!(crate::penman::parse(PLACEHOLDER_GRAPH).is_ok());
    }
}
