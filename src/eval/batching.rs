use indicatif::{ProgressBar, ProgressStyle};

use crate::error::EvalError;
use crate::pipeline::traits::{GraphCodec, GraphModel};
use crate::types::GenerationOutcome;

/// Drives batched beam-search generation over a sentence list.
///
/// Sentences are processed longest-first so batches stay homogeneous in
/// length and progress estimates improve as the run proceeds, but results are
/// always returned in the caller's original order. More beams means more
/// candidates per failure-prone deserialization check, so raising `num_beams`
/// trades runtime for a lower failure rate.
pub struct BatchedGenerator<'a> {
    model: &'a dyn GraphModel,
    codec: &'a dyn GraphCodec,
    batch_size: usize,
    num_beams: usize,
    max_sent_len: Option<usize>,
}

impl<'a> BatchedGenerator<'a> {
    pub fn new(
        model: &'a dyn GraphModel,
        codec: &'a dyn GraphCodec,
        batch_size: usize,
        num_beams: usize,
        max_sent_len: Option<usize>,
    ) -> Self {
        Self {
            model,
            codec,
            batch_size,
            num_beams,
            max_sent_len,
        }
    }

    /// One outcome per input sentence, in input order. A sentence whose beam
    /// candidates all fail to deserialize yields `Failed`, never an error;
    /// only model/device faults abort the run.
    pub fn generate(
        &self,
        sentences: &[String],
        disable_progress: bool,
    ) -> Result<Vec<GenerationOutcome>, EvalError> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }
        let plan = batch_plan(sentences);
        let mut results: Vec<Option<GenerationOutcome>> = vec![None; sentences.len()];

        let progress = if disable_progress {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(sentences.len() as u64)
        };
        progress.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
        );

        for batch in plan.chunks(self.batch_size) {
            let batch_sents: Vec<String> =
                batch.iter().map(|&i| sentences[i].clone()).collect();
            if let Some(limit) = self.max_sent_len {
                for (&idx, sent) in batch.iter().zip(&batch_sents) {
                    if sent.split_whitespace().count() > limit {
                        tracing::warn!(
                            sentence_index = idx,
                            limit,
                            "sentence exceeds the model input length and may be truncated"
                        );
                    }
                }
            }
            let candidates = self
                .model
                .generate_batch(&batch_sents, self.num_beams)
                .map_err(|e| EvalError::model("batched generation", e))?;
            if candidates.len() != batch.len() {
                return Err(EvalError::alignment(format!(
                    "model returned {} candidate lists for a batch of {}",
                    candidates.len(),
                    batch.len()
                )));
            }
            for (&orig_idx, beams) in batch.iter().zip(candidates) {
                results[orig_idx] = Some(self.select_candidate(orig_idx, &sentences[orig_idx], beams));
            }
            progress.inc(batch.len() as u64);
        }
        progress.finish_and_clear();

        // The inverse permutation must have filled every slot.
        results
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| {
                    EvalError::alignment(format!("generation left sentence {i} without a result"))
                })
            })
            .collect()
    }

    /// First beam candidate that deserializes wins; the accepted graph is
    /// returned with its `# ::snt` metadata line attached.
    fn select_candidate(
        &self,
        sentence_index: usize,
        sentence: &str,
        beams: Vec<String>,
    ) -> GenerationOutcome {
        for (beam, candidate) in beams.iter().enumerate() {
            match self.codec.deserialize(candidate) {
                Ok(graph) => {
                    return GenerationOutcome::Generated(format!("# ::snt {sentence}\n{graph}"));
                }
                Err(err) => {
                    tracing::debug!(sentence_index, beam, %err, "beam candidate rejected");
                }
            }
        }
        tracing::debug!(sentence_index, "all beam candidates failed to deserialize");
        GenerationOutcome::Failed
    }
}

/// Processing order: indices sorted by descending sentence length. Captured
/// explicitly so restoring the caller's order is a lookup, not an assumption.
pub(crate) fn batch_plan(sentences: &[String]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..sentences.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(sentences[i].len()));
    order
}
