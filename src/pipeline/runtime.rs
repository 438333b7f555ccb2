use std::path::{Path, PathBuf};

use crate::config::EvalConfig;
use crate::error::EvalError;
use crate::eval::batching::BatchedGenerator;
use crate::eval::corpus::load_corpus;
use crate::eval::persist::write_pairs;
use crate::eval::repair::repair;
use crate::eval::scoring::score;
use crate::pipeline::traits::{CorpusFormat, GraphCodec, GraphModel, SmatchBackend};
use crate::types::EvalReport;

/// The assembled evaluation pipeline: load, generate, repair, persist, score.
/// Stages run strictly in sequence; the loaded corpus is read-only after the
/// first stage, and the gold/pred files are written before anything reads
/// them back.
pub struct Evaluator {
    config: EvalConfig,
    max_sent_len: Option<usize>,
    model: Box<dyn GraphModel>,
    codec: Box<dyn GraphCodec>,
    corpus_format: Box<dyn CorpusFormat>,
    smatch: Box<dyn SmatchBackend>,
}

pub(crate) struct EvaluatorParts {
    pub config: EvalConfig,
    pub max_sent_len: Option<usize>,
    pub model: Box<dyn GraphModel>,
    pub codec: Box<dyn GraphCodec>,
    pub corpus_format: Box<dyn CorpusFormat>,
    pub smatch: Box<dyn SmatchBackend>,
}

impl Evaluator {
    pub(crate) fn from_parts(parts: EvaluatorParts) -> Self {
        Self {
            config: parts.config,
            max_sent_len: parts.max_sent_len,
            model: parts.model,
            codec: parts.codec,
            corpus_format: parts.corpus_format,
            smatch: parts.smatch,
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn max_sent_len(&self) -> Option<usize> {
        self.max_sent_len
    }

    pub fn run(&self, disable_progress: bool) -> Result<EvalReport, EvalError> {
        let corpus_path = Path::new(&self.config.corpus_path);
        let entries = load_corpus(
            self.corpus_format.as_ref(),
            corpus_path,
            self.config.max_entries,
        )?;
        if entries.is_empty() {
            return Err(EvalError::corpus(format!(
                "no entries loaded from {}",
                corpus_path.display()
            )));
        }
        tracing::info!(
            corpus = %corpus_path.display(),
            entries = entries.len(),
            "loaded test corpus"
        );

        let sentences: Vec<String> = entries.iter().map(|e| e.sentence.clone()).collect();
        tracing::info!(
            device = %self.model.device_label(),
            batch_size = self.config.batch_size,
            num_beams = self.config.num_beams,
            "generating graphs"
        );
        let generator = BatchedGenerator::new(
            self.model.as_ref(),
            self.codec.as_ref(),
            self.config.batch_size,
            self.config.num_beams,
            self.max_sent_len,
        );
        let outcomes = generator.generate(&sentences, disable_progress)?;

        let repaired = repair(&entries, outcomes)?;
        if repaired.failure_count > 0 {
            tracing::warn!(
                failures = repaired.failure_count,
                total = entries.len(),
                "some graphs did not deserialize; placeholders keep the files aligned"
            );
        }

        let gold_path = PathBuf::from(&self.config.gold_path);
        let pred_path = PathBuf::from(&self.config.pred_path);
        write_pairs(&repaired.pairs, &gold_path, &pred_path)?;
        tracing::info!(
            gold = %gold_path.display(),
            pred = %pred_path.display(),
            "saved reference and generated graphs"
        );

        let smatch_score = score(self.smatch.as_ref(), &pred_path, &gold_path)?;
        Ok(EvalReport {
            score: smatch_score,
            failure_count: repaired.failure_count,
            corpus_size: entries.len(),
            gold_path,
            pred_path,
        })
    }
}
