use std::path::Path;

use crate::config::{EvalConfig, GenModelConfig};
use crate::error::EvalError;
use crate::pipeline::defaults::{AmrBlockCorpus, PenmanCodec, TripleSmatch};
use crate::pipeline::runtime::{Evaluator, EvaluatorParts};
use crate::pipeline::traits::{CorpusFormat, GraphCodec, GraphModel, SmatchBackend};

pub struct EvaluatorBuilder {
    config: EvalConfig,
    model: Option<Box<dyn GraphModel>>,
    codec: Option<Box<dyn GraphCodec>>,
    corpus_format: Option<Box<dyn CorpusFormat>>,
    smatch: Option<Box<dyn SmatchBackend>>,
}

impl EvaluatorBuilder {
    pub fn new(config: EvalConfig) -> Self {
        Self {
            config,
            model: None,
            codec: None,
            corpus_format: None,
            smatch: None,
        }
    }

    pub fn with_model(mut self, model: Box<dyn GraphModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_codec(mut self, codec: Box<dyn GraphCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn with_corpus_format(mut self, corpus_format: Box<dyn CorpusFormat>) -> Self {
        self.corpus_format = Some(corpus_format);
        self
    }

    pub fn with_smatch(mut self, smatch: Box<dyn SmatchBackend>) -> Self {
        self.smatch = Some(smatch);
        self
    }

    pub fn build(self) -> Result<Evaluator, EvalError> {
        if self.config.batch_size == 0 {
            return Err(EvalError::config("batch_size must be at least 1"));
        }
        if self.config.num_beams == 0 {
            return Err(EvalError::config("num_beams must be at least 1"));
        }
        if self.config.device.is_empty() {
            return Err(EvalError::config("device must not be empty"));
        }
        let model = self.model.ok_or_else(|| {
            EvalError::config("no graph model provided; pass one with with_model")
        })?;

        // The checkpoint config is optional; when present it supplies the
        // input-length limit used for clip warnings.
        let max_sent_len = if self.config.model_dir.is_empty() {
            None
        } else {
            let config_path = Path::new(&self.config.model_dir).join("config.json");
            if config_path.exists() {
                let model_config = GenModelConfig::load(&config_path)?;
                Some(model_config.task_params()?.max_in_len)
            } else {
                None
            }
        };

        Ok(Evaluator::from_parts(EvaluatorParts {
            config: self.config,
            max_sent_len,
            model,
            codec: self.codec.unwrap_or_else(|| Box::new(PenmanCodec)),
            corpus_format: self
                .corpus_format
                .unwrap_or_else(|| Box::new(AmrBlockCorpus)),
            smatch: self.smatch.unwrap_or_else(|| Box::new(TripleSmatch)),
        }))
    }
}
