use std::path::Path;

use crate::error::EvalError;

#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub model_dir: String,
    pub corpus_path: String,
    pub gold_path: String,
    pub pred_path: String,
    pub device: String,
    pub batch_size: usize,
    pub num_beams: usize,
    /// Prefix cap on the test corpus. Applied identically to all three
    /// parallel arrays; `None` evaluates everything.
    pub max_entries: Option<usize>,
}

impl EvalConfig {
    pub const DEFAULT_BATCH_SIZE: usize = 12;
    pub const DEFAULT_NUM_BEAMS: usize = 4;
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            model_dir: String::new(),
            corpus_path: String::new(),
            gold_path: String::new(),
            pred_path: String::new(),
            device: "cpu".to_string(),
            batch_size: Self::DEFAULT_BATCH_SIZE,
            num_beams: Self::DEFAULT_NUM_BEAMS,
            max_entries: None,
        }
    }
}

/// Checkpoint `config.json` as written at training time. Only the generation
/// task parameters matter here.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GenModelConfig {
    pub task_specific_params: TaskSpecificParams,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TaskSpecificParams {
    #[serde(default)]
    pub parse_amr: Option<GenTaskParams>,
    /// Older checkpoints carried the task under this key by mistake.
    #[serde(default)]
    pub translation_amr_to_text: Option<GenTaskParams>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct GenTaskParams {
    pub model_name_or_path: String,
    /// Sentences longer than this (in model tokens) are truncated by the
    /// model-side tokenizer.
    pub max_in_len: usize,
    pub max_out_len: usize,
}

impl GenModelConfig {
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| EvalError::io("read config.json", e))?;
        serde_json::from_str(&data).map_err(|e| EvalError::json("parse config.json", e))
    }

    pub fn task_params(&self) -> Result<&GenTaskParams, EvalError> {
        self.task_specific_params
            .parse_amr
            .as_ref()
            .or(self.task_specific_params.translation_amr_to_text.as_ref())
            .ok_or_else(|| {
                EvalError::config("config.json has no parse_amr task_specific_params entry")
            })
    }
}
