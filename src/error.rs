use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {message}")]
    Config { message: String },
    #[error("corpus format error: {message}")]
    Corpus { message: String },
    #[error("model error while {context}: {message}")]
    Model {
        context: &'static str,
        message: String,
    },
    #[error("alignment integrity violation: {message}")]
    Alignment { message: String },
    #[error("scoring error: {message}")]
    Scoring { message: String },
}

impl EvalError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn corpus(message: impl Into<String>) -> Self {
        Self::Corpus {
            message: message.into(),
        }
    }

    pub(crate) fn model(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Model {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn alignment(message: impl Into<String>) -> Self {
        Self::Alignment {
            message: message.into(),
        }
    }

    pub(crate) fn scoring(message: impl Into<String>) -> Self {
        Self::Scoring {
            message: message.into(),
        }
    }
}

/// Per-candidate deserialization failure. Routine and expected: the generator
/// converts it into [`crate::types::GenerationOutcome::Failed`] instead of
/// propagating it.
#[derive(Debug, Error)]
#[error("deserialization failed: {message}")]
pub struct DeserializeError {
    pub message: String,
}

impl DeserializeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
