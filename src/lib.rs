pub mod config;
pub mod error;
pub mod eval;
pub mod penman;
pub mod pipeline;
pub mod types;

pub use config::{EvalConfig, GenModelConfig};
pub use error::{DeserializeError, EvalError};
pub use eval::repair::PLACEHOLDER_GRAPH;
pub use pipeline::builder::EvaluatorBuilder;
pub use pipeline::defaults::{AmrBlockCorpus, CandidateFileModel, PenmanCodec, TripleSmatch};
pub use pipeline::runtime::Evaluator;
pub use pipeline::traits::{CorpusFormat, GraphCodec, GraphModel, SmatchBackend};
pub use types::{
    AlignedPair, CorpusEntry, EvalReport, GenerationOutcome, RawCorpus, RepairOutcome, SmatchScore,
};
