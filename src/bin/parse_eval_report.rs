use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use amr_parse_eval::{
    eval::scoring, CandidateFileModel, EvalConfig, EvalError, EvaluatorBuilder, TripleSmatch,
};

#[derive(Debug, Parser)]
#[command(name = "parse_eval_report")]
#[command(about = "Evaluate a sentence-to-AMR parse model with SMATCH over a test corpus")]
struct Args {
    /// Trained model directory (config.json is read when present).
    #[arg(long, env = "PARSE_EVAL_MODEL_DIR", default_value = "data/model_parse")]
    model_dir: PathBuf,
    /// Reference corpus file.
    #[arg(long, env = "PARSE_EVAL_CORPUS", default_value = "data/tdata/test.txt")]
    corpus: PathBuf,
    /// Directory receiving test-gold.txt and test-pred.txt.
    #[arg(long, env = "PARSE_EVAL_OUT_DIR")]
    out_dir: Option<PathBuf>,
    /// JSON-lines file of pre-generated beam candidates per sentence.
    #[arg(long, env = "PARSE_EVAL_CANDIDATES")]
    candidates: Option<PathBuf>,
    #[arg(long, env = "PARSE_EVAL_DEVICE", default_value = "cpu")]
    device: String,
    #[arg(long, default_value_t = EvalConfig::DEFAULT_BATCH_SIZE)]
    batch_size: usize,
    /// More beams lower the deserialization-failure rate at the cost of
    /// runtime.
    #[arg(long, default_value_t = EvalConfig::DEFAULT_NUM_BEAMS)]
    num_beams: usize,
    /// Cap on test entries; omit to evaluate everything.
    #[arg(long)]
    max_entries: Option<usize>,
    /// Skip generation and re-score the existing gold/pred files.
    #[arg(long)]
    rescore: bool,
    #[arg(long)]
    no_progress: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), EvalError> {
    let out_dir = args.out_dir.clone().unwrap_or_else(|| args.model_dir.clone());
    let gold_path = out_dir.join("test-gold.txt");
    let pred_path = out_dir.join("test-pred.txt");

    if args.rescore {
        println!("Re-scoring {} against {}", pred_path.display(), gold_path.display());
        let score = scoring::score(&TripleSmatch, &pred_path, &gold_path)?;
        print_score(score.precision, score.recall, score.f_score);
        return Ok(());
    }

    let candidates_path = args.candidates.as_deref().ok_or_else(|| {
        EvalError::Config {
            message: "no --candidates file given; this build has no accelerator backend \
                      (use --rescore to score existing files)"
                .to_string(),
        }
    })?;
    let model = CandidateFileModel::load(candidates_path)?;

    let config = EvalConfig {
        model_dir: args.model_dir.to_string_lossy().to_string(),
        corpus_path: args.corpus.to_string_lossy().to_string(),
        gold_path: gold_path.to_string_lossy().to_string(),
        pred_path: pred_path.to_string_lossy().to_string(),
        device: args.device,
        batch_size: args.batch_size,
        num_beams: args.num_beams,
        max_entries: args.max_entries,
    };

    println!("Loading test data {}", config.corpus_path);
    let evaluator = EvaluatorBuilder::new(config)
        .with_model(Box::new(model))
        .build()?;

    let started = Instant::now();
    println!("Generating ({})", Utc::now().format("%Y-%m-%dT%H:%M:%SZ"));
    let report = evaluator.run(args.no_progress)?;
    println!(
        "Out of {} graphs, {} did not deserialize properly ({:.1?} elapsed).",
        report.corpus_size,
        report.failure_count,
        started.elapsed()
    );
    print_score(
        report.score.precision,
        report.score.recall,
        report.score.f_score,
    );
    Ok(())
}

fn print_score(precision: f64, recall: f64, f_score: f64) {
    println!("SMATCH -> P: {precision:.3},  R: {recall:.3},  F: {f_score:.3}");
}
