/// Ebooks: generate one candidate from a corpus, publish it, and record
/// the outcome in the activity log.
///
/// Usage: ebooks --corpus <file.txt> [--config <config.ron>] [--seed <n>] [--log-dir <dir>]
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use markov_ebooks::publish::{ActivityLog, DryRunPublisher, FileLog, LogError};
use markov_ebooks::{run_once, CandidateEngine, GeneratorConfig};

#[derive(Debug, Parser)]
#[command(name = "ebooks", about = "Post Markov-generated text from a corpus")]
struct Args {
    /// Source corpus (UTF-8 text).
    #[arg(long)]
    corpus: PathBuf,

    /// Generator configuration in RON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed, overriding the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the activity log, overriding the config.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

/// Log sink for runs without a configured log directory.
struct NoLog;

impl ActivityLog for NoLog {
    fn record(&mut self, _message: &str) -> Result<(), LogError> {
        Ok(())
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "markov_ebooks=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load_from_ron(path).unwrap_or_else(|e| {
            eprintln!("Error loading config '{}': {}", path.display(), e);
            process::exit(1);
        }),
        None => GeneratorConfig::default(),
    };
    if args.log_dir.is_some() {
        config.log_dir = args.log_dir;
    }

    let mut builder = CandidateEngine::builder()
        .corpus_path(&args.corpus)
        .config(config.clone());
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let mut engine = builder.build().unwrap_or_else(|e| {
        eprintln!("Error preparing generator: {}", e);
        process::exit(1);
    });

    let mut log: Box<dyn ActivityLog> = match config.log_path() {
        Some(path) => Box::new(FileLog::new(path)),
        None => Box::new(NoLog),
    };

    let outcome = run_once(&mut engine, &mut DryRunPublisher, log.as_mut()).unwrap_or_else(|e| {
        eprintln!("Error generating candidate: {}", e);
        process::exit(1);
    });

    if !outcome.published {
        tracing::warn!("candidate was not published");
    }
}
