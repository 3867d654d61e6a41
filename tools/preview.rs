/// Preview: print candidates from a corpus without publishing or logging.
///
/// Usage: preview --corpus <file.txt> [--config <config.ron>] [--seed <n>] [--count <n>]
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use markov_ebooks::{CandidateEngine, GeneratorConfig, PipelineError};

#[derive(Debug, Parser)]
#[command(name = "preview", about = "Preview Markov-generated candidates")]
struct Args {
    #[arg(long)]
    corpus: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of candidates to print.
    #[arg(long, default_value_t = 10)]
    count: usize,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "markov_ebooks=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GeneratorConfig::load_from_ron(path).unwrap_or_else(|e| {
            eprintln!("Error loading config '{}': {}", path.display(), e);
            process::exit(1);
        }),
        None => GeneratorConfig::default(),
    };

    let mut engine = CandidateEngine::builder()
        .corpus_path(&args.corpus)
        .config(config)
        .seed(args.seed)
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error preparing generator: {}", e);
            process::exit(1);
        });

    println!(
        "{} tokens, {} states (seed {})",
        engine.corpus().len(),
        engine.chain().len(),
        args.seed
    );
    println!("---");

    let mut total_len = 0usize;
    let mut produced = 0usize;
    for i in 0..args.count {
        match engine.create_candidate() {
            Ok(text) => {
                total_len += text.chars().count();
                produced += 1;
                println!("[{}] {}", i + 1, text);
            }
            Err(e @ PipelineError::GenerationExhausted { .. }) => {
                println!("[{}] <{}>", i + 1, e);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    }

    println!("---");
    if produced > 0 {
        println!(
            "{} of {} candidates, average length {} chars",
            produced,
            args.count,
            total_len / produced
        );
    }
}
