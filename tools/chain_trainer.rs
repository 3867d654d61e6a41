/// Chain Trainer: builds a Markov chain from a corpus and saves it as RON.
///
/// Usage: chain_trainer --input <file.txt> --output <chain.ron>
use clap::Parser;
use std::path::PathBuf;
use std::process;

use markov_ebooks::core::corpus::Corpus;
use markov_ebooks::core::markov::{save_chain, MarkovChain, StartFilter};

#[derive(Debug, Parser)]
#[command(name = "chain_trainer", about = "Build a Markov chain from a corpus")]
struct Args {
    /// Source corpus (UTF-8 text).
    #[arg(long)]
    input: PathBuf,

    /// Where to write the chain.
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    let args = Args::parse();

    let corpus = Corpus::load(&args.input).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    println!("Building chain from '{}'...", args.input.display());
    let chain = MarkovChain::build(&corpus);

    println!(
        "Chain built: {} tokens, {} unique states, {} transitions, {} starting states",
        corpus.len(),
        chain.len(),
        chain.transition_count(),
        chain.start_states(&StartFilter::default()).len()
    );

    if chain.is_empty() {
        eprintln!("Warning: corpus has fewer than 3 tokens; the chain is empty");
    }

    save_chain(&chain, &args.output).unwrap_or_else(|e| {
        eprintln!("Error saving chain to '{}': {}", args.output.display(), e);
        process::exit(1);
    });

    println!("Chain saved to '{}'", args.output.display());
}
