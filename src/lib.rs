//! Markov Ebooks: corpus-driven pseudo-text for "ebooks" bots.
//!
//! Builds a second-order word Markov chain from a fixed corpus, walks it to
//! generate text, cuts the result at a sentence boundary within a character
//! budget, and filters out degenerate or plagiarized candidates before
//! handing the cleaned text to a publisher.

pub mod config;
pub mod core;
pub mod publish;

pub use crate::config::GeneratorConfig;
pub use crate::core::pipeline::{run_once, AttemptStats, CandidateEngine, Outcome, PipelineError};
