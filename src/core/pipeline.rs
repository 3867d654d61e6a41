/// The candidate pipeline: Corpus → Chain → {generate → extract → validate}
/// → clean, plus the publish-and-record step.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{ConfigError, GeneratorConfig};
use crate::core::cleaner::clean;
use crate::core::corpus::{Corpus, CorpusError};
use crate::core::excerpt::extract_with;
use crate::core::markov::{MarkovChain, MarkovError, StartStates};
use crate::core::validator::Validator;
use crate::publish::{ActivityLog, Publisher};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),
    #[error("markov error: {0}")]
    Markov(#[from] MarkovError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("no corpus provided")]
    NoCorpus,
    #[error("generation exhausted after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
}

/// Running totals over every `create_candidate` call on an engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttemptStats {
    pub attempts: u64,
    /// Walks that reached a state with no successors.
    pub dead_ends: u64,
    /// Excerpts turned down by the validator.
    pub rejections: u64,
    pub accepted: u64,
}

/// Holds the corpus and chain for a run and produces accepted candidates.
/// Built via `CandidateEngine::builder()`.
pub struct CandidateEngine {
    corpus: Corpus,
    chain: MarkovChain,
    starts: StartStates,
    validator: Validator,
    config: GeneratorConfig,
    rng: StdRng,
    stats: AttemptStats,
}

/// Builder for constructing a `CandidateEngine`.
pub struct CandidateEngineBuilder {
    corpus_path: Option<PathBuf>,
    /// Directly provided corpus (for testing without files).
    corpus: Option<Corpus>,
    config: GeneratorConfig,
    seed: Option<u64>,
}

impl CandidateEngine {
    pub fn builder() -> CandidateEngineBuilder {
        CandidateEngineBuilder {
            corpus_path: None,
            corpus: None,
            config: GeneratorConfig::default(),
            seed: None,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn chain(&self) -> &MarkovChain {
        &self.chain
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn stats(&self) -> AttemptStats {
        self.stats
    }

    /// Generate until an excerpt passes validation, then clean it.
    ///
    /// Gives up with `GenerationExhausted` after `max_attempts` tries. A walk
    /// that runs into the corpus's final pair counts as a failed attempt.
    pub fn create_candidate(&mut self) -> Result<String, PipelineError> {
        let attempts = self.config.max_attempts;
        let mut dead_ends = 0u32;
        let mut rejected = 0u32;

        for attempt in 1..=attempts {
            self.stats.attempts += 1;
            let text = match self
                .chain
                .generate_from(&mut self.rng, &self.starts, self.config.min_words)
            {
                Ok(text) => text,
                Err(MarkovError::MissingState(state)) => {
                    dead_ends += 1;
                    self.stats.dead_ends += 1;
                    tracing::trace!(attempt, %state, "walk reached a dead end");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let excerpt = extract_with(&text, self.config.char_limit, &self.config.sentence_stops);
            match self.validator.check(&self.corpus, &excerpt) {
                Ok(()) => {
                    self.stats.accepted += 1;
                    tracing::debug!(attempt, dead_ends, rejected, "candidate accepted");
                    return Ok(clean(&excerpt));
                }
                Err(reason) => {
                    rejected += 1;
                    self.stats.rejections += 1;
                    tracing::trace!(attempt, %reason, "candidate rejected");
                }
            }
        }

        tracing::warn!(attempts, dead_ends, rejected, "no acceptable candidate");
        Err(PipelineError::GenerationExhausted { attempts })
    }

    /// Produce `count` successive candidates.
    pub fn candidates(&mut self, count: usize) -> Result<Vec<String>, PipelineError> {
        (0..count).map(|_| self.create_candidate()).collect()
    }
}

impl CandidateEngineBuilder {
    pub fn corpus_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus_path = Some(path.into());
        self
    }

    /// Provide corpus text directly (for testing without files).
    pub fn corpus_text(mut self, text: &str) -> Self {
        self.corpus = Some(Corpus::from_text(text));
        self
    }

    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides any seed in the config.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load the corpus and build the chain. Fails before any generation if
    /// the corpus can't be read or yields no usable chain.
    pub fn build(self) -> Result<CandidateEngine, PipelineError> {
        self.config.validate()?;

        let corpus = match (self.corpus, self.corpus_path) {
            (Some(corpus), _) => corpus,
            (None, Some(path)) => Corpus::load(&path)?,
            (None, None) => return Err(PipelineError::NoCorpus),
        };

        let chain = MarkovChain::build(&corpus);
        if chain.is_empty() {
            return Err(MarkovError::EmptyChain.into());
        }

        let starts = chain.start_states(&self.config.start_filter);
        if starts.is_empty() {
            return Err(MarkovError::NoStartState.into());
        }

        let rng = match self.seed.or(self.config.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            tokens = corpus.len(),
            states = chain.len(),
            start_states = starts.len(),
            "candidate engine ready"
        );

        Ok(CandidateEngine {
            corpus,
            chain,
            starts,
            validator: Validator::new(self.config.min_length),
            config: self.config,
            rng,
            stats: AttemptStats::default(),
        })
    }
}

/// What happened to a candidate handed to a publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub text: String,
    pub published: bool,
}

/// Create one candidate, publish it, and record the result.
///
/// Publishing is best effort: a failure is recorded and reported through
/// `Outcome::published`, never returned as an error. Log write failures are
/// only traced.
pub fn run_once(
    engine: &mut CandidateEngine,
    publisher: &mut dyn Publisher,
    log: &mut dyn ActivityLog,
) -> Result<Outcome, PipelineError> {
    let text = engine.create_candidate()?;

    let (published, message) = match publisher.publish(&text) {
        Ok(()) => (true, format!("Tweeted: {}", text)),
        Err(e) => {
            tracing::warn!(error = %e, "publish failed");
            (false, e.to_string())
        }
    };

    if let Err(e) = log.record(&message) {
        tracing::warn!(error = %e, "failed to record activity");
    }

    Ok(Outcome { text, published })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::markov::State;
    use crate::publish::{LogError, MemoryLog, MemoryPublisher};

    /// Activity log whose writes always fail.
    struct BrokenLog;

    impl ActivityLog for BrokenLog {
        fn record(&mut self, _message: &str) -> Result<(), LogError> {
            Err(LogError::Io {
                path: "broken.log".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn build_test_engine(seed: u64) -> CandidateEngine {
        CandidateEngine::builder()
            .corpus_path("tests/fixtures/test_corpus.txt")
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn create_candidate_produces_valid_text() {
        let mut engine = build_test_engine(42);
        let text = engine.create_candidate().unwrap();

        assert!(!text.is_empty());
        assert!(text.chars().count() <= engine.config().char_limit + 1);
        assert!(text.ends_with(['.', '?', '!']));
        let mut words = text.split_whitespace();
        let start = State::new(words.next().unwrap(), words.next().unwrap());
        assert!(engine.config().start_filter.accepts(&start));
    }

    #[test]
    fn create_candidate_deterministic_same_seed() {
        let result1 = build_test_engine(7).candidates(3).unwrap();
        let result2 = build_test_engine(7).candidates(3).unwrap();
        assert_eq!(result1, result2);
    }

    #[test]
    fn different_seeds_eventually_differ() {
        let first = build_test_engine(1).create_candidate().unwrap();
        let found_different =
            (2..30).any(|seed| build_test_engine(seed).create_candidate().unwrap() != first);
        assert!(found_different, "Expected different output with different seeds");
    }

    #[test]
    fn exhaustion_is_bounded() {
        // No sentence stops, so every excerpt comes back empty.
        let config = GeneratorConfig {
            max_attempts: 25,
            ..GeneratorConfig::default()
        };
        let mut engine = CandidateEngine::builder()
            .corpus_text("The cat sat on the mat and The dog ran to the mat and The cat sat")
            .config(config)
            .seed(3)
            .build()
            .unwrap();

        let err = engine.create_candidate().unwrap_err();
        assert!(matches!(
            err,
            PipelineError::GenerationExhausted { attempts: 25 }
        ));
    }

    #[test]
    fn dead_end_walks_count_as_attempts() {
        // Every walk runs into the final pair ("gamma.", "Delta").
        let config = GeneratorConfig {
            max_attempts: 7,
            ..GeneratorConfig::default()
        };
        let mut engine = CandidateEngine::builder()
            .corpus_text("Alpha beta gamma. Delta")
            .config(config)
            .seed(1)
            .build()
            .unwrap();

        let err = engine.create_candidate().unwrap_err();
        assert!(matches!(
            err,
            PipelineError::GenerationExhausted { attempts: 7 }
        ));
        assert_eq!(
            engine.stats(),
            AttemptStats {
                attempts: 7,
                dead_ends: 7,
                rejections: 0,
                accepted: 0,
            }
        );
    }

    #[test]
    fn candidates_survive_occasional_dead_ends() {
        // A trailing pair with no successor, reachable from "the mind.".
        let mut text = std::fs::read_to_string("tests/fixtures/test_corpus.txt").unwrap();
        text.push_str("\nZeta omega\n");
        let mut engine = CandidateEngine::builder()
            .corpus_text(&text)
            .seed(42)
            .build()
            .unwrap();

        let candidates = engine.candidates(100).unwrap();
        assert_eq!(candidates.len(), 100);

        let stats = engine.stats();
        assert!(stats.dead_ends > 0, "expected some dead ends: {:?}", stats);
        assert_eq!(stats.accepted, 100);
        assert_eq!(
            stats.attempts,
            stats.dead_ends + stats.rejections + stats.accepted
        );
    }

    #[test]
    fn build_requires_corpus() {
        let err = CandidateEngine::builder().build().err().unwrap();
        assert!(matches!(err, PipelineError::NoCorpus));
    }

    #[test]
    fn build_missing_corpus_file() {
        let err = CandidateEngine::builder()
            .corpus_path("tests/fixtures/missing.txt")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::Corpus(_)));
    }

    #[test]
    fn build_short_corpus_is_empty_chain() {
        let err = CandidateEngine::builder()
            .corpus_text("Too short")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::Markov(MarkovError::EmptyChain)));
    }

    #[test]
    fn build_rejects_invalid_config() {
        let config = GeneratorConfig {
            max_attempts: 0,
            ..GeneratorConfig::default()
        };
        let err = CandidateEngine::builder()
            .corpus_text("One two three four")
            .config(config)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn run_once_records_success() {
        let mut engine = build_test_engine(42);
        let mut publisher = MemoryPublisher::default();
        let mut log = MemoryLog::default();

        let outcome = run_once(&mut engine, &mut publisher, &mut log).unwrap();
        assert!(outcome.published);
        assert_eq!(publisher.posts, vec![outcome.text.clone()]);
        assert_eq!(log.lines.len(), 1);
        assert!(log.lines[0].ends_with(&format!("Tweeted: {}", outcome.text)));
    }

    #[test]
    fn run_once_swallows_publish_failure() {
        let mut engine = build_test_engine(42);
        let mut publisher = MemoryPublisher {
            fail_with: Some("duplicate status".to_string()),
            ..MemoryPublisher::default()
        };
        let mut log = MemoryLog::default();

        let outcome = run_once(&mut engine, &mut publisher, &mut log).unwrap();
        assert!(!outcome.published);
        assert!(publisher.posts.is_empty());
        assert!(log.lines[0].ends_with("publish rejected: duplicate status"));
    }

    #[test]
    fn run_once_survives_log_failure() {
        let mut engine = build_test_engine(42);
        let mut publisher = MemoryPublisher::default();

        let outcome = run_once(&mut engine, &mut publisher, &mut BrokenLog).unwrap();
        assert!(outcome.published);
        assert_eq!(publisher.posts, vec![outcome.text]);
    }

    #[test]
    fn run_once_survives_missing_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = crate::publish::FileLog::in_dir(&dir.path().join("missing"), "bot");
        let mut engine = build_test_engine(42);
        let mut publisher = MemoryPublisher::default();

        let outcome = run_once(&mut engine, &mut publisher, &mut log).unwrap();
        assert!(outcome.published);
        assert!(!log.path().exists());
    }
}
