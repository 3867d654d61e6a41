/// Second-order Markov chain: construction, persistence, and random walks.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::corpus::Corpus;

#[derive(Debug, Error)]
pub enum MarkovError {
    #[error("chain is empty (corpus needs at least 3 tokens)")]
    EmptyChain,
    #[error("no chain state passes the starting-state filter")]
    NoStartState,
    #[error("state {0} has no successors in the chain")]
    MissingState(State),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON serialization error: {0}")]
    RonSer(#[from] ron::Error),
}

/// Characters that disqualify the second token of a starting state when
/// they end it.
pub const DEFAULT_START_TERMINATORS: &[char] = &['.', '!', '?', '[', ']', '(', ')'];

/// A pair of consecutive tokens used as a chain key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    pub first: String,
    pub second: String,
}

impl State {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Shift left by one token, appending `next`.
    fn advance(&self, next: &str) -> State {
        State::new(self.second.clone(), next)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.first, self.second)
    }
}

/// Heuristic that keeps generated text from opening mid-sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartFilter {
    /// A state is rejected when its second token ends in one of these.
    pub terminators: Vec<char>,
    /// Reject states whose first token starts lowercase.
    pub reject_lowercase: bool,
    /// Reject states whose first token does not start with a letter.
    pub reject_non_alphabetic: bool,
}

impl Default for StartFilter {
    fn default() -> Self {
        Self {
            terminators: DEFAULT_START_TERMINATORS.to_vec(),
            reject_lowercase: true,
            reject_non_alphabetic: true,
        }
    }
}

impl StartFilter {
    pub fn accepts(&self, state: &State) -> bool {
        if let Some(last) = state.second.chars().last() {
            if self.terminators.contains(&last) {
                return false;
            }
        }
        match state.first.chars().next() {
            Some(c) if self.reject_lowercase && c.is_lowercase() => false,
            Some(c) if self.reject_non_alphabetic && !c.is_alphabetic() => false,
            Some(_) => true,
            None => !self.reject_non_alphabetic,
        }
    }
}

/// Indices of the chain states that may open a generated passage.
#[derive(Debug, Clone, Default)]
pub struct StartStates(Vec<usize>);

impl StartStates {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Transition table from a two-token state to its observed successors.
///
/// Successors keep corpus order with repeats, so uniform sampling over the
/// list follows the observed transition frequencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ChainRecord", into = "ChainRecord")]
pub struct MarkovChain {
    transitions: FxHashMap<State, Vec<String>>,
    /// Keys in first-seen order; sampling goes through this so a seeded
    /// walk never depends on hash iteration order.
    order: Vec<State>,
}

impl MarkovChain {
    /// Build the chain from every window of three consecutive tokens.
    pub fn build(corpus: &Corpus) -> MarkovChain {
        let mut chain = MarkovChain::default();
        for window in corpus.tokens().windows(3) {
            let state = State::new(window[0].clone(), window[1].clone());
            chain.add_transition(state, window[2].clone());
        }
        tracing::debug!(
            states = chain.len(),
            transitions = chain.transition_count(),
            "markov chain built"
        );
        chain
    }

    fn add_transition(&mut self, state: State, next: String) {
        match self.transitions.get_mut(&state) {
            Some(successors) => successors.push(next),
            None => {
                self.order.push(state.clone());
                self.transitions.insert(state, vec![next]);
            }
        }
    }

    /// Number of distinct states.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of recorded transitions, repeats included.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(Vec::len).sum()
    }

    /// States in the order they were first observed.
    pub fn states(&self) -> &[State] {
        &self.order
    }

    pub fn successors(&self, state: &State) -> Option<&[String]> {
        self.transitions.get(state).map(Vec::as_slice)
    }

    /// Collect the states accepted by `filter` as walk starting points.
    pub fn start_states(&self, filter: &StartFilter) -> StartStates {
        StartStates(
            self.order
                .iter()
                .enumerate()
                .filter(|(_, state)| filter.accepts(state))
                .map(|(i, _)| i)
                .collect(),
        )
    }

    /// Take one step: sample a successor uniformly and shift the state.
    fn step(&self, state: &State, rng: &mut StdRng) -> Result<State, MarkovError> {
        let next = self
            .transitions
            .get(state)
            .and_then(|successors| successors.choose(rng))
            .ok_or_else(|| MarkovError::MissingState(state.clone()))?;
        Ok(state.advance(next))
    }

    /// Generate text from a random accepted starting state.
    ///
    /// Emits the starting pair, then `min_words` times advances the cursor
    /// twice and emits the resulting pair. Every token is followed by a
    /// space, so the output carries a trailing space.
    pub fn generate(
        &self,
        rng: &mut StdRng,
        filter: &StartFilter,
        min_words: usize,
    ) -> Result<String, MarkovError> {
        let starts = self.start_states(filter);
        self.generate_from(rng, &starts, min_words)
    }

    /// Like [`MarkovChain::generate`], with the starting states precomputed.
    pub fn generate_from(
        &self,
        rng: &mut StdRng,
        starts: &StartStates,
        min_words: usize,
    ) -> Result<String, MarkovError> {
        if self.is_empty() {
            return Err(MarkovError::EmptyChain);
        }

        let mut state = starts
            .0
            .choose(rng)
            .and_then(|&i| self.order.get(i))
            .cloned()
            .ok_or(MarkovError::NoStartState)?;

        let mut output = String::new();
        push_state(&mut output, &state);

        for _ in 0..min_words {
            state = self.step(&state, rng)?;
            state = self.step(&state, rng)?;
            push_state(&mut output, &state);
        }

        Ok(output)
    }
}

fn push_state(output: &mut String, state: &State) {
    output.push_str(&state.first);
    output.push(' ');
    output.push_str(&state.second);
    output.push(' ');
}

/// Serialized form of a chain: entries in first-seen order.
#[derive(Serialize, Deserialize)]
struct ChainRecord {
    entries: Vec<ChainEntry>,
}

#[derive(Serialize, Deserialize)]
struct ChainEntry {
    state: State,
    successors: Vec<String>,
}

impl From<MarkovChain> for ChainRecord {
    fn from(mut chain: MarkovChain) -> Self {
        let entries = chain
            .order
            .into_iter()
            .map(|state| {
                let successors = chain.transitions.remove(&state).unwrap_or_default();
                ChainEntry { state, successors }
            })
            .collect();
        ChainRecord { entries }
    }
}

impl From<ChainRecord> for MarkovChain {
    fn from(record: ChainRecord) -> Self {
        let mut chain = MarkovChain::default();
        for entry in record.entries {
            for next in entry.successors {
                chain.add_transition(entry.state.clone(), next);
            }
        }
        chain
    }
}

/// Save a chain to a RON file.
pub fn save_chain(chain: &MarkovChain, path: &std::path::Path) -> Result<(), MarkovError> {
    let serialized = ron::ser::to_string_pretty(chain, ron::ser::PrettyConfig::default())?;
    std::fs::write(path, serialized)?;
    Ok(())
}

/// Load a chain from a RON file.
pub fn load_chain(path: &std::path::Path) -> Result<MarkovChain, MarkovError> {
    let contents = std::fs::read_to_string(path)?;
    let chain: MarkovChain = ron::from_str(&contents)?;
    Ok(chain)
}
