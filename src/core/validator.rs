/// Candidate validation: rejects degenerate excerpts and verbatim copies of
/// the source corpus.

use std::fmt;

use crate::core::corpus::Corpus;

/// Default minimum excerpt length, in chars.
pub const DEFAULT_MIN_LENGTH: usize = 5;

/// Why an excerpt was turned down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    LowercaseStart,
    TooShort { len: usize, min: usize },
    /// The excerpt's tokens appear unchanged at this corpus position.
    Verbatim { position: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "no sentence boundary in window"),
            Rejection::LowercaseStart => write!(f, "starts with a lowercase letter"),
            Rejection::TooShort { len, min } => write!(f, "too short ({len} < {min} chars)"),
            Rejection::Verbatim { position } => {
                write!(f, "copies the corpus verbatim at token {position}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    pub min_length: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl Validator {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn is_valid(&self, corpus: &Corpus, excerpt: &str) -> bool {
        self.check(corpus, excerpt).is_ok()
    }

    /// Check an excerpt, reporting the first rule it breaks.
    pub fn check(&self, corpus: &Corpus, excerpt: &str) -> Result<(), Rejection> {
        let Some(first) = excerpt.chars().next() else {
            return Err(Rejection::Empty);
        };
        if first.is_lowercase() {
            return Err(Rejection::LowercaseStart);
        }

        let len = excerpt.chars().count();
        if len < self.min_length {
            return Err(Rejection::TooShort {
                len,
                min: self.min_length,
            });
        }

        let tokens: Vec<&str> = excerpt.split_whitespace().collect();
        match corpus.find_run(&tokens) {
            Some(position) => Err(Rejection::Verbatim { position }),
            None => Ok(()),
        }
    }
}
