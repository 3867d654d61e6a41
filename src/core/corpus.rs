/// Corpus loading: reads source text and normalizes it into word tokens.

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// An ordered, immutable sequence of whitespace-delimited tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    tokens: Vec<String>,
}

impl Corpus {
    /// Read a UTF-8 text file and tokenize it.
    pub fn load(path: &Path) -> Result<Corpus, CorpusError> {
        let text = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let corpus = Corpus::from_text(&text);
        tracing::debug!(path = %path.display(), tokens = corpus.len(), "corpus loaded");
        Ok(corpus)
    }

    /// Tokenize raw text.
    ///
    /// Lines are trimmed, empty lines dropped, and the remainder joined with
    /// a single space before splitting on whitespace.
    pub fn from_text(text: &str) -> Corpus {
        let joined = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Corpus {
            tokens: joined.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Find the first corpus position where `run` occurs as a contiguous
    /// token sequence.
    pub fn find_run<S: AsRef<str>>(&self, run: &[S]) -> Option<usize> {
        let first = run.first()?.as_ref();
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, tok)| tok.as_str() == first)
            .map(|(pos, _)| pos)
            .find(|&pos| match self.tokens.get(pos..pos + run.len()) {
                Some(window) => window
                    .iter()
                    .zip(run)
                    .all(|(a, b)| a.as_str() == b.as_ref()),
                None => false,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_joins_lines_and_splits_whitespace() {
        let corpus = Corpus::from_text("  The mind\n\n\tis   a tool.  \nIt works.\n");
        assert_eq!(
            corpus.tokens(),
            &["The", "mind", "is", "a", "tool.", "It", "works."]
        );
    }

    #[test]
    fn from_text_empty_input() {
        let corpus = Corpus::from_text("\n   \n\n");
        assert!(corpus.is_empty());
        assert_eq!(corpus.len(), 0);
    }

    #[test]
    fn tokens_never_contain_whitespace() {
        let corpus = Corpus::from_text("a\u{a0}b c\r\nd\te");
        for tok in corpus.tokens() {
            assert!(!tok.chars().any(char::is_whitespace), "token: {:?}", tok);
        }
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Corpus::load(Path::new("target/definitely_missing_corpus.txt")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
        assert!(err.to_string().contains("definitely_missing_corpus.txt"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        std::fs::write(&path, "One two\nthree four.\n").unwrap();

        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.len(), 4);
    }

    #[test]
    fn find_run_locates_contiguous_tokens() {
        let corpus = Corpus::from_text("A B C D E");
        assert_eq!(corpus.find_run(&["C", "D", "E"]), Some(2));
        assert_eq!(corpus.find_run(&["A"]), Some(0));
        assert_eq!(corpus.find_run(&["C", "E"]), None);
        assert_eq!(corpus.find_run(&["D", "E", "F"]), None);
        assert_eq!(corpus.find_run::<&str>(&[]), None);
    }

    #[test]
    fn find_run_checks_every_candidate_start() {
        let corpus = Corpus::from_text("x y x z x y w");
        assert_eq!(corpus.find_run(&["x", "y", "w"]), Some(4));
    }
}
