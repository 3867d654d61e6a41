/// Publishing: where accepted candidates go, and the activity log that
/// records what happened to them.

use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Timestamp format for activity log lines, e.g. `18 Oct 2026 09:15:02`.
pub const LOG_TIMESTAMP_FORMAT: &str = "%d %b %Y %H:%M:%S";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish rejected: {0}")]
    Rejected(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to write activity log '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for finished posts.
pub trait Publisher {
    fn publish(&mut self, text: &str) -> Result<(), PublishError>;
}

/// Append-only record of bot activity.
pub trait ActivityLog {
    fn record(&mut self, message: &str) -> Result<(), LogError>;
}

/// Writes posts to stdout instead of a live service.
#[derive(Debug, Default)]
pub struct DryRunPublisher;

impl Publisher for DryRunPublisher {
    fn publish(&mut self, text: &str) -> Result<(), PublishError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        Ok(())
    }
}

/// Keeps posts in memory. Set `fail_with` to make every publish fail.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    pub posts: Vec<String>,
    pub fail_with: Option<String>,
}

impl Publisher for MemoryPublisher {
    fn publish(&mut self, text: &str) -> Result<(), PublishError> {
        if let Some(reason) = &self.fail_with {
            return Err(PublishError::Rejected(reason.clone()));
        }
        self.posts.push(text.to_string());
        Ok(())
    }
}

/// Format one activity log line.
pub fn format_log_line(at: DateTime<Utc>, message: &str) -> String {
    format!("{} {}", at.format(LOG_TIMESTAMP_FORMAT), message)
}

/// Activity log backed by a file. Each record is written as a newline
/// followed by a timestamped line.
#[derive(Debug, Clone)]
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log at `<dir>/<bot_name>.log`.
    pub fn in_dir(dir: &Path, bot_name: &str) -> Self {
        Self::new(dir.join(format!("{}.log", bot_name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActivityLog for FileLog {
    fn record(&mut self, message: &str) -> Result<(), LogError> {
        let io_err = |source| LogError::Io {
            path: self.path.display().to_string(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        write!(file, "\n{}", format_log_line(Utc::now(), message)).map_err(io_err)?;
        Ok(())
    }
}

/// Activity log kept in memory, one entry per record.
#[derive(Debug, Default)]
pub struct MemoryLog {
    pub lines: Vec<String>,
}

impl ActivityLog for MemoryLog {
    fn record(&mut self, message: &str) -> Result<(), LogError> {
        self.lines.push(format_log_line(Utc::now(), message));
        Ok(())
    }
}
