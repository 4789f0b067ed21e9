//! Replay Statistics

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Outcome of one file replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayStats {
    pub source: PathBuf,
    /// Lines handed to the client, delivered or not
    pub lines: usize,
    pub delivered: usize,
    pub dropped: usize,
    pub elapsed: Duration,
    /// Stopped early by SIGINT/SIGTERM
    pub interrupted: bool,
}

impl ReplayStats {
    pub fn new(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            lines: 0,
            delivered: 0,
            dropped: 0,
            elapsed: Duration::ZERO,
            interrupted: false,
        }
    }
}

/// One-line run summary written to stderr after a file replay
impl fmt::Display for ReplayStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Replayed {} lines from {} in {:.3} seconds",
            self.lines,
            self.source.display(),
            self.elapsed.as_secs_f64()
        )
    }
}
