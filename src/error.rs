use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level failures of the terminal front end.
///
/// The game core itself never fails; everything here comes from the
/// terminal or the filesystem.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error("cannot open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A global subscriber was already installed in this process.
    #[error("cannot install tracing subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}
