//! Mission parsing errors.
//!
//! Log content never produces an error on its own: malformed lines degrade
//! to absent fields. Only the inability to read the source is fatal.

use std::path::PathBuf;

/// Errors that can occur while parsing a log.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid marker pattern '{name}': {source}")]
    Grammar {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}
