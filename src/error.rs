use std::path::PathBuf;
use thiserror::Error;

/// Failure to read or parse the roster source. Never touches the published
/// snapshot: the caller logs and keeps serving the previous one.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("roster source {} is not readable: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("roster source is malformed: {0}")]
    Parse(#[from] csv::Error),
    #[error("roster watcher failed: {0}")]
    Watch(#[from] notify::Error),
}

impl LoadError {
    /// True when the source file simply is not there, which at startup means
    /// "begin with the empty roster" rather than a fatal error.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Failure to deliver one outbound message. Scoped to a single recipient;
/// batch operations log it and move on.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("platform rejected the call: {0}")]
    Api(String),
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl SendError {
    /// Transient failures are retried by the polling loop; everything else
    /// (a rejected token, a malformed call) is treated as fatal there.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Fatal configuration problem found at boot.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("BOT_TOKEN is not set")]
    MissingToken,
    #[error("{name} is set but not valid: {value}")]
    InvalidVar { name: &'static str, value: String },
}
