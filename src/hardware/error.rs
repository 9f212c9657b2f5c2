use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProbeError>;

/// Errors raised while probing the host.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{tool} is not available: {source}")]
    Unavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} timed out after {after:?}")]
    Timeout { tool: String, after: Duration },

    #[error("{tool} exited with status {code:?}: {stderr}")]
    Failed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("could not parse {tool} output: {message}")]
    Parse { tool: String, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification so callers can decide whether a later retry of the
/// whole collection is worth it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unavailable,
    Timeout,
    Failed,
    Parse,
    Read,
}

impl ProbeError {
    pub fn parse(tool: &str, message: impl Into<String>) -> Self {
        ProbeError::Parse {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProbeError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProbeError::Unavailable { .. } => ErrorKind::Unavailable,
            ProbeError::Timeout { .. } => ErrorKind::Timeout,
            ProbeError::Failed { .. } => ErrorKind::Failed,
            ProbeError::Parse { .. } => ErrorKind::Parse,
            ProbeError::Read { .. } | ProbeError::Io(_) => ErrorKind::Read,
        }
    }

    /// A hung or failing tool may succeed on a later run; a missing tool or
    /// malformed output will not.
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), ErrorKind::Timeout | ErrorKind::Failed)
    }
}
