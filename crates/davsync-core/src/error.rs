use std::fmt;
use std::path::PathBuf;

/// Result type alias using [`SyncError`]
pub type Result<T> = std::result::Result<T, SyncError>;

/// The kind of a [`SyncError`], used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local traversal or read failure
    Filesystem,
    /// Remote transport, authentication or malformed response
    Protocol,
    /// The reconciliation plan failed its partition check
    InvariantViolation,
    /// An addition target already exists on the remote store
    UnexpectedRemoteState,
    /// Invalid or incomplete configuration
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Filesystem => "FilesystemError",
            Self::Protocol => "ProtocolError",
            Self::InvariantViolation => "InvariantViolation",
            Self::UnexpectedRemoteState => "UnexpectedRemoteState",
            Self::Config => "ConfigError",
        };
        f.write_str(name)
    }
}

/// Terminal error of a synchronization run
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Local filesystem failure
    #[error("{message}: {}", path.display())]
    Filesystem {
        /// What was being attempted
        message: String,
        /// Offending local path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: Option<std::io::Error>,
    },

    /// Remote store failure
    #[error("{0}")]
    Protocol(String),

    /// Reconciliation produced an inconsistent plan
    #[error("Error calculating diff: {0}")]
    InvariantViolation(String),

    /// The remote store did not look the way the plan expected
    #[error("Remote file already exists: {path}")]
    UnexpectedRemoteState {
        /// Remote path that unexpectedly exists
        path: String,
    },

    /// Configuration problem
    #[error("{0}")]
    Config(String),
}

impl SyncError {
    /// Local filesystem error with its I/O cause
    pub fn filesystem(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Filesystem {
            message: message.into(),
            path: path.into(),
            source: Some(source),
        }
    }

    /// Local filesystem error without an I/O cause
    pub fn local(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Filesystem {
            message: message.into(),
            path: path.into(),
            source: None,
        }
    }

    /// Protocol error from anything displayable
    pub fn protocol(message: impl fmt::Display) -> Self {
        Self::Protocol(message.to_string())
    }

    /// Kind of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Filesystem { .. } => ErrorKind::Filesystem,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::InvariantViolation(_) => ErrorKind::InvariantViolation,
            Self::UnexpectedRemoteState { .. } => ErrorKind::UnexpectedRemoteState,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        Self::Protocol(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(
            SyncError::protocol("boom").kind().to_string(),
            "ProtocolError"
        );
        assert_eq!(
            SyncError::InvariantViolation("x".into()).kind(),
            ErrorKind::InvariantViolation
        );
    }

    #[test]
    fn test_filesystem_message_includes_path() {
        let err = SyncError::filesystem(
            "Failed to read directory",
            "/tmp/site",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );

        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert_eq!(err.to_string(), "Failed to read directory: /tmp/site");
    }

    #[test]
    fn test_unexpected_remote_state_message() {
        let err = SyncError::UnexpectedRemoteState {
            path: "/site/a.txt".into(),
        };
        assert!(err.to_string().contains("/site/a.txt"));
    }
}
