//! Error types for the Times Gate client library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to a Times Gate device.
#[derive(Error, Debug)]
pub enum Error {
    /// A local precondition was violated. No request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport-level fault: DNS, refused connection, timeout, reset.
    #[error("Connection to device failed: {0}")]
    ConnectionFailure(#[source] reqwest::Error),

    /// The device answered with a non-success HTTP status.
    #[error("Device returned HTTP status {0}")]
    HttpStatus(u16),

    /// The response body was not a JSON object.
    #[error("Malformed response from device: {0}")]
    MalformedResponse(String),

    /// The device answered with a nonzero `error_code`.
    #[error("Command {command} rejected with error code {code}")]
    CommandRejected { command: String, code: i64 },

    /// The cloud discovery service refused the query.
    #[error("Discovery failed (return code {code}): {message}")]
    Discovery { code: i64, message: String },
}

/// Coarse failure categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    ConnectionFailure,
    MalformedResponse,
    CommandRejected,
}

impl Error {
    /// Returns the failure category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::ConnectionFailure(_) | Error::HttpStatus(_) => ErrorKind::ConnectionFailure,
            Error::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Error::CommandRejected { .. } | Error::Discovery { .. } => ErrorKind::CommandRejected,
        }
    }

    /// Whether retrying the same request may succeed.
    ///
    /// The device documents no idempotency, so the library itself never retries.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::ConnectionFailure
    }

    /// The device error code, if the device rejected the command.
    pub fn code(&self) -> Option<i64> {
        match self {
            Error::CommandRejected { code, .. } | Error::Discovery { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "invalid-argument"),
            ErrorKind::ConnectionFailure => write!(f, "connection-failure"),
            ErrorKind::MalformedResponse => write!(f, "malformed-response"),
            ErrorKind::CommandRejected => write!(f, "command-rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            Error::invalid("level").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(Error::HttpStatus(500).kind(), ErrorKind::ConnectionFailure);
        assert_eq!(
            Error::MalformedResponse("OK".into()).kind(),
            ErrorKind::MalformedResponse
        );
        let rejected = Error::CommandRejected {
            command: "Channel/SetBrightness".into(),
            code: 7,
        };
        assert_eq!(rejected.kind(), ErrorKind::CommandRejected);
        assert_eq!(rejected.code(), Some(7));
    }

    #[test]
    fn test_only_connection_failures_retry() {
        assert!(Error::HttpStatus(503).is_retryable());
        assert!(!Error::MalformedResponse(String::new()).is_retryable());
        assert!(!Error::invalid("x").is_retryable());
        assert!(!Error::CommandRejected {
            command: "Device/Reboot".into(),
            code: 1
        }
        .is_retryable());
    }
}
