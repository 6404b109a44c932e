//! Error types for pagewise.

use std::fmt;

/// Errors that can occur while chunking or paginating.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred while reading input data.
    Io(std::io::Error),

    /// A caller-supplied argument or configuration value was rejected.
    InvalidArgument {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The HTTP client could not be constructed.
    Client(reqwest::Error),

    /// A page could not be fetched or decoded.
    ///
    /// Ends the iteration it occurred in. Records yielded before the failure
    /// remain valid.
    FetchFailure {
        /// The 1-based page number that failed.
        page: u32,
        /// What went wrong.
        kind: FetchErrorKind,
    },
}

/// Classification of a page fetch failure.
#[derive(Debug)]
pub enum FetchErrorKind {
    /// The request never produced a complete response (connect, timeout, TLS,
    /// truncated body).
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a non-success status code.
    Status(u16),

    /// The body was not a JSON array.
    Decode(String),

    /// A page element was not an object or lacked the extraction key.
    MissingField {
        /// The configured extraction key.
        key: String,
        /// Position of the element within its page.
        index: usize,
    },
}

impl FetchErrorKind {
    /// Returns true if fetching the same page again might succeed.
    ///
    /// Transport errors, 5xx and 429 are retryable. Everything else is a
    /// property of the response itself and will not change on a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchErrorKind::Transport(_) => true,
            FetchErrorKind::Status(code) => *code == 429 || (500..600).contains(code),
            FetchErrorKind::Decode(_) | FetchErrorKind::MissingField { .. } => false,
        }
    }
}

impl Error {
    /// Creates a fetch failure for `page`.
    pub fn fetch(page: u32, kind: FetchErrorKind) -> Self {
        Error::FetchFailure { page, kind }
    }

    /// Returns true if this error is a retryable fetch failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::FetchFailure { kind, .. } => kind.is_retryable(),
            _ => false,
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorKind::Transport(e) => write!(f, "transport error: {}", e),
            FetchErrorKind::Status(code) => write!(f, "unexpected status {}", code),
            FetchErrorKind::Decode(msg) => write!(f, "decode error: {}", msg),
            FetchErrorKind::MissingField { key, index } => {
                write!(f, "record {} has no field {:?}", index, key)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::InvalidArgument { message } => write!(f, "invalid argument: {}", message),
            Error::Client(e) => write!(f, "http client error: {}", e),
            Error::FetchFailure { page, kind } => {
                write!(f, "failed to fetch page {}: {}", page, kind)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Client(e) => Some(e),
            Error::FetchFailure {
                kind: FetchErrorKind::Transport(e),
                ..
            } => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Client(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_display() {
        let err = Error::InvalidArgument {
            message: "chunk size must be positive",
        };
        assert_eq!(
            err.to_string(),
            "invalid argument: chunk size must be positive"
        );

        let err = Error::fetch(2, FetchErrorKind::Status(503));
        assert_eq!(err.to_string(), "failed to fetch page 2: unexpected status 503");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(FetchErrorKind::Status(500).is_retryable());
        assert!(FetchErrorKind::Status(503).is_retryable());
        assert!(FetchErrorKind::Status(429).is_retryable());
        assert!(!FetchErrorKind::Status(404).is_retryable());
        assert!(!FetchErrorKind::Decode("eof".into()).is_retryable());
        assert!(
            !FetchErrorKind::MissingField {
                key: "body".into(),
                index: 0
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_transport_is_retryable_and_chained() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = Error::fetch(2, FetchErrorKind::Transport(Box::new(io_err)));
        assert!(err.is_retryable());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("page 2"));
    }

    #[test]
    fn test_invalid_argument_not_retryable() {
        let err = Error::InvalidArgument { message: "nope" };
        assert!(!err.is_retryable());
    }
}
