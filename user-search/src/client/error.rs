//! Client error taxonomy
//!
//! Every failure of [`SearchClient::find_users`](super::SearchClient::find_users)
//! is one of six kinds. None are retried by the client.

use std::fmt;

use thiserror::Error;

/// Category of a client failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Local precondition failed or the server rejected the order field
    InvalidArgument,
    /// The server rejected the access token
    Unauthorized,
    /// The call exceeded the client deadline
    Timeout,
    /// A response body could not be decoded
    DecodeError,
    /// The server reported an internal error
    Fatal,
    /// Anything else, including transport failures
    UnknownError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid_argument"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Timeout => write!(f, "timeout"),
            Self::DecodeError => write!(f, "decode_error"),
            Self::Fatal => write!(f, "fatal"),
            Self::UnknownError => write!(f, "unknown_error"),
        }
    }
}

/// Classified failure of a search call
///
/// `Display` is the bare message, e.g. `"Bad AccessToken"` or
/// `"cant unpack result json: ..."`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Local precondition failed or the server rejected the order field
    #[error("{0}")]
    InvalidArgument(String),

    /// The server rejected the access token
    #[error("{0}")]
    Unauthorized(String),

    /// The call exceeded the client deadline
    #[error("{0}")]
    Timeout(String),

    /// A response body could not be decoded
    #[error("{0}")]
    Decode(String),

    /// The server reported an internal error
    #[error("{0}")]
    Fatal(String),

    /// Anything else
    #[error("{0}")]
    Unknown(String),
}

impl ClientError {
    /// Category of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Decode(_) => ErrorKind::DecodeError,
            Self::Fatal(_) => ErrorKind::Fatal,
            Self::Unknown(_) => ErrorKind::UnknownError,
        }
    }

    /// The classified message
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(msg)
            | Self::Unauthorized(msg)
            | Self::Timeout(msg)
            | Self::Decode(msg)
            | Self::Fatal(msg)
            | Self::Unknown(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message() {
        let err = ClientError::Unauthorized("Bad AccessToken".to_string());
        assert_eq!(err.to_string(), "Bad AccessToken");
        assert_eq!(err.message(), "Bad AccessToken");
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ClientError::Decode(String::new()).kind(), ErrorKind::DecodeError);
        assert_eq!(ClientError::Unknown(String::new()).kind(), ErrorKind::UnknownError);
        assert_eq!(ErrorKind::InvalidArgument.to_string(), "invalid_argument");
        assert_eq!(ErrorKind::Timeout.to_string(), "timeout");
    }
}
