//! Error taxonomy shared by every layer of the client.
//!
//! Transport and parse failures abort the current call. HTTP outcomes of a
//! completed exchange are not errors; they are reported as
//! [`DomainStatus`](crate::tidal::DomainStatus) values next to the returned
//! content.

use thiserror::Error;

use crate::tidal::DomainStatus;

/// Failures of the device-code flow and of the token lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The user has not yet entered the user code. Poll again.
    #[error("authorization pending")]
    Pending,

    /// The authorization server asks the client to poll less often.
    #[error("polling too fast, slow down")]
    SlowDown,

    /// The user refused the authorization request.
    #[error("authorization denied by user")]
    Denied,

    /// The device code expired before the user authorized it.
    #[error("device code expired")]
    Expired,

    /// The authorization server rejected the exchange.
    #[error("token exchange rejected: {0}")]
    Rejected(String),

    /// The session has no user token (unauthenticated or demo session).
    #[error("no user token available, run `tidlcli login` first")]
    NotAuthenticated,

    /// The session was logged out or shut down.
    #[error("session is logged out")]
    LoggedOut,
}

impl AuthError {
    /// True for answers the caller should keep polling through.
    pub fn is_pending(&self) -> bool {
        matches!(self, AuthError::Pending | AuthError::SlowDown)
    }
}

/// Errors that can occur when talking to the streaming API.
#[derive(Error, Debug)]
pub enum Error {
    /// No HTTP exchange completed (DNS, TLS, connection reset, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The response body is not valid or not the expected structured data.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Storage for a result container could not be grown.
    #[error("could not allocate storage for {0}")]
    Resource(String),

    /// The credential file could not be read, decoded or written.
    #[error("credential file error: {0}")]
    Persistence(String),

    #[error("index {index} out of range for container of length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("configuration error: {0}")]
    Config(String),

    /// The in-flight call was cancelled by the caller.
    #[error("request cancelled")]
    Cancelled,
}

impl Error {
    /// Status a caller reporting numerically should use for this failure.
    pub fn domain_status(&self) -> DomainStatus {
        match self {
            Error::Transport(_) | Error::Cancelled => DomainStatus::TransportFailure,
            Error::Auth(_) => DomainStatus::Unauthorized,
            _ => DomainStatus::Unclassified,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
