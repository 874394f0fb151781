//! Error types for the Sportify client core.

use thiserror::Error;

/// Errors surfaced to the action that initiated a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Signup rejected by the backend (e.g. duplicate email)
    #[error("{0}")]
    Validation(String),

    /// Login rejected by the backend
    #[error("{0}")]
    InvalidCredentials(String),

    /// 401 on an authenticated call. Logout and redirect already happened.
    #[error("Session expired, please log in again")]
    AuthExpired,

    /// 404, used to tell "profile absent" apart from real failures
    #[error("{0}")]
    NotFound(String),

    /// Any other non-2xx status or malformed payload
    #[error("{0}")]
    Server(String),

    /// No response at all (connection refused, timeout, ...)
    #[error("Request failed: {0}")]
    Network(String),

    /// Rejected locally before contacting the backend
    #[error("{0}")]
    Rejected(Rejection),

    /// The action needs a session with a known user id
    #[error("User ID not found")]
    NotAuthenticated,

    /// Local input rule violated
    #[error("{0}")]
    InvalidInput(#[from] ValueObjectError),
}

/// Why a join/leave was refused without a network call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Event is full")]
    EventFull,

    #[error("You have already joined this event")]
    AlreadyJoined,

    #[error("Join request already sent for this event")]
    PendingJoin,

    #[error("A request for this event is already in progress")]
    InFlight,
}

/// Failure to extract claims from a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("token does not have three dot-separated segments")]
    MalformedToken,

    #[error("claims segment is not valid base64url: {0}")]
    Base64(String),

    #[error("claims segment is not a JSON object: {0}")]
    Json(String),

    #[error("token has no usable `sub` claim")]
    MissingSubject,
}

/// Violation of a value object rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must be a positive integer")]
    NotPositive(&'static str),

    #[error("unknown gender '{0}', expected Male, Female or Others")]
    UnknownGender(String),
}

/// Failure of the persistent key/value backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
