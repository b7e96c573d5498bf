//! Result and error types for the core library
//!
//! Every rejection is local: an operation that returns one of these errors
//! has not changed any account or session state.

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// A transfer, loan or close precondition failed
    #[error("Validation rejected: {0}")]
    ValidationRejected(String),

    /// Login failed. Unknown user and wrong PIN are deliberately not told apart.
    #[error("Authentication rejected")]
    AuthenticationRejected,

    /// The inactivity timer ended the session
    #[error("Session expired")]
    SessionExpired,

    #[error("Not found: {0}")]
    NotFound(String),

    /// An authenticated action was attempted while logged out
    #[error("No active session")]
    NoActiveSession,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::ValidationRejected(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True for the "silently do nothing" class of outcomes
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::ValidationRejected(_)
                | Self::AuthenticationRejected
                | Self::NotFound(_)
                | Self::NoActiveSession
        )
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_classified() {
        assert!(Error::rejected("amount must be positive").is_rejection());
        assert!(Error::AuthenticationRejected.is_rejection());
        assert!(Error::not_found("zz").is_rejection());
        assert!(!Error::SessionExpired.is_rejection());
        assert!(!Error::Io(std::io::Error::other("disk")).is_rejection());
    }

    #[test]
    fn test_authentication_message_does_not_leak_cause() {
        let msg = Error::AuthenticationRejected.to_string();
        assert_eq!(msg, "Authentication rejected");
    }
}
