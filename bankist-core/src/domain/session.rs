//! Session domain model

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The runtime record of which account is authenticated
///
/// Holds the account's username only; the store owns the account itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub username: String,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(username: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            started_at,
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    /// Explicit logout
    Manual,
    /// Inactivity timer reached zero
    Expired,
    /// The active account was closed
    AccountClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_session_gets_its_own_id() {
        let now = Utc::now();
        let a = Session::new("am", now);
        let b = Session::new("am", now);
        assert_ne!(a.id, b.id);
        assert_eq!(a.username, b.username);
    }
}
