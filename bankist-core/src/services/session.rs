//! Session manager - who is logged in
//!
//! States: `LoggedOut -> Active -> LoggedOut`. Credential checking happens
//! inside [`SessionManager::login`] and never leaves a half-open state.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::result::{Error, Result};
use crate::domain::{Pin, Session};
use crate::services::AccountStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    LoggedOut,
    Active(Session),
}

#[derive(Debug, Default)]
pub struct SessionManager {
    state: SessionState,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate against the store
    ///
    /// The PIN input is parsed with [`Pin::parse`]; non-numeric input, an
    /// unknown username and a wrong PIN all produce the same
    /// `AuthenticationRejected`. A rejected attempt leaves the current state
    /// as it was.
    pub fn login(
        &mut self,
        store: &AccountStore,
        username: &str,
        pin_input: &str,
        now: DateTime<Utc>,
    ) -> Result<Session> {
        let matched = store
            .find_by_username(username)
            .filter(|account| Pin::parse(pin_input) == Some(account.pin));

        let Some(account) = matched else {
            debug!("login rejected");
            return Err(Error::AuthenticationRejected);
        };

        let session = Session::new(account.username.clone(), now);
        if let SessionState::Active(previous) = &self.state {
            debug!(previous = %previous.username, "replacing active session");
        }
        info!(username = %session.username, session_id = %session.id, "logged in");
        self.state = SessionState::Active(session.clone());
        Ok(session)
    }

    /// End the active session; `None` when nobody was logged in
    pub fn logout(&mut self) -> Option<Session> {
        match std::mem::take(&mut self.state) {
            SessionState::Active(session) => {
                info!(username = %session.username, session_id = %session.id, "logged out");
                Some(session)
            }
            SessionState::LoggedOut => None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Active(session) => Some(session),
            SessionState::LoggedOut => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.current().is_some()
    }

    /// Username of the active account, or `NoActiveSession`
    pub fn active_username(&self) -> Result<&str> {
        self.current()
            .map(|s| s.username.as_str())
            .ok_or(Error::NoActiveSession)
    }
}
