//! Bankist Core - session and ledger logic for the Bankist demo bank
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Core entities (Account, Session, ViewBundle, errors)
//! - **ports**: Trait definitions for collaborators (Clock, Formatter, Renderer, InputControls)
//! - **services**: Business logic (store, ledger, sessions, timer, projector)
//! - **adapters**: Concrete implementations (system clock, locale formatter, demo data)
//!
//! [`BankContext`] is the single entry point: every user action is a method
//! on it. Methods that start the inactivity timer or schedule a loan must be
//! called from within a tokio runtime.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use anyhow::Context;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use adapters::{demo, LocaleFormatter, SystemClock};
use config::Config;
use ports::{Clock, Control, Field, Formatter, InputControls, Renderer};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{Account, LogoutReason, MovementKind, MovementRow, Pin, Session, SortOrder, ViewBundle};

/// The collaborators the core talks to
#[derive(Clone)]
pub struct Collaborators {
    pub clock: Arc<dyn Clock>,
    pub formatter: Arc<dyn Formatter>,
    pub renderer: Arc<dyn Renderer>,
    pub inputs: Arc<dyn InputControls>,
}

impl Collaborators {
    /// Wall clock and built-in formatter, with the given UI
    pub fn with_ui<U>(ui: Arc<U>) -> Self
    where
        U: Renderer + InputControls + 'static,
    {
        Self {
            clock: Arc::new(SystemClock),
            formatter: Arc::new(LocaleFormatter),
            renderer: ui.clone(),
            inputs: ui,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Mutable application state, guarded by one lock
struct BankState {
    store: AccountStore,
    sessions: SessionManager,
    order: SortOrder,
    pending_loan: Option<ScheduledTask>,
    /// How the last session ended, until the next login
    ended: Option<LogoutReason>,
}

struct Shared {
    config: Config,
    ledger: LedgerService,
    timer: InactivityTimer,
    state: Mutex<BankState>,
    collaborators: Collaborators,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, BankState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn projector(&self) -> ViewProjector<'_> {
        ViewProjector::new(self.collaborators.formatter.as_ref())
    }

    /// Project the active account, if there is one
    fn active_view(&self, state: &BankState) -> Option<ViewBundle> {
        let username = state.sessions.current()?.username.as_str();
        let account = state.store.find_by_username(username)?;
        Some(
            self.projector()
                .project(account, state.order, self.collaborators.clock.now()),
        )
    }

    /// Timer expiry: only ends the session the countdown was started for,
    /// and only if no activity restarted the countdown since
    fn expire(&self, session_id: Uuid, generation: u64) {
        let mut state = self.state();
        if !self.timer.is_current(generation) {
            debug!(generation, "ignoring superseded expiry");
            return;
        }
        if state.sessions.current().map(|s| s.id) != Some(session_id) {
            return;
        }
        if let Some(session) = state.sessions.logout() {
            info!(username = %session.username, "session expired after inactivity");
        }
        state.ended = Some(LogoutReason::Expired);
        drop(state);
        self.collaborators.renderer.hide_session(LogoutReason::Expired);
    }

    /// Deferred loan commit
    fn finish_loan(&self, username: &str, amount: Decimal) {
        let mut state = self.state();
        state.pending_loan = None;
        let now = self.collaborators.clock.now();
        let landed = match self.ledger.commit_loan(&mut state.store, username, amount, now) {
            Ok(()) => true,
            Err(e) => {
                warn!(%username, %amount, error = %e, "dropping approved loan");
                false
            }
        };
        let view = self
            .active_view(&state)
            .filter(|view| landed && view.username == username);
        drop(state);

        let ui = &self.collaborators;
        ui.inputs.set_enabled(Control::LoanRequest, true);
        ui.renderer.loan_settled(amount, landed);
        if let Some(view) = view {
            ui.renderer.update_view(&view);
        }
    }
}

/// Main context for Bankist operations
///
/// Owns the account store, the single session, the inactivity timer and the
/// collaborators. Cloning is cheap and every clone drives the same bank.
#[derive(Clone)]
pub struct BankContext {
    inner: Arc<Shared>,
}

impl BankContext {
    /// Build a context over the given accounts
    pub fn new(config: Config, accounts: Vec<Account>, collaborators: Collaborators) -> Result<Self> {
        let store = AccountStore::new(accounts)?;
        info!(accounts = store.len(), "account store ready");
        Ok(Self {
            inner: Arc::new(Shared {
                ledger: LedgerService::new(config.loan_min_movement_ratio),
                timer: InactivityTimer::new(config.logout_after_secs, config.tick),
                config,
                state: Mutex::new(BankState {
                    store,
                    sessions: SessionManager::new(),
                    order: SortOrder::default(),
                    pending_loan: None,
                    ended: None,
                }),
                collaborators,
            }),
        })
    }

    /// Load config from `bankist_dir` and seed the store from the configured
    /// seed file, or the demo accounts when there is none
    pub fn open(bankist_dir: &Path, collaborators: Collaborators) -> anyhow::Result<Self> {
        let config = Config::load(bankist_dir)?;
        let accounts = match &config.seed_file {
            Some(path) => demo::load_accounts(path)
                .with_context(|| format!("Failed to load accounts from {:?}", path))?,
            None => demo::generate_demo_accounts(),
        };
        Ok(Self::new(config, accounts, collaborators)?)
    }

    fn state(&self) -> MutexGuard<'_, BankState> {
        self.inner.state()
    }

    fn collaborators(&self) -> &Collaborators {
        &self.inner.collaborators
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Username of the active account, explaining why there is none
    fn require_session(state: &BankState) -> Result<String> {
        match state.sessions.current() {
            Some(session) => Ok(session.username.clone()),
            None if state.ended == Some(LogoutReason::Expired) => Err(Error::SessionExpired),
            None => Err(Error::NoActiveSession),
        }
    }

    /// Restart the inactivity countdown for `session_id`
    ///
    /// Called with the state lock held, so an expiry waiting on that lock
    /// sees the new generation and backs off.
    fn restart_timer(&self, session_id: Uuid) {
        let on_tick = Arc::downgrade(&self.inner);
        let on_expire: Weak<Shared> = Arc::downgrade(&self.inner);
        self.inner.timer.reset(
            move |remaining| {
                if let Some(shared) = on_tick.upgrade() {
                    shared.collaborators.renderer.timer_tick(remaining);
                }
            },
            move |generation| {
                if let Some(shared) = on_expire.upgrade() {
                    shared.expire(session_id, generation);
                }
            },
        );
    }

    /// Log in with raw username and PIN input
    ///
    /// On success the authenticated area is shown, the full view is
    /// rendered, the sort order goes back to chronological and the
    /// inactivity timer restarts. On failure nothing changes.
    pub fn login(&self, username: &str, pin: &str) -> Result<Session> {
        let mut guard = self.state();
        let state = &mut *guard;
        let now = self.collaborators().clock.now();
        let session = state.sessions.login(&state.store, username, pin, now)?;
        state.order = SortOrder::Chronological;
        state.ended = None;
        let view = self.inner.active_view(state);
        let welcome = state
            .store
            .find_by_username(&session.username)
            .map(|a| format!("Welcome back, {}", a.first_name()))
            .unwrap_or_default();
        self.restart_timer(session.id);
        drop(guard);

        let ui = self.collaborators();
        ui.inputs.clear(Field::LoginUsername);
        ui.inputs.clear(Field::LoginPin);
        ui.renderer.show_session(&welcome);
        if let Some(view) = view {
            ui.renderer.update_view(&view);
        }
        Ok(session)
    }

    /// End the active session
    pub fn logout(&self) -> Result<()> {
        let mut state = self.state();
        if state.sessions.logout().is_none() {
            return Err(Error::NoActiveSession);
        }
        state.ended = Some(LogoutReason::Manual);
        drop(state);

        self.inner.timer.stop();
        self.collaborators()
            .renderer
            .hide_session(LogoutReason::Manual);
        Ok(())
    }

    /// Transfer from the active account to `to`
    pub fn transfer(&self, to: &str, amount: &str) -> Result<()> {
        let amount = parse_amount(amount)?;
        let mut state = self.state();
        let sender = Self::require_session(&state)?;
        let session_id = state.sessions.current().map(|s| s.id);
        let now = self.collaborators().clock.now();
        self.inner
            .ledger
            .record_transfer(&mut state.store, &sender, to, amount, now)?;
        let view = self.inner.active_view(&state);
        if let Some(id) = session_id {
            self.restart_timer(id);
        }
        drop(state);

        let ui = self.collaborators();
        ui.inputs.clear(Field::TransferAmount);
        ui.inputs.clear(Field::TransferTo);
        if let Some(view) = view {
            ui.renderer.update_view(&view);
        }
        Ok(())
    }

    /// Request a loan for the active account
    ///
    /// Returns the granted (floored) amount. The money lands after the
    /// configured delay; until then the loan control is disabled and further
    /// requests are rejected.
    pub fn request_loan(&self, amount: &str) -> Result<Decimal> {
        let requested = parse_amount(amount)?;
        let mut state = self.state();
        let username = Self::require_session(&state)?;
        let session_id = state.sessions.current().map(|s| s.id);
        if state.pending_loan.is_some() {
            return Err(Error::rejected("a loan is already being processed"));
        }
        let account = state
            .store
            .find_by_username(&username)
            .ok_or_else(|| Error::not_found(format!("account {username}")))?;
        let granted = self.inner.ledger.check_loan(account, requested)?;

        let shared = Arc::downgrade(&self.inner);
        let owner = username.clone();
        let task = schedule_once(self.inner.config.loan_delay, move || {
            if let Some(shared) = shared.upgrade() {
                shared.finish_loan(&owner, granted);
            }
        });
        info!(%username, amount = %granted, task = %task.id(), "loan approved, commit scheduled");
        state.pending_loan = Some(task);
        if let Some(id) = session_id {
            self.restart_timer(id);
        }
        drop(state);

        let ui = self.collaborators();
        ui.inputs.set_enabled(Control::LoanRequest, false);
        ui.inputs.clear(Field::LoanAmount);
        Ok(granted)
    }

    /// Close the active account when both credentials match it
    ///
    /// The account is removed from the store and the session ends.
    pub fn close_account(&self, username: &str, pin: &str) -> Result<Account> {
        let mut state = self.state();
        let active = Self::require_session(&state)?;
        let closed = self.inner.ledger.close_account(
            &mut state.store,
            &active,
            username,
            Pin::parse(pin),
        )?;
        state.sessions.logout();
        state.ended = Some(LogoutReason::AccountClosed);
        drop(state);

        self.inner.timer.stop();
        let ui = self.collaborators();
        ui.inputs.clear(Field::CloseUsername);
        ui.inputs.clear(Field::ClosePin);
        ui.renderer.hide_session(LogoutReason::AccountClosed);
        Ok(closed)
    }

    /// Flip the movement order and redraw
    pub fn toggle_sort(&self) -> Result<SortOrder> {
        let mut state = self.state();
        Self::require_session(&state)?;
        state.order = state.order.toggled();
        let order = state.order;
        let view = self.inner.active_view(&state);
        drop(state);

        if let Some(view) = view {
            self.collaborators().renderer.update_view(&view);
        }
        Ok(order)
    }

    /// Recompute and render the active account's view
    pub fn update_view(&self) -> Result<ViewBundle> {
        let view = self.view()?;
        self.collaborators().renderer.update_view(&view);
        Ok(view)
    }

    /// Project the active account without rendering
    pub fn view(&self) -> Result<ViewBundle> {
        let state = self.state();
        let username = Self::require_session(&state)?;
        self.inner
            .active_view(&state)
            .ok_or_else(|| Error::not_found(format!("account {username}")))
    }

    pub fn session(&self) -> Option<Session> {
        self.state().sessions.current().cloned()
    }

    /// Snapshot of the store
    pub fn accounts(&self) -> Vec<Account> {
        self.state().store.accounts().to_vec()
    }

    pub fn find_account(&self, username: &str) -> Option<Account> {
        self.state().store.find_by_username(username).cloned()
    }

    pub fn timer_running(&self) -> bool {
        self.inner.timer.is_running()
    }

    pub fn loan_pending(&self) -> bool {
        self.state().pending_loan.is_some()
    }

    /// Stop the timer and cancel any pending loan commit
    pub fn shutdown(&self) {
        self.inner.timer.stop();
        if let Some(task) = self.state().pending_loan.take() {
            task.cancel();
        }
        info!("bank context shut down");
    }
}
