//! UI ports - rendering and input surfaces

use rust_decimal::Decimal;

use crate::domain::{LogoutReason, ViewBundle};

/// Receives everything the user should see
pub trait Renderer: Send + Sync {
    /// Redraw balance, summary and movement list
    fn update_view(&self, view: &ViewBundle);

    /// Reveal the authenticated area with a welcome line
    fn show_session(&self, welcome: &str);

    /// Hide the authenticated area
    fn hide_session(&self, reason: LogoutReason);

    /// Remaining inactivity time as `mm:ss`
    fn timer_tick(&self, remaining: &str);

    /// A deferred loan finished; `landed` is false when it was dropped
    fn loan_settled(&self, amount: Decimal, landed: bool);
}

/// Input fields the core may ask to clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    LoginUsername,
    LoginPin,
    TransferTo,
    TransferAmount,
    LoanAmount,
    CloseUsername,
    ClosePin,
}

/// Controls the core may disable while work is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    LoanRequest,
}

/// Receives "clear this field" and "disable this control" signals
pub trait InputControls: Send + Sync {
    fn clear(&self, field: Field);

    fn set_enabled(&self, control: Control, enabled: bool);
}
