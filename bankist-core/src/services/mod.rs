//! Service layer - business logic
//!
//! Each service focuses on one concern; [`crate::BankContext`] wires them
//! together into the user-facing operations.

pub mod ledger;
pub mod projector;
mod scheduler;
mod session;
mod store;
pub mod timer;

pub use ledger::{parse_amount, LedgerService};
pub use projector::{movements_view, MovementsView, ViewProjector};
pub use scheduler::{schedule_once, ScheduledTask};
pub use session::{SessionManager, SessionState};
pub use store::AccountStore;
pub use timer::InactivityTimer;
