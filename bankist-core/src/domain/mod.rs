//! Core domain entities
//!
//! Plain data structures with validation logic - no I/O, no timers.

mod account;
mod movement;
pub mod result;
mod session;
mod view;

pub use account::{derive_username, Account, Pin};
pub use movement::{exact_add, MovementKind};
pub use session::{LogoutReason, Session};
pub use view::{MovementRow, SortOrder, ViewBundle};
