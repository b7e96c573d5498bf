//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - System and manual clocks for the Clock port
//! - A built-in locale table for the Formatter port
//! - An in-memory recorder for the Renderer and InputControls ports
//! - Demo accounts for seeding the store

pub mod clock;
pub mod demo;
pub mod formatter;
pub mod recording;

pub use clock::{ManualClock, SystemClock};
pub use formatter::LocaleFormatter;
pub use recording::{RecordingUi, UiEvent};
