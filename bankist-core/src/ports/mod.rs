//! Port definitions (hexagonal architecture)
//!
//! Ports define the collaborators the core talks to. The core depends only
//! on these traits; adapters and the CLI provide the implementations.

mod clock;
mod formatter;
mod ui;

pub use clock::Clock;
pub use formatter::Formatter;
pub use ui::{Control, Field, InputControls, Renderer};
