//! In-memory UI adapter that records every signal it receives
//!
//! Stands in for a real screen in tests and in non-interactive CLI commands.

use std::sync::Mutex;

use rust_decimal::Decimal;

use crate::domain::{LogoutReason, ViewBundle};
use crate::ports::{Control, Field, InputControls, Renderer};

/// One signal sent by the core
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    View(Box<ViewBundle>),
    Shown(String),
    Hidden(LogoutReason),
    Tick(String),
    Cleared(Field),
    Enabled(Control, bool),
    LoanSettled { amount: Decimal, landed: bool },
}

#[derive(Debug, Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: UiEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn last_view(&self) -> Option<ViewBundle> {
        self.events().into_iter().rev().find_map(|e| match e {
            UiEvent::View(view) => Some(*view),
            _ => None,
        })
    }

    pub fn view_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, UiEvent::View(_)))
            .count()
    }

    pub fn ticks(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Tick(label) => Some(label),
                _ => None,
            })
            .collect()
    }

    pub fn hidden(&self) -> Vec<LogoutReason> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Hidden(reason) => Some(reason),
                _ => None,
            })
            .collect()
    }

    /// Outcome of the most recent deferred loan
    pub fn last_loan(&self) -> Option<(Decimal, bool)> {
        self.events().into_iter().rev().find_map(|e| match e {
            UiEvent::LoanSettled { amount, landed } => Some((amount, landed)),
            _ => None,
        })
    }

    /// Last enabled/disabled signal for a control, if any
    pub fn control_enabled(&self, control: Control) -> Option<bool> {
        self.events().into_iter().rev().find_map(|e| match e {
            UiEvent::Enabled(c, enabled) if c == control => Some(enabled),
            _ => None,
        })
    }
}

impl Renderer for RecordingUi {
    fn update_view(&self, view: &ViewBundle) {
        self.push(UiEvent::View(Box::new(view.clone())));
    }

    fn show_session(&self, welcome: &str) {
        self.push(UiEvent::Shown(welcome.to_string()));
    }

    fn hide_session(&self, reason: LogoutReason) {
        self.push(UiEvent::Hidden(reason));
    }

    fn timer_tick(&self, remaining: &str) {
        self.push(UiEvent::Tick(remaining.to_string()));
    }

    fn loan_settled(&self, amount: Decimal, landed: bool) {
        self.push(UiEvent::LoanSettled { amount, landed });
    }
}

impl InputControls for RecordingUi {
    fn clear(&self, field: Field) {
        self.push(UiEvent::Cleared(field));
    }

    fn set_enabled(&self, control: Control, enabled: bool) {
        self.push(UiEvent::Enabled(control, enabled));
    }
}
