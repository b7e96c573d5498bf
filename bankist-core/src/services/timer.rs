//! Inactivity timer - a restartable countdown
//!
//! At most one countdown runs at a time. Every `start` cancels the previous
//! countdown before spawning a new one, and every countdown carries a
//! generation number: a tick that wakes up after its generation has been
//! superseded does nothing, even if the abort has not landed yet.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Format remaining units as `mm:ss`
pub fn format_remaining(units: u32) -> String {
    format!("{:02}:{:02}", units / 60, units % 60)
}

#[derive(Debug)]
pub struct InactivityTimer {
    /// Countdown length in ticks
    units: u32,
    tick: Duration,
    generation: Arc<AtomicU64>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl InactivityTimer {
    /// A countdown of `units` ticks, one tick every `tick`
    pub fn new(units: u32, tick: Duration) -> Self {
        Self {
            units,
            tick,
            generation: Arc::new(AtomicU64::new(0)),
            handle: Mutex::new(None),
        }
    }

    /// Cancel any running countdown and start a fresh one
    ///
    /// `on_tick` runs immediately with the full duration and then once per
    /// tick; when the count reaches zero `on_expire` runs with the
    /// countdown's generation and the countdown ends. Returns the generation
    /// of the new countdown. Must be called from within a tokio runtime.
    pub fn start<T, E>(&self, on_tick: T, on_expire: E) -> u64
    where
        T: Fn(&str) + Send + 'static,
        E: FnOnce(u64) + Send + 'static,
    {
        let mut slot = self.handle.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let current = Arc::clone(&self.generation);
        let units = self.units;
        let tick = self.tick;
        *slot = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            let mut remaining = units;
            loop {
                interval.tick().await;
                if current.load(Ordering::SeqCst) != generation {
                    return;
                }
                on_tick(&format_remaining(remaining));
                if remaining == 0 {
                    debug!(generation, "inactivity countdown expired");
                    on_expire(generation);
                    return;
                }
                remaining -= 1;
            }
        }));
        debug!(generation, units, "inactivity countdown started");
        generation
    }

    /// Same as `start`; named for call sites that restart after activity
    pub fn reset<T, E>(&self, on_tick: T, on_expire: E) -> u64
    where
        T: Fn(&str) + Send + 'static,
        E: FnOnce(u64) + Send + 'static,
    {
        self.start(on_tick, on_expire)
    }

    /// Cancel the running countdown, if any
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// False once `generation` has been restarted or stopped
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }
}

impl Drop for InactivityTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
