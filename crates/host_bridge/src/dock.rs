use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::warn;

use shared::protocol::{BadgeUpdate, DockState, ProgressUpdate, BADGE_UPDATED, PROGRESS_UPDATED};

use crate::channel::{EventChannel, Subscription};

/// Folds the host's two dock event streams into one coherent
/// [`DockState`]. Each event mutates only its own field; `null` on a
/// field is an explicit clear, never "no change".
pub struct DockMonitor {
    state: Arc<Mutex<DockState>>,
    progress_sub: Subscription,
    badge_sub: Subscription,
}

impl DockMonitor {
    /// Subscribe to both dock event kinds on `channel`. The state starts
    /// with both fields unset and lives for as long as the monitor.
    pub fn attach(channel: &EventChannel) -> anyhow::Result<Self> {
        let state = Arc::new(Mutex::new(DockState::default()));

        let progress_state = Arc::clone(&state);
        let progress_sub = channel.subscribe(PROGRESS_UPDATED, move |payload| {
            apply_progress(&progress_state, payload);
        })?;

        let badge_state = Arc::clone(&state);
        let badge_sub = channel.subscribe(BADGE_UPDATED, move |payload| {
            apply_badge(&badge_state, payload);
        })?;

        Ok(Self {
            state,
            progress_sub,
            badge_sub,
        })
    }

    /// Copy of the current state. Percent display comes from
    /// [`DockState::progress_percent`] on the copy, recomputed per read.
    pub fn snapshot(&self) -> DockState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cancel both subscriptions. Safe to call more than once.
    pub fn detach(&self) {
        self.progress_sub.cancel();
        self.badge_sub.cancel();
    }
}

fn apply_progress(state: &Mutex<DockState>, payload: Value) {
    let update: ProgressUpdate = match serde_json::from_value(payload) {
        Ok(update) => update,
        Err(err) => {
            warn!(error = %err, "dock: malformed progress payload dropped");
            return;
        }
    };
    if let Some(fraction) = update.progress {
        // Same bounds the host enforces on its side of the dock.
        if !(0.0..=1.0).contains(&fraction) {
            warn!(fraction, "dock: progress outside [0, 1] rejected");
            return;
        }
    }
    state
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .progress = update.progress;
}

fn apply_badge(state: &Mutex<DockState>, payload: Value) {
    let update: BadgeUpdate = match serde_json::from_value(payload) {
        Ok(update) => update,
        Err(err) => {
            warn!(error = %err, "dock: malformed badge payload dropped");
            return;
        }
    };
    state.lock().unwrap_or_else(PoisonError::into_inner).badge = update.badge;
}

#[cfg(test)]
#[path = "tests/dock_tests.rs"]
mod tests;
