use std::sync::Arc;

use serde_json::Value;
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tracing::{debug, warn};

use crate::HostEvents;

/// Subscribes handler closures to named host push-events.
pub struct EventChannel {
    events: Arc<dyn HostEvents>,
}

/// Cancellation handle for a single subscription.
///
/// Cancelling is idempotent: repeated calls, or calls after the
/// underlying transport already tore down, neither fail nor re-invoke
/// the handler. Dropping the handle does NOT cancel; callers own the
/// teardown of their registrations across view transitions.
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl EventChannel {
    pub fn new(events: Arc<dyn HostEvents>) -> Self {
        Self { events }
    }

    /// Register `handler` for `event`. Registration failures surface in
    /// the returned `Result`. Payloads reach the handler in the order
    /// the transport delivers them; the channel adds no buffering or
    /// reordering of its own. Each call gets an independent handle, also
    /// for repeated subscriptions to the same name.
    pub fn subscribe<F>(&self, event: &str, mut handler: F) -> anyhow::Result<Subscription>
    where
        F: FnMut(Value) + Send + 'static,
    {
        let mut rx = self.events.subscribe(event)?;
        let event = event.to_string();
        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(payload) => handler(payload),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(event = %event, skipped, "channel: subscriber lagged, events dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!(event = %event, "channel: transport closed, subscription ended");
                        break;
                    }
                }
            }
        });
        Ok(Subscription { task })
    }
}

#[cfg(test)]
#[path = "tests/channel_tests.rs"]
mod tests;
