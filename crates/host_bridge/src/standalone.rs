use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

use shared::protocol::CommandArgs;

use crate::{HostCommands, HostEvents};

const TOPIC_BUFFER: usize = 64;

/// In-process stand-in for the privileged host, used when the shell runs
/// with no host present. Commands resolve to a benign null and cannot
/// fail; events travel over per-name in-process topics that demo and
/// test code feed through [`StandaloneHost::emit`].
pub struct StandaloneHost {
    topics: Mutex<HashMap<String, broadcast::Sender<Value>>>,
}

impl StandaloneHost {
    pub fn new() -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
        }
    }

    /// Simulate a host push. Payloads reach current subscribers in send
    /// order; with no subscriber the payload is dropped.
    pub fn emit(&self, event: &str, payload: Value) {
        let delivered = self.topic(event).send(payload).unwrap_or(0);
        debug!(event = %event, delivered, "standalone: event emitted");
    }

    fn topic(&self, event: &str) -> broadcast::Sender<Value> {
        let mut topics = self.topics.lock().unwrap_or_else(PoisonError::into_inner);
        topics
            .entry(event.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_BUFFER).0)
            .clone()
    }
}

impl Default for StandaloneHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostCommands for StandaloneHost {
    async fn dispatch(&self, command: &str, _args: CommandArgs) -> anyhow::Result<Value> {
        debug!(command, "standalone: command stubbed to null");
        Ok(Value::Null)
    }
}

impl HostEvents for StandaloneHost {
    fn subscribe(&self, event: &str) -> anyhow::Result<broadcast::Receiver<Value>> {
        Ok(self.topic(event).subscribe())
    }
}
