//! Mediation layer between the shell UI and the privileged host process:
//! command dispatch, push-event subscription, configuration loading, and
//! the dock state fold. The host boundary is a pair of strategy traits
//! whose implementations are chosen once at startup and injected.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use shared::protocol::CommandArgs;

pub mod bridge;
pub mod channel;
pub mod dock;
pub mod kube_config;
pub mod standalone;

pub use bridge::ExecutionBridge;
pub use channel::{EventChannel, Subscription};
pub use dock::DockMonitor;
pub use standalone::StandaloneHost;

/// Command half of the host boundary. The native implementation forwards
/// to the embedding process; [`StandaloneHost`] stands in when there is
/// no host to talk to.
#[async_trait]
pub trait HostCommands: Send + Sync {
    /// One invocation, one attempt: no retry or timeout lives below this
    /// seam. Failures surface as an opaque message for the bridge to
    /// classify.
    async fn dispatch(&self, command: &str, args: CommandArgs) -> anyhow::Result<Value>;
}

/// Push-event half of the host boundary. Registration hands back a
/// receiver on the transport's own delivery order.
pub trait HostEvents: Send + Sync {
    fn subscribe(&self, event: &str) -> anyhow::Result<broadcast::Receiver<Value>>;
}
