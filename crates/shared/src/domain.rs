use serde::{Deserialize, Serialize};

/// How the shell was launched: embedded in the privileged host process,
/// or on its own with no host to talk to.
///
/// Decided once at startup; the chosen mode selects which host boundary
/// implementations get injected into the bridge and the event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Native,
    Standalone,
}

impl ExecutionMode {
    pub fn is_standalone(self) -> bool {
        matches!(self, ExecutionMode::Standalone)
    }
}
