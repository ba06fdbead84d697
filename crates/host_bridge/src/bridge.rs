use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use shared::{domain::ExecutionMode, error::CommandError, protocol::CommandArgs};

use crate::HostCommands;

const MISSING_ARGS_PREFIX: &str = "invalid args `";
const MISSING_ARGS_INFIX: &str = "` for command `";
const MISSING_ARGS_SUFFIX: &str = "`:";

/// Dispatches named commands to the injected host dispatcher and turns
/// its opaque failures into the structured [`CommandError`] taxonomy.
///
/// The standalone dispatcher resolves every command to a benign null, so
/// callers never branch on the mode themselves; it is kept here only for
/// diagnostics.
pub struct ExecutionBridge {
    mode: ExecutionMode,
    host: Arc<dyn HostCommands>,
}

impl ExecutionBridge {
    pub fn new(mode: ExecutionMode, host: Arc<dyn HostCommands>) -> Self {
        Self { mode, host }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Invoke a host command and await its result. One invocation is one
    /// attempt; the trace of the outcome never alters the result.
    pub async fn invoke(&self, command: &str, args: CommandArgs) -> Result<Value, CommandError> {
        debug!(mode = ?self.mode, command, "bridge: dispatching command");
        match self.host.dispatch(command, args).await {
            Ok(value) => {
                debug!(command, "bridge: command resolved");
                Ok(value)
            }
            Err(err) => {
                let classified = classify_host_failure(command, err.to_string());
                warn!(command, error = %classified, "bridge: command failed");
                Err(classified)
            }
        }
    }
}

/// Host argument-validation failures are re-raised structured; anything
/// else passes through verbatim. `command` is the originally invoked
/// name, not whatever the message happens to mention.
fn classify_host_failure(command: &str, raw: String) -> CommandError {
    match parse_missing_argument(&raw) {
        Some(field) => CommandError::MissingArgument {
            field,
            command: command.to_string(),
        },
        None => CommandError::HostFailure { raw },
    }
}

/// Matches ``invalid args `<field>` for command `<command>`: ...``
/// case-insensitively, returning the field with its original casing.
fn parse_missing_argument(raw: &str) -> Option<String> {
    let lower = raw.to_ascii_lowercase();
    let rest = lower.strip_prefix(MISSING_ARGS_PREFIX)?;
    let field_end = rest.find(MISSING_ARGS_INFIX)?;
    let tail = &rest[field_end + MISSING_ARGS_INFIX.len()..];
    tail.find(MISSING_ARGS_SUFFIX)?;

    // Byte offsets in the lowered copy line up with the original since
    // ASCII lowering never changes lengths.
    let field_start = MISSING_ARGS_PREFIX.len();
    Some(raw[field_start..field_start + field_end].to_string())
}

#[cfg(test)]
#[path = "tests/bridge_tests.rs"]
mod tests;
