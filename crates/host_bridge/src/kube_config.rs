use serde_json::{Map, Value};
use tracing::{debug, warn};

use shared::{error::CommandError, kube::KubeConfig, protocol::CommandArgs};

use crate::bridge::ExecutionBridge;

/// Host command that reads and parses the kubeconfig file.
pub const LOAD_KUBE_CONFIG: &str = "load_kube_config";

/// Path forwarded when the caller names none. Tilde expansion is the
/// host's business; the literal travels in the `path` argument.
pub const DEFAULT_KUBECONFIG_PATH: &str = "~/.kube/config";

/// Fetch the raw configuration document through the bridge and produce a
/// fresh, self-contained [`KubeConfig`] snapshot.
///
/// Fails with [`CommandError::InvalidFormat`] when the host result is
/// not an object (null included, which is what a standalone bridge
/// yields); no partial document is ever returned.
pub async fn load(
    bridge: &ExecutionBridge,
    path: Option<&str>,
) -> Result<KubeConfig, CommandError> {
    let mut args = CommandArgs::new();
    args.insert(
        "path".to_string(),
        Value::String(path.unwrap_or(DEFAULT_KUBECONFIG_PATH).to_string()),
    );

    let raw = bridge.invoke(LOAD_KUBE_CONFIG, args).await?;
    let Value::Object(mut doc) = raw else {
        warn!("kube_config: host returned a non-object document");
        return Err(CommandError::InvalidFormat);
    };

    normalize_document(&mut doc);
    debug!(
        contexts = doc.get("contexts").and_then(serde_json::Value::as_array).map_or(0, Vec::len),
        "kube_config: document normalized"
    );

    serde_json::from_value(Value::Object(doc)).map_err(|err| {
        warn!(error = %err, "kube_config: normalized document failed to type");
        CommandError::InvalidFormat
    })
}

/// Raw-document normalization: `current-context` becomes
/// `currentContext`; per user entry, `client-certificate` and
/// `client-key` become `clientCertificate`/`clientKey`. User entries
/// whose credential sub-object is absent or null are dropped before
/// their keys are touched.
fn normalize_document(doc: &mut Map<String, Value>) {
    rename_key(doc, "current-context", "currentContext");

    if let Some(Value::Array(users)) = doc.get_mut("users") {
        users.retain(|entry| entry.get("user").is_some_and(|user| !user.is_null()));
        for entry in users.iter_mut() {
            if let Some(Value::Object(user)) = entry.get_mut("user") {
                rename_key(user, "client-certificate", "clientCertificate");
                rename_key(user, "client-key", "clientKey");
            }
        }
    }
}

fn rename_key(map: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(value) = map.remove(from) {
        map.insert(to.to_string(), value);
    }
}

#[cfg(test)]
#[path = "tests/kube_config_tests.rs"]
mod tests;
