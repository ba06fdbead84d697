use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named arguments for a host command. Keys are unique by construction;
/// the payload itself is opaque to the bridge.
pub type CommandArgs = Map<String, Value>;

/// Push-event emitted when the host changes the dock progress fraction.
pub const PROGRESS_UPDATED: &str = "progress-updated";
/// Push-event emitted when the host changes the dock badge label.
pub const BADGE_UPDATED: &str = "badge-updated";

/// Payload of [`PROGRESS_UPDATED`]. `progress` is a fraction in [0, 1];
/// `null` clears the indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub progress: Option<f64>,
}

/// Payload of [`BADGE_UPDATED`]. `null` clears the badge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeUpdate {
    pub badge: Option<String>,
}

/// Dock indicator state as the shell renders it. Both fields start unset
/// and are updated independently of each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockState {
    pub progress: Option<f64>,
    pub badge: Option<String>,
}

impl DockState {
    /// Integer percentage for display. Pure function of the stored
    /// fraction, recomputed on every read.
    pub fn progress_percent(&self) -> Option<u8> {
        self.progress.map(|fraction| (fraction * 100.0).round() as u8)
    }
}
