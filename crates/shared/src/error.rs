use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy for a single host command invocation.
///
/// `MissingArgument` is the structured form of the host's argument
/// validation message; `HostFailure` carries every other host error
/// verbatim; `InvalidFormat` is raised only by the configuration loader
/// when the host hands back something that is not a document.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CommandError {
    #[error("missing argument `{field}` for command `{command}`")]
    MissingArgument { field: String, command: String },
    #[error("host failure: {raw}")]
    HostFailure { raw: String },
    #[error("host returned a malformed configuration document")]
    InvalidFormat,
}

impl CommandError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CommandError::MissingArgument { .. })
    }
}
