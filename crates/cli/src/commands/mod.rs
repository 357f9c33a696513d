pub mod config;
pub mod doctor;
pub mod migrate;
pub mod resolve;
pub mod seed;

use serde::Serialize;

/// Rendered outcome of one subcommand: the JSON line to print and the
/// process exit code.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum OutcomeStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
struct CommandOutcome<'a> {
    command: &'a str,
    status: OutcomeStatus,
    error_class: Option<&'a str>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command,
            status: OutcomeStatus::Ok,
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_json(&payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command,
            status: OutcomeStatus::Error,
            error_class: Some(error_class),
            message: message.into(),
        };
        Self { exit_code, output: serialize_json(&payload) }
    }
}

pub(crate) fn serialize_json<T: Serialize>(payload: &T) -> String {
    serde_json::to_string(payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            escape_json(&error.to_string())
        )
    })
}

/// Minimal escaping for the hand-built serialization fallback payloads.
pub(crate) fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
