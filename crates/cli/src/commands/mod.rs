pub mod audit;
pub mod config;
pub mod inquiry;
pub mod quote;

use serde::Serialize;
use uuid::Uuid;
use vamela_core::config::ConfigError;
use vamela_core::ApplicationError;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_VALIDATION: u8 = 3;
pub const EXIT_REMOTE: u8 = 4;
pub const EXIT_RUNTIME: u8 = 5;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

#[derive(Debug, Serialize)]
struct CommandReport<'a, T> {
    command: &'a str,
    status: &'static str,
    #[serde(flatten)]
    data: &'a T,
}

impl CommandResult {
    /// Success with structured data merged next to `command`/`status`.
    pub fn report<T: Serialize>(command: &str, data: &T) -> Self {
        let report = CommandReport { command, status: "ok", data };
        match serde_json::to_string(&report) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure(command, "serialization", error.to_string(), EXIT_RUNTIME),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

/// Config load failure, logged with a correlation id and reported as exit 2.
pub fn config_failure(command: &str, error: ConfigError) -> CommandResult {
    let message = format!("configuration issue: {error}");
    let correlation_id = Uuid::new_v4().to_string();
    let interface = ApplicationError::from(error).into_interface(correlation_id.clone());
    tracing::error!(
        event_name = "cli.config.invalid",
        command,
        correlation_id = %correlation_id,
        error = %interface,
        "configuration failed to load"
    );
    CommandResult::failure(command, "config_validation", message, EXIT_CONFIG)
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
