use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use toml::Value;
use vamela_core::config::{AppConfig, LoadOptions};

use crate::commands::{config_failure, CommandResult};

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

#[derive(Debug, Serialize)]
struct ConfigReport {
    precedence: &'static str,
    entries: Vec<ConfigEntry>,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return config_failure("config", error),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let entry = |key: &'static str, value: String, env_keys: &[&str]| {
        let source =
            field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref());
        ConfigEntry { key, value, source }
    };

    let audit_api_key = if config.audit.api_key.is_some() { "<redacted>" } else { "<unset>" };
    let entries = vec![
        entry("handoff.base_url", config.handoff.base_url.clone(), &["VAMELA_HANDOFF_BASE_URL"]),
        entry(
            "handoff.recipient_id",
            redact_phone(&config.handoff.recipient_id),
            &["VAMELA_HANDOFF_RECIPIENT_ID"],
        ),
        entry(
            "handoff.greeting_name",
            config.handoff.greeting_name.clone(),
            &["VAMELA_HANDOFF_GREETING_NAME"],
        ),
        entry(
            "exit_intent.threshold_px",
            config.exit_intent.threshold_px.to_string(),
            &["VAMELA_EXIT_INTENT_THRESHOLD_PX"],
        ),
        entry(
            "exit_intent.session_key",
            config.exit_intent.session_key.clone(),
            &["VAMELA_EXIT_INTENT_SESSION_KEY"],
        ),
        entry("audit.enabled", config.audit.enabled.to_string(), &["VAMELA_AUDIT_ENABLED"]),
        entry(
            "audit.base_url",
            config.audit.base_url.clone().unwrap_or_else(|| "<unset>".to_string()),
            &["VAMELA_AUDIT_BASE_URL"],
        ),
        entry("audit.api_key", audit_api_key.to_string(), &["VAMELA_AUDIT_API_KEY"]),
        entry(
            "audit.timeout_secs",
            config.audit.timeout_secs.to_string(),
            &["VAMELA_AUDIT_TIMEOUT_SECS"],
        ),
        entry(
            "logging.level",
            config.logging.level.clone(),
            &["VAMELA_LOGGING_LEVEL", "VAMELA_LOG_LEVEL"],
        ),
        entry(
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            &["VAMELA_LOGGING_FORMAT", "VAMELA_LOG_FORMAT"],
        ),
    ];

    CommandResult::report(
        "config",
        &ConfigReport { precedence: "env > file > default", entries },
    )
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("vamela.toml"), PathBuf::from("config/vamela.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    // Same lookup order and blank handling as the loader.
    let env_key = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

/// Keeps the country prefix and the last two digits.
fn redact_phone(number: &str) -> String {
    let trimmed = number.trim();
    if trimmed.len() <= 6 {
        return "<redacted>".to_string();
    }
    let (head, rest) = trimmed.split_at(2);
    let tail = &rest[rest.len() - 2..];
    format!("{head}{}{tail}", "*".repeat(rest.len() - 2))
}
