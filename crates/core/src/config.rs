use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gate::{GateSettings, DEFAULT_SESSION_KEY, DEFAULT_THRESHOLD_PX};
use crate::handoff::{MessagingLink, DEFAULT_MESSAGING_BASE_URL, DEFAULT_RECIPIENT_ID};
use crate::summary::SummaryCopy;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub handoff: HandoffConfig,
    pub exit_intent: ExitIntentConfig,
    pub audit: AuditConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct HandoffConfig {
    pub base_url: String,
    pub recipient_id: String,
    pub greeting_name: String,
}

#[derive(Clone, Debug)]
pub struct ExitIntentConfig {
    pub threshold_px: f64,
    pub session_key: String,
}

#[derive(Clone, Debug)]
pub struct AuditConfig {
    pub enabled: bool,
    pub base_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub handoff_recipient_id: Option<String>,
    pub audit_enabled: Option<bool>,
    pub audit_base_url: Option<String>,
    pub audit_api_key: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            handoff: HandoffConfig {
                base_url: DEFAULT_MESSAGING_BASE_URL.to_string(),
                recipient_id: DEFAULT_RECIPIENT_ID.to_string(),
                greeting_name: "Christian".to_string(),
            },
            exit_intent: ExitIntentConfig {
                threshold_px: DEFAULT_THRESHOLD_PX,
                session_key: DEFAULT_SESSION_KEY.to_string(),
            },
            audit: AuditConfig { enabled: false, base_url: None, api_key: None, timeout_secs: 10 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("vamela.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn messaging_link(&self) -> MessagingLink {
        MessagingLink::new(&self.handoff.base_url, &self.handoff.recipient_id)
    }

    pub fn summary_copy(&self) -> SummaryCopy {
        SummaryCopy::for_recipient(&self.handoff.greeting_name)
    }

    pub fn gate_settings(&self) -> GateSettings {
        GateSettings {
            session_key: self.exit_intent.session_key.clone(),
            threshold_px: self.exit_intent.threshold_px,
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(handoff) = patch.handoff {
            if let Some(base_url) = handoff.base_url {
                self.handoff.base_url = base_url;
            }
            if let Some(recipient_id) = handoff.recipient_id {
                self.handoff.recipient_id = recipient_id;
            }
            if let Some(greeting_name) = handoff.greeting_name {
                self.handoff.greeting_name = greeting_name;
            }
        }

        if let Some(exit_intent) = patch.exit_intent {
            if let Some(threshold_px) = exit_intent.threshold_px {
                self.exit_intent.threshold_px = threshold_px;
            }
            if let Some(session_key) = exit_intent.session_key {
                self.exit_intent.session_key = session_key;
            }
        }

        if let Some(audit) = patch.audit {
            if let Some(enabled) = audit.enabled {
                self.audit.enabled = enabled;
            }
            if let Some(base_url) = audit.base_url {
                self.audit.base_url = Some(base_url);
            }
            if let Some(audit_api_key_value) = audit.api_key {
                self.audit.api_key = Some(secret_value(audit_api_key_value));
            }
            if let Some(timeout_secs) = audit.timeout_secs {
                self.audit.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("VAMELA_HANDOFF_BASE_URL") {
            self.handoff.base_url = value;
        }
        if let Some(value) = read_env("VAMELA_HANDOFF_RECIPIENT_ID") {
            self.handoff.recipient_id = value;
        }
        if let Some(value) = read_env("VAMELA_HANDOFF_GREETING_NAME") {
            self.handoff.greeting_name = value;
        }

        if let Some(value) = read_env("VAMELA_EXIT_INTENT_THRESHOLD_PX") {
            self.exit_intent.threshold_px = parse_f64("VAMELA_EXIT_INTENT_THRESHOLD_PX", &value)?;
        }
        if let Some(value) = read_env("VAMELA_EXIT_INTENT_SESSION_KEY") {
            self.exit_intent.session_key = value;
        }

        if let Some(value) = read_env("VAMELA_AUDIT_ENABLED") {
            self.audit.enabled = parse_bool("VAMELA_AUDIT_ENABLED", &value)?;
        }
        if let Some(value) = read_env("VAMELA_AUDIT_BASE_URL") {
            self.audit.base_url = Some(value);
        }
        if let Some(value) = read_env("VAMELA_AUDIT_API_KEY") {
            self.audit.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("VAMELA_AUDIT_TIMEOUT_SECS") {
            self.audit.timeout_secs = parse_u64("VAMELA_AUDIT_TIMEOUT_SECS", &value)?;
        }

        let log_level = read_env("VAMELA_LOGGING_LEVEL").or_else(|| read_env("VAMELA_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("VAMELA_LOGGING_FORMAT").or_else(|| read_env("VAMELA_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(recipient_id) = overrides.handoff_recipient_id {
            self.handoff.recipient_id = recipient_id;
        }
        if let Some(enabled) = overrides.audit_enabled {
            self.audit.enabled = enabled;
        }
        if let Some(base_url) = overrides.audit_base_url {
            self.audit.base_url = Some(base_url);
        }
        if let Some(api_key) = overrides.audit_api_key {
            self.audit.api_key = Some(secret_value(api_key));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_handoff(&self.handoff)?;
        validate_exit_intent(&self.exit_intent)?;
        validate_audit(&self.audit)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("vamela.toml"), PathBuf::from("config/vamela.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_handoff(handoff: &HandoffConfig) -> Result<(), ConfigError> {
    if !handoff.base_url.starts_with("https://") && !handoff.base_url.starts_with("http://") {
        return Err(ConfigError::Validation(
            "handoff.base_url must start with http:// or https://".to_string(),
        ));
    }

    let recipient = handoff.recipient_id.trim();
    if recipient.is_empty() || !recipient.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ConfigError::Validation(
            "handoff.recipient_id must be a phone number in international format, digits only (e.g. 4917624200179)"
                .to_string(),
        ));
    }

    if handoff.greeting_name.trim().is_empty() {
        return Err(ConfigError::Validation("handoff.greeting_name must not be empty".to_string()));
    }

    Ok(())
}

fn validate_exit_intent(exit_intent: &ExitIntentConfig) -> Result<(), ConfigError> {
    if !exit_intent.threshold_px.is_finite() || exit_intent.threshold_px <= 0.0 {
        return Err(ConfigError::Validation(
            "exit_intent.threshold_px must be a positive number".to_string(),
        ));
    }

    if exit_intent.session_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "exit_intent.session_key must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_audit(audit: &AuditConfig) -> Result<(), ConfigError> {
    if audit.timeout_secs == 0 || audit.timeout_secs > 60 {
        return Err(ConfigError::Validation(
            "audit.timeout_secs must be in range 1..=60".to_string(),
        ));
    }

    if let Some(base_url) = &audit.base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "audit.base_url must start with http:// or https://".to_string(),
            ));
        }
    }

    if audit.enabled && audit.base_url.is_none() {
        return Err(ConfigError::Validation(
            "audit.enabled is true but audit.base_url is not configured".to_string(),
        ));
    }

    let blank_key =
        audit.api_key.as_ref().map(|key| key.expose_secret().trim().is_empty()).unwrap_or(false);
    if blank_key {
        return Err(ConfigError::Validation(
            "audit.api_key is set but empty; remove it or provide a key".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    handoff: Option<HandoffPatch>,
    exit_intent: Option<ExitIntentPatch>,
    audit: Option<AuditPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct HandoffPatch {
    base_url: Option<String>,
    recipient_id: Option<String>,
    greeting_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ExitIntentPatch {
    threshold_px: Option<f64>,
    session_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuditPatch {
    enabled: Option<bool>,
    base_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
