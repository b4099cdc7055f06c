use serde::Serialize;
use uuid::Uuid;
use vamela_core::config::{AppConfig, LoadOptions};
use vamela_core::perf_audit::{normalize_domain, run_audit, AuditFlags, AuditState};
use vamela_core::ApplicationError;

use crate::audit_client::HttpAuditClient;
use crate::commands::{
    config_failure, CommandResult, EXIT_CONFIG, EXIT_REMOTE, EXIT_RUNTIME, EXIT_VALIDATION,
};

#[derive(Debug, Serialize)]
struct AuditOutput {
    domain: String,
    score: u8,
    flags: AuditFlags,
}

pub fn run(raw_domain: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return config_failure("audit", error),
    };

    // Reject bad input before touching the network or the audit settings.
    if let Err(error) = normalize_domain(raw_domain) {
        return CommandResult::failure(
            "audit",
            error.error_class(),
            error.user_message(),
            EXIT_VALIDATION,
        );
    }

    if !config.audit.enabled {
        return CommandResult::failure(
            "audit",
            "audit_disabled",
            "performance audit is disabled (set audit.enabled and audit.base_url)",
            EXIT_CONFIG,
        );
    }

    let client = match HttpAuditClient::from_config(&config.audit) {
        Ok(client) => client,
        Err(error) => {
            return CommandResult::failure(
                "audit",
                "client_init",
                format!("{error:#}"),
                EXIT_RUNTIME,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "audit",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            );
        }
    };

    let state = runtime.block_on(run_audit(&client, raw_domain));
    render_state(state)
}

pub fn render_state(state: AuditState) -> CommandResult {
    match state {
        AuditState::Success(report) => CommandResult::report(
            "audit",
            &AuditOutput { domain: report.domain, score: report.score, flags: report.flags },
        ),
        AuditState::Failure(error) => {
            let exit_code = if error.is_client_side() { EXIT_VALIDATION } else { EXIT_REMOTE };
            let error_class = error.error_class();
            let user_message = error.user_message();
            let correlation_id = Uuid::new_v4().to_string();
            let interface = ApplicationError::from(error).into_interface(correlation_id.clone());
            tracing::warn!(
                event_name = "audit.command.failed",
                correlation_id = %correlation_id,
                error = %interface,
                "audit command failed"
            );
            CommandResult::failure("audit", error_class, user_message, exit_code)
        }
        AuditState::Pending => {
            CommandResult::failure("audit", "pending", "audit did not complete", EXIT_RUNTIME)
        }
    }
}
