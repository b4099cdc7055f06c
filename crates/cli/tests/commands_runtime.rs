use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use vamela_cli::commands::{audit, config, inquiry, quote};

#[test]
fn quote_returns_total_summary_and_link() {
    with_env(&[], || {
        let result = quote::run(&quote::QuoteArgs {
            pages: 7,
            tier: "standard".to_string(),
            features: vec!["cms".to_string(), "copywriting".to_string()],
        });
        assert_eq!(result.exit_code, 0, "expected successful quote");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "quote");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["total"], 1050);
        assert_eq!(payload["total_display"], "1.050€");
        assert_eq!(payload["features"], serde_json::json!(["cms", "copywriting"]));

        let link = payload["link"].as_str().expect("link should be a string");
        let encoded = link
            .strip_prefix("https://wa.me/4917624200179?text=")
            .expect("link should target the default recipient");
        let decoded = urlencoding::decode(encoded).expect("text should be percent-encoded utf-8");
        let summary = payload["summary"].as_str().expect("summary should be a string");
        assert_eq!(decoded, summary);
        assert!(summary.contains("• 7 Unterseiten"));
        assert!(summary.contains("Geschätzter Preis: ca. 1.050€"));
    });
}

#[test]
fn quote_clamps_pages_and_reports_unknown_features() {
    with_env(&[], || {
        let result = quote::run(&quote::QuoteArgs {
            pages: 99,
            tier: "high-end".to_string(),
            features: vec!["seo".to_string(), "newsletter".to_string()],
        });
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["pages"], 20);
        assert_eq!(payload["tier"], "high-end");
        assert_eq!(payload["ignored_features"], serde_json::json!(["newsletter"]));
        // (350 + 20 * 50 + 120) * 1.8
        assert_eq!(payload["total"], 2646);
    });
}

#[test]
fn quote_rejects_unknown_tier() {
    with_env(&[], || {
        let result = quote::run(&quote::QuoteArgs {
            tier: "luxury".to_string(),
            ..quote::QuoteArgs::default()
        });
        assert_eq!(result.exit_code, 3, "expected validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "validation");
    });
}

#[test]
fn quote_uses_configured_recipient() {
    with_env(&[("VAMELA_HANDOFF_RECIPIENT_ID", "4930123456")], || {
        let result = quote::run(&quote::QuoteArgs::default());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let link = payload["link"].as_str().expect("link should be a string");
        assert!(link.starts_with("https://wa.me/4930123456?text="));
    });
}

#[test]
fn quote_returns_config_failure_for_invalid_env() {
    with_env(&[("VAMELA_HANDOFF_RECIPIENT_ID", "+49 not a number")], || {
        let result = quote::run(&quote::QuoteArgs::default());
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn inquiry_snaps_budget_and_builds_link() {
    with_env(&[], || {
        let result = inquiry::run(&inquiry::InquiryArgs {
            name: "Anna".to_string(),
            budget: Some(9_999),
            message: "Neue Website".to_string(),
        });
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "inquiry");
        assert_eq!(payload["budget"], 5000);
        let summary = payload["summary"].as_str().expect("summary should be a string");
        assert!(summary.contains("👤 *Name:* Anna"));
        assert!(summary.contains("💰 *Budget:* ca. 5.000€\n"));
        assert_eq!(payload["budget_display"], "5.000€+");
    });
}

#[test]
fn inquiry_without_message_is_rejected() {
    with_env(&[], || {
        let result = inquiry::run(&inquiry::InquiryArgs {
            name: "Anna".to_string(),
            budget: None,
            message: "   ".to_string(),
        });
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "validation");
    });
}

#[test]
fn audit_rejects_invalid_domain_before_config_checks() {
    with_env(&[], || {
        let result = audit::run("not a domain");
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "audit");
        assert_eq!(payload["error_class"], "invalid_domain");
    });
}

#[test]
fn audit_reports_disabled_feature() {
    with_env(&[], || {
        let result = audit::run("example.com");
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "audit_disabled");
    });
}

#[test]
fn audit_reports_unreachable_service() {
    with_env(
        &[
            ("VAMELA_AUDIT_ENABLED", "true"),
            ("VAMELA_AUDIT_BASE_URL", "http://127.0.0.1:9"),
            ("VAMELA_AUDIT_TIMEOUT_SECS", "2"),
        ],
        || {
            let result = audit::run("example.com");
            assert_eq!(result.exit_code, 4, "expected remote failure code");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["error_class"], "unreachable");
        },
    );
}

#[test]
fn config_reports_sources_and_redacts_secrets() {
    with_env(
        &[
            ("VAMELA_LOG_LEVEL", "debug"),
            ("VAMELA_HANDOFF_GREETING_NAME", "   "),
            ("VAMELA_AUDIT_API_KEY", "audit-secret-value"),
        ],
        || {
            let result = config::run();
            assert_eq!(result.exit_code, 0, "expected config inspection success");
            assert!(!result.output.contains("audit-secret-value"));

            let payload = parse_payload(&result.output);
            assert_eq!(payload["command"], "config");
            assert_eq!(payload["status"], "ok");

            let level = config_entry(&payload, "logging.level");
            assert_eq!(level["value"], "debug");
            assert_eq!(level["source"], "env (VAMELA_LOG_LEVEL)");

            let greeting = config_entry(&payload, "handoff.greeting_name");
            assert_eq!(greeting["value"], "Christian");
            assert_eq!(greeting["source"], "default");

            let api_key = config_entry(&payload, "audit.api_key");
            assert_eq!(api_key["value"], "<redacted>");
            assert_eq!(api_key["source"], "env (VAMELA_AUDIT_API_KEY)");

            let recipient = config_entry(&payload, "handoff.recipient_id");
            assert_eq!(recipient["value"], "49*********79");
        },
    );
}

#[test]
fn config_returns_config_failure_for_invalid_env() {
    with_env(&[("VAMELA_AUDIT_TIMEOUT_SECS", "soon")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn config_entry<'a>(payload: &'a Value, key: &str) -> &'a Value {
    payload["entries"]
        .as_array()
        .expect("entries should be an array")
        .iter()
        .find(|entry| entry["key"] == key)
        .unwrap_or_else(|| panic!("missing config entry `{key}`"))
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid json")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "VAMELA_HANDOFF_BASE_URL",
        "VAMELA_HANDOFF_RECIPIENT_ID",
        "VAMELA_HANDOFF_GREETING_NAME",
        "VAMELA_EXIT_INTENT_THRESHOLD_PX",
        "VAMELA_EXIT_INTENT_SESSION_KEY",
        "VAMELA_AUDIT_ENABLED",
        "VAMELA_AUDIT_BASE_URL",
        "VAMELA_AUDIT_API_KEY",
        "VAMELA_AUDIT_TIMEOUT_SECS",
        "VAMELA_LOGGING_LEVEL",
        "VAMELA_LOGGING_FORMAT",
        "VAMELA_LOG_LEVEL",
        "VAMELA_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
