//! Optional website performance check for a visitor-supplied domain.
//!
//! Validation and payload decoding live here; the HTTP transport is an
//! [`AuditClient`] implementation supplied by the caller.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AuditError {
    #[error("`{0}` is not a valid domain")]
    InvalidDomain(String),
    #[error("audit service rejected the request as malformed")]
    MalformedRequest,
    #[error("site could not be reached by the audit service: {0}")]
    Unreachable(String),
    #[error("audit service rate limit reached")]
    RateLimited,
    #[error("audit service failed with status {0}")]
    Server(u16),
    #[error("audit service returned an unreadable payload: {0}")]
    MalformedResponse(String),
}

impl AuditError {
    /// Maps a non-success HTTP status to its failure class.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::MalformedRequest,
            404 | 410 | 422 => Self::Unreachable(format!("remote rejected domain ({status})")),
            429 => Self::RateLimited,
            _ => Self::Server(status),
        }
    }

    /// Errors detected before any request leaves the process.
    pub fn is_client_side(&self) -> bool {
        matches!(self, Self::InvalidDomain(_))
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::InvalidDomain(_) => "invalid_domain",
            Self::MalformedRequest => "malformed_request",
            Self::Unreachable(_) => "unreachable",
            Self::RateLimited => "rate_limited",
            Self::Server(_) => "server_error",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidDomain(_) => "Please enter a domain like example.com.",
            Self::MalformedRequest => "The check could not be started for this input.",
            Self::Unreachable(_) => "This website could not be reached. Check the address.",
            Self::RateLimited => "Too many checks right now. Please wait a moment and try again.",
            Self::Server(_) => "The check service is having trouble. Please try again later.",
            Self::MalformedResponse(_) => "The check returned an unexpected result.",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditFlags {
    pub https: bool,
    pub mobile_friendly: bool,
    pub compressed_assets: bool,
    pub render_blocking_resources: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub domain: String,
    pub score: u8,
    pub flags: AuditFlags,
}

#[derive(Debug, Deserialize)]
struct AuditPayload {
    score: f64,
    #[serde(default)]
    flags: AuditFlags,
}

/// Three-state lookup result as seen by the view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuditState {
    Pending,
    Success(AuditReport),
    Failure(AuditError),
}

impl From<Result<AuditReport, AuditError>> for AuditState {
    fn from(result: Result<AuditReport, AuditError>) -> Self {
        match result {
            Ok(report) => Self::Success(report),
            Err(error) => Self::Failure(error),
        }
    }
}

#[async_trait]
pub trait AuditClient: Send + Sync {
    /// `domain` has already passed [`normalize_domain`].
    async fn fetch(&self, domain: &str) -> Result<AuditReport, AuditError>;
}

fn domain_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$")
            .unwrap_or_else(|error| unreachable!("static domain pattern: {error}"))
    })
}

/// Reduces user input to a bare host name and checks its shape.
pub fn normalize_domain(raw: &str) -> Result<String, AuditError> {
    let lowered = raw.trim().to_ascii_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let host = without_scheme.split(['/', '?', '#']).next().unwrap_or_default();

    if host.len() > 253 || !domain_pattern().is_match(host) {
        return Err(AuditError::InvalidDomain(raw.trim().to_string()));
    }
    Ok(host.to_string())
}

pub fn parse_report(domain: &str, body: &[u8]) -> Result<AuditReport, AuditError> {
    let payload: AuditPayload = serde_json::from_slice(body)
        .map_err(|error| AuditError::MalformedResponse(error.to_string()))?;

    if !payload.score.is_finite() || !(0.0..=100.0).contains(&payload.score) {
        return Err(AuditError::MalformedResponse(format!(
            "score {} outside 0..=100",
            payload.score
        )));
    }

    Ok(AuditReport {
        domain: domain.to_string(),
        score: payload.score.round() as u8,
        flags: payload.flags,
    })
}

/// Validates `raw` and runs the lookup. Invalid input never reaches the
/// client.
pub async fn run_audit<C>(client: &C, raw: &str) -> AuditState
where
    C: AuditClient + ?Sized,
{
    let domain = match normalize_domain(raw) {
        Ok(domain) => domain,
        Err(error) => return AuditState::Failure(error),
    };

    let result = client.fetch(&domain).await;
    match &result {
        Ok(report) => tracing::info!(
            event_name = "audit.request.succeeded",
            domain = %report.domain,
            score = report.score,
            "performance audit completed"
        ),
        Err(error) => tracing::warn!(
            event_name = "audit.request.failed",
            domain = %domain,
            error_class = error.error_class(),
            error = %error,
            "performance audit failed"
        ),
    }
    AuditState::from(result)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::{
        normalize_domain, parse_report, run_audit, AuditClient, AuditError, AuditFlags,
        AuditReport, AuditState,
    };

    #[derive(Default)]
    struct CountingClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AuditClient for CountingClient {
        async fn fetch(&self, domain: &str) -> Result<AuditReport, AuditError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if domain == "limited.de" {
                return Err(AuditError::RateLimited);
            }
            Ok(AuditReport { domain: domain.to_string(), score: 91, flags: AuditFlags::default() })
        }
    }

    #[test]
    fn normalizes_scheme_case_and_path() {
        assert_eq!(
            normalize_domain(" HTTPS://Www.Vamela.de/kontakt?x=1 "),
            Ok("www.vamela.de".to_string())
        );
        assert_eq!(normalize_domain("shop.example.co.uk"), Ok("shop.example.co.uk".to_string()));
    }

    #[test]
    fn rejects_inputs_without_domain_shape() {
        let rejected =
            ["", "localhost", "-bad.de", "bad-.de", "exa mple.de", "example.d", "http://", "1.2.3.4"];
        for raw in rejected {
            assert!(
                matches!(normalize_domain(raw), Err(AuditError::InvalidDomain(_))),
                "`{raw}` should be rejected"
            );
        }
    }

    #[test]
    fn status_codes_map_to_distinct_classes() {
        assert_eq!(AuditError::from_status(400), AuditError::MalformedRequest);
        assert!(matches!(AuditError::from_status(404), AuditError::Unreachable(_)));
        assert_eq!(AuditError::from_status(429), AuditError::RateLimited);
        assert_eq!(AuditError::from_status(503), AuditError::Server(503));

        let messages = [
            AuditError::InvalidDomain(String::new()),
            AuditError::MalformedRequest,
            AuditError::Unreachable(String::new()),
            AuditError::RateLimited,
            AuditError::Server(500),
            AuditError::MalformedResponse(String::new()),
        ]
        .map(|error| error.user_message());
        for (index, message) in messages.iter().enumerate() {
            assert!(!messages[index + 1..].contains(message), "duplicate message `{message}`");
        }
    }

    #[test]
    fn parses_score_and_defaults_missing_flags() {
        let report = parse_report(
            "vamela.de",
            br#"{"score": 86.6, "flags": {"https": true, "mobile_friendly": true}}"#,
        )
        .expect("valid payload");

        assert_eq!(report.score, 87);
        assert!(report.flags.https);
        assert!(report.flags.mobile_friendly);
        assert!(!report.flags.compressed_assets);
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(matches!(
            parse_report("a.de", b"<html>"),
            Err(AuditError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_report("a.de", br#"{"score": 140}"#),
            Err(AuditError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_report("a.de", br#"{"flags": {}}"#),
            Err(AuditError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn invalid_domain_never_reaches_the_client() {
        let client = CountingClient::default();
        let state = run_audit(&client, "not a domain").await;

        assert!(matches!(state, AuditState::Failure(AuditError::InvalidDomain(_))));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn client_results_become_states() {
        let client = CountingClient::default();

        let ok = run_audit(&client, "https://vamela.de/").await;
        assert!(matches!(ok, AuditState::Success(ref report) if report.domain == "vamela.de"));

        let limited = run_audit(&client, "limited.de").await;
        assert_eq!(limited, AuditState::Failure(AuditError::RateLimited));
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }
}
