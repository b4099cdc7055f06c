use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};
use vamela_core::config::AuditConfig;
use vamela_core::perf_audit::{parse_report, AuditClient, AuditError, AuditReport};

/// Performance-audit lookups over HTTP: `GET {base_url}/audit?domain=...`.
pub struct HttpAuditClient {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl HttpAuditClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vamela/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build audit http client")?;

        Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_string(), api_key })
    }

    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        let base_url = config.base_url.clone().context("audit.base_url is not configured")?;
        Self::new(base_url, config.api_key.clone(), Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl AuditClient for HttpAuditClient {
    async fn fetch(&self, domain: &str) -> Result<AuditReport, AuditError> {
        let mut request =
            self.client.get(format!("{}/audit", self.base_url)).query(&[("domain", domain)]);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|error| {
            error!(
                event_name = "audit.request.transport_failed",
                error = %error,
                "audit request failed"
            );
            if error.is_builder() {
                AuditError::MalformedRequest
            } else {
                AuditError::Unreachable(error.to_string())
            }
        })?;

        let status = response.status();
        debug!(
            event_name = "audit.response.received",
            status = status.as_u16(),
            "audit response received"
        );
        if !status.is_success() {
            return Err(AuditError::from_status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|error| {
            AuditError::MalformedResponse(format!("failed to read body: {error}"))
        })?;
        parse_report(domain, &body)
    }
}
