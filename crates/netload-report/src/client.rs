// Report delivery HTTP client
//
// Wraps `reqwest::Client` with the endpoint URL, content-type, and
// optional bearer token. Delivery is fire-and-forget per tick: the
// caller logs failures and moves on, so this module never retries.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::payload::MetricReport;

/// Default per-request timeout. A slow endpoint delays the tick that hit
/// it, never the process as a whole.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivery settings for building a [`ReportClient`].
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Endpoint to POST reports to.
    pub url: Url,
    /// Optional opaque bearer token, sent as `Authorization: Bearer <key>`.
    pub api_key: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl DeliveryConfig {
    /// Create a config with the default timeout and no token.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Async client that POSTs one JSON report per call.
///
/// Holds no per-report state; safe to keep for the lifetime of the
/// reporting loop.
pub struct ReportClient {
    http: reqwest::Client,
    url: Url,
    api_key: Option<SecretString>,
}

impl ReportClient {
    /// Build a client from a [`DeliveryConfig`].
    pub fn new(config: DeliveryConfig) -> Result<Self, Error> {
        // Redirects are not followed: a >= 300 answer means the endpoint
        // is misconfigured, and the report for this tick is dropped.
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("netload/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            url: config.url,
            api_key: config.api_key,
        })
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// POST one report as JSON.
    ///
    /// Any response status >= 300 is an [`Error::Status`]; the body is
    /// not read. Never retries.
    pub async fn send(&self, report: &MetricReport) -> Result<(), Error> {
        let mut request = self.http.post(self.url.clone()).json(report);

        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status.as_u16() >= 300 {
            return Err(Error::Status {
                url: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(status = status.as_u16(), "report delivered");
        Ok(())
    }
}
