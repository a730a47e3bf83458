//! Thin JSON-over-HTTP client shared by the venue adapters.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::VenueError;

/// Sent on every request; Coinbase rejects anonymous clients.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub timeout: Duration,
    /// Skip server certificate checks (deployments behind intercepting proxies).
    pub accept_invalid_certs: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(5), accept_invalid_certs: false }
    }
}

/// One HTTP session per venue.
#[derive(Debug, Clone)]
pub struct VenueClient {
    venue: &'static str,
    client: reqwest::Client,
    timeout: Duration,
}

impl VenueClient {
    pub fn new(venue: &'static str, options: &HttpOptions) -> Result<Self, VenueError> {
        if options.accept_invalid_certs {
            warn!(venue, "Server certificate verification is disabled");
        }
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .gzip(true)
            .build()
            .map_err(|e| VenueError::FetchFailed { venue, reason: e.to_string() })?;
        Ok(Self { venue, client, timeout: options.timeout })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, VenueError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VenueError::FetchFailed {
                venue: self.venue,
                reason: format!("got response status {}", status.as_u16()),
            });
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        debug!(venue = self.venue, bytes = body.len(), "Response body received");
        serde_json::from_slice(&body).map_err(|e| VenueError::FetchFailed {
            venue: self.venue,
            reason: format!("malformed body: {e}"),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> VenueError {
        if e.is_timeout() {
            VenueError::Timeout { venue: self.venue, after: self.timeout }
        } else {
            VenueError::FetchFailed { venue: self.venue, reason: e.to_string() }
        }
    }
}
