//! Blocking HTTP access shared by the SELIC and BTC price sources.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0";

/// Source of remote text documents.
///
/// Implemented over `reqwest` for the real endpoints; tests substitute
/// canned responses.
pub trait TextFetcher {
    /// GET `url` and return the body. Non-2xx statuses are errors.
    fn fetch_text(&self, url: &str) -> Result<String>;
}

/// `reqwest` blocking client with a fixed timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client. `accept_invalid_certs` disables TLS certificate
    /// verification.
    pub fn new(timeout: Duration, accept_invalid_certs: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl TextFetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .context("Request failed")?
            .error_for_status()
            .context("Server returned an error status")?
            .text()
            .context("Failed to read response body")
    }
}
