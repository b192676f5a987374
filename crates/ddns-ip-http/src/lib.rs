// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS updater.
//
// ## Architecture
//
// Fetches the current public IPv4 address from an external service that
// answers a plain GET with the caller's address as the response body
// (e.g. api.ipify.org, ifconfig.me/ip, icanhazip.com). One request per run;
// no polling, no caching, no silent failover between services.

use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::net::Ipv4Addr;
use std::time::Duration;

/// Default IP discovery service (IPv4 only, plain text body)
pub const DEFAULT_IP_URL: &str = "https://api.ipify.org";

/// HTTP request timeout
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IPv4 source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://api.ipify.org")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(Error::config(format!(
                "IP source URL must use HTTP or HTTPS scheme. Got: {}",
                url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::ip_source(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { url, client })
    }

    /// Source using [`DEFAULT_IP_URL`]
    pub fn ipify() -> Result<Self> {
        Self::new(DEFAULT_IP_URL)
    }

    /// The URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Parse a service response body into an IPv4 address
fn parse_ipv4(body: &str) -> Result<Ipv4Addr> {
    let ip_text = body.trim();
    ip_text
        .parse()
        .map_err(|_| Error::ip_source(format!("Expected an IPv4 address, got: {:?}", ip_text)))
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        tracing::debug!("Fetching public IP address from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "{} answered with HTTP {}",
                self.url,
                response.status()
            )));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to read response: {}", e)))?;

        parse_ipv4(&ip_text)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
