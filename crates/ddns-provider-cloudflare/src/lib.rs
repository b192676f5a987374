// # Cloudflare DNS Provider
//
// This crate provides a Cloudflare DNS provider implementation for the DDNS
// updater.
//
// - ✅ One HTTP request per trait call
// - ✅ Full error propagation to the reconciler (which counts failures)
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Specific error handling for HTTP status codes (401/403, 404, 429, 5xx)
// - ✅ Cloudflare `success: false` envelopes surfaced with their messages
// - ❌ NO retry or backoff logic
// - ❌ NO caching of zones or records
// - ❌ NO decision about whether a record needs an update
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Factory MUST fail if the token is empty or not a valid header value
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...`
// - Patch DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use ddns_core::traits::{DnsProvider, DnsProviderFactory, DnsRecord, ZoneId};
use ddns_core::{Error, Result};
use reqwest::header::HeaderValue;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER_NAME: &str = "cloudflare";

/// Cloudflare API v4 response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct Zone {
    id: String,
    name: String,
}

/// Cloudflare DNS provider
///
/// Stateless between calls. All decisions (what to update, how to count
/// failures) are owned by the `Reconciler`.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL (overridable for tests and API proxies)
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:Read and DNS:Edit permissions
    ///
    /// # Errors
    ///
    /// - `Error::Authentication` if the token is empty or cannot be sent as
    ///   an HTTP header
    /// - `Error::Http` if the HTTP client cannot be built
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE)
    }

    /// Create a provider talking to a different API base URL
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();

        // Validate token is usable before any request is made
        if api_token.trim().is_empty() {
            return Err(Error::auth("Cloudflare API token cannot be empty"));
        }
        if HeaderValue::from_str(&format!("Bearer {}", api_token)).is_err() {
            return Err(Error::auth(
                "Cloudflare API token contains characters not allowed in an HTTP header",
            ));
        }

        // Build HTTP client with timeout
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Send a request and unwrap the Cloudflare envelope
    ///
    /// `context` names the operation in error messages.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<Option<T>> {
        let response = request
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: HTTP request failed: {}", context, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status.as_u16(), context, &error_text));
        }

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            Error::provider(
                PROVIDER_NAME,
                format!("{}: Failed to parse response: {}", context, e),
            )
        })?;

        envelope.into_result(context)
    }
}

impl<T> ApiResponse<T> {
    fn into_result(self, context: &str) -> Result<Option<T>> {
        if self.success {
            return Ok(self.result);
        }

        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{} (code {})", e.message, e.code))
            .collect();
        Err(Error::provider(
            PROVIDER_NAME,
            format!("{}: {}", context, messages.join(", ")),
        ))
    }
}

/// Map a non-success HTTP status to an error
fn status_error(status: u16, context: &str, body: &str) -> Error {
    match status {
        401 | 403 => Error::auth(format!(
            "{}: Invalid API token or insufficient permissions. Status: {}",
            context, status
        )),
        404 => Error::not_found(format!("{}: {}", context, status)),
        429 => Error::rate_limited(format!(
            "{}: Rate limit exceeded. Status: {}",
            context, status
        )),
        500..=599 => Error::provider(
            PROVIDER_NAME,
            format!("{}: Cloudflare server error: {} - {}", context, status, body),
        ),
        _ => Error::provider(
            PROVIDER_NAME,
            format!("{}: {} - {}", context, status, body),
        ),
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Find the zone for an apex domain
    ///
    /// ```http
    /// GET /zones?name=example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn resolve_zone(&self, apex_domain: &str) -> Result<ZoneId> {
        tracing::debug!("Looking up zone ID for domain: {}", apex_domain);

        let url = format!("{}/zones", self.base_url);
        let zones: Vec<Zone> = self
            .send(
                self.client.get(&url).query(&[("name", apex_domain)]),
                "Zone lookup",
            )
            .await?
            .unwrap_or_default();

        let zone = zones
            .into_iter()
            .find(|z| z.name.eq_ignore_ascii_case(apex_domain))
            .ok_or_else(|| Error::not_found(format!("Zone not found: {}", apex_domain)))?;

        tracing::debug!("Found zone ID: {}", zone.id);
        Ok(ZoneId::new(zone.id))
    }

    /// List records whose name equals `name`
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?name=home.example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn list_records(&self, zone: &ZoneId, name: &str) -> Result<Vec<DnsRecord>> {
        tracing::debug!("Listing records named {} in zone {}", name, zone);

        let url = format!("{}/zones/{}/dns_records", self.base_url, zone);
        let records: Vec<DnsRecord> = self
            .send(
                self.client.get(&url).query(&[("name", name)]),
                "Record listing",
            )
            .await?
            .unwrap_or_default();

        // The API filter is exact, but stay strict about what we return
        Ok(records
            .into_iter()
            .filter(|r| r.name.eq_ignore_ascii_case(name))
            .collect())
    }

    /// Replace a record's content
    ///
    /// ```http
    /// PATCH /zones/:zone_id/dns_records/:record_id
    /// { "content": "1.2.3.4" }
    /// ```
    async fn update_record(&self, zone: &ZoneId, record_id: &str, content: &str) -> Result<()> {
        tracing::debug!("Patching record {} in zone {}", record_id, zone);

        let url = format!("{}/zones/{}/dns_records/{}", self.base_url, zone, record_id);
        let payload = serde_json::json!({ "content": content });

        let _: Option<serde_json::Value> = self
            .send(self.client.patch(&url).json(&payload), "Record update")
            .await?;

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating Cloudflare providers
#[derive(Debug, Default)]
pub struct CloudflareFactory {
    base_url: Option<String>,
}

impl CloudflareFactory {
    /// Factory for the public Cloudflare API
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory for a different API base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }
}

impl DnsProviderFactory for CloudflareFactory {
    fn create(&self, api_token: &str) -> Result<Box<dyn DnsProvider>> {
        let provider = match &self.base_url {
            Some(base_url) => CloudflareProvider::with_base_url(api_token, base_url.as_str())?,
            None => CloudflareProvider::new(api_token)?,
        };
        Ok(Box::new(provider))
    }
}
