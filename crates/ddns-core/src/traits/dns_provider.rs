// # DNS Provider Trait
//
// Defines the interface the reconciler uses to read and write DNS records.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::traits::{DnsProvider, DnsProviderFactory};
//
// let provider = factory.create(&config.api_token)?;
// let zone = provider.resolve_zone("example.com").await?;
// for record in provider.list_records(&zone, "home.example.com").await? {
//     provider.update_record(&zone, &record.id, "1.2.3.4").await?;
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Record type managed by the updater
pub const RECORD_TYPE_A: &str = "A";

/// Opaque provider identifier of a DNS zone
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneId(pub String);

impl ZoneId {
    /// Create a zone identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A DNS record as returned by the provider
///
/// The reconciler only holds transient copies of these while processing a
/// single FQDN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// The record ID (provider-specific)
    pub id: String,
    /// The record name (FQDN)
    pub name: String,
    /// Record type ("A", "AAAA", "TXT", ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record content (an IP address for A records)
    pub content: String,
    /// Time-to-live, if the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Cloudflare proxy flag, if the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

impl DnsRecord {
    /// Create a record without provider extras
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        record_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            record_type: record_type.into(),
            content: content.into(),
            ttl: None,
            proxied: None,
        }
    }
}

/// Trait for DNS provider implementations
///
/// Every method is a single API call. Providers are stateless between calls
/// and never decide whether an update is needed; that belongs to the
/// [`Reconciler`](crate::Reconciler).
///
/// # Forbidden Capabilities
/// - ❌ Implement retry logic or backoff
/// - ❌ Cache zones or records between calls
/// - ❌ Compare record content against the desired address
/// - ❌ Spawn tasks or threads
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Resolve an apex domain (e.g. "example.com") to its zone
    ///
    /// # Returns
    ///
    /// - `Ok(ZoneId)`: The zone managing the domain
    /// - `Err(Error::NotFound)`: If no zone exists for the domain
    /// - `Err(Error)`: On transport or API errors
    async fn resolve_zone(&self, apex_domain: &str) -> Result<ZoneId, crate::Error>;

    /// List records in `zone` whose name equals `name` exactly
    ///
    /// May return zero, one or several records (of different types).
    async fn list_records(&self, zone: &ZoneId, name: &str)
    -> Result<Vec<DnsRecord>, crate::Error>;

    /// Replace the content of a record
    async fn update_record(
        &self,
        zone: &ZoneId,
        record_id: &str,
        content: &str,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from an API token
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider client
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsProvider>)`: A ready client
    /// - `Err(Error::Authentication)`: If the token is malformed
    fn create(&self, api_token: &str) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
