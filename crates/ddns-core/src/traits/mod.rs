//! Core traits for the DDNS updater
//!
//! This module defines the interfaces of the external collaborators the
//! reconciler talks to.
//!
//! - [`IpSource`]: Discover the current public IPv4 address
//! - [`DnsProvider`]: Look up zones, list records and update records
//! - [`DnsProviderFactory`]: Build a provider client from an API token

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsProviderFactory, DnsRecord, ZoneId, RECORD_TYPE_A};
