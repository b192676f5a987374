// # ddns-core
//
// Core library for the one-shot DDNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **IpSource**: Trait for discovering the current public IPv4 address
// - **DnsProvider**: Trait for zone lookup, record listing and record updates
// - **Reconciler**: Applies one address to the A records of a list of FQDNs
// - **RunConfig**: The FQDN list and API token for a run
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic lives in the reconciler only;
//    providers and IP sources are thin API wrappers
// 2. **Lenient Runs**: A failure for one FQDN never stops the others
// 3. **Library-First**: The binary is a thin front end over this crate
// 4. **Stateless**: Nothing is persisted between runs

pub mod traits;
pub mod reconciler;
pub mod domain;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{DnsProvider, DnsProviderFactory, DnsRecord, IpSource, ZoneId, RECORD_TYPE_A};
pub use reconciler::{Failure, Reconciler, RunOutcome};
pub use config::RunConfig;
pub use error::{Error, Result};
