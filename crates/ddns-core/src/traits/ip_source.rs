// # IP Source Trait
//
// Defines the interface for discovering the machine's current public IPv4
// address.
//
// ## Implementations
//
// - HTTP "what is my IP" services: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//     let ip = source.current().await?;
//     println!("Current IP address is: {}", ip);
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for IP source implementations
///
/// A run asks for the address exactly once. Failing to obtain it is fatal
/// for the run: reconciliation never starts without a desired address.
///
/// # Forbidden Capabilities
/// - ❌ Perform DNS updates (use `DnsProvider`)
/// - ❌ Implement retry logic or fall back to other services silently
/// - ❌ Cache the address across runs
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: The current address
    /// - `Err(Error::IpSource)`: If the service is unreachable or answered
    ///   with something that is not an IPv4 address
    async fn current(&self) -> Result<Ipv4Addr, crate::Error>;

    /// Short name of the source (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
