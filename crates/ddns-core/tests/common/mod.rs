//! Test doubles and common utilities for reconciler contract tests
//!
//! The scripted provider answers from fixed tables and records every call,
//! so tests can assert on exactly which API calls a run made.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, DnsProviderFactory, DnsRecord, ZoneId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// A provider call, as observed by [`ScriptedDnsProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ResolveZone(String),
    ListRecords { zone: String, name: String },
    UpdateRecord { zone: String, record_id: String, content: String },
}

/// Shared, ordered log of provider calls
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    /// All calls in the order they were made
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Update calls only
    pub fn updates(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::UpdateRecord { .. }))
            .collect()
    }

    /// Number of update calls
    pub fn update_call_count(&self) -> usize {
        self.updates().len()
    }

    /// Names passed to list_records, in order
    pub fn listed_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ListRecords { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }
}

/// A DnsProvider that answers from fixed tables
#[derive(Debug, Clone, Default)]
pub struct ScriptedDnsProvider {
    /// apex domain -> zone id
    zones: HashMap<String, String>,
    /// apex domains whose lookup fails with a transport error
    failing_zones: HashSet<String>,
    /// FQDN -> records carrying that name
    records: HashMap<String, Vec<DnsRecord>>,
    /// FQDNs whose listing fails
    failing_lists: HashSet<String>,
    /// Record ids whose update fails
    failing_updates: HashSet<String>,
    log: CallLog,
}

impl ScriptedDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, apex: &str, zone_id: &str) -> Self {
        self.zones.insert(apex.to_string(), zone_id.to_string());
        self
    }

    pub fn with_failing_zone(mut self, apex: &str) -> Self {
        self.failing_zones.insert(apex.to_string());
        self
    }

    pub fn with_record(mut self, record: DnsRecord) -> Self {
        self.records
            .entry(record.name.clone())
            .or_default()
            .push(record);
        self
    }

    pub fn with_failing_list(mut self, fqdn: &str) -> Self {
        self.failing_lists.insert(fqdn.to_string());
        self
    }

    pub fn with_failing_update(mut self, record_id: &str) -> Self {
        self.failing_updates.insert(record_id.to_string());
        self
    }

    /// Handle on the call log, shared with every clone of this provider
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for ScriptedDnsProvider {
    async fn resolve_zone(&self, apex_domain: &str) -> Result<ZoneId> {
        self.log.push(Call::ResolveZone(apex_domain.to_string()));

        if self.failing_zones.contains(apex_domain) {
            return Err(Error::http("connection refused"));
        }

        self.zones
            .get(apex_domain)
            .map(|id| ZoneId::new(id.clone()))
            .ok_or_else(|| Error::not_found(format!("Zone not found: {}", apex_domain)))
    }

    async fn list_records(&self, zone: &ZoneId, name: &str) -> Result<Vec<DnsRecord>> {
        self.log.push(Call::ListRecords {
            zone: zone.to_string(),
            name: name.to_string(),
        });

        if self.failing_lists.contains(name) {
            return Err(Error::http("timed out"));
        }

        Ok(self.records.get(name).cloned().unwrap_or_default())
    }

    async fn update_record(&self, zone: &ZoneId, record_id: &str, content: &str) -> Result<()> {
        self.log.push(Call::UpdateRecord {
            zone: zone.to_string(),
            record_id: record_id.to_string(),
            content: content.to_string(),
        });

        if self.failing_updates.contains(record_id) {
            return Err(Error::provider("scripted", "update rejected"));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Factory handing out clones of a scripted provider
pub struct ScriptedFactory(pub ScriptedDnsProvider);

impl DnsProviderFactory for ScriptedFactory {
    fn create(&self, _api_token: &str) -> Result<Box<dyn DnsProvider>> {
        Ok(Box::new(self.0.clone()))
    }
}

/// Factory that rejects every token
pub struct RejectingFactory;

impl DnsProviderFactory for RejectingFactory {
    fn create(&self, _api_token: &str) -> Result<Box<dyn DnsProvider>> {
        Err(Error::auth("API token is malformed"))
    }
}

/// An A record
pub fn a_record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord::new(id, name, "A", content)
}

/// Helper to turn string literals into an owned FQDN list
pub fn fqdns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
