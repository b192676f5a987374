//! Record reconciler
//!
//! The Reconciler is responsible for:
//! - Resolving each FQDN's zone via the DnsProvider
//! - Listing the records that carry the FQDN's name
//! - Updating stale records of the target type (unless in check mode)
//! - Counting failures without aborting the run
//!
//! ## Flow
//!
//! ```text
//! for fqdn in fqdns (input order):
//!     apex_domain(fqdn) ──► resolve_zone ──► list_records ──► per record:
//!                              │                  │             type != target → ignore
//!                           failure            failure          content == ip  → converged
//!                              │                  │             check mode     → report only
//!                              ▼                  ▼             otherwise      → update_record
//!                        +1, next fqdn      +1, next fqdn                         │
//!                                                                              failure → +1
//! ```
//!
//! Failures are counted per sub-operation and folded into a [`RunOutcome`].
//! The reason for each failure only goes to the log.

use crate::domain::apex_domain;
use crate::error::Error;
use crate::traits::{DnsProvider, DnsProviderFactory, DnsRecord, ZoneId};
use thiserror::Error as ThisError;
use tracing::{debug, error, info, warn};

/// A failed sub-operation of a run
///
/// Only ever logged; callers see the count in [`RunOutcome`].
#[derive(ThisError, Debug)]
pub enum Failure {
    /// The provider client could not be built from the API token
    #[error("unable to create DNS provider client: {0}")]
    ClientConstruction(String),

    /// Zone resolution failed for an FQDN
    #[error("zone lookup failed for {fqdn}: {source}")]
    ZoneLookup {
        fqdn: String,
        #[source]
        source: Error,
    },

    /// Listing the FQDN's records failed
    #[error("listing records for {fqdn} failed: {source}")]
    RecordList {
        fqdn: String,
        #[source]
        source: Error,
    },

    /// Updating a stale record failed
    #[error("updating record {record_id} of {fqdn} failed: {source}")]
    RecordUpdate {
        fqdn: String,
        record_id: String,
        #[source]
        source: Error,
    },
}

/// Aggregate result of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOutcome {
    errors: usize,
}

impl RunOutcome {
    /// An outcome with `errors` failed sub-operations
    pub fn with_errors(errors: usize) -> Self {
        Self { errors }
    }

    /// Number of failed sub-operations
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// `true` when nothing failed
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }

    /// Log a failure and count it
    fn record(&mut self, failure: Failure) {
        error!("{}", failure);
        self.errors += 1;
    }

    /// Fold another outcome into this one
    fn merge(&mut self, other: RunOutcome) {
        self.errors += other.errors;
    }
}

/// What happened to a single record of the target type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordAction {
    /// Content already equals the desired address
    Converged,
    /// Stale, but check mode prevented the update
    WouldUpdate,
    /// Stale and updated
    Updated,
}

/// Applies one address to the A records of a list of FQDNs
///
/// ## Lifecycle
///
/// 1. Create with [`Reconciler::new()`] or [`Reconciler::connect()`]
/// 2. Call [`Reconciler::reconcile()`] once per run
///
/// ## Client construction
///
/// [`Reconciler::connect()`] does not fail when the provider client cannot
/// be built. The failure is counted once per run and every FQDN is still
/// walked; each one then fails its zone lookup.
pub struct Reconciler {
    /// DNS provider client, absent when construction failed
    provider: Option<Box<dyn DnsProvider>>,

    /// Why the client is absent
    construction_error: Option<String>,
}

impl Reconciler {
    /// Create a reconciler around an existing provider client
    pub fn new(provider: Box<dyn DnsProvider>) -> Self {
        Self {
            provider: Some(provider),
            construction_error: None,
        }
    }

    /// Build the provider client from an API token and wrap it
    ///
    /// A construction error is kept and reported by [`Self::reconcile()`]
    /// instead of being returned.
    pub fn connect(factory: &dyn DnsProviderFactory, api_token: &str) -> Self {
        match factory.create(api_token) {
            Ok(provider) => Self::new(provider),
            Err(e) => Self {
                provider: None,
                construction_error: Some(e.to_string()),
            },
        }
    }

    /// Reconcile `record_type` records of every FQDN against `desired_ip`
    ///
    /// FQDNs are processed strictly in order, each exactly once. A failure for
    /// one FQDN never stops the others.
    ///
    /// # Parameters
    ///
    /// - `fqdns`: Names to process, in order (duplicates processed again)
    /// - `record_type`: Record type to manage, normally [`RECORD_TYPE_A`](crate::traits::RECORD_TYPE_A)
    /// - `desired_ip`: Content every matching record should carry
    /// - `check_mode`: Report stale records without updating them
    pub async fn reconcile<S: AsRef<str>>(
        &self,
        fqdns: &[S],
        record_type: &str,
        desired_ip: &str,
        check_mode: bool,
    ) -> RunOutcome {
        let mut outcome = RunOutcome::default();

        if let Some(reason) = &self.construction_error {
            outcome.record(Failure::ClientConstruction(reason.clone()));
        }

        if check_mode {
            info!("Check mode is active, no changes will be made.");
        }

        for fqdn in fqdns {
            let fqdn = fqdn.as_ref();
            outcome.merge(
                self.reconcile_fqdn(fqdn, record_type, desired_ip, check_mode)
                    .await,
            );
        }

        info!("{} errors occurred.", outcome.error_count());
        outcome
    }

    /// Process a single FQDN and return its failures
    async fn reconcile_fqdn(
        &self,
        fqdn: &str,
        record_type: &str,
        desired_ip: &str,
        check_mode: bool,
    ) -> RunOutcome {
        let mut outcome = RunOutcome::default();
        let fqdn = normalize_fqdn(fqdn);
        info!("Processing FQDN: {}", fqdn);

        let zone = match self.resolve_zone(fqdn).await {
            Ok(zone) => zone,
            Err(source) => {
                outcome.record(Failure::ZoneLookup {
                    fqdn: fqdn.to_string(),
                    source,
                });
                return outcome;
            }
        };

        let records = match self.list_records(&zone, fqdn).await {
            Ok(records) => records,
            Err(source) => {
                outcome.record(Failure::RecordList {
                    fqdn: fqdn.to_string(),
                    source,
                });
                return outcome;
            }
        };

        debug!("{} record(s) found for {}", records.len(), fqdn);

        for record in records.iter().filter(|r| r.record_type == record_type) {
            match self
                .reconcile_record(&zone, fqdn, record, desired_ip, check_mode)
                .await
            {
                Ok(action) => debug!("Record {} of {}: {:?}", record.id, fqdn, action),
                Err(failure) => outcome.record(failure),
            }
        }

        outcome
    }

    /// Bring one record of the target type to `desired_ip`
    async fn reconcile_record(
        &self,
        zone: &ZoneId,
        fqdn: &str,
        record: &DnsRecord,
        desired_ip: &str,
        check_mode: bool,
    ) -> Result<RecordAction, Failure> {
        if record.content == desired_ip {
            info!(
                "{} points to current IP address, no change is needed.",
                record.name
            );
            return Ok(RecordAction::Converged);
        }

        info!(
            "{} points to {}, the record will be updated.",
            record.name, record.content
        );

        if check_mode {
            warn!(
                "Check mode: {} would be set to {}, skipping update.",
                record.name, desired_ip
            );
            return Ok(RecordAction::WouldUpdate);
        }

        info!("Setting {} => {} ...", fqdn, desired_ip);
        self.update_record(zone, &record.id, desired_ip)
            .await
            .map_err(|source| Failure::RecordUpdate {
                fqdn: fqdn.to_string(),
                record_id: record.id.clone(),
                source,
            })?;

        info!("Success! {} now points to {}", fqdn, desired_ip);
        Ok(RecordAction::Updated)
    }

    /// Derive the apex domain and resolve its zone
    async fn resolve_zone(&self, fqdn: &str) -> Result<ZoneId, Error> {
        let domain = apex_domain(fqdn).ok_or_else(|| {
            Error::invalid_input(format!("cannot derive a registrable domain from {}", fqdn))
        })?;

        debug!("Resolving zone for {} (apex {})", fqdn, domain);
        self.client()?.resolve_zone(&domain).await
    }

    async fn list_records(&self, zone: &ZoneId, fqdn: &str) -> Result<Vec<DnsRecord>, Error> {
        self.client()?.list_records(zone, fqdn).await
    }

    async fn update_record(
        &self,
        zone: &ZoneId,
        record_id: &str,
        content: &str,
    ) -> Result<(), Error> {
        self.client()?.update_record(zone, record_id, content).await
    }

    /// The provider client, or the reason it is missing
    fn client(&self) -> Result<&dyn DnsProvider, Error> {
        self.provider.as_deref().ok_or_else(|| {
            Error::auth(format!(
                "no DNS provider client ({})",
                self.construction_error.as_deref().unwrap_or("not configured")
            ))
        })
    }
}

/// Strip surrounding whitespace and the root label's trailing dot
///
/// Providers store record names without the trailing dot, so the absolute
/// form `home.example.com.` must match `home.example.com`.
fn normalize_fqdn(fqdn: &str) -> &str {
    fqdn.trim().trim_end_matches('.')
}
