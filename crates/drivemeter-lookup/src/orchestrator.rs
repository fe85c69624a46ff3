//! Lookup orchestrator: tiered fallback across live sources.
//!
//! This module provides the `LookupOrchestrator`, which validates the
//! registration number, tries the enabled live tiers strictly one after the
//! other in their fixed priority order, normalizes the first answer, and
//! falls back to the [`Synthesizer`] when every live tier has failed.
//!
//! Once validation passes the result is always successful. A successful
//! envelope does not imply real data; check `source` for
//! [`DataSource::Simulated`].

use crate::error::{TierError, TierResult};
use crate::normalizer::{normalize_challans, normalize_rc, normalize_vehicle};
use crate::synthesizer::Synthesizer;
use crate::tier::{LookupTier, RawChallan, RawRc, RawVehicle, TierResponse};
use crate::tiers::{FreeTierAdapter, PaidTierAdapter};
use chrono::{Local, NaiveDate};
use drivemeter_core::{
    ChallanRecord, DataSource, LookupConfig, LookupKind, LookupResult, RcRecord,
    RegistrationNumber, VehicleRecord,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Payload from whichever live tier answered.
#[allow(clippy::large_enum_variant)]
enum Fetched {
    Vehicle(TierResponse<RawVehicle>),
    Challans(TierResponse<Vec<RawChallan>>),
    Rc(TierResponse<RawRc>),
}

async fn fetch(
    tier: &dyn LookupTier,
    kind: LookupKind,
    registration: &RegistrationNumber,
) -> TierResult<Fetched> {
    Ok(match kind {
        LookupKind::Vehicle => Fetched::Vehicle(tier.fetch_vehicle(registration).await?),
        LookupKind::Challan => Fetched::Challans(tier.fetch_challans(registration).await?),
        LookupKind::Rc => Fetched::Rc(tier.fetch_rc(registration).await?),
    })
}

fn tier_label(source: DataSource) -> &'static str {
    match source {
        DataSource::FreeApi => "free API",
        DataSource::PaidApi => "paid API",
        DataSource::Simulated => "simulation",
    }
}

fn challan_message(count: usize, suffix: &str) -> String {
    if count > 0 {
        format!("Found {count} challan(s){suffix}")
    } else {
        format!("No challans found{suffix}")
    }
}

/// Resolves lookups across the live tiers and the synthesizer.
pub struct LookupOrchestrator {
    /// Live tiers, kept sorted by priority
    tiers: Vec<Arc<dyn LookupTier>>,
    /// Terminal tier
    synthesizer: Synthesizer,
    /// Budget for the whole live-tier chain
    deadline: Option<Duration>,
    /// Reference date for expiry checks and synthesis; today when unset
    reference_date: Option<NaiveDate>,
}

impl LookupOrchestrator {
    /// Create an orchestrator with no live tiers; every lookup is simulated.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tiers: Vec::new(),
            synthesizer: Synthesizer::new(),
            deadline: None,
            reference_date: None,
        }
    }

    /// Build the orchestrator and its adapters from configuration.
    ///
    /// # Errors
    /// Returns error if an enabled adapter's HTTP client cannot be created.
    pub fn from_config(config: &LookupConfig) -> TierResult<Self> {
        let mut orchestrator = Self::new();

        if config.tiers.use_free_tier {
            orchestrator.add_tier(Arc::new(FreeTierAdapter::new(&config.free_tier)?));
        }
        if config.tiers.use_paid_tier {
            orchestrator.add_tier(Arc::new(PaidTierAdapter::new(&config.paid_tier)?));
        }
        if let Some(secs) = config.lookup.deadline_secs {
            orchestrator = orchestrator.with_deadline(Duration::from_secs(secs));
        }

        tracing::debug!(
            "Lookup orchestrator built with tiers {:?}, deadline {:?}",
            orchestrator.tier_sources(),
            orchestrator.deadline
        );

        Ok(orchestrator)
    }

    /// Add a live tier. Tiers are tried free first, then paid, regardless
    /// of insertion order.
    pub fn add_tier(&mut self, tier: Arc<dyn LookupTier>) {
        self.tiers.push(tier);
        self.tiers.sort_by_key(|t| t.source());
    }

    /// Bound the whole live-tier chain of each lookup.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Pin the reference date instead of using the local date.
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Sources of the live tiers, in the order they are tried.
    #[must_use]
    pub fn tier_sources(&self) -> Vec<DataSource> {
        self.tiers.iter().map(|t| t.source()).collect()
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn validate(raw: &str) -> Result<RegistrationNumber, String> {
        RegistrationNumber::parse(raw).map_err(|e| {
            tracing::debug!("Rejected registration '{}': {}", raw, e);
            e.to_string()
        })
    }

    /// Try each live tier serving `kind`, in order, until one answers.
    async fn first_live_answer(
        &self,
        kind: LookupKind,
        registration: &RegistrationNumber,
    ) -> Option<(DataSource, Fetched)> {
        let started = Instant::now();

        for tier in self.tiers.iter().filter(|t| t.supports(kind)) {
            let source = tier.source();
            tracing::debug!("Trying {} for {} lookup of {}", source, kind, registration);

            let attempt = fetch(tier.as_ref(), kind, registration);
            let outcome = match self.deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_sub(started.elapsed());
                    if remaining.is_zero() {
                        Err(TierError::DeadlineExceeded { tier: source })
                    } else {
                        tokio::time::timeout(remaining, attempt)
                            .await
                            .unwrap_or(Err(TierError::DeadlineExceeded { tier: source }))
                    }
                }
                None => attempt.await,
            };

            match outcome {
                Ok(fetched) => {
                    tracing::info!("{} lookup of {} answered by {}", kind, registration, source);
                    return Some((source, fetched));
                }
                Err(e) => {
                    tracing::warn!(
                        "{} failed for {} lookup of {}, trying next tier: {}",
                        source,
                        kind,
                        registration,
                        e
                    );
                }
            }
        }

        None
    }

    /// Look up the full vehicle record.
    pub async fn get_vehicle_info(&self, registration: &str) -> LookupResult<VehicleRecord> {
        let registration = match Self::validate(registration) {
            Ok(registration) => registration,
            Err(message) => return LookupResult::failure(message),
        };
        let today = self.today();

        if let Some((source, Fetched::Vehicle(response))) = self
            .first_live_answer(LookupKind::Vehicle, &registration)
            .await
        {
            let record = normalize_vehicle(response.payload, &registration, source, today);
            return LookupResult::success(
                record,
                format!("Vehicle information retrieved from {}", tier_label(source)),
                Some(source),
            )
            .with_txn_id(response.txn_id);
        }

        tracing::info!("vehicle lookup of {} answered by simulation", registration);
        LookupResult::success(
            self.synthesizer.vehicle(&registration, today),
            "Vehicle information retrieved successfully (simulated)",
            Some(DataSource::Simulated),
        )
    }

    /// Look up traffic-violation entries. An empty list is a valid answer.
    pub async fn get_challan_info(&self, registration: &str) -> LookupResult<Vec<ChallanRecord>> {
        let registration = match Self::validate(registration) {
            Ok(registration) => registration,
            Err(message) => return LookupResult::failure(message),
        };
        let today = self.today();

        if let Some((source, Fetched::Challans(response))) = self
            .first_live_answer(LookupKind::Challan, &registration)
            .await
        {
            let challans = normalize_challans(response.payload, &registration, source, today);
            let message = format!(
                "{} from {}",
                challan_message(challans.len(), ""),
                tier_label(source)
            );
            return LookupResult::success(challans, message, Some(source))
                .with_txn_id(response.txn_id);
        }

        tracing::info!("challan lookup of {} answered by simulation", registration);
        let challans = self.synthesizer.challans(&registration, today);
        let message = challan_message(challans.len(), " (simulated)");
        LookupResult::success(challans, message, Some(DataSource::Simulated))
    }

    /// Look up the registration certificate.
    pub async fn get_rc_info(&self, registration: &str) -> LookupResult<RcRecord> {
        let registration = match Self::validate(registration) {
            Ok(registration) => registration,
            Err(message) => return LookupResult::failure(message),
        };

        if let Some((source, Fetched::Rc(response))) =
            self.first_live_answer(LookupKind::Rc, &registration).await
        {
            let record = normalize_rc(response.payload, &registration, source);
            return LookupResult::success(
                record,
                format!("RC information retrieved from {}", tier_label(source)),
                Some(source),
            )
            .with_txn_id(response.txn_id);
        }

        tracing::info!("rc lookup of {} answered by simulation", registration);
        LookupResult::success(
            self.synthesizer.rc(&registration, self.today()),
            "RC information retrieved successfully (simulated)",
            Some(DataSource::Simulated),
        )
    }
}

impl Default for LookupOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
