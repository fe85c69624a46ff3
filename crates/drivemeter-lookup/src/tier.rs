//! Live tier capability trait and the raw payloads tiers hand back.

use crate::error::{TierError, TierResult};
use async_trait::async_trait;
use drivemeter_core::{DataSource, LookupKind, RegistrationNumber};

/// Trait for live data tiers (free and paid).
///
/// Implementations must convert every transport, status and decoding problem
/// into a [`TierError`]; the orchestrator relies on this to fall through to
/// the next tier without special-casing error types. Tiers should be
/// thread-safe (Send + Sync) so separate lookups can run concurrently.
#[async_trait]
pub trait LookupTier: Send + Sync {
    /// Tag attached to records this tier produces. Also fixes the tier's
    /// position in the fallback chain.
    fn source(&self) -> DataSource;

    /// Whether this tier serves the given lookup kind.
    fn supports(&self, kind: LookupKind) -> bool;

    /// Fetch the raw vehicle record.
    async fn fetch_vehicle(
        &self,
        registration: &RegistrationNumber,
    ) -> TierResult<TierResponse<RawVehicle>>;

    /// Fetch raw challan entries.
    async fn fetch_challans(
        &self,
        _registration: &RegistrationNumber,
    ) -> TierResult<TierResponse<Vec<RawChallan>>> {
        Err(TierError::Unsupported {
            tier: self.source(),
            kind: LookupKind::Challan,
        })
    }

    /// Fetch the raw registration certificate.
    async fn fetch_rc(
        &self,
        _registration: &RegistrationNumber,
    ) -> TierResult<TierResponse<RawRc>> {
        Err(TierError::Unsupported {
            tier: self.source(),
            kind: LookupKind::Rc,
        })
    }
}

/// Payload plus the tier's transaction id, when it issues one.
#[derive(Debug, Clone)]
pub struct TierResponse<T> {
    /// Raw payload
    pub payload: T,
    /// Transaction id for metered calls
    pub txn_id: Option<String>,
}

impl<T> TierResponse<T> {
    /// Wrap a payload without a transaction id.
    #[must_use]
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            txn_id: None,
        }
    }
}

/// Vehicle fields as a tier supplied them, already mapped from the tier's
/// own field names. `None` means the tier left the field out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct RawVehicle {
    pub owner_name: Option<String>,
    pub father_name: Option<String>,
    pub address: Option<String>,
    pub vehicle_class: Option<String>,
    /// Combined manufacturer and model, e.g. "Maruti Suzuki Swift"
    pub maker_model: Option<String>,
    pub fuel_type: Option<String>,
    pub color: Option<String>,
    pub transmission: Option<String>,
    pub manufacturing_date: Option<String>,
    pub registration_date: Option<String>,
    pub chassis_number: Option<String>,
    pub engine_number: Option<String>,
    pub rto_code: Option<String>,
    pub rto_name: Option<String>,
    pub insurance_expiry: Option<String>,
    pub insurer_name: Option<String>,
    pub puc_expiry: Option<String>,
    pub tax_expiry: Option<String>,
    pub tax_status: Option<String>,
    pub tax_amount: Option<u32>,
    pub fitness_expiry: Option<String>,
}

impl RawVehicle {
    /// True when the tier supplied no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One challan entry as a tier supplied it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct RawChallan {
    pub challan_number: Option<String>,
    pub vehicle_number: Option<String>,
    pub violation_date: Option<String>,
    pub violation_type: Option<String>,
    pub fine_amount: Option<u32>,
    pub status: Option<String>,
    pub location: Option<String>,
}

impl RawChallan {
    /// True when the tier supplied no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Registration certificate fields as a tier supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct RawRc {
    pub owner_name: Option<String>,
    pub father_name: Option<String>,
    pub address: Option<String>,
    pub vehicle_class: Option<String>,
    pub maker_model: Option<String>,
    pub fuel_type: Option<String>,
    pub color: Option<String>,
    pub manufacturing_date: Option<String>,
    pub registration_date: Option<String>,
    pub chassis_number: Option<String>,
    pub engine_number: Option<String>,
    pub rto_code: Option<String>,
    pub rto_name: Option<String>,
    pub fitness_upto: Option<String>,
    pub seating_capacity: Option<String>,
}

impl RawRc {
    /// True when the tier supplied no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
