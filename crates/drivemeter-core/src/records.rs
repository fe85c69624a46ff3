//! Canonical record shapes returned to callers.
//!
//! Every lookup, whichever tier answered it, is delivered in these types.
//! A successful envelope does not imply the data is real: check
//! [`LookupResult::source`] or the record's `data_source` for
//! [`DataSource::Simulated`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tier that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Public, low-quota source
    FreeApi,
    /// Metered, credentialed source
    PaidApi,
    /// Deterministic synthetic data
    Simulated,
}

impl DataSource {
    /// Wire name of the tier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FreeApi => "free_api",
            Self::PaidApi => "paid_api",
            Self::Simulated => "simulated",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of lookup being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    /// Full vehicle record
    Vehicle,
    /// Traffic-violation entries
    Challan,
    /// Registration certificate
    Rc,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vehicle => "vehicle",
            Self::Challan => "challan",
            Self::Rc => "rc",
        })
    }
}

/// Insurance validity summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceDetails {
    /// Policy valid-until date
    pub valid_upto: String,
    /// Insurer name
    pub insurer_name: String,
    /// Whether the policy lapsed before the reference date
    pub is_expired: bool,
}

/// Pollution-under-control certificate summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PucDetails {
    /// Certificate valid-until date
    pub valid_upto: String,
    /// Emission test result
    pub test_result: String,
    /// Whether the certificate lapsed before the reference date
    pub is_expired: bool,
}

/// Road tax summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxDetails {
    /// Tax paid-until date
    pub tax_paid_upto: String,
    /// Tax amount in rupees, when known
    pub tax_amount: Option<u32>,
    /// Whether tax is overdue
    pub is_overdue: bool,
}

/// Full vehicle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    /// Canonical registration number
    pub registration_number: String,
    /// Registered owner
    pub owner_name: String,
    /// Owner's father / guardian
    pub father_name: String,
    /// Owner address
    pub address: String,
    /// Vehicle class, e.g. "Motor Car"
    pub vehicle_class: String,
    /// Manufacturer
    pub make: String,
    /// Model
    pub model: String,
    /// Fuel type
    pub fuel_type: String,
    /// Body color
    pub color: String,
    /// Transmission
    pub transmission: String,
    /// Year of manufacture
    pub manufacturing_year: String,
    /// Date of manufacture
    pub manufacturing_date: String,
    /// Date of registration
    pub registration_date: String,
    /// Chassis number
    pub chassis_number: String,
    /// Engine number
    pub engine_number: String,
    /// RTO code (registration prefix)
    pub rto_code: String,
    /// RTO name
    pub rto_name: String,
    /// State of the registering RTO
    pub rto_state: String,
    /// Insurance expiry date
    pub insurance_expiry: String,
    /// PUC expiry date
    pub puc_expiry: String,
    /// Tax status, e.g. "PAID"
    pub tax_status: String,
    /// Fitness certificate expiry, when known
    pub fitness_expiry: Option<String>,
    /// Insurance summary
    pub insurance_details: InsuranceDetails,
    /// PUC summary
    pub puc_details: PucDetails,
    /// Tax summary
    pub tax_details: TaxDetails,
    /// Tier that produced the record
    pub data_source: DataSource,
}

/// Challan payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChallanStatus {
    /// Fine paid
    Paid,
    /// Fine outstanding
    Unpaid,
    /// Under adjudication
    Pending,
}

impl ChallanStatus {
    /// Parse a source status string, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PAID" | "DISPOSED" => Some(Self::Paid),
            "UNPAID" => Some(Self::Unpaid),
            "PENDING" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// One traffic-violation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallanRecord {
    /// Challan number
    pub challan_number: String,
    /// Vehicle registration number
    pub vehicle_number: String,
    /// Date of violation
    pub violation_date: String,
    /// Violation description
    pub violation_type: String,
    /// Fine in rupees
    pub fine_amount: u32,
    /// Payment status
    pub status: ChallanStatus,
    /// Where the violation was recorded
    pub location: String,
    /// Tier that produced the record
    pub data_source: DataSource,
}

/// Registration certificate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcRecord {
    /// Canonical registration number
    pub registration_number: String,
    /// Registered owner
    pub owner_name: String,
    /// Owner's father / guardian
    pub father_name: String,
    /// Owner address
    pub address: String,
    /// Vehicle class
    pub vehicle_class: String,
    /// Manufacturer
    pub make: String,
    /// Model
    pub model: String,
    /// Fuel type
    pub fuel_type: String,
    /// Body color
    pub color: String,
    /// Date of manufacture
    pub manufacturing_date: String,
    /// Date of registration
    pub registration_date: String,
    /// Chassis number
    pub chassis_number: String,
    /// Engine number
    pub engine_number: String,
    /// RTO code
    pub rto_code: String,
    /// RTO name
    pub rto_name: String,
    /// Fitness certificate validity, when known
    pub fitness_upto: Option<String>,
    /// Seating capacity
    pub seating_capacity: String,
    /// Tier that produced the record
    pub data_source: DataSource,
}

impl RcRecord {
    /// Project a vehicle record onto the RC shape.
    #[must_use]
    pub fn from_vehicle(vehicle: &VehicleRecord, seating_capacity: impl Into<String>) -> Self {
        Self {
            registration_number: vehicle.registration_number.clone(),
            owner_name: vehicle.owner_name.clone(),
            father_name: vehicle.father_name.clone(),
            address: vehicle.address.clone(),
            vehicle_class: vehicle.vehicle_class.clone(),
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            fuel_type: vehicle.fuel_type.clone(),
            color: vehicle.color.clone(),
            manufacturing_date: vehicle.manufacturing_date.clone(),
            registration_date: vehicle.registration_date.clone(),
            chassis_number: vehicle.chassis_number.clone(),
            engine_number: vehicle.engine_number.clone(),
            rto_code: vehicle.rto_code.clone(),
            rto_name: vehicle.rto_name.clone(),
            fitness_upto: vehicle.fitness_expiry.clone(),
            seating_capacity: seating_capacity.into(),
            data_source: vehicle.data_source,
        }
    }
}

/// Envelope returned by every lookup operation.
///
/// `success == false` always carries `data == None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult<T> {
    /// Whether `data` is present
    pub success: bool,
    /// Payload
    pub data: Option<T>,
    /// Human-readable outcome
    pub message: String,
    /// Tier that answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DataSource>,
    /// Paid-tier transaction id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn_id: Option<String>,
}

impl<T> LookupResult<T> {
    /// Successful envelope.
    #[must_use]
    pub fn success(data: T, message: impl Into<String>, source: Option<DataSource>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            source,
            txn_id: None,
        }
    }

    /// Failed envelope, never carrying data.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            source: None,
            txn_id: None,
        }
    }

    /// Attach a transaction id.
    #[must_use]
    pub fn with_txn_id(mut self, txn_id: Option<String>) -> Self {
        self.txn_id = txn_id;
        self
    }
}

/// Paid-tier balance query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResult {
    /// Whether the balance was retrieved
    pub success: bool,
    /// Remaining balance; zero on failure
    pub balance: f64,
    /// Human-readable outcome
    pub message: String,
}
