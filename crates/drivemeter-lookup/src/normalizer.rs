//! Mapping of raw tier payloads onto the canonical record types.
//!
//! The same target rules apply whichever live tier supplied the payload;
//! tier-specific field names are already resolved by the adapters into
//! [`RawVehicle`], [`RawChallan`] and [`RawRc`].

use crate::tier::{RawChallan, RawRc, RawVehicle};
use chrono::{DateTime, Datelike, NaiveDate};
use drivemeter_core::{
    resolve_rto, ChallanRecord, ChallanStatus, DataSource, InsuranceDetails, PucDetails,
    RcRecord, RegistrationNumber, TaxDetails, VehicleRecord,
};

/// Sentinel for missing identifiers and descriptive fields.
pub const NOT_AVAILABLE: &str = "N/A";

const DEFAULT_FUEL_TYPE: &str = "Petrol";
const DEFAULT_COLOR: &str = "White";
const DEFAULT_TRANSMISSION: &str = "Manual";
const DEFAULT_VEHICLE_CLASS: &str = "Motor Car";
const DEFAULT_TAX_STATUS: &str = "PAID";
const DEFAULT_RECORD_DATE: &str = "2020-01-01";
const DEFAULT_INSURANCE_EXPIRY: &str = "2024-12-31";
const DEFAULT_PUC_EXPIRY: &str = "2024-06-30";
const DEFAULT_TAX_EXPIRY: &str = "2024-12-31";
const DEFAULT_VIOLATION_TYPE: &str = "Traffic Violation";
const DEFAULT_FINE_AMOUNT: u32 = 500;

/// Day-first and ISO layouts seen across registry payloads.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d-%b-%Y"];

/// Split a combined "maker model" string on the first whitespace boundary.
///
/// `"Maruti Suzuki Swift"` yields `("Maruti", "Suzuki Swift")`. A missing or
/// blank value yields the sentinel make and an empty model.
#[must_use]
pub fn split_maker_model(maker_model: Option<&str>) -> (String, String) {
    let combined = maker_model.map(str::trim).unwrap_or_default();
    if combined.is_empty() {
        return (NOT_AVAILABLE.to_string(), String::new());
    }

    match combined.split_once(char::is_whitespace) {
        Some((make, model)) => (make.to_string(), model.trim_start().to_string()),
        None => (combined.to_string(), String::new()),
    }
}

/// Parse a registry date in any of the accepted layouts.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            // Timestamps without an offset, e.g. "2027-02-28T00:00:00"
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

/// Whether `raw` names a date strictly before `today`.
///
/// Unparseable dates are never treated as expired.
#[must_use]
pub fn is_before(raw: &str, today: NaiveDate) -> bool {
    parse_date(raw).is_some_and(|date| date < today)
}

/// Canonical `YYYY-MM-DD` form of a date, or the input unchanged when it
/// cannot be parsed.
fn canonical_date(raw: &str) -> String {
    parse_date(raw).map_or_else(
        || raw.trim().to_string(),
        |date| date.format("%Y-%m-%d").to_string(),
    )
}

fn date_or(raw: Option<String>, default: &str) -> String {
    raw.map_or_else(|| default.to_string(), |d| canonical_date(&d))
}

fn text_or(raw: Option<String>, default: &str) -> String {
    raw.unwrap_or_else(|| default.to_string())
}

/// Build a canonical vehicle record from a live tier payload.
#[must_use]
pub fn normalize_vehicle(
    raw: RawVehicle,
    registration: &RegistrationNumber,
    source: DataSource,
    today: NaiveDate,
) -> VehicleRecord {
    let (make, model) = split_maker_model(raw.maker_model.as_deref());
    let rto = resolve_rto(registration.rto_prefix());

    let manufacturing_date = date_or(raw.manufacturing_date, DEFAULT_RECORD_DATE);
    let manufacturing_year = parse_date(&manufacturing_date)
        .map_or_else(|| "2020".to_string(), |date| date.year().to_string());

    let insurance_expiry = date_or(raw.insurance_expiry, DEFAULT_INSURANCE_EXPIRY);
    let puc_expiry = date_or(raw.puc_expiry, DEFAULT_PUC_EXPIRY);
    let tax_paid_upto = date_or(raw.tax_expiry, DEFAULT_TAX_EXPIRY);

    VehicleRecord {
        registration_number: registration.as_str().to_string(),
        owner_name: text_or(raw.owner_name, NOT_AVAILABLE),
        father_name: text_or(raw.father_name, NOT_AVAILABLE),
        address: text_or(raw.address, NOT_AVAILABLE),
        vehicle_class: text_or(raw.vehicle_class, DEFAULT_VEHICLE_CLASS),
        make,
        model,
        fuel_type: text_or(raw.fuel_type, DEFAULT_FUEL_TYPE),
        color: text_or(raw.color, DEFAULT_COLOR),
        transmission: text_or(raw.transmission, DEFAULT_TRANSMISSION),
        manufacturing_year,
        manufacturing_date,
        registration_date: date_or(raw.registration_date, DEFAULT_RECORD_DATE),
        chassis_number: text_or(raw.chassis_number, NOT_AVAILABLE),
        engine_number: text_or(raw.engine_number, NOT_AVAILABLE),
        rto_code: raw
            .rto_code
            .unwrap_or_else(|| registration.rto_prefix().to_string()),
        rto_name: raw.rto_name.unwrap_or(rto.name),
        rto_state: rto.state,
        insurance_details: InsuranceDetails {
            valid_upto: insurance_expiry.clone(),
            insurer_name: text_or(raw.insurer_name, NOT_AVAILABLE),
            is_expired: is_before(&insurance_expiry, today),
        },
        puc_details: PucDetails {
            valid_upto: puc_expiry.clone(),
            test_result: NOT_AVAILABLE.to_string(),
            is_expired: is_before(&puc_expiry, today),
        },
        tax_details: TaxDetails {
            is_overdue: is_before(&tax_paid_upto, today),
            tax_paid_upto,
            tax_amount: raw.tax_amount,
        },
        insurance_expiry,
        puc_expiry,
        tax_status: text_or(raw.tax_status, DEFAULT_TAX_STATUS),
        fitness_expiry: raw.fitness_expiry.map(|d| canonical_date(&d)),
        data_source: source,
    }
}

/// Build canonical challan entries from a live tier payload.
#[must_use]
pub fn normalize_challans(
    raw: Vec<RawChallan>,
    registration: &RegistrationNumber,
    source: DataSource,
    today: NaiveDate,
) -> Vec<ChallanRecord> {
    let today = today.format("%Y-%m-%d").to_string();

    raw.into_iter()
        .map(|challan| ChallanRecord {
            challan_number: text_or(challan.challan_number, NOT_AVAILABLE),
            vehicle_number: challan.vehicle_number.map_or_else(
                || registration.as_str().to_string(),
                |v| RegistrationNumber::normalize(&v),
            ),
            violation_date: date_or(challan.violation_date, &today),
            violation_type: text_or(challan.violation_type, DEFAULT_VIOLATION_TYPE),
            fine_amount: challan.fine_amount.unwrap_or(DEFAULT_FINE_AMOUNT),
            status: challan
                .status
                .as_deref()
                .and_then(ChallanStatus::parse)
                .unwrap_or(ChallanStatus::Unpaid),
            location: text_or(challan.location, NOT_AVAILABLE),
            data_source: source,
        })
        .collect()
}

/// Build a canonical registration certificate from a live tier payload.
#[must_use]
pub fn normalize_rc(raw: RawRc, registration: &RegistrationNumber, source: DataSource) -> RcRecord {
    let (make, model) = split_maker_model(raw.maker_model.as_deref());

    RcRecord {
        registration_number: registration.as_str().to_string(),
        owner_name: text_or(raw.owner_name, NOT_AVAILABLE),
        father_name: text_or(raw.father_name, NOT_AVAILABLE),
        address: text_or(raw.address, NOT_AVAILABLE),
        vehicle_class: text_or(raw.vehicle_class, DEFAULT_VEHICLE_CLASS),
        make,
        model,
        fuel_type: text_or(raw.fuel_type, DEFAULT_FUEL_TYPE),
        color: text_or(raw.color, DEFAULT_COLOR),
        manufacturing_date: date_or(raw.manufacturing_date, DEFAULT_RECORD_DATE),
        registration_date: date_or(raw.registration_date, DEFAULT_RECORD_DATE),
        chassis_number: text_or(raw.chassis_number, NOT_AVAILABLE),
        engine_number: text_or(raw.engine_number, NOT_AVAILABLE),
        rto_code: raw
            .rto_code
            .unwrap_or_else(|| registration.rto_prefix().to_string()),
        rto_name: raw
            .rto_name
            .unwrap_or_else(|| resolve_rto(registration.rto_prefix()).name),
        fitness_upto: raw.fitness_upto.map(|d| canonical_date(&d)),
        seating_capacity: text_or(raw.seating_capacity, NOT_AVAILABLE),
        data_source: source,
    }
}
