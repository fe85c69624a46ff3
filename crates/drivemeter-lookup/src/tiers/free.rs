//! Free tier: public, low-quota vehicle registry.

use crate::error::{TierError, TierResult};
use crate::tier::{LookupTier, RawVehicle, TierResponse};
use crate::tiers::common::{build_http_client, endpoint_url, lenient_string, CONSENT_TEXT};
use async_trait::async_trait;
use drivemeter_core::{DataSource, FreeTierConfig, LookupKind, RegistrationNumber};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const VEHICLE_INFO_PATH: &str = "/api/v1/rc/vehicleinfo";

/// Free tier adapter.
///
/// Serves vehicle lookups only; there is no free source for challans or
/// registration certificates.
pub struct FreeTierAdapter {
    client: Client,
    base_url: String,
    api_host: String,
    api_key: String,
    timeout_secs: u64,
}

impl FreeTierAdapter {
    /// Create a free tier adapter from its configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &FreeTierConfig) -> TierResult<Self> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.clone(),
            api_host: config.api_host.clone(),
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn error(&self, e: reqwest::Error) -> TierError {
        TierError::from_reqwest(DataSource::FreeApi, self.timeout_secs, e)
    }
}

#[async_trait]
impl LookupTier for FreeTierAdapter {
    fn source(&self) -> DataSource {
        DataSource::FreeApi
    }

    fn supports(&self, kind: LookupKind) -> bool {
        kind == LookupKind::Vehicle
    }

    async fn fetch_vehicle(
        &self,
        registration: &RegistrationNumber,
    ) -> TierResult<TierResponse<RawVehicle>> {
        let request = FreeVehicleRequest {
            reg_no: registration.as_str(),
            consent: "Y",
            consent_text: CONSENT_TEXT,
        };

        let response = self
            .client
            .post(endpoint_url(&self.base_url, VEHICLE_INFO_PATH))
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TierError::Status {
                tier: DataSource::FreeApi,
                status: status.as_u16(),
                message,
            });
        }

        let body: FreeVehicleResponse = response.json().await.map_err(|e| TierError::Parse {
            tier: DataSource::FreeApi,
            message: e.to_string(),
        })?;

        if !body.status.eq_ignore_ascii_case("SUCCESS") {
            return Err(TierError::Source {
                tier: DataSource::FreeApi,
                message: body
                    .message
                    .unwrap_or_else(|| format!("status {}", body.status)),
            });
        }

        let vehicle = body.result.map(RawVehicle::from).unwrap_or_default();
        if vehicle.is_empty() {
            return Err(TierError::EmptyPayload {
                tier: DataSource::FreeApi,
            });
        }

        Ok(TierResponse::new(vehicle))
    }
}

// Free tier API types

#[derive(Debug, Serialize)]
struct FreeVehicleRequest<'a> {
    reg_no: &'a str,
    consent: &'a str,
    consent_text: &'a str,
}

#[derive(Debug, Deserialize)]
struct FreeVehicleResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<FreeVehicleData>,
}

#[derive(Debug, Default, Deserialize)]
struct FreeVehicleData {
    #[serde(default, deserialize_with = "lenient_string")]
    owner_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    father_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    vehicle_class: Option<String>,
    #[serde(default, alias = "vehicle_model", deserialize_with = "lenient_string")]
    maker_model: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    fuel_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    color: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    transmission: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    manufacturing_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    registration_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    chassis_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    engine_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    rto_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    rto_name: Option<String>,
    #[serde(default, alias = "insurance_upto", deserialize_with = "lenient_string")]
    insurance_validity: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    insurance_company: Option<String>,
    #[serde(default, alias = "puc_upto", deserialize_with = "lenient_string")]
    puc_validity: Option<String>,
    #[serde(default, alias = "tax_upto", deserialize_with = "lenient_string")]
    tax_validity: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    tax_status: Option<String>,
    #[serde(default, alias = "fitness_upto", deserialize_with = "lenient_string")]
    fitness_validity: Option<String>,
}

impl From<FreeVehicleData> for RawVehicle {
    fn from(data: FreeVehicleData) -> Self {
        Self {
            owner_name: data.owner_name,
            father_name: data.father_name,
            address: data.address,
            vehicle_class: data.vehicle_class,
            maker_model: data.maker_model,
            fuel_type: data.fuel_type,
            color: data.color,
            transmission: data.transmission,
            manufacturing_date: data.manufacturing_date,
            registration_date: data.registration_date,
            chassis_number: data.chassis_number,
            engine_number: data.engine_number,
            rto_code: data.rto_code,
            rto_name: data.rto_name,
            insurance_expiry: data.insurance_validity,
            insurer_name: data.insurance_company,
            puc_expiry: data.puc_validity,
            tax_expiry: data.tax_validity,
            tax_status: data.tax_status,
            tax_amount: None,
            fitness_expiry: data.fitness_validity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_creation() {
        let adapter = FreeTierAdapter::new(&FreeTierConfig::default()).expect("create adapter");
        assert_eq!(adapter.source(), DataSource::FreeApi);
        assert!(adapter.supports(LookupKind::Vehicle));
        assert!(!adapter.supports(LookupKind::Challan));
        assert!(!adapter.supports(LookupKind::Rc));
    }

    #[test]
    fn test_field_mapping_with_aliases() {
        let json = r#"{
            "owner_name": "Priya Sharma",
            "vehicle_model": "Hyundai Creta",
            "insurance_upto": "2027-01-31",
            "puc_upto": "2026-03-01",
            "chassis_number": 12345
        }"#;
        let data: FreeVehicleData = serde_json::from_str(json).expect("parse free data");
        let raw = RawVehicle::from(data);

        assert_eq!(raw.owner_name.as_deref(), Some("Priya Sharma"));
        assert_eq!(raw.maker_model.as_deref(), Some("Hyundai Creta"));
        assert_eq!(raw.insurance_expiry.as_deref(), Some("2027-01-31"));
        assert_eq!(raw.puc_expiry.as_deref(), Some("2026-03-01"));
        assert_eq!(raw.chassis_number.as_deref(), Some("12345"));
        assert!(raw.engine_number.is_none());
    }

    #[test]
    fn test_empty_result_maps_to_empty_raw() {
        let data: FreeVehicleData = serde_json::from_str("{}").expect("parse empty data");
        assert!(RawVehicle::from(data).is_empty());
    }
}
