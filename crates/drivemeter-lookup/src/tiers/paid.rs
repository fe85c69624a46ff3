//! Paid tier: metered, credentialed registry gateway.
//!
//! Besides the three lookups used by the fallback chain, the adapter exposes
//! informational calls (balance, transaction status, FASTag, driving licence)
//! for operational tooling. Those never take part in fallback and never
//! raise: failures come back as unsuccessful envelopes.

use crate::error::{TierError, TierResult};
use crate::tier::{LookupTier, RawChallan, RawRc, RawVehicle, TierResponse};
use crate::tiers::common::{
    build_http_client, endpoint_url, lenient_amount, lenient_string, truthy, CONSENT_TEXT,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use drivemeter_core::{
    BalanceResult, DataSource, LookupKind, LookupResult, PaidTierConfig, RegistrationNumber,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

const VAHAN_RC_PATH: &str = "/v1/vahan_rc";
const ECHALLAN_PATH: &str = "/v1/echallan";
const RC_VERIFICATION_PATH: &str = "/v1/rc_verification";
const FASTAG_PATH: &str = "/v1/fastag";
const DRIVING_LICENSE_PATH: &str = "/v1/driving_license";
const BALANCE_PATH: &str = "/v1/balance";
const TRANSACTION_STATUS_PATH: &str = "/v1/transaction_status";

/// Paid tier adapter.
pub struct PaidTierAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    account_id: String,
    timeout_secs: u64,
}

impl PaidTierAdapter {
    /// Create a paid tier adapter from its configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &PaidTierConfig) -> TierResult<Self> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            account_id: config.account_id.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// POST a JSON payload and decode the gateway envelope.
    async fn post(&self, path: &str, payload: Value) -> TierResult<PaidEnvelope> {
        let response = self
            .client
            .post(endpoint_url(&self.base_url, path))
            .header("X-API-KEY", &self.api_key)
            .header("X-ACCOUNT-ID", &self.account_id)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TierError::from_reqwest(DataSource::PaidApi, self.timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TierError::Status {
                tier: DataSource::PaidApi,
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(|e| TierError::Parse {
            tier: DataSource::PaidApi,
            message: e.to_string(),
        })
    }

    /// Query a registry endpoint and decode its `data` member into `T`.
    async fn query<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Value,
    ) -> TierResult<TierResponse<T>> {
        let envelope = self.post(path, payload).await?;

        if !envelope.status {
            return Err(TierError::Source {
                tier: DataSource::PaidApi,
                message: envelope
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }

        if envelope.data.is_null() {
            return Err(TierError::EmptyPayload {
                tier: DataSource::PaidApi,
            });
        }

        let payload = serde_json::from_value(envelope.data).map_err(|e| TierError::Parse {
            tier: DataSource::PaidApi,
            message: e.to_string(),
        })?;

        Ok(TierResponse {
            payload,
            txn_id: envelope.txn_id,
        })
    }

    /// Query an informational endpoint, folding every failure into the envelope.
    async fn informational(
        &self,
        path: &str,
        payload: Value,
        what: &str,
    ) -> LookupResult<Value> {
        match self.post(path, payload).await {
            Ok(envelope) if envelope.status && !envelope.data.is_null() => LookupResult::success(
                envelope.data,
                envelope
                    .message
                    .unwrap_or_else(|| format!("{what} retrieved successfully")),
                Some(DataSource::PaidApi),
            )
            .with_txn_id(envelope.txn_id),
            Ok(envelope) => LookupResult::failure(
                envelope
                    .message
                    .unwrap_or_else(|| format!("{what} not available")),
            )
            .with_txn_id(envelope.txn_id),
            Err(e) => {
                tracing::warn!("Paid tier {} request failed: {}", what, e);
                LookupResult::failure(format!("API request failed: {e}"))
            }
        }
    }

    /// Remaining account balance.
    pub async fn check_balance(&self) -> BalanceResult {
        match self.post(BALANCE_PATH, json!({})).await {
            Ok(envelope) if envelope.status => match balance_of(&envelope.data) {
                Some(balance) => BalanceResult {
                    success: true,
                    balance,
                    message: "Balance retrieved successfully".to_string(),
                },
                None => {
                    tracing::warn!("Paid tier balance response carried no balance");
                    BalanceResult {
                        success: false,
                        balance: 0.0,
                        message: "Balance missing from response".to_string(),
                    }
                }
            },
            Ok(envelope) => BalanceResult {
                success: false,
                balance: 0.0,
                message: envelope
                    .message
                    .unwrap_or_else(|| "Failed to retrieve balance".to_string()),
            },
            Err(e) => {
                tracing::warn!("Paid tier balance check failed: {}", e);
                BalanceResult {
                    success: false,
                    balance: 0.0,
                    message: format!("API request failed: {e}"),
                }
            }
        }
    }

    /// Status of an earlier metered transaction.
    pub async fn get_transaction_status(&self, txn_id: &str) -> LookupResult<Value> {
        self.informational(
            TRANSACTION_STATUS_PATH,
            json!({ "txn_id": txn_id }),
            "Transaction status",
        )
        .await
    }

    /// FASTag details for a vehicle.
    pub async fn get_fastag(&self, registration: &RegistrationNumber) -> LookupResult<Value> {
        self.informational(
            FASTAG_PATH,
            json!({ "vehicle_number": registration.as_str(), "consent": "Y" }),
            "FASTag information",
        )
        .await
    }

    /// Driving licence verification.
    pub async fn get_driving_license(
        &self,
        license_number: &str,
        date_of_birth: NaiveDate,
    ) -> LookupResult<Value> {
        let license_number: String = license_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect();

        self.informational(
            DRIVING_LICENSE_PATH,
            json!({
                "license_number": license_number,
                "date_of_birth": date_of_birth.format("%Y-%m-%d").to_string(),
                "consent": "Y",
                "consent_text": CONSENT_TEXT,
            }),
            "Driving license information",
        )
        .await
    }
}

#[async_trait]
impl LookupTier for PaidTierAdapter {
    fn source(&self) -> DataSource {
        DataSource::PaidApi
    }

    fn supports(&self, _kind: LookupKind) -> bool {
        true
    }

    async fn fetch_vehicle(
        &self,
        registration: &RegistrationNumber,
    ) -> TierResult<TierResponse<RawVehicle>> {
        let response: TierResponse<PaidVehicleData> = self
            .query(
                VAHAN_RC_PATH,
                json!({
                    "number": registration.as_str(),
                    "consent": "Y",
                    "consent_text": CONSENT_TEXT,
                }),
            )
            .await?;

        let vehicle = RawVehicle::from(response.payload);
        if vehicle.is_empty() {
            return Err(TierError::EmptyPayload {
                tier: DataSource::PaidApi,
            });
        }

        Ok(TierResponse {
            payload: vehicle,
            txn_id: response.txn_id,
        })
    }

    async fn fetch_challans(
        &self,
        registration: &RegistrationNumber,
    ) -> TierResult<TierResponse<Vec<RawChallan>>> {
        let response: TierResponse<OneOrMany<PaidChallanData>> = self
            .query(
                ECHALLAN_PATH,
                json!({
                    "vehicle_number": registration.as_str(),
                    "consent": "Y",
                    "consent_text": CONSENT_TEXT,
                }),
            )
            .await?;

        let single = matches!(response.payload, OneOrMany::One(_));
        let challans: Vec<RawChallan> = response
            .payload
            .into_vec()
            .into_iter()
            .map(RawChallan::from)
            .filter(|challan| !challan.is_empty())
            .collect();

        // An empty list means no challans; a bare empty object means no answer
        if single && challans.is_empty() {
            return Err(TierError::EmptyPayload {
                tier: DataSource::PaidApi,
            });
        }

        Ok(TierResponse {
            payload: challans,
            txn_id: response.txn_id,
        })
    }

    async fn fetch_rc(
        &self,
        registration: &RegistrationNumber,
    ) -> TierResult<TierResponse<RawRc>> {
        let response: TierResponse<PaidRcData> = self
            .query(
                RC_VERIFICATION_PATH,
                json!({
                    "vehicle_number": registration.as_str(),
                    "consent": "Y",
                    "consent_text": CONSENT_TEXT,
                }),
            )
            .await?;

        let rc = RawRc::from(response.payload);
        if rc.is_empty() {
            return Err(TierError::EmptyPayload {
                tier: DataSource::PaidApi,
            });
        }

        Ok(TierResponse {
            payload: rc,
            txn_id: response.txn_id,
        })
    }
}

/// Extract `balance` from a balance response, accepting numbers or numeric strings.
fn balance_of(data: &Value) -> Option<f64> {
    match data.get("balance")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// Paid tier API types

#[derive(Debug, Deserialize)]
struct PaidEnvelope {
    #[serde(default, deserialize_with = "truthy")]
    status: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    txn_id: Option<String>,
}

/// The e-challan endpoint answers with a list, or a bare object for a single entry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PaidVehicleData {
    #[serde(default, deserialize_with = "lenient_string")]
    owner_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    father_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    permanent_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    vehicle_class_desc: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    maker_model: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    fuel_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    color: Option<String>,
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
    #[serde(default, deserialize_with = "lenient_string")]
    insurance_upto: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    insurance_company: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    puc_upto: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    tax_upto: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    tax_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    tax_amount: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    fitness_upto: Option<String>,
}

impl From<PaidVehicleData> for RawVehicle {
    fn from(data: PaidVehicleData) -> Self {
        Self {
            owner_name: data.owner_name,
            father_name: data.father_name,
            address: data.permanent_address,
            vehicle_class: data.vehicle_class_desc,
            maker_model: data.maker_model,
            fuel_type: data.fuel_type,
            color: data.color,
            transmission: None,
            manufacturing_date: data.manufacturing_date,
            registration_date: data.registration_date,
            chassis_number: data.chassis_number,
            engine_number: data.engine_number,
            rto_code: data.rto_code,
            rto_name: data.rto_name,
            insurance_expiry: data.insurance_upto,
            insurer_name: data.insurance_company,
            puc_expiry: data.puc_upto,
            tax_expiry: data.tax_upto,
            tax_status: data.tax_status,
            tax_amount: data.tax_amount,
            fitness_expiry: data.fitness_upto,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PaidChallanData {
    #[serde(default, deserialize_with = "lenient_string")]
    challan_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    vehicle_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    violation_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    violation_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    fine_amount: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    location: Option<String>,
}

impl From<PaidChallanData> for RawChallan {
    fn from(data: PaidChallanData) -> Self {
        Self {
            challan_number: data.challan_number,
            vehicle_number: data.vehicle_number,
            violation_date: data.violation_date,
            violation_type: data.violation_type,
            fine_amount: data.fine_amount,
            status: data.status,
            location: data.location,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PaidRcData {
    #[serde(default, deserialize_with = "lenient_string")]
    owner_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    father_name: Option<String>,
    #[serde(default, alias = "permanent_address", deserialize_with = "lenient_string")]
    present_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    vehicle_class: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    maker_model: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    fuel_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    color: Option<String>,
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
    #[serde(default, deserialize_with = "lenient_string")]
    fitness_upto: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    seating_capacity: Option<String>,
}

impl From<PaidRcData> for RawRc {
    fn from(data: PaidRcData) -> Self {
        Self {
            owner_name: data.owner_name,
            father_name: data.father_name,
            address: data.present_address,
            vehicle_class: data.vehicle_class,
            maker_model: data.maker_model,
            fuel_type: data.fuel_type,
            color: data.color,
            manufacturing_date: data.manufacturing_date,
            registration_date: data.registration_date,
            chassis_number: data.chassis_number,
            engine_number: data.engine_number,
            rto_code: data.rto_code,
            rto_name: data.rto_name,
            fitness_upto: data.fitness_upto,
            seating_capacity: data.seating_capacity,
        }
    }
}
