//! Common utilities shared across live tiers.

use crate::error::{TierError, TierResult};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;

/// Consent declaration sent with every registry query.
pub const CONSENT_TEXT: &str =
    "I hereby declare my consent agreement for fetching my information via VAHAN";

/// Build an HTTP client bounded by `timeout_secs`.
///
/// # Errors
/// Returns error if the HTTP client cannot be created.
pub fn build_http_client(timeout_secs: u64) -> TierResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("DriveMeter/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| TierError::Client(e.to_string()))
}

/// Join a base URL and an endpoint path with exactly one slash.
#[must_use]
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Deserialize a loosely typed scalar into a trimmed, non-empty string.
///
/// Registry payloads mix strings and numbers for the same field; blank
/// strings count as missing.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }))
}

/// Deserialize a loosely typed amount (number or numeric string).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(|f| {
            if f >= 0.0 && f <= f64::from(u32::MAX) {
                Some(f.round() as u32)
            } else {
                None
            }
        }),
        _ => None,
    }))
}

/// Deserialize a loosely typed success flag the way the registry reports it:
/// `true`, non-zero numbers and "true"/"success"/"1" count as success.
pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "success" | "1"
        ),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_string")]
        text: Option<String>,
        #[serde(default, deserialize_with = "lenient_amount")]
        amount: Option<u32>,
        #[serde(default, deserialize_with = "truthy")]
        ok: bool,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).expect("parse probe")
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(30).is_ok());
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("https://api.instantpay.in/", "/v1/balance"),
            "https://api.instantpay.in/v1/balance"
        );
        assert_eq!(
            endpoint_url("http://127.0.0.1:8080", "v1/echallan"),
            "http://127.0.0.1:8080/v1/echallan"
        );
    }

    #[test]
    fn test_lenient_string() {
        assert_eq!(probe(r#"{"text": " Rajesh "}"#).text.as_deref(), Some("Rajesh"));
        assert_eq!(probe(r#"{"text": 5}"#).text.as_deref(), Some("5"));
        assert_eq!(probe(r#"{"text": "  "}"#).text, None);
        assert_eq!(probe(r#"{"text": null}"#).text, None);
        assert_eq!(probe("{}").text, None);
    }

    #[test]
    fn test_lenient_amount() {
        assert_eq!(probe(r#"{"amount": 1500}"#).amount, Some(1500));
        assert_eq!(probe(r#"{"amount": "2000"}"#).amount, Some(2000));
        assert_eq!(probe(r#"{"amount": 499.6}"#).amount, Some(500));
        assert_eq!(probe(r#"{"amount": "n/a"}"#).amount, None);
        assert_eq!(probe(r#"{"amount": -5}"#).amount, None);
    }

    #[test]
    fn test_truthy() {
        assert!(probe(r#"{"ok": true}"#).ok);
        assert!(probe(r#"{"ok": 1}"#).ok);
        assert!(probe(r#"{"ok": "SUCCESS"}"#).ok);
        assert!(!probe(r#"{"ok": false}"#).ok);
        assert!(!probe(r#"{"ok": 0}"#).ok);
        assert!(!probe(r#"{"ok": "FAILED"}"#).ok);
        assert!(!probe("{}").ok);
    }
}
