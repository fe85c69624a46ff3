//! Vehicle registration number normalization and validation.

use crate::error::DriveMeterError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Accepted registration grammars, checked against the canonical form.
const PATTERNS: [&str; 3] = [
    // Standard plate: MH12AB1234, DL1C1, KA03MNP4321
    r"^[A-Z]{2}[0-9]{1,2}[A-Z]{1,3}[0-9]{1,4}$",
    // Legacy fixed-width plate
    r"^[A-Z]{2}[0-9]{2}[A-Z]{2}[0-9]{4}$",
    // Special series
    r"^[A-Z]{3}[0-9]{1,4}$",
];

/// Newtype for canonical registration numbers.
///
/// The inner string is uppercase, contains no whitespace and matches one of
/// the accepted grammars. Every accepted grammar is ASCII and at least four
/// characters long, so [`RegistrationNumber::rto_prefix`] never truncates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    /// Normalize and validate a raw registration string.
    ///
    /// # Errors
    /// Returns error if the canonical form matches none of the accepted grammars.
    pub fn parse(raw: &str) -> Result<Self, DriveMeterError> {
        let canonical = Self::normalize(raw);
        if Self::validate(&canonical) {
            Ok(Self(canonical))
        } else {
            Err(DriveMeterError::Validation(format!(
                "invalid registration number: '{}'",
                raw.trim()
            )))
        }
    }

    /// Strip all whitespace and uppercase.
    #[must_use]
    pub fn normalize(raw: &str) -> String {
        raw.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Check a canonical string against the accepted grammars.
    #[must_use]
    pub fn validate(canonical: &str) -> bool {
        static REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
        let regexes = REGEXES.get_or_init(|| {
            PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("valid regex"))
                .collect()
        });

        !canonical.is_empty() && regexes.iter().any(|r| r.is_match(canonical))
    }

    /// Get the canonical string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First four characters, used to key the RTO table.
    #[must_use]
    pub fn rto_prefix(&self) -> &str {
        self.0.get(..4).unwrap_or(&self.0)
    }

    /// Two-letter state code at the start of the number.
    #[must_use]
    pub fn state_code(&self) -> &str {
        self.0.get(..2).unwrap_or(&self.0)
    }
}

impl fmt::Display for RegistrationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RegistrationNumber {
    type Error = DriveMeterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistrationNumber> for String {
    fn from(value: RegistrationNumber) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(RegistrationNumber::normalize("mh12 ab1234"), "MH12AB1234");
        assert_eq!(RegistrationNumber::normalize(" dl 1c\t12 "), "DL1C12");
        assert_eq!(RegistrationNumber::normalize(""), "");
    }

    #[test]
    fn test_validate_accepted_grammars() {
        assert!(RegistrationNumber::validate("MH12AB1234"));
        assert!(RegistrationNumber::validate("DL1C1"));
        assert!(RegistrationNumber::validate("KA03MNP4321"));
        assert!(RegistrationNumber::validate("ABC1234"));
        assert!(RegistrationNumber::validate("CHD7"));
    }

    #[test]
    fn test_validate_rejects() {
        assert!(!RegistrationNumber::validate("1234"));
        assert!(!RegistrationNumber::validate(""));
        assert!(!RegistrationNumber::validate("MH12AB12345"));
        assert!(!RegistrationNumber::validate("MH12ABCD1234"));
        assert!(!RegistrationNumber::validate("mh12ab1234"));
        assert!(!RegistrationNumber::validate("MH12 AB1234"));
        assert!(!RegistrationNumber::validate("ABCD123"));
    }

    #[test]
    fn test_parse() {
        let reg = RegistrationNumber::parse("mh12 ab1234").expect("valid registration");
        assert_eq!(reg.as_str(), "MH12AB1234");
        assert_eq!(reg.rto_prefix(), "MH12");
        assert_eq!(reg.state_code(), "MH");
        assert_eq!(reg.to_string(), "MH12AB1234");

        let err = RegistrationNumber::parse("   ").unwrap_err();
        assert!(matches!(err, DriveMeterError::Validation(_)));
        assert!(RegistrationNumber::parse("12AB").is_err());
    }

    #[test]
    fn test_special_series_prefix() {
        let reg = RegistrationNumber::parse("abc1").expect("valid special series");
        assert_eq!(reg.rto_prefix(), "ABC1");
    }

    #[test]
    fn test_serde_validates() {
        let reg: RegistrationNumber =
            serde_json::from_str("\"ka03mn4321\"").expect("deserialize registration");
        assert_eq!(reg.as_str(), "KA03MN4321");

        let json = serde_json::to_string(&reg).expect("serialize registration");
        assert_eq!(json, "\"KA03MN4321\"");

        assert!(serde_json::from_str::<RegistrationNumber>("\"1234\"").is_err());
    }
}
