//! Regional Transport Office resolution from a registration prefix.

use serde::{Deserialize, Serialize};

/// Known offices keyed by the four-character registration prefix.
const RTO_TABLE: &[(&str, &str, &str)] = &[
    ("MH01", "Mumbai Central RTO", "Maharashtra"),
    ("MH02", "Mumbai West RTO", "Maharashtra"),
    ("MH03", "Mumbai East RTO", "Maharashtra"),
    ("MH12", "Pune RTO", "Maharashtra"),
    ("DL01", "Delhi Central RTO", "Delhi"),
    ("DL02", "Delhi New Delhi RTO", "Delhi"),
    ("KA01", "Bangalore Central RTO", "Karnataka"),
    ("KA03", "Bangalore East RTO", "Karnataka"),
    ("TN01", "Chennai Central RTO", "Tamil Nadu"),
    ("GJ01", "Ahmedabad RTO", "Gujarat"),
];

/// Regional Transport Office metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtoInfo {
    /// Office name
    pub name: String,
    /// State the office belongs to
    pub state: String,
}

/// Resolve a prefix to its regional office.
///
/// Only the first four characters are considered, case-insensitively. Unknown
/// prefixes resolve to `"<prefix> RTO"` in `"India"`.
#[must_use]
pub fn resolve_rto(prefix: &str) -> RtoInfo {
    let code: String = prefix.chars().take(4).flat_map(char::to_uppercase).collect();

    RTO_TABLE
        .iter()
        .find(|(key, _, _)| *key == code)
        .map_or_else(
            || RtoInfo {
                name: format!("{code} RTO"),
                state: "India".to_string(),
            },
            |(_, name, state)| RtoInfo {
                name: (*name).to_string(),
                state: (*state).to_string(),
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_prefixes() {
        let mumbai = resolve_rto("MH01");
        assert_eq!(mumbai.name, "Mumbai Central RTO");
        assert_eq!(mumbai.state, "Maharashtra");

        assert_eq!(resolve_rto("DL01").state, "Delhi");
        assert_eq!(resolve_rto("KA01").name, "Bangalore Central RTO");
        assert_eq!(resolve_rto("TN01").name, "Chennai Central RTO");
        assert_eq!(resolve_rto("GJ01").name, "Ahmedabad RTO");
    }

    #[test]
    fn test_unknown_prefix_fallback() {
        assert_eq!(
            resolve_rto("ZZ99"),
            RtoInfo {
                name: "ZZ99 RTO".to_string(),
                state: "India".to_string(),
            }
        );
    }

    #[test]
    fn test_uses_first_four_characters() {
        assert_eq!(resolve_rto("mh01ab1234").name, "Mumbai Central RTO");
        assert_eq!(resolve_rto("XY1").name, "XY1 RTO");
    }
}
