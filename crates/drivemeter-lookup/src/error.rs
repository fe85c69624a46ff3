//! Error types for live data tiers.
//!
//! A [`TierError`] is the failure value every adapter returns instead of
//! raising. The orchestrator treats all variants alike: log and advance to
//! the next tier.

use drivemeter_core::{DataSource, LookupKind};
use thiserror::Error;

/// Errors a live tier can report for one attempt.
#[derive(Error, Debug)]
pub enum TierError {
    /// Network failure contacting the tier
    #[error("network error ({tier}): {source}")]
    Transport {
        /// Tier that failed
        tier: DataSource,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the tier timeout
    #[error("{tier} request timed out after {seconds}s")]
    Timeout {
        /// Tier that failed
        tier: DataSource,
        /// Timeout duration in seconds
        seconds: u64,
    },

    /// Overall lookup budget ran out before this tier was tried
    #[error("lookup deadline exceeded before {tier} could answer")]
    DeadlineExceeded {
        /// Tier that was skipped or cut short
        tier: DataSource,
    },

    /// Non-success HTTP status
    #[error("API error ({tier}): status {status}, {message}")]
    Status {
        /// Tier that failed
        tier: DataSource,
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Tier answered but reported failure in its envelope
    #[error("{tier} reported failure: {message}")]
    Source {
        /// Tier that failed
        tier: DataSource,
        /// Message from the envelope
        message: String,
    },

    /// Tier answered with no usable data
    #[error("{tier} returned an empty payload")]
    EmptyPayload {
        /// Tier that failed
        tier: DataSource,
    },

    /// Response body could not be decoded
    #[error("failed to parse response from {tier}: {message}")]
    Parse {
        /// Tier that failed
        tier: DataSource,
        /// Decoder message
        message: String,
    },

    /// Tier does not serve this kind of lookup
    #[error("{tier} does not support {kind} lookups")]
    Unsupported {
        /// Tier asked
        tier: DataSource,
        /// Requested lookup kind
        kind: LookupKind,
    },

    /// HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

impl TierError {
    /// Classify a `reqwest` error raised while talking to `tier`.
    #[must_use]
    pub fn from_reqwest(tier: DataSource, timeout_secs: u64, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                tier,
                seconds: timeout_secs,
            }
        } else if error.is_decode() {
            Self::Parse {
                tier,
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                tier,
                source: error,
            }
        }
    }
}

/// Result type alias for tier operations.
pub type TierResult<T> = std::result::Result<T, TierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TierError::Status {
            tier: DataSource::PaidApi,
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (paid_api): status 503, Service Unavailable"
        );

        let err = TierError::Unsupported {
            tier: DataSource::FreeApi,
            kind: LookupKind::Challan,
        };
        assert_eq!(err.to_string(), "free_api does not support challan lookups");
    }

    #[test]
    fn test_empty_payload_display() {
        let err = TierError::EmptyPayload {
            tier: DataSource::FreeApi,
        };
        assert!(err.to_string().contains("empty payload"));
    }
}
