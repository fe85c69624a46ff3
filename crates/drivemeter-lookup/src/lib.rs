//! DriveMeter Lookup - tiered vehicle registration lookups.
//!
//! This crate resolves vehicle, challan and registration certificate lookups
//! across ranked data sources and always produces an answer for a valid
//! registration number.
//!
//! # Features
//!
//! - **Fixed Priority**: Free tier, then paid tier, then the synthesizer
//! - **Fail-Open**: Tier failures are logged and absorbed, never surfaced
//! - **Deterministic Fallback**: The same registration number always
//!   synthesizes the same record for a given reference date
//! - **One Record Shape**: Each tier's payload is normalized into the
//!   canonical records of `drivemeter-core`
//!
//! # Example
//!
//! ```rust
//! use drivemeter_core::DataSource;
//! use drivemeter_lookup::LookupOrchestrator;
//!
//! # async fn example() {
//! // No live tiers enabled: every lookup is simulated
//! let orchestrator = LookupOrchestrator::new();
//!
//! let result = orchestrator.get_vehicle_info("MH12 AB 1234").await;
//! assert!(result.success);
//! assert_eq!(result.source, Some(DataSource::Simulated));
//! # }
//! ```
//!
//! # Fallback Model
//!
//! ```text
//! raw input → RegistrationNumber::parse ──✗──→ failure envelope
//!                     │
//!                     ✓
//!                     ↓
//!   FreeTier (vehicle only) ──✗──→ PaidTier ──✗──→ Synthesizer
//!         │                           │                 │
//!         └──────────── normalizer ───┘                 │
//!                          ↓                            ↓
//!                  success envelope ←───────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod normalizer;
pub mod orchestrator;
pub mod synthesizer;
pub mod tier;
pub mod tiers;

// Re-export commonly used types
pub use error::{TierError, TierResult};
pub use orchestrator::LookupOrchestrator;
pub use synthesizer::Synthesizer;
pub use tier::{LookupTier, RawChallan, RawRc, RawVehicle, TierResponse};
pub use tiers::{FreeTierAdapter, PaidTierAdapter};
