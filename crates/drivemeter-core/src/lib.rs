//! DriveMeter Core - Foundation crate for vehicle registration lookups.
//!
//! This crate provides the value types every other DriveMeter crate speaks:
//! validated registration numbers, regional transport office metadata, the
//! canonical record shapes returned to callers, and the immutable lookup
//! configuration read once at startup.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`registration`] - `RegistrationNumber` normalization and validation
//! - [`rto`] - Registration prefix to regional office resolution
//! - [`records`] - Canonical `VehicleRecord`, `ChallanRecord`, `RcRecord` and `LookupResult`
//!
//! # Example
//!
//! ```rust
//! use drivemeter_core::{resolve_rto, RegistrationNumber};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registration = RegistrationNumber::parse("mh01 ab 1234")?;
//! assert_eq!(registration.as_str(), "MH01AB1234");
//!
//! let office = resolve_rto(registration.rto_prefix());
//! assert_eq!(office.state, "Maharashtra");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod records;
pub mod registration;
pub mod rto;

// Re-export commonly used types
pub use config::{FreeTierConfig, LookupConfig, LookupSettings, PaidTierConfig, TierToggles};
pub use error::{ConfigError, ConfigResult, DriveMeterError, Result};
pub use records::{
    BalanceResult, ChallanRecord, ChallanStatus, DataSource, InsuranceDetails, LookupKind,
    LookupResult, PucDetails, RcRecord, TaxDetails, VehicleRecord,
};
pub use registration::RegistrationNumber;
pub use rto::{resolve_rto, RtoInfo};
