pub mod config;
pub mod error;
pub mod types;

#[cfg(feature = "mortgage")]
pub mod mortgage;

#[cfg(feature = "rental")]
pub mod rental;

#[cfg(feature = "wholesale")]
pub mod wholesale;

#[cfg(feature = "creative")]
pub mod creative;

#[cfg(feature = "underwriting")]
pub mod underwriting;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "store")]
pub mod store;

pub use config::CalculatorConfig;
pub use error::RealtyCalcError;
pub use types::*;

/// Standard result type for all realty-calc operations
pub type RealtyCalcResult<T> = Result<T, RealtyCalcError>;
