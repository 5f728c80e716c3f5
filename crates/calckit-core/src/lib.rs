pub mod amortization;
pub mod error;
pub mod form;
pub mod time_value;
pub mod types;

#[cfg(feature = "loans")]
pub mod loans;

#[cfg(feature = "real_estate")]
pub mod real_estate;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "everyday")]
pub mod everyday;

#[cfg(feature = "units")]
pub mod units;

#[cfg(feature = "network")]
pub mod network;

#[cfg(feature = "economics")]
pub mod economics;

#[cfg(feature = "statistics")]
pub mod statistics;

#[cfg(feature = "random")]
pub mod random;

pub use error::CalcError;
pub use types::*;

/// Standard result type for every calculator
pub type CalcResult<T> = Result<T, CalcError>;
