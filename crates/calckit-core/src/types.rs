use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::CalcResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Rates as users type them (5 = 5%). Only ever found on input structs,
/// in fields suffixed `_percent`.
pub type Percent = Decimal;

/// Number of months in a year; every loan calculator pays monthly.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Convert a user-facing percentage into a decimal rate.
pub fn percent_to_rate(percent: Percent) -> Rate {
    percent / dec!(100)
}

/// Convert a decimal rate back into a percentage for display.
pub fn rate_to_percent(rate: Rate) -> Percent {
    rate * dec!(100)
}

/// Reject negative values.
pub fn require_non_negative(field: &str, value: Decimal) -> CalcResult<()> {
    if value < Decimal::ZERO {
        return Err(CalcError::invalid(field, "Must not be negative"));
    }
    Ok(())
}

/// Reject zero and negative values.
pub fn require_positive(field: &str, value: Decimal) -> CalcResult<()> {
    if value <= Decimal::ZERO {
        return Err(CalcError::invalid(field, "Must be greater than zero"));
    }
    Ok(())
}

/// Longest term, in years, that any loan calculator accepts.
pub const MAX_TERM_YEARS: u32 = 100;
pub const MAX_TERM_MONTHS: u32 = MAX_TERM_YEARS * MONTHS_PER_YEAR;

/// Monthly periods in a term of `years`, capped at [`MAX_TERM_YEARS`].
pub fn months_for_years(field: &str, years: u32) -> CalcResult<u32> {
    years
        .checked_mul(MONTHS_PER_YEAR)
        .filter(|_| years <= MAX_TERM_YEARS)
        .ok_or_else(|| {
            CalcError::invalid(field, format!("Must be at most {MAX_TERM_YEARS} years"))
        })
}

/// Error for a result that leaves the 96-bit Decimal range.
pub fn out_of_range(field: &str) -> CalcError {
    CalcError::invalid(field, "Result exceeds the representable range")
}

/// Product of `factors`; overflow is reported against `field`.
pub fn checked_product(field: &str, factors: &[Decimal]) -> CalcResult<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, f| acc.checked_mul(*f))
        .ok_or_else(|| out_of_range(field))
}

/// Sum of `terms`; overflow is reported against `field`.
pub fn checked_sum(field: &str, terms: &[Decimal]) -> CalcResult<Decimal> {
    terms
        .iter()
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(*t))
        .ok_or_else(|| out_of_range(field))
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

fn envelope<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    precision: &str,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: precision.to_string(),
        },
    }
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    envelope(
        methodology,
        assumptions,
        warnings,
        elapsed_us,
        "rust_decimal_128bit",
        result,
    )
}

/// Same as [`with_metadata`] for calculators that work in floating point.
pub fn with_metadata_f64<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    envelope(
        methodology,
        assumptions,
        warnings,
        elapsed_us,
        "ieee754_f64",
        result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_conversion() {
        assert_eq!(percent_to_rate(dec!(6.5)), dec!(0.065));
        assert_eq!(rate_to_percent(dec!(0.065)), dec!(6.5));
    }

    #[test]
    fn test_require_positive_rejects_zero() {
        assert!(require_positive("term", Decimal::ZERO).is_err());
        assert!(require_positive("term", dec!(1)).is_ok());
        assert!(require_non_negative("fees", Decimal::ZERO).is_ok());
        assert!(require_non_negative("fees", dec!(-0.01)).is_err());
    }

    #[test]
    fn test_metadata_precision_label() {
        let out = with_metadata_f64("Test", &serde_json::json!({}), vec![], 3, 1.5_f64);
        assert_eq!(out.metadata.precision, "ieee754_f64");
        assert_eq!(out.metadata.computation_time_us, 3);
        let out = with_metadata("Test", &serde_json::json!({}), vec![], 0, dec!(1));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_term_months_is_bounded() {
        assert_eq!(months_for_years("term_years", 30).unwrap(), 360);
        assert_eq!(months_for_years("term_years", MAX_TERM_YEARS).unwrap(), 1200);
        assert!(months_for_years("term_years", MAX_TERM_YEARS + 1).is_err());
        assert!(months_for_years("term_years", u32::MAX).is_err());
    }

    #[test]
    fn test_checked_arithmetic_reports_field() {
        assert_eq!(checked_product("x", &[dec!(2), dec!(3), dec!(4)]).unwrap(), dec!(24));
        assert_eq!(checked_sum("x", &[dec!(2), dec!(3)]).unwrap(), dec!(5));
        match checked_product("radius", &[Decimal::MAX, dec!(2)]) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "radius"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(checked_sum("total", &[Decimal::MAX, Decimal::MAX]).is_err());
    }
}
