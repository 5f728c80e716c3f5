use log::debug;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiInput {
    pub initial_investment: Money,
    pub final_value: Money,
    /// Holding period; enables the annualized figure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiOutput {
    pub gain: Money,
    pub roi: Rate,
    pub roi_percent: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annualized_roi: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annualized_roi_percent: Option<Percent>,
}

/// Simple and annualized return on investment.
pub fn calculate_roi(input: &RoiInput) -> CalcResult<ComputationOutput<RoiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("initial_investment", input.initial_investment)?;
    require_non_negative("final_value", input.final_value)?;

    let gain = input.final_value - input.initial_investment;
    let roi = gain
        .checked_div(input.initial_investment)
        .ok_or_else(|| out_of_range("initial_investment"))?;

    let annualized_roi = match input.years {
        None => None,
        Some(y) if y <= Decimal::ZERO => {
            return Err(CalcError::invalid("years", "Holding period must be positive"))
        }
        Some(_) if input.final_value.is_zero() => Some(-Decimal::ONE),
        Some(y) => {
            let multiple = input
                .final_value
                .checked_div(input.initial_investment)
                .ok_or_else(|| out_of_range("initial_investment"))?;
            let grown = multiple
                .checked_powd(Decimal::ONE / y)
                .ok_or_else(|| CalcError::invalid("years", "Annualized return out of range"))?;
            Some(grown - Decimal::ONE)
        }
    };

    if roi < Decimal::ZERO {
        warnings.push("Investment lost value".into());
    }

    debug!("roi initial={} final={} roi={}", input.initial_investment, input.final_value, roi);

    let output = RoiOutput {
        gain,
        roi,
        roi_percent: checked_product("initial_investment", &[roi, dec!(100)])?,
        annualized_roi,
        annualized_roi_percent: annualized_roi
            .map(|r| checked_product("years", &[r, dec!(100)]))
            .transpose()?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Return on investment",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_simple_roi() {
        let input = RoiInput {
            initial_investment: dec!(10000),
            final_value: dec!(15000),
            years: None,
        };
        let out = calculate_roi(&input).unwrap().result;
        assert_eq!(out.gain, dec!(5000));
        assert_eq!(out.roi, dec!(0.5));
        assert_eq!(out.roi_percent, dec!(50));
        assert!(out.annualized_roi.is_none());
    }

    #[test]
    fn test_annualized_roi() {
        let input = RoiInput {
            initial_investment: dec!(10000),
            final_value: dec!(12100),
            years: Some(dec!(2)),
        };
        let out = calculate_roi(&input).unwrap().result;
        let annual = out.annualized_roi.unwrap();
        assert!((annual - dec!(0.1)).abs() < dec!(0.0001), "got {annual}");
    }

    #[test]
    fn test_loss_warns() {
        let input = RoiInput {
            initial_investment: dec!(100),
            final_value: dec!(80),
            years: None,
        };
        let out = calculate_roi(&input).unwrap();
        assert_eq!(out.result.roi, dec!(-0.2));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_zero_initial_rejected() {
        let input = RoiInput {
            initial_investment: Decimal::ZERO,
            final_value: dec!(80),
            years: None,
        };
        assert!(calculate_roi(&input).is_err());
    }

    #[test]
    fn test_tiny_initial_investment_is_an_error() {
        let input = RoiInput {
            initial_investment: dec!(0.0000000000000000000000000001),
            final_value: dec!(10000000000),
            years: None,
        };
        assert!(calculate_roi(&input).is_err());
    }
}
