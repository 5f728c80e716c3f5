use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

/// Expenditure-approach components, all in the same currency and period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GdpInput {
    pub consumption: Money,
    pub investment: Money,
    pub government_spending: Money,
    pub exports: Money,
    pub imports: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GdpShares {
    pub consumption: Rate,
    pub investment: Rate,
    pub government_spending: Rate,
    pub net_exports: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GdpOutput {
    pub gdp: Money,
    pub net_exports: Money,
    /// Component over GDP; absent when GDP is not positive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<GdpShares>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gdp_per_capita: Option<Money>,
}

/// GDP = C + I + G + (X − M)
pub fn calculate_gdp(input: &GdpInput) -> CalcResult<ComputationOutput<GdpOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_non_negative("consumption", input.consumption)?;
    require_non_negative("government_spending", input.government_spending)?;
    require_non_negative("exports", input.exports)?;
    require_non_negative("imports", input.imports)?;
    // Gross investment can be negative when inventories run down.
    if input.investment < Decimal::ZERO {
        warnings.push("Negative investment implies inventory drawdown".into());
    }

    let net_exports = input.exports - input.imports;
    let gdp = checked_sum(
        "gdp",
        &[
            input.consumption,
            input.investment,
            input.government_spending,
            net_exports,
        ],
    )?;

    let share = |part: Money| part.checked_div(gdp).ok_or_else(|| out_of_range("gdp"));
    let shares = if gdp > Decimal::ZERO {
        Some(GdpShares {
            consumption: share(input.consumption)?,
            investment: share(input.investment)?,
            government_spending: share(input.government_spending)?,
            net_exports: share(net_exports)?,
        })
    } else {
        warnings.push("GDP is not positive; component shares omitted".into());
        None
    };

    let gdp_per_capita = match input.population {
        None => None,
        Some(p) if p <= Decimal::ZERO => {
            return Err(CalcError::invalid("population", "Must be greater than zero"))
        }
        Some(p) => Some(gdp.checked_div(p).ok_or_else(|| out_of_range("population"))?),
    };

    if net_exports < Decimal::ZERO {
        warnings.push("Trade deficit: imports exceed exports".into());
    }

    let output = GdpOutput {
        gdp,
        net_exports,
        shares,
        gdp_per_capita,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "GDP expenditure approach",
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

    fn economy() -> GdpInput {
        GdpInput {
            consumption: dec!(14000),
            investment: dec!(3500),
            government_spending: dec!(3800),
            exports: dec!(2500),
            imports: dec!(3300),
            population: Some(dec!(330)),
        }
    }

    #[test]
    fn test_expenditure_sum() {
        let out = calculate_gdp(&economy()).unwrap();
        let r = &out.result;
        assert_eq!(r.net_exports, dec!(-800));
        assert_eq!(r.gdp, dec!(20500));
        let per_capita = r.gdp_per_capita.unwrap();
        assert!((per_capita - dec!(62.1212)).abs() < dec!(0.0001));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_shares_sum_to_one() {
        let r = calculate_gdp(&economy()).unwrap().result;
        let s = r.shares.unwrap();
        let total = s.consumption + s.investment + s.government_spending + s.net_exports;
        assert!((total - Decimal::ONE).abs() < dec!(0.000001));
    }

    #[test]
    fn test_zero_population_rejected() {
        let mut input = economy();
        input.population = Some(Decimal::ZERO);
        assert!(calculate_gdp(&input).is_err());
    }

    #[test]
    fn test_components_beyond_range_are_errors() {
        let mut input = economy();
        input.consumption = Decimal::MAX;
        input.government_spending = Decimal::MAX;
        match calculate_gdp(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "gdp"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }

        let mut input = economy();
        input.population = Some(dec!(0.000000000000000000000000001));
        match calculate_gdp(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "population"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
