//! Monthly payment breakdown and equity build-up projection.
//!
//! Property value grows at a flat annual appreciation rate (2% unless told
//! otherwise); this is an illustrative projection, not a market forecast.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{balance_after, checked_payment, periodic_rate};
use crate::error::CalcError;
use crate::loans::resolve_down_payment;
use crate::types::*;
use crate::CalcResult;

fn default_appreciation_percent() -> Percent {
    dec!(2)
}

fn default_projection_years() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityProjectionInput {
    pub home_value: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment_percent: Option<Percent>,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    #[serde(default)]
    pub property_tax_annual: Money,
    #[serde(default)]
    pub insurance_annual: Money,
    #[serde(default = "default_appreciation_percent")]
    pub appreciation_percent: Percent,
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub principal_interest: Money,
    pub first_month_interest: Money,
    pub first_month_principal: Money,
    pub property_tax: Money,
    pub insurance: Money,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityYear {
    pub year: u32,
    pub property_value: Money,
    pub loan_balance: Money,
    pub equity: Money,
    pub equity_share: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityProjectionOutput {
    pub loan_amount: Money,
    pub monthly: PaymentBreakdown,
    pub projection: Vec<EquityYear>,
}

pub fn project_equity(
    input: &EquityProjectionInput,
) -> CalcResult<ComputationOutput<EquityProjectionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("home_value", input.home_value)?;
    require_non_negative("annual_rate_percent", input.annual_rate_percent)?;
    require_non_negative("property_tax_annual", input.property_tax_annual)?;
    require_non_negative("insurance_annual", input.insurance_annual)?;
    if input.appreciation_percent <= dec!(-100) {
        return Err(CalcError::invalid(
            "appreciation_percent",
            "Appreciation must be greater than -100%",
        ));
    }
    if input.term_years == 0 {
        return Err(CalcError::invalid("term_years", "Term must be at least 1 year"));
    }
    if input.projection_years == 0 || input.projection_years > MAX_TERM_YEARS {
        return Err(CalcError::invalid(
            "projection_years",
            format!("Project between 1 and {MAX_TERM_YEARS} years"),
        ));
    }
    let term_months = months_for_years("term_years", input.term_years)?;

    let down_payment = resolve_down_payment(
        input.home_value,
        input.down_payment,
        input.down_payment_percent,
    )?;
    let loan_amount = input.home_value - down_payment;
    let rate = periodic_rate(input.annual_rate_percent);
    let payment =
        checked_payment(loan_amount, rate, term_months).ok_or_else(|| out_of_range("home_value"))?;

    let months = Decimal::from(MONTHS_PER_YEAR);
    let first_month_interest = checked_product("home_value", &[loan_amount, rate])?;
    let property_tax = input.property_tax_annual / months;
    let insurance = input.insurance_annual / months;
    let monthly = PaymentBreakdown {
        principal_interest: payment,
        first_month_interest,
        first_month_principal: payment - first_month_interest,
        property_tax,
        insurance,
        total: checked_sum("total", &[payment, property_tax, insurance])?,
    };

    if input.projection_years > input.term_years {
        warnings.push(format!(
            "Projection runs {} years past loan payoff",
            input.projection_years - input.term_years
        ));
    }

    let growth = Decimal::ONE + percent_to_rate(input.appreciation_percent);
    let mut property_value = input.home_value;
    let mut projection = Vec::with_capacity(input.projection_years as usize);
    for year in 1..=input.projection_years {
        property_value = checked_product("appreciation_percent", &[property_value, growth])?;
        let paid = year.saturating_mul(MONTHS_PER_YEAR).min(term_months);
        let loan_balance = balance_after(loan_amount, rate, payment, paid).max(Decimal::ZERO);
        let equity = property_value - loan_balance;
        projection.push(EquityYear {
            year,
            property_value,
            loan_balance,
            equity,
            equity_share: if property_value.is_zero() {
                Decimal::ZERO
            } else {
                equity / property_value
            },
        });
    }

    debug!(
        "equity projection loan={} years={} final_equity={:?}",
        loan_amount,
        input.projection_years,
        projection.last().map(|y| y.equity)
    );

    let output = EquityProjectionOutput {
        loan_amount,
        monthly,
        projection,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment breakdown with flat-appreciation equity projection",
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

    fn home() -> EquityProjectionInput {
        EquityProjectionInput {
            home_value: dec!(250000),
            down_payment: None,
            down_payment_percent: Some(dec!(20)),
            annual_rate_percent: dec!(6),
            term_years: 30,
            property_tax_annual: dec!(2400),
            insurance_annual: dec!(1200),
            appreciation_percent: dec!(2),
            projection_years: 5,
        }
    }

    #[test]
    fn test_first_month_split() {
        let out = project_equity(&home()).unwrap().result;
        assert_eq!(out.monthly.first_month_interest, dec!(1000));
        assert!((out.monthly.first_month_principal - dec!(199.10)).abs() < dec!(0.01));
        assert_eq!(out.monthly.property_tax, dec!(200));
        assert!((out.monthly.total - dec!(1499.10)).abs() < dec!(0.01));
    }

    #[test]
    fn test_equity_grows_each_year() {
        let out = project_equity(&home()).unwrap().result;
        assert_eq!(out.projection.len(), 5);
        assert_eq!(out.projection[0].property_value, dec!(255000));
        for pair in out.projection.windows(2) {
            assert!(pair[1].equity > pair[0].equity);
            assert!(pair[1].loan_balance < pair[0].loan_balance);
        }
    }

    #[test]
    fn test_projection_past_payoff() {
        let mut input = home();
        input.term_years = 2;
        input.projection_years = 3;
        let out = project_equity(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        let last = out.result.projection.last().unwrap();
        assert!(last.loan_balance < dec!(0.01));
        assert!((last.equity - last.property_value).abs() < dec!(0.01));
    }

    #[test]
    fn test_term_and_horizon_are_bounded() {
        let mut input = home();
        input.term_years = 400_000_000;
        match project_equity(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "term_years"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        let mut input = home();
        input.projection_years = u32::MAX;
        match project_equity(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "projection_years"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_runaway_appreciation_is_an_error() {
        let mut input = home();
        input.home_value = dec!(100000000000000000000000000);
        input.appreciation_percent = dec!(1000);
        match project_equity(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "appreciation_percent"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
