use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{amortize, LoanTerms, PeriodEntry, YearSummary};
use crate::error::CalcError;
use crate::loans::validate_rate_and_term;
use crate::types::*;
use crate::CalcResult;

/// Minimum FHA down payment for borrowers with a 580+ credit score.
const FHA_MIN_DOWN_PERCENT: Percent = dec!(3.5);
/// With at least this much down, annual MIP ends after eleven years.
const MIP_SHORT_DURATION_DOWN_PERCENT: Percent = dec!(10);
const MIP_SHORT_DURATION_MONTHS: u32 = 132;

fn default_down_percent() -> Percent {
    FHA_MIN_DOWN_PERCENT
}

fn default_upfront_mip_percent() -> Percent {
    dec!(1.75)
}

fn default_annual_mip_percent() -> Percent {
    dec!(0.55)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhaLoanInput {
    pub home_price: Money,
    #[serde(default = "default_down_percent")]
    pub down_payment_percent: Percent,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    /// Financed into the loan at closing
    #[serde(default = "default_upfront_mip_percent")]
    pub upfront_mip_percent: Percent,
    #[serde(default = "default_annual_mip_percent")]
    pub annual_mip_percent: Percent,
    #[serde(default)]
    pub property_tax_annual: Money,
    #[serde(default)]
    pub home_insurance_annual: Money,
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhaLoanOutput {
    pub down_payment: Money,
    pub base_loan_amount: Money,
    pub upfront_mip: Money,
    /// Base loan plus financed upfront MIP
    pub loan_amount: Money,
    pub monthly_principal_interest: Money,
    pub monthly_mip: Money,
    pub mip_duration_months: u32,
    pub monthly_property_tax: Money,
    pub monthly_insurance: Money,
    pub total_monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_mip: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<PeriodEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_summary: Option<Vec<YearSummary>>,
}

/// FHA-insured mortgage: upfront MIP is financed, annual MIP is paid monthly.
pub fn calculate_fha_loan(input: &FhaLoanInput) -> CalcResult<ComputationOutput<FhaLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("home_price", input.home_price)?;
    require_non_negative("down_payment_percent", input.down_payment_percent)?;
    require_non_negative("upfront_mip_percent", input.upfront_mip_percent)?;
    require_non_negative("annual_mip_percent", input.annual_mip_percent)?;
    require_non_negative("property_tax_annual", input.property_tax_annual)?;
    require_non_negative("home_insurance_annual", input.home_insurance_annual)?;
    if input.down_payment_percent >= dec!(100) {
        return Err(CalcError::invalid(
            "down_payment_percent",
            "Down payment must be less than 100% of the price",
        ));
    }
    if input.term_years == 0 {
        return Err(CalcError::invalid("term_years", "Term must be at least 1 year"));
    }
    let term_months = months_for_years("term_years", input.term_years)?;
    validate_rate_and_term(input.annual_rate_percent, term_months)?;

    if input.down_payment_percent < FHA_MIN_DOWN_PERCENT {
        warnings.push(format!(
            "Down payment of {}% is below the FHA minimum of {}%",
            input.down_payment_percent, FHA_MIN_DOWN_PERCENT
        ));
    }

    let down_payment = input.home_price * percent_to_rate(input.down_payment_percent);
    let base_loan_amount = input.home_price - down_payment;
    let upfront_mip = checked_product(
        "upfront_mip_percent",
        &[base_loan_amount, percent_to_rate(input.upfront_mip_percent)],
    )?;
    let loan_amount = checked_sum("upfront_mip_percent", &[base_loan_amount, upfront_mip])?;

    let amort = amortize(
        &LoanTerms::new(loan_amount, input.annual_rate_percent, term_months),
        input.include_schedule,
    )?;

    let months = Decimal::from(MONTHS_PER_YEAR);
    let monthly_mip = checked_product(
        "annual_mip_percent",
        &[base_loan_amount, percent_to_rate(input.annual_mip_percent)],
    )? / months;
    let mip_duration_months = if input.down_payment_percent >= MIP_SHORT_DURATION_DOWN_PERCENT {
        MIP_SHORT_DURATION_MONTHS.min(term_months)
    } else {
        term_months
    };
    let monthly_property_tax = input.property_tax_annual / months;
    let monthly_insurance = input.home_insurance_annual / months;

    let total_monthly_payment = checked_sum(
        "total_monthly_payment",
        &[amort.periodic_payment, monthly_mip, monthly_property_tax, monthly_insurance],
    )?;
    let total_mip = checked_sum(
        "annual_mip_percent",
        &[
            upfront_mip,
            checked_product("annual_mip_percent", &[monthly_mip, Decimal::from(mip_duration_months)])?,
        ],
    )?;

    debug!(
        "fha base_loan={} financed={} payment={}",
        base_loan_amount, loan_amount, amort.periodic_payment
    );

    let output = FhaLoanOutput {
        down_payment,
        base_loan_amount,
        upfront_mip,
        loan_amount,
        monthly_principal_interest: amort.periodic_payment,
        monthly_mip,
        mip_duration_months,
        monthly_property_tax,
        monthly_insurance,
        total_monthly_payment,
        total_paid: amort.total_paid,
        total_interest: amort.total_interest,
        total_mip,
        schedule: amort.schedule,
        yearly_summary: amort.yearly_summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "FHA mortgage with mortgage insurance premium",
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

    fn fha() -> FhaLoanInput {
        FhaLoanInput {
            home_price: dec!(300000),
            down_payment_percent: dec!(3.5),
            annual_rate_percent: dec!(6.5),
            term_years: 30,
            upfront_mip_percent: dec!(1.75),
            annual_mip_percent: dec!(0.55),
            property_tax_annual: Decimal::ZERO,
            home_insurance_annual: Decimal::ZERO,
            include_schedule: false,
        }
    }

    #[test]
    fn test_fha_financed_amount() {
        let out = calculate_fha_loan(&fha()).unwrap();
        let r = &out.result;
        assert_eq!(r.down_payment, dec!(10500));
        assert_eq!(r.base_loan_amount, dec!(289500));
        assert_eq!(r.upfront_mip, dec!(5066.25));
        assert_eq!(r.loan_amount, dec!(294566.25));
        assert_eq!(r.mip_duration_months, 360);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_ten_percent_down_limits_mip() {
        let mut input = fha();
        input.down_payment_percent = dec!(10);
        let out = calculate_fha_loan(&input).unwrap().result;
        assert_eq!(out.mip_duration_months, 132);
    }

    #[test]
    fn test_low_down_payment_warns() {
        let mut input = fha();
        input.down_payment_percent = dec!(3);
        let out = calculate_fha_loan(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_term_beyond_limit_rejected() {
        let mut input = fha();
        input.term_years = u32::MAX;
        match calculate_fha_loan(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "term_years"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_unrepresentable_upfront_mip_is_an_error() {
        let mut input = fha();
        input.upfront_mip_percent = dec!(70000000000000000000000000000);
        assert!(calculate_fha_loan(&input).is_err());
    }
}
