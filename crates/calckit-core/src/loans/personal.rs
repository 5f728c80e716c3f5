use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{amortize, LoanTerms, PeriodEntry, YearSummary};
use crate::error::CalcError;
use crate::loans::validate_rate_and_term;
use crate::time_value::solve_periodic_rate;
use crate::types::*;
use crate::CalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalLoanInput {
    pub amount: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    /// Deducted from the proceeds at funding
    #[serde(default)]
    pub origination_fee_percent: Percent,
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalLoanOutput {
    pub monthly_payment: Money,
    pub origination_fee: Money,
    pub net_proceeds: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Interest plus fee
    pub total_cost_of_borrowing: Money,
    /// APR implied by the payments against the net proceeds
    pub effective_apr_percent: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<PeriodEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_summary: Option<Vec<YearSummary>>,
}

/// Unsecured installment loan with an optional origination fee.
pub fn calculate_personal_loan(
    input: &PersonalLoanInput,
) -> CalcResult<ComputationOutput<PersonalLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("amount", input.amount)?;
    require_non_negative("origination_fee_percent", input.origination_fee_percent)?;
    validate_rate_and_term(input.annual_rate_percent, input.term_months)?;
    if input.origination_fee_percent >= dec!(100) {
        return Err(CalcError::invalid(
            "origination_fee_percent",
            "Fee must be below 100% of the amount",
        ));
    }

    let terms = LoanTerms::new(input.amount, input.annual_rate_percent, input.term_months);
    let amort = amortize(&terms, input.include_schedule)?;

    let origination_fee = input.amount * percent_to_rate(input.origination_fee_percent);
    let net_proceeds = input.amount - origination_fee;

    let effective_apr_percent = if origination_fee.is_zero() {
        input.annual_rate_percent
    } else {
        let guess = terms.periodic_rate().max(dec!(0.001));
        let monthly = solve_periodic_rate(
            net_proceeds,
            amort.periodic_payment,
            input.term_months,
            guess,
        )?;
        rate_to_percent(monthly * Decimal::from(MONTHS_PER_YEAR))
    };

    if input.annual_rate_percent > dec!(36) {
        warnings.push(format!(
            "Rate of {}% exceeds the 36% APR cap used by many states",
            input.annual_rate_percent
        ));
    }

    let total_cost_of_borrowing =
        checked_sum("total_cost_of_borrowing", &[amort.total_interest, origination_fee])?;

    debug!(
        "personal loan amount={} payment={} apr={}",
        input.amount, amort.periodic_payment, effective_apr_percent
    );

    let output = PersonalLoanOutput {
        monthly_payment: amort.periodic_payment,
        origination_fee,
        net_proceeds,
        total_paid: amort.total_paid,
        total_interest: amort.total_interest,
        total_cost_of_borrowing,
        effective_apr_percent,
        schedule: amort.schedule,
        yearly_summary: amort.yearly_summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Personal installment loan",
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

    fn loan(fee: Decimal) -> PersonalLoanInput {
        PersonalLoanInput {
            amount: dec!(10000),
            annual_rate_percent: dec!(5),
            term_months: 60,
            origination_fee_percent: fee,
            include_schedule: false,
        }
    }

    #[test]
    fn test_personal_loan_payment() {
        let out = calculate_personal_loan(&loan(Decimal::ZERO)).unwrap().result;
        assert!((out.monthly_payment - dec!(188.71)).abs() < dec!(0.01));
        assert_eq!(out.effective_apr_percent, dec!(5));
        assert_eq!(out.net_proceeds, dec!(10000));
    }

    #[test]
    fn test_origination_fee_raises_apr() {
        let out = calculate_personal_loan(&loan(dec!(3))).unwrap().result;
        assert_eq!(out.origination_fee, dec!(300));
        assert_eq!(out.net_proceeds, dec!(9700));
        // a 3% fee on a 5-year 5% loan lands a little above 6.2%
        assert!(
            out.effective_apr_percent > dec!(6.1) && out.effective_apr_percent < dec!(6.4),
            "got {}",
            out.effective_apr_percent
        );
        assert_eq!(
            out.total_cost_of_borrowing,
            out.total_interest + dec!(300)
        );
    }

    #[test]
    fn test_fee_of_full_amount_rejected() {
        match calculate_personal_loan(&loan(dec!(100))) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "origination_fee_percent"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_unrepresentable_amount_is_an_error() {
        let mut input = loan(dec!(1));
        input.amount = dec!(70000000000000000000000000000);
        input.annual_rate_percent = dec!(36);
        input.term_months = 1200;
        assert!(calculate_personal_loan(&input).is_err());
    }
}
