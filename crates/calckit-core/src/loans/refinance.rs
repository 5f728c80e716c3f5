use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{checked_payment, checked_totals, periodic_rate, LoanTotals};
use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceInput {
    pub current_balance: Money,
    pub current_rate_percent: Percent,
    pub remaining_months: u32,
    pub new_rate_percent: Percent,
    pub new_term_months: u32,
    #[serde(default)]
    pub closing_costs: Money,
    /// Add closing costs to the new principal instead of paying them upfront
    #[serde(default)]
    pub roll_costs_into_loan: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceOutput {
    pub current_payment: Money,
    pub new_loan_amount: Money,
    pub new_payment: Money,
    pub monthly_savings: Money,
    /// Months of savings needed to recover upfront closing costs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_even_months: Option<u32>,
    pub current_remaining_interest: Money,
    pub new_total_interest: Money,
    /// Remaining cost of the current loan minus full cost of the new one,
    /// closing costs included either way
    pub lifetime_savings: Money,
}

/// Level payment and lifetime totals, with overflow reported against `field`.
fn payment_and_totals(
    field: &str,
    amount: Money,
    rate_percent: Percent,
    months: u32,
) -> CalcResult<(Money, LoanTotals)> {
    if months > MAX_TERM_MONTHS {
        return Err(CalcError::invalid(
            field,
            format!("Term must be at most {MAX_TERM_MONTHS} months"),
        ));
    }
    let payment = checked_payment(amount, periodic_rate(rate_percent), months)
        .ok_or_else(|| out_of_range(field))?;
    let totals = checked_totals(amount, payment, months).ok_or_else(|| out_of_range(field))?;
    Ok((payment, totals))
}

/// Compare keeping the current loan against refinancing it.
pub fn calculate_refinance(
    input: &RefinanceInput,
) -> CalcResult<ComputationOutput<RefinanceOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("current_balance", input.current_balance)?;
    require_non_negative("current_rate_percent", input.current_rate_percent)?;
    require_non_negative("new_rate_percent", input.new_rate_percent)?;
    require_non_negative("closing_costs", input.closing_costs)?;
    if input.remaining_months == 0 {
        return Err(CalcError::invalid(
            "remaining_months",
            "Current loan must have at least 1 month remaining",
        ));
    }
    if input.new_term_months == 0 {
        return Err(CalcError::invalid(
            "new_term_months",
            "New term must be at least 1 month",
        ));
    }

    let (current_payment, current) = payment_and_totals(
        "remaining_months",
        input.current_balance,
        input.current_rate_percent,
        input.remaining_months,
    )?;

    let new_loan_amount = if input.roll_costs_into_loan {
        checked_sum("closing_costs", &[input.current_balance, input.closing_costs])?
    } else {
        input.current_balance
    };
    let (new_payment, new) = payment_and_totals(
        "new_term_months",
        new_loan_amount,
        input.new_rate_percent,
        input.new_term_months,
    )?;

    let monthly_savings = current_payment - new_payment;
    let upfront_costs = if input.roll_costs_into_loan {
        Decimal::ZERO
    } else {
        input.closing_costs
    };

    let break_even_months = if monthly_savings <= Decimal::ZERO {
        warnings.push("New payment is not lower than the current payment; no break-even".into());
        None
    } else if upfront_costs.is_zero() {
        Some(0)
    } else {
        upfront_costs
            .checked_div(monthly_savings)
            .and_then(|months| months.ceil().to_u32())
    };

    let lifetime_savings =
        current.total_paid - checked_sum("closing_costs", &[new.total_paid, upfront_costs])?;
    if lifetime_savings < Decimal::ZERO {
        warnings.push(
            "Refinancing costs more over the life of the loan than keeping the current loan"
                .into(),
        );
    }
    if input.new_term_months > input.remaining_months {
        warnings.push(format!(
            "New term extends repayment by {} months",
            input.new_term_months - input.remaining_months
        ));
    }

    debug!(
        "refinance current_payment={} new_payment={} savings={}",
        current_payment, new_payment, monthly_savings
    );

    let output = RefinanceOutput {
        current_payment,
        new_loan_amount,
        new_payment,
        monthly_savings,
        break_even_months,
        current_remaining_interest: current.total_interest,
        new_total_interest: new.total_interest,
        lifetime_savings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Refinance break-even comparison",
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

    fn refi() -> RefinanceInput {
        RefinanceInput {
            current_balance: dec!(200000),
            current_rate_percent: dec!(7),
            remaining_months: 300,
            new_rate_percent: dec!(5.5),
            new_term_months: 300,
            closing_costs: dec!(4000),
            roll_costs_into_loan: false,
        }
    }

    #[test]
    fn test_lower_rate_saves_money() {
        let out = calculate_refinance(&refi()).unwrap();
        let r = &out.result;
        assert!(r.monthly_savings > dec!(150));
        let months = r.break_even_months.unwrap();
        assert!(months > 12 && months < 30, "break-even {months}");
        assert!(r.lifetime_savings > Decimal::ZERO);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_higher_rate_has_no_break_even() {
        let mut input = refi();
        input.new_rate_percent = dec!(8);
        let out = calculate_refinance(&input).unwrap();
        assert!(out.result.break_even_months.is_none());
        assert!(out.result.lifetime_savings < Decimal::ZERO);
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_rolled_costs_break_even_immediately() {
        let mut input = refi();
        input.roll_costs_into_loan = true;
        let out = calculate_refinance(&input).unwrap().result;
        assert_eq!(out.new_loan_amount, dec!(204000));
        assert_eq!(out.break_even_months, Some(0));
    }

    #[test]
    fn test_term_beyond_limit_rejected() {
        let mut input = refi();
        input.new_term_months = MAX_TERM_MONTHS + 1;
        match calculate_refinance(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "new_term_months"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_unrepresentable_balance_is_an_error() {
        let mut input = refi();
        input.current_balance = dec!(70000000000000000000000000000);
        input.current_rate_percent = dec!(36);
        assert!(calculate_refinance(&input).is_err());
    }
}
