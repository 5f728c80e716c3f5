use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{amortize, LoanTerms, PeriodEntry, YearSummary};
use crate::error::CalcError;
use crate::loans::validate_rate_and_term;
use crate::types::*;
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Purchase of a car, boat or other vehicle financed with a term loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleLoanInput {
    pub price: Money,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub trade_in_value: Money,
    /// Charged on price less trade-in
    #[serde(default)]
    pub sales_tax_percent: Percent,
    /// Title, registration and dealer fees rolled into the loan
    #[serde(default)]
    pub fees: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleLoanOutput {
    pub sales_tax: Money,
    pub amount_financed: Money,
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Down payment, trade-in and all loan payments
    pub total_cost: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<PeriodEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_summary: Option<Vec<YearSummary>>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

pub fn calculate_auto_loan(
    input: &VehicleLoanInput,
) -> CalcResult<ComputationOutput<VehicleLoanOutput>> {
    financed_purchase(input, "Auto loan")
}

pub fn calculate_boat_loan(
    input: &VehicleLoanInput,
) -> CalcResult<ComputationOutput<VehicleLoanOutput>> {
    financed_purchase(input, "Boat loan")
}

fn financed_purchase(
    input: &VehicleLoanInput,
    methodology: &str,
) -> CalcResult<ComputationOutput<VehicleLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("price", input.price)?;
    require_non_negative("down_payment", input.down_payment)?;
    require_non_negative("trade_in_value", input.trade_in_value)?;
    require_non_negative("sales_tax_percent", input.sales_tax_percent)?;
    require_non_negative("fees", input.fees)?;
    validate_rate_and_term(input.annual_rate_percent, input.term_months)?;

    let taxable = (input.price - input.trade_in_value).max(Decimal::ZERO);
    let sales_tax = checked_product(
        "sales_tax_percent",
        &[taxable, percent_to_rate(input.sales_tax_percent)],
    )?;
    let amount_financed = checked_sum("price", &[input.price, sales_tax, input.fees])?
        - input.down_payment
        - input.trade_in_value;

    if amount_financed <= Decimal::ZERO {
        return Err(CalcError::invalid(
            "down_payment",
            "Down payment and trade-in cover the full purchase; nothing to finance",
        ));
    }
    if input.term_months > 84 {
        warnings.push(format!(
            "Term of {} months is longer than typical vehicle financing",
            input.term_months
        ));
    }

    let amort = amortize(
        &LoanTerms::new(amount_financed, input.annual_rate_percent, input.term_months),
        input.include_schedule,
    )?;
    let total_cost = checked_sum(
        "total_cost",
        &[input.down_payment, input.trade_in_value, amort.total_paid],
    )?;

    debug!(
        "{} financed={} payment={}",
        methodology, amount_financed, amort.periodic_payment
    );

    let output = VehicleLoanOutput {
        sales_tax,
        amount_financed,
        monthly_payment: amort.periodic_payment,
        total_paid: amort.total_paid,
        total_interest: amort.total_interest,
        total_cost,
        schedule: amort.schedule,
        yearly_summary: amort.yearly_summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn car() -> VehicleLoanInput {
        VehicleLoanInput {
            price: dec!(30000),
            down_payment: dec!(3000),
            trade_in_value: dec!(5000),
            sales_tax_percent: dec!(7),
            fees: dec!(500),
            annual_rate_percent: dec!(5),
            term_months: 60,
            include_schedule: false,
        }
    }

    #[test]
    fn test_auto_loan_amount_financed() {
        let out = calculate_auto_loan(&car()).unwrap().result;
        // tax on 25,000 = 1,750; 30,000 + 1,750 + 500 − 3,000 − 5,000
        assert_eq!(out.sales_tax, dec!(1750));
        assert_eq!(out.amount_financed, dec!(24250));
        assert!(out.total_interest > Decimal::ZERO);
        assert_eq!(
            out.total_cost,
            dec!(3000) + dec!(5000) + out.total_paid
        );
    }

    #[test]
    fn test_boat_loan_long_term_warns() {
        let mut input = car();
        input.term_months = 180;
        let out = calculate_boat_loan(&input).unwrap();
        assert_eq!(out.methodology, "Boat loan");
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_nothing_to_finance() {
        let mut input = car();
        input.down_payment = dec!(40000);
        assert!(calculate_auto_loan(&input).is_err());
    }

    #[test]
    fn test_unrepresentable_sales_tax_is_an_error() {
        let mut input = car();
        input.sales_tax_percent = dec!(70000000000000000000000000000);
        match calculate_auto_loan(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "sales_tax_percent"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
