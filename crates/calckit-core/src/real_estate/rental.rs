use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{checked_payment, periodic_rate};
use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalPropertyInput {
    pub purchase_price: Money,
    pub down_payment_percent: Percent,
    #[serde(default)]
    pub closing_costs: Money,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    pub monthly_rent: Money,
    #[serde(default)]
    pub other_monthly_income: Money,
    #[serde(default)]
    pub vacancy_percent: Percent,
    #[serde(default)]
    pub property_tax_annual: Money,
    #[serde(default)]
    pub insurance_annual: Money,
    /// Maintenance, utilities, HOA and other fixed monthly costs
    #[serde(default)]
    pub monthly_operating_expenses: Money,
    /// Property management fee as a percent of collected income
    #[serde(default)]
    pub management_percent: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalPropertyOutput {
    pub loan_amount: Money,
    pub monthly_mortgage: Money,
    pub gross_scheduled_income: Money,
    pub vacancy_loss: Money,
    pub effective_gross_income: Money,
    pub operating_expenses: Money,
    pub net_operating_income: Money,
    pub cap_rate: Rate,
    pub annual_debt_service: Money,
    pub annual_cash_flow: Money,
    pub monthly_cash_flow: Money,
    pub cash_invested: Money,
    pub cash_on_cash_return: Rate,
    pub gross_rent_multiplier: Decimal,
    /// NOI over debt service; absent for all-cash purchases
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_service_coverage: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Year-one income, NOI, cap rate and leveraged cash returns for a rental.
pub fn analyze_rental_property(
    input: &RentalPropertyInput,
) -> CalcResult<ComputationOutput<RentalPropertyOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let months = Decimal::from(MONTHS_PER_YEAR);
    let down_payment = input.purchase_price * percent_to_rate(input.down_payment_percent);
    let loan_amount = input.purchase_price - down_payment;
    let term_months = months_for_years("term_years", input.term_years)?;
    let monthly_mortgage = checked_payment(
        loan_amount,
        periodic_rate(input.annual_rate_percent),
        term_months,
    )
    .ok_or_else(|| out_of_range("purchase_price"))?;

    // --- Income ---
    let monthly_income = checked_sum("monthly_rent", &[input.monthly_rent, input.other_monthly_income])?;
    let gross_scheduled_income = checked_product("monthly_rent", &[monthly_income, months])?;
    let vacancy_loss = gross_scheduled_income * percent_to_rate(input.vacancy_percent);
    let effective_gross_income = gross_scheduled_income - vacancy_loss;

    // --- Expenses ---
    let management = checked_product(
        "management_percent",
        &[effective_gross_income, percent_to_rate(input.management_percent)],
    )?;
    let operating_expenses = checked_sum(
        "operating_expenses",
        &[
            input.property_tax_annual,
            input.insurance_annual,
            checked_product("monthly_operating_expenses", &[input.monthly_operating_expenses, months])?,
            management,
        ],
    )?;
    let net_operating_income = effective_gross_income - operating_expenses;

    // --- Returns ---
    let cap_rate = net_operating_income
        .checked_div(input.purchase_price)
        .ok_or_else(|| out_of_range("cap_rate"))?;
    let annual_debt_service = checked_product("purchase_price", &[monthly_mortgage, months])?;
    let annual_cash_flow = net_operating_income
        .checked_sub(annual_debt_service)
        .ok_or_else(|| out_of_range("annual_cash_flow"))?;
    let cash_invested = checked_sum("closing_costs", &[down_payment, input.closing_costs])?;
    let cash_on_cash_return = if cash_invested.is_zero() {
        warnings.push("No cash invested; cash-on-cash return is undefined and reported as 0".into());
        Decimal::ZERO
    } else {
        annual_cash_flow
            .checked_div(cash_invested)
            .ok_or_else(|| out_of_range("cash_on_cash_return"))?
    };
    let gross_rent_multiplier = input
        .purchase_price
        .checked_div(checked_product("monthly_rent", &[input.monthly_rent, months])?)
        .ok_or_else(|| out_of_range("gross_rent_multiplier"))?;
    let debt_service_coverage = if annual_debt_service.is_zero() {
        None
    } else {
        Some(
            net_operating_income
                .checked_div(annual_debt_service)
                .ok_or_else(|| out_of_range("debt_service_coverage"))?,
        )
    };

    // --- Warnings ---
    if annual_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative cash flow of {} per year",
            annual_cash_flow.round_dp(2)
        ));
    }
    if let Some(dscr) = debt_service_coverage {
        if dscr < dec!(1.25) {
            warnings.push(format!(
                "DSCR of {} is below the 1.25x most lenders require",
                dscr.round_dp(2)
            ));
        }
    }
    if cap_rate < dec!(0.03) {
        warnings.push(format!(
            "Cap rate {:.2}% is below 3%, unusually low",
            rate_to_percent(cap_rate)
        ));
    } else if cap_rate > dec!(0.12) {
        warnings.push(format!(
            "Cap rate {:.2}% exceeds 12%, verify income and expense inputs",
            rate_to_percent(cap_rate)
        ));
    }

    debug!(
        "rental noi={} cap_rate={} cash_flow={}",
        net_operating_income, cap_rate, annual_cash_flow
    );

    let output = RentalPropertyOutput {
        loan_amount,
        monthly_mortgage,
        gross_scheduled_income,
        vacancy_loss,
        effective_gross_income,
        operating_expenses,
        net_operating_income,
        cap_rate,
        annual_debt_service,
        annual_cash_flow,
        monthly_cash_flow: annual_cash_flow / months,
        cash_invested,
        cash_on_cash_return,
        gross_rent_multiplier,
        debt_service_coverage,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rental property income approach (year one)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &RentalPropertyInput) -> CalcResult<()> {
    require_positive("purchase_price", input.purchase_price)?;
    require_positive("monthly_rent", input.monthly_rent)?;
    require_non_negative("down_payment_percent", input.down_payment_percent)?;
    require_non_negative("closing_costs", input.closing_costs)?;
    require_non_negative("annual_rate_percent", input.annual_rate_percent)?;
    require_non_negative("other_monthly_income", input.other_monthly_income)?;
    require_non_negative("property_tax_annual", input.property_tax_annual)?;
    require_non_negative("insurance_annual", input.insurance_annual)?;
    require_non_negative("monthly_operating_expenses", input.monthly_operating_expenses)?;
    require_non_negative("management_percent", input.management_percent)?;

    if input.down_payment_percent > dec!(100) {
        return Err(CalcError::invalid(
            "down_payment_percent",
            "Down payment cannot exceed 100% of the price",
        ));
    }
    if input.vacancy_percent < Decimal::ZERO || input.vacancy_percent >= dec!(100) {
        return Err(CalcError::invalid(
            "vacancy_percent",
            "Vacancy must be between 0 and 100 (exclusive upper)",
        ));
    }
    if input.term_years == 0 && input.down_payment_percent < dec!(100) {
        return Err(CalcError::invalid(
            "term_years",
            "Financed purchases need a term of at least 1 year",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn duplex() -> RentalPropertyInput {
        RentalPropertyInput {
            purchase_price: dec!(250000),
            down_payment_percent: dec!(20),
            closing_costs: dec!(5000),
            annual_rate_percent: dec!(6),
            term_years: 30,
            monthly_rent: dec!(2500),
            other_monthly_income: Decimal::ZERO,
            vacancy_percent: dec!(5),
            property_tax_annual: dec!(3000),
            insurance_annual: dec!(1200),
            monthly_operating_expenses: dec!(200),
            management_percent: Decimal::ZERO,
        }
    }

    #[test]
    fn test_noi_and_cap_rate() {
        let out = analyze_rental_property(&duplex()).unwrap().result;
        assert_eq!(out.gross_scheduled_income, dec!(30000));
        assert_eq!(out.vacancy_loss, dec!(1500));
        assert_eq!(out.operating_expenses, dec!(6600));
        assert_eq!(out.net_operating_income, dec!(21900));
        assert_eq!(out.cap_rate, dec!(0.0876));
        assert_eq!(out.cash_invested, dec!(55000));
        assert_eq!(out.gross_rent_multiplier, dec!(250000) / dec!(30000));
    }

    #[test]
    fn test_leveraged_cash_flow() {
        let out = analyze_rental_property(&duplex()).unwrap().result;
        // 21,900 − 12 × 1,199.10
        assert!((out.annual_cash_flow - dec!(7510.79)).abs() < dec!(0.05));
        assert!(out.debt_service_coverage.unwrap() > dec!(1.5));
        assert!(out.cash_on_cash_return > dec!(0.13));
    }

    #[test]
    fn test_all_cash_has_no_dscr() {
        let mut input = duplex();
        input.down_payment_percent = dec!(100);
        input.term_years = 0;
        let out = analyze_rental_property(&input).unwrap().result;
        assert_eq!(out.loan_amount, Decimal::ZERO);
        assert!(out.debt_service_coverage.is_none());
        assert_eq!(out.annual_cash_flow, out.net_operating_income);
    }

    #[test]
    fn test_full_vacancy_rejected() {
        let mut input = duplex();
        input.vacancy_percent = dec!(100);
        assert!(analyze_rental_property(&input).is_err());
    }

    #[test]
    fn test_term_beyond_limit_rejected() {
        let mut input = duplex();
        input.term_years = u32::MAX;
        match analyze_rental_property(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "term_years"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_unrepresentable_rent_is_an_error() {
        let mut input = duplex();
        input.monthly_rent = dec!(70000000000000000000000000000);
        assert!(analyze_rental_property(&input).is_err());
    }
}
