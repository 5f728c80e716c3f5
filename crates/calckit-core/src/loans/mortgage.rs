use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{
    amortize_from, compute_schedule, payoff_date, LoanTerms, PeriodEntry, YearSummary,
};
use crate::error::CalcError;
use crate::loans::{resolve_down_payment, validate_rate_and_term};
use crate::types::*;
use crate::CalcResult;

/// Equity share below which lenders charge PMI.
const PMI_EQUITY_THRESHOLD: Rate = dec!(0.20);
/// PMI is cancelled once the balance reaches this share of the price.
const PMI_CANCEL_LTV: Rate = dec!(0.78);

fn default_pmi_rate_percent() -> Percent {
    dec!(0.5)
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub home_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment_percent: Option<Percent>,
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    #[serde(default)]
    pub property_tax_annual: Money,
    #[serde(default)]
    pub home_insurance_annual: Money,
    #[serde(default)]
    pub hoa_monthly: Money,
    /// Annual PMI premium as a percent of the loan amount
    #[serde(default = "default_pmi_rate_percent")]
    pub pmi_rate_percent: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageOutput {
    pub loan_amount: Money,
    pub down_payment: Money,
    pub loan_to_value: Rate,
    pub monthly_principal_interest: Money,
    pub monthly_property_tax: Money,
    pub monthly_insurance: Money,
    pub monthly_pmi: Money,
    pub monthly_hoa: Money,
    pub total_monthly_payment: Money,
    /// Month in which PMI stops, if it was charged at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmi_cancel_period: Option<u32>,
    pub total_pmi: Money,
    pub total_principal_interest: Money,
    pub total_interest: Money,
    /// Down payment plus every principal and interest payment
    pub total_cost: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<PeriodEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_summary: Option<Vec<YearSummary>>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Monthly housing payment (PITI + PMI + HOA) for a fixed-rate mortgage.
pub fn calculate_mortgage(input: &MortgageInput) -> CalcResult<ComputationOutput<MortgageOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("home_price", input.home_price)?;
    require_non_negative("property_tax_annual", input.property_tax_annual)?;
    require_non_negative("home_insurance_annual", input.home_insurance_annual)?;
    require_non_negative("hoa_monthly", input.hoa_monthly)?;
    require_non_negative("pmi_rate_percent", input.pmi_rate_percent)?;
    if input.term_years == 0 {
        return Err(CalcError::invalid("term_years", "Term must be at least 1 year"));
    }
    let term_months = months_for_years("term_years", input.term_years)?;
    validate_rate_and_term(input.annual_rate_percent, term_months)?;

    let down_payment = resolve_down_payment(
        input.home_price,
        input.down_payment,
        input.down_payment_percent,
    )?;
    let loan_amount = input.home_price - down_payment;
    let loan_to_value = loan_amount / input.home_price;

    let terms = LoanTerms::new(loan_amount, input.annual_rate_percent, term_months);
    let amort = amortize_from(&terms, input.include_schedule, input.first_payment_date)?;
    let payment = amort.periodic_payment;

    let months = Decimal::from(MONTHS_PER_YEAR);
    let monthly_property_tax = input.property_tax_annual / months;
    let monthly_insurance = input.home_insurance_annual / months;

    let (monthly_pmi, pmi_cancel_period, total_pmi) =
        if down_payment / input.home_price < PMI_EQUITY_THRESHOLD && !input.pmi_rate_percent.is_zero() {
            let monthly = checked_product(
                "pmi_rate_percent",
                &[loan_amount, percent_to_rate(input.pmi_rate_percent)],
            )? / months;
            let cancel_at = input.home_price * PMI_CANCEL_LTV;
            let cancel_period = compute_schedule(loan_amount, terms.periodic_rate(), payment, term_months)
                .iter()
                .find(|e| e.ending_balance <= cancel_at)
                .map(|e| e.period);
            let charged_months = cancel_period.unwrap_or(term_months);
            warnings.push(format!(
                "Down payment below 20% of price: PMI of {} per month applies for {} months",
                monthly.round_dp(2),
                charged_months
            ));
            let total = checked_product("pmi_rate_percent", &[monthly, Decimal::from(charged_months)])?;
            (monthly, cancel_period, total)
        } else {
            (Decimal::ZERO, None, Decimal::ZERO)
        };

    if input.annual_rate_percent.is_zero() {
        warn!("mortgage computed at 0% interest");
        warnings.push("Interest rate is 0%: payment is principal only".into());
    }

    let total_monthly_payment = checked_sum(
        "total_monthly_payment",
        &[payment, monthly_property_tax, monthly_insurance, monthly_pmi, input.hoa_monthly],
    )?;
    let total_cost = checked_sum("total_cost", &[down_payment, amort.total_paid])?;

    debug!(
        "mortgage price={} loan={} payment={} total_monthly={}",
        input.home_price, loan_amount, payment, total_monthly_payment
    );

    let output = MortgageOutput {
        loan_amount,
        down_payment,
        loan_to_value,
        monthly_principal_interest: payment,
        monthly_property_tax,
        monthly_insurance,
        monthly_pmi,
        monthly_hoa: input.hoa_monthly,
        total_monthly_payment,
        pmi_cancel_period,
        total_pmi,
        total_principal_interest: amort.total_paid,
        total_interest: amort.total_interest,
        total_cost,
        payoff_date: payoff_date(input.first_payment_date, term_months)?,
        schedule: amort.schedule,
        yearly_summary: amort.yearly_summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate mortgage (PITI)",
        &serde_json::json!({
            "home_price": input.home_price.to_string(),
            "down_payment": down_payment.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "term_years": input.term_years,
            "pmi_rate_percent": input.pmi_rate_percent.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
