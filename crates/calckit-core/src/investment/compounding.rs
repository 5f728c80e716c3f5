use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::time_value::{future_value_annuity, future_value_lump, present_value_lump};
use crate::types::*;
use crate::CalcResult;

fn default_compounds_per_year() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentValueInput {
    pub future_value: Money,
    pub annual_rate_percent: Percent,
    pub years: Decimal,
    #[serde(default = "default_compounds_per_year")]
    pub compounds_per_year: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentValueOutput {
    pub present_value: Money,
    pub discount: Money,
    pub discount_factor: Decimal,
    pub effective_annual_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FutureValueInput {
    pub present_value: Money,
    pub annual_rate_percent: Percent,
    pub years: Decimal,
    #[serde(default = "default_compounds_per_year")]
    pub compounds_per_year: u32,
    /// Deposit made at the end of every compounding period
    #[serde(default)]
    pub contribution: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FutureValueOutput {
    pub future_value: Money,
    pub lump_sum_growth: Money,
    pub contributions_value: Money,
    pub total_contributions: Money,
    pub total_interest: Money,
    pub effective_annual_rate: Rate,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Rate per compounding period and the number of periods.
fn period_basis(
    annual_rate_percent: Percent,
    years: Decimal,
    compounds_per_year: u32,
) -> CalcResult<(Rate, Decimal)> {
    require_non_negative("years", years)?;
    if compounds_per_year == 0 {
        return Err(CalcError::invalid(
            "compounds_per_year",
            "Must compound at least once per year",
        ));
    }
    let m = Decimal::from(compounds_per_year);
    Ok((percent_to_rate(annual_rate_percent) / m, checked_product("years", &[years, m])?))
}

fn effective_annual_rate(period_rate: Rate, compounds_per_year: u32) -> CalcResult<Rate> {
    let factor = crate::time_value::compound_factor(period_rate, Decimal::from(compounds_per_year))?;
    Ok(factor - Decimal::ONE)
}

/// Today's value of a single future amount.
pub fn calculate_present_value(
    input: &PresentValueInput,
) -> CalcResult<ComputationOutput<PresentValueOutput>> {
    let start = Instant::now();

    let (rate, periods) =
        period_basis(input.annual_rate_percent, input.years, input.compounds_per_year)?;
    let present_value = present_value_lump(input.future_value, rate, periods)?;

    debug!(
        "present value fv={} rate={} periods={} pv={}",
        input.future_value, rate, periods, present_value
    );

    let output = PresentValueOutput {
        present_value,
        discount: input
            .future_value
            .checked_sub(present_value)
            .ok_or_else(|| out_of_range("future_value"))?,
        discount_factor: if input.future_value.is_zero() {
            Decimal::ZERO
        } else {
            present_value / input.future_value
        },
        effective_annual_rate: effective_annual_rate(rate, input.compounds_per_year)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Present value of a single sum",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Growth of a lump sum plus optional level contributions.
pub fn calculate_future_value(
    input: &FutureValueInput,
) -> CalcResult<ComputationOutput<FutureValueOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (rate, periods) =
        period_basis(input.annual_rate_percent, input.years, input.compounds_per_year)?;
    if !periods.fract().is_zero() && !input.contribution.is_zero() {
        warnings.push(
            "Term ends mid-period; contributions are compounded over a fractional period count"
                .into(),
        );
    }

    let lump_sum_growth = future_value_lump(input.present_value, rate, periods)?;
    let contributions_value = future_value_annuity(input.contribution, rate, periods)?;
    let future_value = checked_sum("future_value", &[lump_sum_growth, contributions_value])?;
    let total_contributions = checked_product("contribution", &[input.contribution, periods])?;

    let output = FutureValueOutput {
        future_value,
        lump_sum_growth,
        contributions_value,
        total_contributions,
        total_interest: future_value
            .checked_sub(input.present_value)
            .and_then(|v| v.checked_sub(total_contributions))
            .ok_or_else(|| out_of_range("future_value"))?,
        effective_annual_rate: effective_annual_rate(rate, input.compounds_per_year)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Future value with periodic compounding",
        input,
        warnings,
        elapsed,
        output,
    ))
}
