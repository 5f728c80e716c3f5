//! Closed-end lease payment.
//!
//! Not an amortizing loan: the lessee pays for the depreciation between the
//! capitalized cost and the residual value, plus a finance charge on
//! `capitalized cost + residual` at the monthly rate.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::periodic_rate;
use crate::error::CalcError;
use crate::loans::validate_rate_and_term;
use crate::types::*;
use crate::CalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseInput {
    pub price: Money,
    /// Capitalized cost reduction
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_value: Option<Money>,
    /// Residual as a percent of price, in place of `residual_value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_percent: Option<Percent>,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    /// Applied to each monthly payment
    #[serde(default)]
    pub sales_tax_percent: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseOutput {
    pub capitalized_cost: Money,
    pub residual_value: Money,
    pub monthly_depreciation: Money,
    pub monthly_finance_charge: Money,
    pub base_monthly_payment: Money,
    pub monthly_tax: Money,
    pub total_monthly_payment: Money,
    /// Down payment plus every monthly payment
    pub total_lease_cost: Money,
}

/// Lease payment: `(cap − residual)/n + (cap + residual)·r`.
///
/// Returns the depreciation and finance parts; both are zero for a zero term.
pub fn lease_payment(
    capitalized_cost: Money,
    residual_value: Money,
    periodic_rate: Rate,
    term_months: u32,
) -> CalcResult<(Money, Money)> {
    if term_months == 0 {
        return Ok((Decimal::ZERO, Decimal::ZERO));
    }
    let depreciation = (capitalized_cost - residual_value) / Decimal::from(term_months);
    let finance = checked_product(
        "residual_value",
        &[checked_sum("residual_value", &[capitalized_cost, residual_value])?, periodic_rate],
    )?;
    Ok((depreciation, finance))
}

pub fn calculate_lease(input: &LeaseInput) -> CalcResult<ComputationOutput<LeaseOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("price", input.price)?;
    require_non_negative("down_payment", input.down_payment)?;
    require_non_negative("sales_tax_percent", input.sales_tax_percent)?;
    validate_rate_and_term(input.annual_rate_percent, input.term_months)?;

    let residual_value = match (input.residual_value, input.residual_percent) {
        (Some(_), Some(_)) => {
            return Err(CalcError::invalid(
                "residual_value",
                "Provide either residual_value or residual_percent, not both",
            ))
        }
        (Some(v), None) => v,
        (None, Some(p)) => checked_product("residual_percent", &[input.price, percent_to_rate(p)])?,
        (None, None) => {
            return Err(CalcError::invalid(
                "residual_value",
                "Provide residual_value or residual_percent",
            ))
        }
    };
    require_non_negative("residual_value", residual_value)?;

    let capitalized_cost = input.price - input.down_payment;
    if capitalized_cost <= Decimal::ZERO {
        return Err(CalcError::invalid(
            "down_payment",
            "Down payment must be less than the price",
        ));
    }
    if residual_value > capitalized_cost {
        warnings.push(
            "Residual value exceeds the capitalized cost; depreciation charge is negative".into(),
        );
    }

    let (monthly_depreciation, monthly_finance_charge) = lease_payment(
        capitalized_cost,
        residual_value,
        periodic_rate(input.annual_rate_percent),
        input.term_months,
    )?;
    let base_monthly_payment =
        checked_sum("residual_value", &[monthly_depreciation, monthly_finance_charge])?;
    let monthly_tax = checked_product(
        "sales_tax_percent",
        &[base_monthly_payment, percent_to_rate(input.sales_tax_percent)],
    )?;
    let total_monthly_payment = checked_sum("sales_tax_percent", &[base_monthly_payment, monthly_tax])?;
    let total_lease_cost = checked_sum(
        "total_lease_cost",
        &[
            input.down_payment,
            checked_product(
                "total_lease_cost",
                &[total_monthly_payment, Decimal::from(input.term_months)],
            )?,
        ],
    )?;

    debug!(
        "lease cap_cost={} residual={} payment={}",
        capitalized_cost, residual_value, total_monthly_payment
    );

    let output = LeaseOutput {
        capitalized_cost,
        residual_value,
        monthly_depreciation,
        monthly_finance_charge,
        base_monthly_payment,
        monthly_tax,
        total_monthly_payment,
        total_lease_cost,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Closed-end lease (depreciation + finance charge)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
