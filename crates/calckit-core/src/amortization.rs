//! Fixed-rate amortizing loan engine.
//!
//! Every loan-shaped calculator (mortgage, auto, boat, personal, FHA,
//! refinance, rental property, equity projection) funnels through the
//! functions here. The engine keeps the historical "zero means not enough
//! input" contract: a zero principal or zero term yields a zero payment
//! rather than an error. Callers that need an explicit readiness signal use
//! [`crate::form`].

use chrono::{Months, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The three numbers that define a level-payment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount financed
    pub principal: Money,
    /// Nominal annual rate in percent (6.5 = 6.5%)
    pub annual_rate_percent: Percent,
    /// Number of monthly payments
    pub term_periods: u32,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Percent, term_periods: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_periods,
        }
    }

    /// Monthly rate derived from the nominal annual percentage.
    pub fn periodic_rate(&self) -> Rate {
        periodic_rate(self.annual_rate_percent)
    }
}

/// Aggregate cost of a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTotals {
    pub total_paid: Money,
    pub total_interest: Money,
}

/// One row of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodEntry {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub beginning_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub ending_balance: Money,
}

/// Twelve schedule rows rolled up; the final year may hold fewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub payments: u32,
    pub interest: Money,
    pub principal: Money,
    pub ending_balance: Money,
}

/// Payment, totals and (optionally) the period-by-period breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub periodic_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<PeriodEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_summary: Option<Vec<YearSummary>>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Monthly rate for a nominal annual percentage: `percent / 100 / 12`.
pub fn periodic_rate(annual_rate_percent: Percent) -> Rate {
    percent_to_rate(annual_rate_percent) / Decimal::from(MONTHS_PER_YEAR)
}

/// Level payment that fully repays `principal` over `term_periods`.
///
/// `P·r·(1+r)^n / ((1+r)^n − 1)`, straight-line `P / n` when `r == 0`,
/// and `0` when either the principal or the term is zero. A payment too
/// large for `Decimal` is also reported as `0`; use [`checked_payment`] to
/// tell the two apart.
pub fn compute_payment(principal: Money, periodic_rate: Rate, term_periods: u32) -> Money {
    checked_payment(principal, periodic_rate, term_periods).unwrap_or(Decimal::ZERO)
}

/// [`compute_payment`], returning `None` when the payment is out of range.
pub fn checked_payment(principal: Money, periodic_rate: Rate, term_periods: u32) -> Option<Money> {
    if principal.is_zero() || term_periods == 0 {
        return Some(Decimal::ZERO);
    }
    if periodic_rate.is_zero() {
        return principal.checked_div(Decimal::from(term_periods));
    }
    principal.checked_mul(annuity_factor(periodic_rate, term_periods))
}

/// Payment per unit of principal: `r·(1+r)^n / ((1+r)^n − 1)`.
fn annuity_factor(periodic_rate: Rate, term_periods: u32) -> Decimal {
    match (Decimal::ONE + periodic_rate).checked_powi(term_periods as i64) {
        Some(growth) => {
            let denominator = growth - Decimal::ONE;
            if denominator.is_zero() {
                // rate too small to register after compounding
                return Decimal::ONE / Decimal::from(term_periods);
            }
            growth
                .checked_div(denominator)
                .and_then(|g| g.checked_mul(periodic_rate))
                .unwrap_or(periodic_rate)
        }
        // (1+r)^n beyond Decimal range: the factor tends to r
        None => periodic_rate,
    }
}

/// Total paid over the life of the loan and the interest share of it.
///
/// Zero totals when `payment · n` is out of range; see [`checked_totals`].
pub fn compute_totals(principal: Money, payment: Money, term_periods: u32) -> LoanTotals {
    checked_totals(principal, payment, term_periods).unwrap_or(LoanTotals {
        total_paid: Decimal::ZERO,
        total_interest: Decimal::ZERO,
    })
}

pub fn checked_totals(principal: Money, payment: Money, term_periods: u32) -> Option<LoanTotals> {
    let total_paid = payment.checked_mul(Decimal::from(term_periods))?;
    Some(LoanTotals {
        total_paid,
        total_interest: total_paid.checked_sub(principal)?,
    })
}

/// Lazily evaluated schedule; nothing is computed until it is iterated.
pub fn compute_schedule(
    principal: Money,
    periodic_rate: Rate,
    payment: Money,
    term_periods: u32,
) -> AmortizationSchedule {
    AmortizationSchedule {
        principal,
        periodic_rate,
        payment,
        term_periods,
        first_payment_date: None,
    }
}

/// Outstanding balance after `periods` level payments.
///
/// Closed form `(1+r)^k·(P − A/r) + A/r`; when that leaves `Decimal` range
/// the schedule is rolled forward instead.
pub fn balance_after(principal: Money, periodic_rate: Rate, payment: Money, periods: u32) -> Money {
    let closed_form = if periodic_rate.is_zero() {
        payment
            .checked_mul(Decimal::from(periods))
            .and_then(|paid| principal.checked_sub(paid))
    } else {
        (Decimal::ONE + periodic_rate)
            .checked_powi(periods as i64)
            .and_then(|growth| {
                let payoff = payment.checked_div(periodic_rate)?;
                growth.checked_mul(principal.checked_sub(payoff)?)?.checked_add(payoff)
            })
    };
    closed_form.unwrap_or_else(|| {
        compute_schedule(principal, periodic_rate, payment, periods)
            .iter()
            .last()
            .map(|e| e.ending_balance)
            .unwrap_or(principal)
    })
}

/// Payment, totals and optionally the full schedule for a set of terms.
///
/// Unlike the bare engine functions this fails with `InvalidInput` when
/// the payment or totals fall outside `Decimal` range.
pub fn amortize(terms: &LoanTerms, include_schedule: bool) -> CalcResult<AmortizationResult> {
    amortize_from(terms, include_schedule, None)
}

pub(crate) fn amortize_from(
    terms: &LoanTerms,
    include_schedule: bool,
    first_payment_date: Option<NaiveDate>,
) -> CalcResult<AmortizationResult> {
    let rate = terms.periodic_rate();
    let payment = checked_payment(terms.principal, rate, terms.term_periods)
        .ok_or_else(|| out_of_range("principal"))?;
    let totals = checked_totals(terms.principal, payment, terms.term_periods)
        .ok_or_else(|| out_of_range("principal"))?;

    debug!(
        "amortize principal={} rate={} periods={} payment={}",
        terms.principal, rate, terms.term_periods, payment
    );

    let (schedule, yearly) = if include_schedule && !payment.is_zero() {
        let mut schedule = compute_schedule(terms.principal, rate, payment, terms.term_periods);
        if let Some(date) = first_payment_date {
            schedule = schedule.starting(date);
        }
        let yearly = yearly_summary(&schedule);
        (Some(schedule.to_vec()), Some(yearly))
    } else {
        (None, None)
    };

    Ok(AmortizationResult {
        periodic_payment: payment,
        total_paid: totals.total_paid,
        total_interest: totals.total_interest,
        schedule,
        yearly_summary: yearly,
    })
}

/// Roll a schedule up into calendar-agnostic loan years.
pub fn yearly_summary(schedule: &AmortizationSchedule) -> Vec<YearSummary> {
    let mut years: Vec<YearSummary> = Vec::new();
    for entry in schedule.iter() {
        let year = (entry.period - 1) / MONTHS_PER_YEAR + 1;
        match years.last_mut() {
            Some(current) if current.year == year => {
                current.payments += 1;
                current.interest += entry.interest;
                current.principal += entry.principal;
                current.ending_balance = entry.ending_balance;
            }
            _ => years.push(YearSummary {
                year,
                payments: 1,
                interest: entry.interest,
                principal: entry.principal,
                ending_balance: entry.ending_balance,
            }),
        }
    }
    years
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// A finite, restartable amortization schedule.
///
/// Each call to [`AmortizationSchedule::iter`] recomputes the rows from
/// period 1; the schedule itself holds only the loan parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationSchedule {
    principal: Money,
    periodic_rate: Rate,
    payment: Money,
    term_periods: u32,
    first_payment_date: Option<NaiveDate>,
}

impl AmortizationSchedule {
    /// Attach calendar dates, one month apart, beginning with `date`.
    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.first_payment_date = Some(date);
        self
    }

    pub fn len(&self) -> usize {
        self.term_periods as usize
    }

    pub fn is_empty(&self) -> bool {
        self.term_periods == 0
    }

    pub fn iter(&self) -> ScheduleIter<'_> {
        ScheduleIter {
            schedule: self,
            period: 0,
            balance: self.principal,
        }
    }

    pub fn to_vec(&self) -> Vec<PeriodEntry> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = PeriodEntry;
    type IntoIter = ScheduleIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleIter<'a> {
    schedule: &'a AmortizationSchedule,
    period: u32,
    balance: Money,
}

impl Iterator for ScheduleIter<'_> {
    type Item = PeriodEntry;

    fn next(&mut self) -> Option<PeriodEntry> {
        let s = self.schedule;
        if self.period >= s.term_periods {
            return None;
        }
        self.period += 1;

        let beginning_balance = self.balance;
        let interest = beginning_balance * s.periodic_rate;
        let principal = s.payment - interest;
        self.balance = beginning_balance - principal;

        let payment_date = s
            .first_payment_date
            .and_then(|d| d.checked_add_months(Months::new(self.period - 1)));

        Some(PeriodEntry {
            period: self.period,
            payment_date,
            beginning_balance,
            payment: s.payment,
            interest,
            principal,
            ending_balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.schedule.term_periods - self.period) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScheduleIter<'_> {}

// ---------------------------------------------------------------------------
// Standalone amortization calculator
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Input for a plain amortization table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    #[serde(default = "default_true")]
    pub include_schedule: bool,
    /// Date of the first payment; adds a date to every schedule row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub periodic_rate: Rate,
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<PeriodEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_summary: Option<Vec<YearSummary>>,
}

/// Validated, enveloped version of [`amortize`].
pub fn calculate_amortization(
    input: &AmortizationInput,
) -> CalcResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();

    require_positive("principal", input.principal)?;
    require_non_negative("annual_rate_percent", input.annual_rate_percent)?;
    if input.term_months == 0 {
        return Err(CalcError::invalid("term_months", "Term must be at least 1 month"));
    }

    let terms = LoanTerms::new(input.principal, input.annual_rate_percent, input.term_months);
    let result = amortize_from(&terms, input.include_schedule, input.first_payment_date)?;
    let payoff_date = payoff_date(input.first_payment_date, input.term_months)?;

    let output = AmortizationOutput {
        periodic_rate: terms.periodic_rate(),
        monthly_payment: result.periodic_payment,
        total_paid: result.total_paid,
        total_interest: result.total_interest,
        payoff_date,
        schedule: result.schedule,
        yearly_summary: result.yearly_summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "term_months": input.term_months,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Date of the last payment given the first one.
pub(crate) fn payoff_date(
    first_payment_date: Option<NaiveDate>,
    term_months: u32,
) -> CalcResult<Option<NaiveDate>> {
    match first_payment_date {
        None => Ok(None),
        Some(d) => d
            .checked_add_months(Months::new(term_months.saturating_sub(1)))
            .map(Some)
            .ok_or_else(|| CalcError::DateError(format!("Payoff date overflows from {d}"))),
    }
}
