use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::CalcError;
use crate::types::{checked_product, out_of_range, Money, Rate};
use crate::CalcResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_RATE_ITERATIONS: u32 = 100;

/// `(1 + rate)^periods`, allowing fractional periods.
pub fn compound_factor(rate: Rate, periods: Decimal) -> CalcResult<Decimal> {
    if rate <= dec!(-1) {
        return Err(CalcError::invalid(
            "rate",
            "Rate per period must be greater than -100%",
        ));
    }
    let base = Decimal::ONE + rate;
    let factor = if periods.fract().is_zero() {
        let n = periods
            .to_i64()
            .ok_or_else(|| CalcError::invalid("periods", "Too many periods"))?;
        base.checked_powi(n)
    } else {
        base.checked_powd(periods)
    };
    factor.ok_or_else(|| CalcError::invalid("periods", "Compound growth exceeds representable range"))
}

/// Single sum grown forward: `PV · (1+r)^n`.
pub fn future_value_lump(present_value: Money, rate: Rate, periods: Decimal) -> CalcResult<Money> {
    checked_product("present_value", &[present_value, compound_factor(rate, periods)?])
}

/// Single sum discounted back: `FV · (1+r)^−n`.
pub fn present_value_lump(future_value: Money, rate: Rate, periods: Decimal) -> CalcResult<Money> {
    let factor = compound_factor(rate, periods)?;
    if factor.is_zero() {
        return Err(CalcError::DivisionByZero {
            context: "present value discount factor".into(),
        });
    }
    future_value
        .checked_div(factor)
        .ok_or_else(|| out_of_range("future_value"))
}

/// Future value of an ordinary annuity (payments at period end).
pub fn future_value_annuity(payment: Money, rate: Rate, periods: Decimal) -> CalcResult<Money> {
    if rate.is_zero() {
        return checked_product("payment", &[payment, periods]);
    }
    let factor = compound_factor(rate, periods)?;
    (factor - Decimal::ONE)
        .checked_div(rate)
        .and_then(|annuity| payment.checked_mul(annuity))
        .ok_or_else(|| out_of_range("payment"))
}

/// Periodic rate at which `periods` level payments repay `present_value`.
///
/// Newton-Raphson on `−PV + Σ pmt/(1+r)^t`. Used to back out the effective
/// APR of a loan whose proceeds are reduced by upfront fees.
pub fn solve_periodic_rate(
    present_value: Money,
    payment: Money,
    periods: u32,
    guess: Rate,
) -> CalcResult<Rate> {
    if periods == 0 {
        return Err(CalcError::InsufficientData(
            "Rate solve requires at least one payment".into(),
        ));
    }
    if present_value <= Decimal::ZERO || payment <= Decimal::ZERO {
        return Err(CalcError::invalid(
            "present_value",
            "Present value and payment must be positive",
        ));
    }
    if payment.checked_mul(Decimal::from(periods)) == Some(present_value) {
        return Ok(Decimal::ZERO);
    }

    let mut rate = guess;

    for i in 0..MAX_RATE_ITERATIONS {
        let one_plus_r = Decimal::ONE + rate;
        let mut npv_val = -present_value;
        let mut dnpv = Decimal::ZERO;
        let mut discount = Decimal::ONE;

        for t in 1..=periods {
            let step = discount.checked_div(one_plus_r).and_then(|d| {
                let pv = payment.checked_mul(d)?;
                let slope = pv.checked_mul(Decimal::from(t))?.checked_div(one_plus_r)?;
                Some((d, npv_val.checked_add(pv)?, dnpv.checked_sub(slope)?))
            });
            (discount, npv_val, dnpv) = step.ok_or_else(|| out_of_range("payment"))?;
        }

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Ok(rate);
        }

        let Some(delta) = npv_val.checked_div(dnpv) else {
            return Err(CalcError::ConvergenceFailure {
                function: "periodic rate".into(),
                iterations: i,
                last_delta: npv_val,
            });
        };
        rate = rate.checked_sub(delta).unwrap_or(if delta.is_sign_positive() {
            dec!(-0.99)
        } else {
            dec!(100.0)
        });

        // Guard against divergence
        if rate < dec!(-0.99) {
            rate = dec!(-0.99);
        } else if rate > dec!(100.0) {
            rate = dec!(100.0);
        }
    }

    Err(CalcError::ConvergenceFailure {
        function: "periodic rate".into(),
        iterations: MAX_RATE_ITERATIONS,
        last_delta: Decimal::ZERO,
    })
}
