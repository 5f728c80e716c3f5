use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

/// The three questions a percentage calculator answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PercentageInput {
    /// What is `percent`% of `value`?
    PercentOf { percent: Percent, value: Decimal },
    /// `part` is what percent of `whole`?
    WhatPercent { part: Decimal, whole: Decimal },
    /// Percent change going from `from` to `to`.
    PercentChange { from: Decimal, to: Decimal },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentageOutput {
    pub answer: Decimal,
    /// The answer in words, e.g. "25% of 80 is 20"
    pub statement: String,
}

pub fn calculate_percentage(
    input: &PercentageInput,
) -> CalcResult<ComputationOutput<PercentageOutput>> {
    let start = Instant::now();

    let (answer, statement) = match input {
        PercentageInput::PercentOf { percent, value } => {
            let answer = checked_product("percent", &[*value, percent_to_rate(*percent)])?;
            (answer, format!("{percent}% of {value} is {}", answer.normalize()))
        }
        PercentageInput::WhatPercent { part, whole } => {
            if whole.is_zero() {
                return Err(CalcError::DivisionByZero {
                    context: "percentage of a zero whole".into(),
                });
            }
            let answer = part
                .checked_div(*whole)
                .and_then(|share| share.checked_mul(dec!(100)))
                .ok_or_else(|| out_of_range("part"))?;
            (
                answer,
                format!("{part} is {}% of {whole}", answer.round_dp(4).normalize()),
            )
        }
        PercentageInput::PercentChange { from, to } => {
            if from.is_zero() {
                return Err(CalcError::DivisionByZero {
                    context: "percent change from zero".into(),
                });
            }
            let answer = to
                .checked_sub(*from)
                .and_then(|change| change.checked_div(from.abs()))
                .and_then(|share| share.checked_mul(dec!(100)))
                .ok_or_else(|| out_of_range("to"))?;
            let direction = if answer < Decimal::ZERO {
                "decrease"
            } else {
                "increase"
            };
            (
                answer,
                format!(
                    "{from} to {to} is a {}% {direction}",
                    answer.abs().round_dp(4).normalize()
                ),
            )
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Percentage",
        input,
        Vec::new(),
        elapsed,
        PercentageOutput { answer, statement },
    ))
}
