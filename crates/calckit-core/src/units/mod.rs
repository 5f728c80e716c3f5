pub mod mass;
pub mod speed;
pub mod volume;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{out_of_range, with_metadata, ComputationOutput};
use crate::CalcResult;

/// A unit of some physical dimension, measured against a fixed base unit.
pub trait Unit: Copy + Serialize + 'static {
    /// Every unit of this dimension, in display order.
    const ALL: &'static [Self];
    /// Dimension name used in methodology strings.
    const DIMENSION: &'static str;

    /// How many base units one of this unit is.
    fn factor(self) -> Decimal;

    fn symbol(self) -> &'static str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionInput<U> {
    pub value: Decimal,
    pub from: U,
    pub to: U,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub value: Decimal,
    pub from: String,
    pub to: String,
    pub result: Decimal,
    /// The input value expressed in every unit of the dimension
    pub equivalents: BTreeMap<String, Decimal>,
}

/// `value` in `from` units, expressed in `to` units.
pub fn convert<U: Unit>(value: Decimal, from: U, to: U) -> CalcResult<Decimal> {
    value
        .checked_mul(from.factor())
        .and_then(|base| base.checked_div(to.factor()))
        .ok_or_else(|| out_of_range("value"))
}

/// Enveloped conversion shared by every unit calculator.
pub fn calculate_conversion<U: Unit>(
    input: &ConversionInput<U>,
) -> CalcResult<ComputationOutput<ConversionOutput>> {
    let start = Instant::now();

    if input.value < Decimal::ZERO {
        return Err(CalcError::invalid(
            "value",
            format!("A {} cannot be negative", U::DIMENSION),
        ));
    }

    let result = convert(input.value, input.from, input.to)?;
    let equivalents = U::ALL
        .iter()
        .map(|u| -> CalcResult<(String, Decimal)> {
            Ok((u.symbol().to_string(), convert(input.value, input.from, *u)?))
        })
        .collect::<CalcResult<BTreeMap<_, _>>>()?;

    let output = ConversionOutput {
        value: input.value,
        from: input.from.symbol().to_string(),
        to: input.to.symbol().to_string(),
        result,
        equivalents,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!("{} unit conversion", U::DIMENSION),
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}
