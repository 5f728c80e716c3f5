use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::Unit;
use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    Knots,
    FeetPerSecond,
}

impl Unit for SpeedUnit {
    const ALL: &'static [Self] = &[
        SpeedUnit::MetersPerSecond,
        SpeedUnit::KilometersPerHour,
        SpeedUnit::MilesPerHour,
        SpeedUnit::Knots,
        SpeedUnit::FeetPerSecond,
    ];
    const DIMENSION: &'static str = "speed";

    // Meters per hour, so every factor is a terminating decimal.
    fn factor(self) -> Decimal {
        match self {
            SpeedUnit::MetersPerSecond => dec!(3600),
            SpeedUnit::KilometersPerHour => dec!(1000),
            SpeedUnit::MilesPerHour => dec!(1609.344),
            SpeedUnit::Knots => dec!(1852),
            SpeedUnit::FeetPerSecond => dec!(1097.28),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            SpeedUnit::MetersPerSecond => "m/s",
            SpeedUnit::KilometersPerHour => "km/h",
            SpeedUnit::MilesPerHour => "mph",
            SpeedUnit::Knots => "kn",
            SpeedUnit::FeetPerSecond => "ft/s",
        }
    }
}

// ---------------------------------------------------------------------------
// Distance / time / speed
// ---------------------------------------------------------------------------

/// Any two of distance, time and speed; the third is solved for.
/// Units are whatever the caller uses consistently (e.g. km, hours, km/h).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelOutput {
    pub distance: Decimal,
    pub time: Decimal,
    pub speed: Decimal,
    /// Which of the three was derived
    pub solved_for: String,
    /// Time per unit distance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace: Option<Decimal>,
}

pub fn calculate_travel(input: &TravelInput) -> CalcResult<ComputationOutput<TravelOutput>> {
    let start = Instant::now();

    for (field, v) in [
        ("distance", input.distance),
        ("time", input.time),
        ("speed", input.speed),
    ] {
        if let Some(v) = v {
            require_non_negative(field, v)?;
        }
    }

    let (distance, time, speed, solved_for) = match (input.distance, input.time, input.speed) {
        (Some(d), Some(t), None) => {
            if t.is_zero() {
                return Err(CalcError::DivisionByZero {
                    context: "speed over zero time".into(),
                });
            }
            let speed = d.checked_div(t).ok_or_else(|| out_of_range("time"))?;
            (d, t, speed, "speed")
        }
        (Some(d), None, Some(s)) => {
            if s.is_zero() {
                return Err(CalcError::DivisionByZero {
                    context: "time at zero speed".into(),
                });
            }
            let time = d.checked_div(s).ok_or_else(|| out_of_range("speed"))?;
            (d, time, s, "time")
        }
        (None, Some(t), Some(s)) => (checked_product("speed", &[s, t])?, t, s, "distance"),
        _ => {
            return Err(CalcError::InsufficientData(
                "Provide exactly two of distance, time and speed".into(),
            ))
        }
    };

    let pace = if distance.is_zero() {
        None
    } else {
        Some(time.checked_div(distance).ok_or_else(|| out_of_range("distance"))?)
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Distance = speed × time",
        input,
        Vec::new(),
        elapsed,
        TravelOutput {
            distance,
            time,
            speed,
            solved_for: solved_for.into(),
            pace,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::convert;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kmh_to_ms() {
        assert_eq!(
            convert(dec!(36), SpeedUnit::KilometersPerHour, SpeedUnit::MetersPerSecond).unwrap(),
            dec!(10)
        );
    }

    #[test]
    fn test_mph_to_kmh() {
        assert_eq!(
            convert(dec!(60), SpeedUnit::MilesPerHour, SpeedUnit::KilometersPerHour).unwrap(),
            dec!(96.56064)
        );
    }

    #[test]
    fn test_solve_speed() {
        let input = TravelInput {
            distance: Some(dec!(150)),
            time: Some(dec!(2.5)),
            speed: None,
        };
        let out = calculate_travel(&input).unwrap().result;
        assert_eq!(out.speed, dec!(60));
        assert_eq!(out.solved_for, "speed");
    }

    #[test]
    fn test_solve_time_and_distance() {
        let t = calculate_travel(&TravelInput {
            distance: Some(dec!(100)),
            time: None,
            speed: Some(dec!(40)),
        })
        .unwrap()
        .result;
        assert_eq!(t.time, dec!(2.5));

        let d = calculate_travel(&TravelInput {
            distance: None,
            time: Some(dec!(3)),
            speed: Some(dec!(55)),
        })
        .unwrap()
        .result;
        assert_eq!(d.distance, dec!(165));
    }

    #[test]
    fn test_needs_exactly_two() {
        assert!(calculate_travel(&TravelInput::default()).is_err());
        assert!(calculate_travel(&TravelInput {
            distance: Some(dec!(1)),
            time: Some(dec!(1)),
            speed: Some(dec!(1)),
        })
        .is_err());
    }

    #[test]
    fn test_travel_beyond_range_is_an_error() {
        let input = TravelInput {
            distance: None,
            time: Some(Decimal::MAX),
            speed: Some(dec!(2)),
        };
        match calculate_travel(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "speed"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }

        let input = TravelInput {
            distance: Some(dec!(1000000000000)),
            time: Some(dec!(0.0000000000000000000001)),
            speed: None,
        };
        assert!(calculate_travel(&input).is_err());
    }
}
