use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::Unit;
use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Unit conversion
// ---------------------------------------------------------------------------

/// Liquid and solid volume units. Kitchen measures are US customary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeUnit {
    Milliliter,
    Liter,
    CubicMeter,
    CubicCentimeter,
    CubicInch,
    CubicFoot,
    Teaspoon,
    Tablespoon,
    FluidOunce,
    Cup,
    Pint,
    Quart,
    Gallon,
}

impl Unit for VolumeUnit {
    const ALL: &'static [Self] = &[
        VolumeUnit::Milliliter,
        VolumeUnit::Liter,
        VolumeUnit::CubicMeter,
        VolumeUnit::CubicCentimeter,
        VolumeUnit::CubicInch,
        VolumeUnit::CubicFoot,
        VolumeUnit::Teaspoon,
        VolumeUnit::Tablespoon,
        VolumeUnit::FluidOunce,
        VolumeUnit::Cup,
        VolumeUnit::Pint,
        VolumeUnit::Quart,
        VolumeUnit::Gallon,
    ];
    const DIMENSION: &'static str = "volume";

    /// Liters per unit, all derived from the exact 231 in³ gallon.
    fn factor(self) -> Decimal {
        match self {
            VolumeUnit::Milliliter | VolumeUnit::CubicCentimeter => dec!(0.001),
            VolumeUnit::Liter => Decimal::ONE,
            VolumeUnit::CubicMeter => dec!(1000),
            VolumeUnit::CubicInch => dec!(0.016387064),
            VolumeUnit::CubicFoot => dec!(28.316846592),
            VolumeUnit::Teaspoon => dec!(0.00492892159375),
            VolumeUnit::Tablespoon => dec!(0.01478676478125),
            VolumeUnit::FluidOunce => dec!(0.0295735295625),
            VolumeUnit::Cup => dec!(0.2365882365),
            VolumeUnit::Pint => dec!(0.473176473),
            VolumeUnit::Quart => dec!(0.946352946),
            VolumeUnit::Gallon => dec!(3.785411784),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            VolumeUnit::Milliliter => "ml",
            VolumeUnit::Liter => "l",
            VolumeUnit::CubicMeter => "m3",
            VolumeUnit::CubicCentimeter => "cm3",
            VolumeUnit::CubicInch => "in3",
            VolumeUnit::CubicFoot => "ft3",
            VolumeUnit::Teaspoon => "tsp",
            VolumeUnit::Tablespoon => "tbsp",
            VolumeUnit::FluidOunce => "fl_oz",
            VolumeUnit::Cup => "cup",
            VolumeUnit::Pint => "pt",
            VolumeUnit::Quart => "qt",
            VolumeUnit::Gallon => "gal",
        }
    }
}

// ---------------------------------------------------------------------------
// Solid shapes
// ---------------------------------------------------------------------------

/// A solid and its dimensions, all in the same length unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SolidInput {
    Cube { side: Decimal },
    RectangularPrism { length: Decimal, width: Decimal, height: Decimal },
    Sphere { radius: Decimal },
    Cylinder { radius: Decimal, height: Decimal },
    Cone { radius: Decimal, height: Decimal },
    SquarePyramid { base_edge: Decimal, height: Decimal },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolidOutput {
    /// Cubic units of the input length
    pub volume: Decimal,
    /// Square units of the input length
    pub surface_area: Decimal,
}

fn slant(a: Decimal, b: Decimal) -> CalcResult<Decimal> {
    let squares = checked_sum(
        "height",
        &[checked_product("height", &[a, a])?, checked_product("height", &[b, b])?],
    )?;
    squares
        .sqrt()
        .ok_or_else(|| CalcError::invalid("height", "Slant height undefined"))
}

/// Volume and total surface area of a regular solid.
pub fn calculate_solid_volume(input: &SolidInput) -> CalcResult<ComputationOutput<SolidOutput>> {
    let start = Instant::now();
    let pi = Decimal::PI;
    let three = dec!(3);
    let two = dec!(2);

    let (methodology, volume, surface_area) = match *input {
        SolidInput::Cube { side } => {
            require_non_negative("side", side)?;
            (
                "Cube: s³",
                checked_product("side", &[side, side, side])?,
                checked_product("side", &[dec!(6), side, side])?,
            )
        }
        SolidInput::RectangularPrism { length, width, height } => {
            require_non_negative("length", length)?;
            require_non_negative("width", width)?;
            require_non_negative("height", height)?;
            let faces = checked_sum(
                "length",
                &[
                    checked_product("length", &[length, width])?,
                    checked_product("length", &[length, height])?,
                    checked_product("width", &[width, height])?,
                ],
            )?;
            (
                "Rectangular prism: l·w·h",
                checked_product("length", &[length, width, height])?,
                checked_product("length", &[two, faces])?,
            )
        }
        SolidInput::Sphere { radius } => {
            require_non_negative("radius", radius)?;
            (
                "Sphere: 4/3·π·r³",
                checked_product("radius", &[dec!(4), pi, radius, radius, radius])? / three,
                checked_product("radius", &[dec!(4), pi, radius, radius])?,
            )
        }
        SolidInput::Cylinder { radius, height } => {
            require_non_negative("radius", radius)?;
            require_non_negative("height", height)?;
            let span = checked_sum("height", &[radius, height])?;
            (
                "Cylinder: π·r²·h",
                checked_product("radius", &[pi, radius, radius, height])?,
                checked_product("radius", &[two, pi, radius, span])?,
            )
        }
        SolidInput::Cone { radius, height } => {
            require_non_negative("radius", radius)?;
            require_non_negative("height", height)?;
            let l = slant(radius, height)?;
            let span = checked_sum("radius", &[radius, l])?;
            (
                "Cone: π·r²·h/3",
                checked_product("radius", &[pi, radius, radius, height])? / three,
                checked_product("radius", &[pi, radius, span])?,
            )
        }
        SolidInput::SquarePyramid { base_edge, height } => {
            require_non_negative("base_edge", base_edge)?;
            require_non_negative("height", height)?;
            let l = slant(base_edge / two, height)?;
            let base = checked_product("base_edge", &[base_edge, base_edge])?;
            (
                "Square pyramid: b²·h/3",
                checked_product("base_edge", &[base, height])? / three,
                checked_sum(
                    "base_edge",
                    &[base, checked_product("base_edge", &[two, base_edge, l])?],
                )?,
            )
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        input,
        Vec::new(),
        elapsed,
        SolidOutput {
            volume,
            surface_area,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::convert;
    use rust_decimal_macros::dec;

    fn close(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.0001)
    }

    #[test]
    fn test_gallon_is_four_quarts() {
        assert_eq!(convert(Decimal::ONE, VolumeUnit::Gallon, VolumeUnit::Quart).unwrap(), dec!(4));
    }

    #[test]
    fn test_cup_is_sixteen_tablespoons() {
        assert_eq!(convert(Decimal::ONE, VolumeUnit::Cup, VolumeUnit::Tablespoon).unwrap(), dec!(16));
    }

    #[test]
    fn test_cubic_meter_to_liters() {
        assert_eq!(
            convert(dec!(2.5), VolumeUnit::CubicMeter, VolumeUnit::Liter).unwrap(),
            dec!(2500)
        );
    }

    #[test]
    fn test_cube() {
        let out = calculate_solid_volume(&SolidInput::Cube { side: dec!(3) })
            .unwrap()
            .result;
        assert_eq!(out.volume, dec!(27));
        assert_eq!(out.surface_area, dec!(54));
    }

    #[test]
    fn test_sphere() {
        let out = calculate_solid_volume(&SolidInput::Sphere { radius: dec!(2) })
            .unwrap()
            .result;
        // 4/3·π·8
        assert!(close(out.volume, dec!(33.5103)), "got {}", out.volume);
        assert!(close(out.surface_area, dec!(50.2655)));
    }

    #[test]
    fn test_cone_slant_surface() {
        let out = calculate_solid_volume(&SolidInput::Cone {
            radius: dec!(3),
            height: dec!(4),
        })
        .unwrap()
        .result;
        // slant 5, area π·3·(3+5) = 24π
        assert!(close(out.volume, dec!(37.6991)));
        assert!(close(out.surface_area, dec!(75.3982)));
    }

    #[test]
    fn test_square_pyramid() {
        let out = calculate_solid_volume(&SolidInput::SquarePyramid {
            base_edge: dec!(6),
            height: dec!(4),
        })
        .unwrap()
        .result;
        assert_eq!(out.volume, dec!(48));
        // 36 + 2·6·5
        assert!(close(out.surface_area, dec!(96)));
    }

    #[test]
    fn test_negative_dimension_rejected() {
        assert!(calculate_solid_volume(&SolidInput::Cylinder {
            radius: dec!(-1),
            height: dec!(2),
        })
        .is_err());
    }

    #[test]
    fn test_solid_beyond_range_is_an_error() {
        match calculate_solid_volume(&SolidInput::Sphere {
            radius: dec!(10000000000),
        }) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "radius"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(calculate_solid_volume(&SolidInput::SquarePyramid {
            base_edge: Decimal::MAX,
            height: dec!(1),
        })
        .is_err());
    }

    #[test]
    fn test_conversion_beyond_range_is_an_error() {
        match convert(Decimal::MAX, VolumeUnit::CubicMeter, VolumeUnit::Milliliter) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "value"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
