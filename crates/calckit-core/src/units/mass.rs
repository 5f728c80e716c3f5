use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassUnit {
    Milligram,
    Gram,
    Kilogram,
    /// Metric tonne
    Tonne,
    Ounce,
    Pound,
    Stone,
    ShortTon,
    LongTon,
}

impl Unit for MassUnit {
    const ALL: &'static [Self] = &[
        MassUnit::Milligram,
        MassUnit::Gram,
        MassUnit::Kilogram,
        MassUnit::Tonne,
        MassUnit::Ounce,
        MassUnit::Pound,
        MassUnit::Stone,
        MassUnit::ShortTon,
        MassUnit::LongTon,
    ];
    const DIMENSION: &'static str = "mass";

    /// Kilograms per unit. Imperial factors are exact under the 1959
    /// international pound.
    fn factor(self) -> Decimal {
        match self {
            MassUnit::Milligram => dec!(0.000001),
            MassUnit::Gram => dec!(0.001),
            MassUnit::Kilogram => Decimal::ONE,
            MassUnit::Tonne => dec!(1000),
            MassUnit::Ounce => dec!(0.028349523125),
            MassUnit::Pound => dec!(0.45359237),
            MassUnit::Stone => dec!(6.35029318),
            MassUnit::ShortTon => dec!(907.18474),
            MassUnit::LongTon => dec!(1016.0469088),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            MassUnit::Milligram => "mg",
            MassUnit::Gram => "g",
            MassUnit::Kilogram => "kg",
            MassUnit::Tonne => "t",
            MassUnit::Ounce => "oz",
            MassUnit::Pound => "lb",
            MassUnit::Stone => "st",
            MassUnit::ShortTon => "short_ton",
            MassUnit::LongTon => "long_ton",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{calculate_conversion, convert, ConversionInput};
    use rust_decimal_macros::dec;

    #[test]
    fn test_pounds_to_kilograms() {
        assert_eq!(
            convert(dec!(10), MassUnit::Pound, MassUnit::Kilogram).unwrap(),
            dec!(4.5359237)
        );
    }

    #[test]
    fn test_sixteen_ounces_is_a_pound() {
        assert_eq!(convert(dec!(16), MassUnit::Ounce, MassUnit::Pound).unwrap(), dec!(1));
    }

    #[test]
    fn test_stone_is_fourteen_pounds() {
        assert_eq!(convert(Decimal::ONE, MassUnit::Stone, MassUnit::Pound).unwrap(), dec!(14));
    }

    #[test]
    fn test_equivalents_cover_every_unit() {
        let input = ConversionInput {
            value: dec!(2000),
            from: MassUnit::Pound,
            to: MassUnit::ShortTon,
        };
        let out = calculate_conversion(&input).unwrap().result;
        assert_eq!(out.result, dec!(1));
        assert_eq!(out.equivalents.len(), MassUnit::ALL.len());
        assert_eq!(out.equivalents["lb"], dec!(2000));
    }

    #[test]
    fn test_negative_mass_rejected() {
        let input = ConversionInput {
            value: dec!(-1),
            from: MassUnit::Gram,
            to: MassUnit::Kilogram,
        };
        assert!(calculate_conversion(&input).is_err());
    }

    #[test]
    fn test_mass_beyond_range_rejected() {
        // Fine in tonnes, too large once spread across the milligram equivalent.
        let input = ConversionInput {
            value: dec!(1000000000000000000000000),
            from: MassUnit::LongTon,
            to: MassUnit::Tonne,
        };
        assert!(calculate_conversion(&input).is_err());
        assert!(convert(dec!(1000000000000000000000000), MassUnit::LongTon, MassUnit::Tonne).is_ok());
    }
}
