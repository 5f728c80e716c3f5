use clap::Args;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use calckit_core::units::mass::MassUnit;
use calckit_core::units::speed::{self, SpeedUnit, TravelInput};
use calckit_core::units::volume::{self, SolidInput, VolumeUnit};
use calckit_core::units::{calculate_conversion, ConversionInput, Unit};

use crate::input::{self, required};

/// Arguments shared by the mass, volume and speed converters
#[derive(Args)]
pub struct ConvertArgs {
    /// Quantity to convert
    #[arg(long)]
    pub value: Option<Decimal>,

    /// Source unit, by symbol (kg) or name (kilogram)
    #[arg(long)]
    pub from: Option<String>,

    /// Target unit, by symbol or name
    #[arg(long)]
    pub to: Option<String>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the volume of a solid
#[derive(Args)]
pub struct SolidVolumeArgs {
    /// cube, rectangular_prism, sphere, cylinder, cone or square_pyramid
    #[arg(long)]
    pub shape: Option<String>,

    #[arg(long)]
    pub side: Option<Decimal>,

    #[arg(long)]
    pub length: Option<Decimal>,

    #[arg(long)]
    pub width: Option<Decimal>,

    #[arg(long)]
    pub height: Option<Decimal>,

    #[arg(long)]
    pub radius: Option<Decimal>,

    #[arg(long)]
    pub base_edge: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for distance / time / speed; give any two
#[derive(Args)]
pub struct TravelArgs {
    /// Distance (e.g. km)
    #[arg(long)]
    pub distance: Option<Decimal>,

    /// Time (e.g. hours)
    #[arg(long)]
    pub time: Option<Decimal>,

    /// Speed (e.g. km/h)
    #[arg(long)]
    pub speed: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Match a unit by its symbol first, then by its serialized name.
fn parse_unit<U: Unit + DeserializeOwned>(text: &str) -> Result<U, Box<dyn std::error::Error>> {
    if let Some(unit) = U::ALL.iter().find(|u| u.symbol().eq_ignore_ascii_case(text)) {
        return Ok(*unit);
    }
    serde_json::from_value(Value::String(text.to_lowercase()))
        .map_err(|_| format!("Unknown {} unit '{}'", U::DIMENSION, text).into())
}

fn run_conversion<U: Unit + DeserializeOwned>(
    args: ConvertArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let conv_input: ConversionInput<U> = input::load(args.input.as_deref(), || {
        Ok(ConversionInput {
            value: required(args.value, "value")?,
            from: parse_unit(&required(args.from, "from")?)?,
            to: parse_unit(&required(args.to, "to")?)?,
        })
    })?;
    let result = calculate_conversion(&conv_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_mass(args: ConvertArgs) -> Result<Value, Box<dyn std::error::Error>> {
    run_conversion::<MassUnit>(args)
}

pub fn run_volume(args: ConvertArgs) -> Result<Value, Box<dyn std::error::Error>> {
    run_conversion::<VolumeUnit>(args)
}

pub fn run_speed(args: ConvertArgs) -> Result<Value, Box<dyn std::error::Error>> {
    run_conversion::<SpeedUnit>(args)
}

pub fn run_solid_volume(args: SolidVolumeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let solid: SolidInput = input::load(args.input.as_deref(), || {
        let shape = required(args.shape, "shape")?;
        let solid = match shape.to_lowercase().replace('-', "_").as_str() {
            "cube" => SolidInput::Cube {
                side: required(args.side, "side")?,
            },
            "rectangular_prism" | "box" => SolidInput::RectangularPrism {
                length: required(args.length, "length")?,
                width: required(args.width, "width")?,
                height: required(args.height, "height")?,
            },
            "sphere" => SolidInput::Sphere {
                radius: required(args.radius, "radius")?,
            },
            "cylinder" => SolidInput::Cylinder {
                radius: required(args.radius, "radius")?,
                height: required(args.height, "height")?,
            },
            "cone" => SolidInput::Cone {
                radius: required(args.radius, "radius")?,
                height: required(args.height, "height")?,
            },
            "square_pyramid" | "pyramid" => SolidInput::SquarePyramid {
                base_edge: required(args.base_edge, "base-edge")?,
                height: required(args.height, "height")?,
            },
            other => return Err(format!("Unknown shape '{other}'").into()),
        };
        Ok(solid)
    })?;
    let result = volume::calculate_solid_volume(&solid)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_travel(args: TravelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let travel_input: TravelInput = input::load(args.input.as_deref(), || {
        Ok(TravelInput {
            distance: args.distance,
            time: args.time,
            speed: args.speed,
        })
    })?;
    let result = speed::calculate_travel(&travel_input)?;
    Ok(serde_json::to_value(result)?)
}
