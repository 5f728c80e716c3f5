use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calckit_core::economics::gdp::{self, GdpInput};

use crate::input::{self, required};

/// Arguments for GDP by the expenditure approach
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct GdpArgs {
    /// Household consumption (C)
    #[arg(long)]
    pub consumption: Option<Decimal>,

    /// Gross private investment (I)
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Government spending (G)
    #[arg(long)]
    pub government: Option<Decimal>,

    /// Exports (X)
    #[arg(long, default_value = "0")]
    pub exports: Decimal,

    /// Imports (M)
    #[arg(long, default_value = "0")]
    pub imports: Decimal,

    /// Population, for GDP per capita
    #[arg(long)]
    pub population: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_gdp(args: GdpArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let gdp_input: GdpInput = input::load(args.input.as_deref(), || {
        Ok(GdpInput {
            consumption: required(args.consumption, "consumption")?,
            investment: required(args.investment, "investment")?,
            government_spending: required(args.government, "government")?,
            exports: args.exports,
            imports: args.imports,
            population: args.population,
        })
    })?;
    let result = gdp::calculate_gdp(&gdp_input)?;
    Ok(serde_json::to_value(result)?)
}
