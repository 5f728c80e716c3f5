use clap::Args;
use serde_json::Value;

use calckit_core::statistics::descriptive::{self, StatisticsInput};

use crate::input::{self, required};

/// Arguments for descriptive statistics
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct StatisticsArgs {
    /// Comma- or space-separated numbers ("3, 1.5, 4")
    #[arg(long)]
    pub values: Option<String>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_statistics(args: StatisticsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let stats_input: StatisticsInput = input::load(args.input.as_deref(), || {
        let text = required(args.values, "values")?;
        Ok(StatisticsInput {
            values: descriptive::parse_values(&text)?,
        })
    })?;
    let result = descriptive::calculate_statistics(&stats_input)?;
    Ok(serde_json::to_value(result)?)
}
