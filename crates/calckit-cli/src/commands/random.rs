use clap::Args;
use serde_json::Value;

use calckit_core::random::generator::{self, RandomInput};

use crate::input;

/// Arguments for random integers
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RandomArgs {
    /// Smallest value (inclusive)
    #[arg(long, default_value = "1")]
    pub min: i64,

    /// Largest value (inclusive)
    #[arg(long, default_value = "100")]
    pub max: i64,

    /// How many numbers to draw
    #[arg(long, default_value = "1")]
    pub count: u32,

    /// Draw without replacement
    #[arg(long)]
    pub unique: bool,

    /// Sort the result ascending
    #[arg(long)]
    pub sorted: bool,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_random(args: RandomArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let random_input: RandomInput = input::load(args.input.as_deref(), || {
        Ok(RandomInput {
            min: args.min,
            max: args.max,
            count: args.count,
            allow_duplicates: !args.unique,
            sorted: args.sorted,
            seed: args.seed,
        })
    })?;
    let result = generator::generate_random(&random_input)?;
    Ok(serde_json::to_value(result)?)
}
