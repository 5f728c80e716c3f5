use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calckit_core::investment::compounding::{self, FutureValueInput, PresentValueInput};
use calckit_core::investment::roi::{self, RoiInput};

use crate::input::{self, required};

/// Arguments for present value
#[derive(Args)]
pub struct PresentValueArgs {
    /// Amount to be received in the future
    #[arg(long)]
    pub future_value: Option<Decimal>,

    /// Annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Years until the amount is received
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Compounding periods per year
    #[arg(long, default_value = "1")]
    pub compounding: u32,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for future value
#[derive(Args)]
pub struct FutureValueArgs {
    /// Amount invested today
    #[arg(long, default_value = "0")]
    pub present_value: Decimal,

    /// Annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Years of growth
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Compounding periods per year
    #[arg(long, default_value = "1")]
    pub compounding: u32,

    /// Deposit at the end of every compounding period
    #[arg(long, default_value = "0")]
    pub contribution: Decimal,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for return on investment
#[derive(Args)]
pub struct RoiArgs {
    /// Amount invested
    #[arg(long)]
    pub initial: Option<Decimal>,

    /// Value at the end of the holding period
    #[arg(long, alias = "final")]
    pub final_value: Option<Decimal>,

    /// Holding period in years, for the annualized return
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_present_value(args: PresentValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pv_input: PresentValueInput = input::load(args.input.as_deref(), || {
        Ok(PresentValueInput {
            future_value: required(args.future_value, "future-value")?,
            annual_rate_percent: required(args.rate, "rate")?,
            years: required(args.years, "years")?,
            compounds_per_year: args.compounding,
        })
    })?;
    let result = compounding::calculate_present_value(&pv_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_future_value(args: FutureValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fv_input: FutureValueInput = input::load(args.input.as_deref(), || {
        Ok(FutureValueInput {
            present_value: args.present_value,
            annual_rate_percent: required(args.rate, "rate")?,
            years: required(args.years, "years")?,
            compounds_per_year: args.compounding,
            contribution: args.contribution,
        })
    })?;
    let result = compounding::calculate_future_value(&fv_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_roi(args: RoiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let roi_input: RoiInput = input::load(args.input.as_deref(), || {
        Ok(RoiInput {
            initial_investment: required(args.initial, "initial")?,
            final_value: required(args.final_value, "final-value")?,
            years: args.years,
        })
    })?;
    let result = roi::calculate_roi(&roi_input)?;
    Ok(serde_json::to_value(result)?)
}
