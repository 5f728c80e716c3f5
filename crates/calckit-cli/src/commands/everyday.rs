use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calckit_core::everyday::budget::{self, BudgetInput};
use calckit_core::everyday::discount::{self, DiscountInput};
use calckit_core::everyday::percentage::{self, PercentageInput};

use crate::input::{self, required};

/// Arguments for percentage questions. Give one pair:
/// `--percent/--of`, `--part/--whole` or `--from/--to`.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PercentageArgs {
    /// Percent to take (with --of)
    #[arg(long, requires = "of")]
    pub percent: Option<Decimal>,

    /// Value the percent is taken of
    #[arg(long)]
    pub of: Option<Decimal>,

    /// Part of a whole (with --whole)
    #[arg(long, requires = "whole")]
    pub part: Option<Decimal>,

    #[arg(long)]
    pub whole: Option<Decimal>,

    /// Starting value of a change (with --to)
    #[arg(long, requires = "to")]
    pub from: Option<Decimal>,

    #[arg(long)]
    pub to: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a discounted price
#[derive(Args)]
pub struct DiscountArgs {
    /// Price before the discount
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Discount in percent
    #[arg(long)]
    pub discount: Option<Decimal>,

    /// Sales tax in percent, applied after the discount
    #[arg(long, default_value = "0")]
    pub tax: Decimal,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a monthly budget
#[derive(Args)]
pub struct BudgetArgs {
    /// Path to JSON or YAML file with income and expense lines
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_percentage(args: PercentageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pct_input: PercentageInput = input::load(args.input.as_deref(), || {
        match (args.percent, args.of, args.part, args.whole, args.from, args.to) {
            (Some(percent), Some(value), None, None, None, None) => {
                Ok(PercentageInput::PercentOf { percent, value })
            }
            (None, None, Some(part), Some(whole), None, None) => {
                Ok(PercentageInput::WhatPercent { part, whole })
            }
            (None, None, None, None, Some(from), Some(to)) => {
                Ok(PercentageInput::PercentChange { from, to })
            }
            _ => Err("Give exactly one of --percent/--of, --part/--whole or --from/--to".into()),
        }
    })?;
    let result = percentage::calculate_percentage(&pct_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_discount(args: DiscountArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let discount_input: DiscountInput = input::load(args.input.as_deref(), || {
        Ok(DiscountInput {
            original_price: required(args.price, "price")?,
            discount_percent: required(args.discount, "discount")?,
            tax_percent: args.tax,
        })
    })?;
    let result = discount::calculate_discount(&discount_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_budget(args: BudgetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let budget_input: BudgetInput = input::load(args.input.as_deref(), || {
        Err("Budget requires --input <file.json|file.yaml> or JSON on stdin".into())
    })?;
    let result = budget::calculate_budget(&budget_input)?;
    Ok(serde_json::to_value(result)?)
}
