use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calckit_core::real_estate::equity::{self, EquityProjectionInput};
use calckit_core::real_estate::rental::{self, RentalPropertyInput};

use crate::input::{self, required};

/// Arguments for rental property analysis
#[derive(Args)]
pub struct RentalPropertyArgs {
    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment in percent of price
    #[arg(long, default_value = "25")]
    pub down_percent: Decimal,

    /// Closing costs paid in cash
    #[arg(long, default_value = "0")]
    pub closing_costs: Decimal,

    /// Mortgage rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Mortgage term in years
    #[arg(long, default_value = "30")]
    pub years: u32,

    /// Monthly rent
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Other monthly income (parking, laundry)
    #[arg(long, default_value = "0")]
    pub other_income: Decimal,

    /// Vacancy allowance in percent
    #[arg(long, default_value = "5")]
    pub vacancy: Decimal,

    /// Annual property tax
    #[arg(long, default_value = "0")]
    pub property_tax: Decimal,

    /// Annual insurance
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Other fixed monthly operating expenses
    #[arg(long, default_value = "0")]
    pub expenses: Decimal,

    /// Management fee in percent of collected income
    #[arg(long, default_value = "0")]
    pub management: Decimal,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a home equity projection
#[derive(Args)]
pub struct RealEstateArgs {
    /// Current home value
    #[arg(long)]
    pub value: Option<Decimal>,

    /// Down payment as an amount
    #[arg(long, conflicts_with = "down_percent")]
    pub down_payment: Option<Decimal>,

    /// Down payment in percent of value
    #[arg(long)]
    pub down_percent: Option<Decimal>,

    /// Mortgage rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Mortgage term in years
    #[arg(long, default_value = "30")]
    pub years: u32,

    /// Annual property tax
    #[arg(long, default_value = "0")]
    pub property_tax: Decimal,

    /// Annual insurance
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Annual appreciation in percent
    #[arg(long, default_value = "2")]
    pub appreciation: Decimal,

    /// Years to project
    #[arg(long, default_value = "10")]
    pub horizon: u32,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rental_property(args: RentalPropertyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rental_input: RentalPropertyInput = input::load(args.input.as_deref(), || {
        Ok(RentalPropertyInput {
            purchase_price: required(args.price, "price")?,
            down_payment_percent: args.down_percent,
            closing_costs: args.closing_costs,
            annual_rate_percent: required(args.rate, "rate")?,
            term_years: args.years,
            monthly_rent: required(args.rent, "rent")?,
            other_monthly_income: args.other_income,
            vacancy_percent: args.vacancy,
            property_tax_annual: args.property_tax,
            insurance_annual: args.insurance,
            monthly_operating_expenses: args.expenses,
            management_percent: args.management,
        })
    })?;
    let result = rental::analyze_rental_property(&rental_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_real_estate(args: RealEstateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let equity_input: EquityProjectionInput = input::load(args.input.as_deref(), || {
        Ok(EquityProjectionInput {
            home_value: required(args.value, "value")?,
            down_payment: args.down_payment,
            down_payment_percent: args.down_percent,
            annual_rate_percent: required(args.rate, "rate")?,
            term_years: args.years,
            property_tax_annual: args.property_tax,
            insurance_annual: args.insurance,
            appreciation_percent: args.appreciation,
            projection_years: args.horizon,
        })
    })?;
    let result = equity::project_equity(&equity_input)?;
    Ok(serde_json::to_value(result)?)
}
