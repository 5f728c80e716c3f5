use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calckit_core::amortization::{self, AmortizationInput};
use calckit_core::loans::fha::{self, FhaLoanInput};
use calckit_core::loans::lease::{self, LeaseInput};
use calckit_core::loans::mortgage::{self, MortgageInput};
use calckit_core::loans::personal::{self, PersonalLoanInput};
use calckit_core::loans::refinance::{self, RefinanceInput};
use calckit_core::loans::vehicle::{self, VehicleLoanInput};

use crate::input::{self, required};

/// Arguments for a plain amortization table
#[derive(Args)]
pub struct AmortizeArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate in percent (e.g. 6.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Number of monthly payments
    #[arg(long, alias = "months")]
    pub term_months: Option<u32>,

    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,

    /// Omit the period-by-period schedule
    #[arg(long)]
    pub no_schedule: bool,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a fixed-rate mortgage
#[derive(Args)]
pub struct MortgageArgs {
    /// Purchase price of the home
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment as an amount
    #[arg(long, conflicts_with = "down_percent")]
    pub down_payment: Option<Decimal>,

    /// Down payment as a percent of price
    #[arg(long)]
    pub down_percent: Option<Decimal>,

    /// Nominal annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub years: u32,

    /// Annual property tax
    #[arg(long, default_value = "0")]
    pub property_tax: Decimal,

    /// Annual homeowner's insurance
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Monthly HOA dues
    #[arg(long, default_value = "0")]
    pub hoa: Decimal,

    /// Annual PMI premium in percent of the loan
    #[arg(long, default_value = "0.5")]
    pub pmi_rate: Decimal,

    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,

    /// Include the amortization schedule
    #[arg(long)]
    pub schedule: bool,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for auto and boat loans
#[derive(Args)]
pub struct VehicleLoanArgs {
    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Cash down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Trade-in value credited against the price
    #[arg(long, default_value = "0")]
    pub trade_in: Decimal,

    /// Sales tax in percent
    #[arg(long, default_value = "0")]
    pub sales_tax: Decimal,

    /// Title, registration and dealer fees rolled into the loan
    #[arg(long, default_value = "0")]
    pub fees: Decimal,

    /// Nominal annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Number of monthly payments
    #[arg(long, alias = "months")]
    pub term_months: Option<u32>,

    /// Include the amortization schedule
    #[arg(long)]
    pub schedule: bool,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for an unsecured personal loan
#[derive(Args)]
pub struct PersonalLoanArgs {
    /// Amount borrowed
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Nominal annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Number of monthly payments
    #[arg(long, alias = "months")]
    pub term_months: Option<u32>,

    /// Origination fee in percent, deducted from proceeds
    #[arg(long, default_value = "0")]
    pub origination_fee: Decimal,

    /// Include the amortization schedule
    #[arg(long)]
    pub schedule: bool,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for an FHA-insured mortgage
#[derive(Args)]
pub struct FhaLoanArgs {
    /// Purchase price of the home
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment in percent (FHA minimum 3.5)
    #[arg(long, default_value = "3.5")]
    pub down_percent: Decimal,

    /// Nominal annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub years: u32,

    /// Upfront mortgage insurance premium in percent
    #[arg(long, default_value = "1.75")]
    pub upfront_mip: Decimal,

    /// Annual mortgage insurance premium in percent
    #[arg(long, default_value = "0.55")]
    pub annual_mip: Decimal,

    /// Annual property tax
    #[arg(long, default_value = "0")]
    pub property_tax: Decimal,

    /// Annual homeowner's insurance
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Include the amortization schedule
    #[arg(long)]
    pub schedule: bool,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a refinance comparison
#[derive(Args)]
pub struct RefinanceArgs {
    /// Outstanding balance on the current loan
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Current annual rate in percent
    #[arg(long)]
    pub current_rate: Option<Decimal>,

    /// Months left on the current loan
    #[arg(long)]
    pub remaining_months: Option<u32>,

    /// New annual rate in percent
    #[arg(long)]
    pub new_rate: Option<Decimal>,

    /// Term of the new loan in months
    #[arg(long, default_value = "360")]
    pub new_term_months: u32,

    /// Closing costs of the new loan
    #[arg(long, default_value = "0")]
    pub closing_costs: Decimal,

    /// Finance the closing costs instead of paying them upfront
    #[arg(long)]
    pub roll_costs: bool,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a vehicle lease
#[derive(Args)]
pub struct LeaseArgs {
    /// Negotiated price of the vehicle
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Capitalized cost reduction
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Residual value at lease end
    #[arg(long, conflicts_with = "residual_percent")]
    pub residual: Option<Decimal>,

    /// Residual value in percent of price
    #[arg(long)]
    pub residual_percent: Option<Decimal>,

    /// Annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Lease term in months
    #[arg(long, default_value = "36")]
    pub term_months: u32,

    /// Sales tax on the monthly payment in percent
    #[arg(long, default_value = "0")]
    pub sales_tax: Decimal,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input: AmortizationInput = input::load(args.input.as_deref(), || {
        Ok(AmortizationInput {
            principal: required(args.principal, "principal")?,
            annual_rate_percent: required(args.rate, "rate")?,
            term_months: required(args.term_months, "term-months")?,
            include_schedule: !args.no_schedule,
            first_payment_date: args.first_payment_date,
        })
    })?;
    let result = amortization::calculate_amortization(&amort_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = input::load(args.input.as_deref(), || {
        Ok(MortgageInput {
            home_price: required(args.price, "price")?,
            down_payment: args.down_payment,
            down_payment_percent: args.down_percent,
            annual_rate_percent: required(args.rate, "rate")?,
            term_years: args.years,
            property_tax_annual: args.property_tax,
            home_insurance_annual: args.insurance,
            hoa_monthly: args.hoa,
            pmi_rate_percent: args.pmi_rate,
            first_payment_date: args.first_payment_date,
            include_schedule: args.schedule,
        })
    })?;
    let result = mortgage::calculate_mortgage(&mortgage_input)?;
    Ok(serde_json::to_value(result)?)
}

fn vehicle_input(args: VehicleLoanArgs) -> Result<VehicleLoanInput, Box<dyn std::error::Error>> {
    input::load(args.input.as_deref(), || {
        Ok(VehicleLoanInput {
            price: required(args.price, "price")?,
            down_payment: args.down_payment,
            trade_in_value: args.trade_in,
            sales_tax_percent: args.sales_tax,
            fees: args.fees,
            annual_rate_percent: required(args.rate, "rate")?,
            term_months: required(args.term_months, "term-months")?,
            include_schedule: args.schedule,
        })
    })
}

pub fn run_auto_loan(args: VehicleLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = vehicle::calculate_auto_loan(&vehicle_input(args)?)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_boat_loan(args: VehicleLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = vehicle::calculate_boat_loan(&vehicle_input(args)?)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_personal_loan(args: PersonalLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: PersonalLoanInput = input::load(args.input.as_deref(), || {
        Ok(PersonalLoanInput {
            amount: required(args.amount, "amount")?,
            annual_rate_percent: required(args.rate, "rate")?,
            term_months: required(args.term_months, "term-months")?,
            origination_fee_percent: args.origination_fee,
            include_schedule: args.schedule,
        })
    })?;
    let result = personal::calculate_personal_loan(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fha_loan(args: FhaLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fha_input: FhaLoanInput = input::load(args.input.as_deref(), || {
        Ok(FhaLoanInput {
            home_price: required(args.price, "price")?,
            down_payment_percent: args.down_percent,
            annual_rate_percent: required(args.rate, "rate")?,
            term_years: args.years,
            upfront_mip_percent: args.upfront_mip,
            annual_mip_percent: args.annual_mip,
            property_tax_annual: args.property_tax,
            home_insurance_annual: args.insurance,
            include_schedule: args.schedule,
        })
    })?;
    let result = fha::calculate_fha_loan(&fha_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_refinance(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let refi_input: RefinanceInput = input::load(args.input.as_deref(), || {
        Ok(RefinanceInput {
            current_balance: required(args.balance, "balance")?,
            current_rate_percent: required(args.current_rate, "current-rate")?,
            remaining_months: required(args.remaining_months, "remaining-months")?,
            new_rate_percent: required(args.new_rate, "new-rate")?,
            new_term_months: args.new_term_months,
            closing_costs: args.closing_costs,
            roll_costs_into_loan: args.roll_costs,
        })
    })?;
    let result = refinance::calculate_refinance(&refi_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_lease(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let lease_input: LeaseInput = input::load(args.input.as_deref(), || {
        Ok(LeaseInput {
            price: required(args.price, "price")?,
            down_payment: args.down_payment,
            residual_value: args.residual,
            residual_percent: args.residual_percent,
            annual_rate_percent: required(args.rate, "rate")?,
            term_months: args.term_months,
            sales_tax_percent: args.sales_tax,
        })
    })?;
    let result = lease::calculate_lease(&lease_input)?;
    Ok(serde_json::to_value(result)?)
}
