mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::economics::GdpArgs;
use commands::everyday::{BudgetArgs, DiscountArgs, PercentageArgs};
use commands::investment::{FutureValueArgs, PresentValueArgs, RoiArgs};
use commands::loans::{
    AmortizeArgs, FhaLoanArgs, LeaseArgs, MortgageArgs, PersonalLoanArgs, RefinanceArgs,
    VehicleLoanArgs,
};
use commands::network::SubnetArgs;
use commands::random::RandomArgs;
use commands::real_estate::{RealEstateArgs, RentalPropertyArgs};
use commands::statistics::StatisticsArgs;
use commands::units::{ConvertArgs, SolidVolumeArgs, TravelArgs};

/// Loan, investment, unit and everyday math calculators
#[derive(Parser)]
#[command(
    name = "calckit",
    version,
    about = "Loan, investment, unit and everyday math calculators",
    long_about = "Every calculator takes its inputs as flags, as a JSON or YAML file \
                  passed with --input, or as JSON piped on stdin. Money math is done \
                  in 128-bit decimal; rates are entered in percent (6.5 = 6.5%)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr (-vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Level-payment amortization schedule
    Amortize(AmortizeArgs),
    /// Fixed-rate mortgage with taxes, insurance, HOA and PMI
    Mortgage(MortgageArgs),
    /// Auto loan with trade-in, sales tax and fees
    AutoLoan(VehicleLoanArgs),
    /// Boat loan with trade-in, sales tax and fees
    BoatLoan(VehicleLoanArgs),
    /// Personal loan with origination fee and effective APR
    PersonalLoan(PersonalLoanArgs),
    /// FHA-insured mortgage with upfront and annual MIP
    FhaLoan(FhaLoanArgs),
    /// Compare the current loan against a refinance
    Refinance(RefinanceArgs),
    /// Vehicle lease payment
    Lease(LeaseArgs),
    /// Rental property cash flow, cap rate and DSCR
    RentalProperty(RentalPropertyArgs),
    /// Home equity build-up projection
    RealEstate(RealEstateArgs),
    /// Present value of a future amount
    PresentValue(PresentValueArgs),
    /// Future value of a lump sum and contributions
    FutureValue(FutureValueArgs),
    /// Return on investment, simple and annualized
    Roi(RoiArgs),
    /// Percent of, what percent, and percent change
    Percentage(PercentageArgs),
    /// Sale price after discount and tax
    Discount(DiscountArgs),
    /// Monthly budget against the 50/30/20 guideline
    Budget(BudgetArgs),
    /// Convert between mass units
    Mass(ConvertArgs),
    /// Convert between volume units
    Volume(ConvertArgs),
    /// Volume and surface area of a solid
    SolidVolume(SolidVolumeArgs),
    /// Convert between speed units
    Speed(ConvertArgs),
    /// Solve distance, time or speed from the other two
    Travel(TravelArgs),
    /// IPv4 subnet details
    Subnet(SubnetArgs),
    /// GDP by the expenditure approach
    Gdp(GdpArgs),
    /// Descriptive statistics of a list of numbers
    Statistics(StatisticsArgs),
    /// Random integers in a range
    Random(RandomArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::loans::run_amortize(args),
        Commands::Mortgage(args) => commands::loans::run_mortgage(args),
        Commands::AutoLoan(args) => commands::loans::run_auto_loan(args),
        Commands::BoatLoan(args) => commands::loans::run_boat_loan(args),
        Commands::PersonalLoan(args) => commands::loans::run_personal_loan(args),
        Commands::FhaLoan(args) => commands::loans::run_fha_loan(args),
        Commands::Refinance(args) => commands::loans::run_refinance(args),
        Commands::Lease(args) => commands::loans::run_lease(args),
        Commands::RentalProperty(args) => commands::real_estate::run_rental_property(args),
        Commands::RealEstate(args) => commands::real_estate::run_real_estate(args),
        Commands::PresentValue(args) => commands::investment::run_present_value(args),
        Commands::FutureValue(args) => commands::investment::run_future_value(args),
        Commands::Roi(args) => commands::investment::run_roi(args),
        Commands::Percentage(args) => commands::everyday::run_percentage(args),
        Commands::Discount(args) => commands::everyday::run_discount(args),
        Commands::Budget(args) => commands::everyday::run_budget(args),
        Commands::Mass(args) => commands::units::run_mass(args),
        Commands::Volume(args) => commands::units::run_volume(args),
        Commands::SolidVolume(args) => commands::units::run_solid_volume(args),
        Commands::Speed(args) => commands::units::run_speed(args),
        Commands::Travel(args) => commands::units::run_travel(args),
        Commands::Subnet(args) => commands::network::run_subnet(args),
        Commands::Gdp(args) => commands::economics::run_gdp(args),
        Commands::Statistics(args) => commands::statistics::run_statistics(args),
        Commands::Random(args) => commands::random::run_random(args),
        Commands::Version => {
            println!("calckit {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
