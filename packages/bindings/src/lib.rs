use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

use calckit_core::form::LoanForm;
use calckit_core::CalcResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Deserialize, compute, serialize.
fn run<I, O>(input_json: &str, calc: impl FnOnce(&I) -> CalcResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = calc(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::amortization::calculate_amortization)
}

/// Bare level payment; decimal arguments are passed as strings.
#[napi]
pub fn loan_payment(principal: String, annual_rate_percent: String, term_months: u32) -> NapiResult<String> {
    let principal: Decimal = principal.parse().map_err(to_napi_error)?;
    let rate: Decimal = annual_rate_percent.parse().map_err(to_napi_error)?;
    let payment = calckit_core::amortization::compute_payment(
        principal,
        calckit_core::amortization::periodic_rate(rate),
        term_months,
    );
    Ok(payment.to_string())
}

#[derive(serde::Deserialize)]
struct LoanFormRequest {
    #[serde(flatten)]
    form: LoanForm,
    #[serde(default)]
    include_schedule: bool,
}

/// Raw form text in, `{"status": "not_ready" | "ready" | "invalid", ...}` out.
#[napi]
pub fn evaluate_loan_form(input_json: String) -> NapiResult<String> {
    let request: LoanFormRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let calculation = request.form.evaluate(request.include_schedule);
    serde_json::to_string(&calculation).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn mortgage(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::loans::mortgage::calculate_mortgage)
}

#[napi]
pub fn auto_loan(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::loans::vehicle::calculate_auto_loan)
}

#[napi]
pub fn boat_loan(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::loans::vehicle::calculate_boat_loan)
}

#[napi]
pub fn personal_loan(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::loans::personal::calculate_personal_loan)
}

#[napi]
pub fn fha_loan(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::loans::fha::calculate_fha_loan)
}

#[napi]
pub fn refinance(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::loans::refinance::calculate_refinance)
}

#[napi]
pub fn lease(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::loans::lease::calculate_lease)
}

// ---------------------------------------------------------------------------
// Real estate
// ---------------------------------------------------------------------------

#[napi]
pub fn rental_property(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::real_estate::rental::analyze_rental_property)
}

#[napi]
pub fn equity_projection(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::real_estate::equity::project_equity)
}

// ---------------------------------------------------------------------------
// Investment
// ---------------------------------------------------------------------------

#[napi]
pub fn present_value(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::investment::compounding::calculate_present_value)
}

#[napi]
pub fn future_value(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::investment::compounding::calculate_future_value)
}

#[napi]
pub fn roi(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::investment::roi::calculate_roi)
}

// ---------------------------------------------------------------------------
// Everyday
// ---------------------------------------------------------------------------

#[napi]
pub fn percentage(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::everyday::percentage::calculate_percentage)
}

#[napi]
pub fn discount(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::everyday::discount::calculate_discount)
}

#[napi]
pub fn budget(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::everyday::budget::calculate_budget)
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

#[napi]
pub fn convert_mass(input_json: String) -> NapiResult<String> {
    run(
        &input_json,
        calckit_core::units::calculate_conversion::<calckit_core::units::mass::MassUnit>,
    )
}

#[napi]
pub fn convert_volume(input_json: String) -> NapiResult<String> {
    run(
        &input_json,
        calckit_core::units::calculate_conversion::<calckit_core::units::volume::VolumeUnit>,
    )
}

#[napi]
pub fn convert_speed(input_json: String) -> NapiResult<String> {
    run(
        &input_json,
        calckit_core::units::calculate_conversion::<calckit_core::units::speed::SpeedUnit>,
    )
}

#[napi]
pub fn solid_volume(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::units::volume::calculate_solid_volume)
}

#[napi]
pub fn travel(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::units::speed::calculate_travel)
}

// ---------------------------------------------------------------------------
// Network, economics, statistics, random
// ---------------------------------------------------------------------------

#[napi]
pub fn subnet(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::network::subnet::calculate_subnet)
}

#[napi]
pub fn gdp(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::economics::gdp::calculate_gdp)
}

#[napi]
pub fn descriptive_statistics(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::statistics::descriptive::calculate_statistics)
}

#[napi]
pub fn random_integers(input_json: String) -> NapiResult<String> {
    run(&input_json, calckit_core::random::generator::generate_random)
}
