#![cfg(feature = "loans")]

use calckit_core::amortization::{compute_payment, periodic_rate};
use calckit_core::loans::{lease, mortgage, personal, refinance, vehicle};
use calckit_core::CalcError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

// ===========================================================================
// Mortgage
// ===========================================================================

#[test]
fn test_mortgage_from_json_defaults() {
    let input: mortgage::MortgageInput = serde_json::from_value(json!({
        "home_price": "250000",
        "down_payment_percent": "20",
        "annual_rate_percent": "6",
        "term_years": 30
    }))
    .unwrap();
    assert_eq!(input.pmi_rate_percent, dec!(0.5));

    let out = mortgage::calculate_mortgage(&input).unwrap().result;
    assert_eq!(out.loan_amount, dec!(200000));
    assert_eq!(out.monthly_principal_interest.round_dp(2), dec!(1199.10));
    assert_eq!(out.monthly_pmi, Decimal::ZERO);
    assert_eq!(out.total_cost, out.down_payment + out.total_principal_interest);
    assert!(out.schedule.is_none());
}

#[test]
fn test_mortgage_pmi_cancels() {
    let input = mortgage::MortgageInput {
        home_price: dec!(300000),
        down_payment: Some(dec!(15000)),
        down_payment_percent: None,
        annual_rate_percent: dec!(6.5),
        term_years: 30,
        property_tax_annual: dec!(3600),
        home_insurance_annual: dec!(1200),
        hoa_monthly: Decimal::ZERO,
        pmi_rate_percent: dec!(0.5),
        first_payment_date: NaiveDate::from_ymd_opt(2025, 1, 1),
        include_schedule: true,
    };
    let out = mortgage::calculate_mortgage(&input).unwrap().result;
    assert!(out.monthly_pmi > Decimal::ZERO);
    let cancel = out.pmi_cancel_period.unwrap();
    assert!(cancel > 1 && cancel < 360);
    assert_eq!(out.total_pmi, out.monthly_pmi * Decimal::from(cancel));
    assert_eq!(out.payoff_date, NaiveDate::from_ymd_opt(2054, 12, 1));
}

// ===========================================================================
// Vehicle and personal
// ===========================================================================

#[test]
fn test_auto_and_boat_share_formula() {
    let input = vehicle::VehicleLoanInput {
        price: dec!(32000),
        down_payment: dec!(4000),
        trade_in_value: dec!(3000),
        sales_tax_percent: dec!(7),
        fees: dec!(500),
        annual_rate_percent: dec!(5.9),
        term_months: 60,
        include_schedule: false,
    };
    let auto = vehicle::calculate_auto_loan(&input).unwrap();
    let boat = vehicle::calculate_boat_loan(&input).unwrap();
    assert_eq!(auto.result.monthly_payment, boat.result.monthly_payment);
    assert_ne!(auto.methodology, boat.methodology);
    // (32000 - 3000) * 7% tax
    assert_eq!(auto.result.sales_tax, dec!(2030));
    assert_eq!(auto.result.amount_financed, dec!(27530));
}

#[test]
fn test_personal_loan_matches_engine() {
    let input = personal::PersonalLoanInput {
        amount: dec!(10000),
        annual_rate_percent: dec!(5),
        term_months: 60,
        origination_fee_percent: Decimal::ZERO,
        include_schedule: true,
    };
    let out = personal::calculate_personal_loan(&input).unwrap().result;
    assert_eq!(
        out.monthly_payment,
        compute_payment(dec!(10000), periodic_rate(dec!(5)), 60)
    );
    assert!((out.effective_apr_percent - dec!(5)).abs() < dec!(0.001));
    let schedule = out.schedule.unwrap();
    assert!(schedule.last().unwrap().ending_balance.abs() < dec!(0.01));
}

#[test]
fn test_zero_term_is_an_error_not_a_zero_payment() {
    let input = personal::PersonalLoanInput {
        amount: dec!(10000),
        annual_rate_percent: dec!(5),
        term_months: 0,
        origination_fee_percent: Decimal::ZERO,
        include_schedule: false,
    };
    let err = personal::calculate_personal_loan(&input).unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput { .. }));
}

// ===========================================================================
// Refinance and lease
// ===========================================================================

#[test]
fn test_refinance_break_even() {
    let input = refinance::RefinanceInput {
        current_balance: dec!(250000),
        current_rate_percent: dec!(7),
        remaining_months: 300,
        new_rate_percent: dec!(5.5),
        new_term_months: 360,
        closing_costs: dec!(5000),
        roll_costs_into_loan: false,
    };
    let out = refinance::calculate_refinance(&input).unwrap().result;
    assert!(out.monthly_savings > Decimal::ZERO);
    let months = out.break_even_months.unwrap();
    let savings = out.monthly_savings * Decimal::from(months);
    assert!(savings >= dec!(5000));
    assert!(savings - out.monthly_savings < dec!(5000));
}

#[test]
fn test_lease_is_not_an_amortized_loan() {
    let input = lease::LeaseInput {
        price: dec!(36000),
        down_payment: Decimal::ZERO,
        residual_value: None,
        residual_percent: Some(dec!(50)),
        annual_rate_percent: dec!(6),
        term_months: 36,
        sales_tax_percent: Decimal::ZERO,
    };
    let out = lease::calculate_lease(&input).unwrap().result;
    assert_eq!(out.residual_value, dec!(18000));
    assert_eq!(out.base_monthly_payment, dec!(770));
    let loan_payment = compute_payment(dec!(18000), periodic_rate(dec!(6)), 36);
    assert_ne!(out.base_monthly_payment, loan_payment);
}
