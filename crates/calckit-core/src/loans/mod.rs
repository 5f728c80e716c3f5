pub mod fha;
pub mod lease;
pub mod mortgage;
pub mod personal;
pub mod refinance;
pub mod vehicle;

use rust_decimal::Decimal;

use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

/// Resolve a down payment given either as an amount or as a percentage of
/// the price. Supplying neither means no down payment.
pub(crate) fn resolve_down_payment(
    price: Money,
    amount: Option<Money>,
    percent: Option<Percent>,
) -> CalcResult<Money> {
    let down = match (amount, percent) {
        (Some(_), Some(_)) => {
            return Err(CalcError::invalid(
                "down_payment",
                "Provide either down_payment or down_payment_percent, not both",
            ))
        }
        (Some(a), None) => a,
        (None, Some(p)) => checked_product("down_payment_percent", &[price, percent_to_rate(p)])?,
        (None, None) => Decimal::ZERO,
    };

    require_non_negative("down_payment", down)?;
    if down >= price {
        return Err(CalcError::invalid(
            "down_payment",
            "Down payment must be less than the price",
        ));
    }
    Ok(down)
}

/// Shared rate/term checks for monthly loans.
pub(crate) fn validate_rate_and_term(
    annual_rate_percent: Percent,
    term_months: u32,
) -> CalcResult<()> {
    require_non_negative("annual_rate_percent", annual_rate_percent)?;
    if term_months == 0 {
        return Err(CalcError::invalid("term", "Term must be at least 1 month"));
    }
    if term_months > MAX_TERM_MONTHS {
        return Err(CalcError::invalid(
            "term",
            format!("Term must be at most {MAX_TERM_MONTHS} months"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_down_payment_from_percent() {
        let down = resolve_down_payment(dec!(300000), None, Some(dec!(20))).unwrap();
        assert_eq!(down, dec!(60000));
    }

    #[test]
    fn test_down_payment_both_forms_rejected() {
        assert!(resolve_down_payment(dec!(300000), Some(dec!(1)), Some(dec!(1))).is_err());
    }

    #[test]
    fn test_down_payment_cannot_cover_price() {
        assert!(resolve_down_payment(dec!(1000), Some(dec!(1000)), None).is_err());
        assert_eq!(resolve_down_payment(dec!(1000), None, None).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_term_bounds() {
        assert!(validate_rate_and_term(dec!(5), 0).is_err());
        assert!(validate_rate_and_term(dec!(5), MAX_TERM_MONTHS).is_ok());
        assert!(validate_rate_and_term(dec!(5), MAX_TERM_MONTHS + 1).is_err());
    }

    #[test]
    fn test_unrepresentable_down_payment_percent() {
        let err = resolve_down_payment(dec!(1000000), None, Some(dec!(70000000000000000000000000000)));
        assert!(matches!(err, Err(CalcError::InvalidInput { ref field, .. }) if field == "down_payment_percent"));
    }
}
