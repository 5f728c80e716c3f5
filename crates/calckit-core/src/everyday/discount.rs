use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountInput {
    pub original_price: Money,
    pub discount_percent: Percent,
    /// Sales tax applied after the discount
    #[serde(default)]
    pub tax_percent: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountOutput {
    pub savings: Money,
    pub sale_price: Money,
    pub tax: Money,
    pub final_price: Money,
}

pub fn calculate_discount(input: &DiscountInput) -> CalcResult<ComputationOutput<DiscountOutput>> {
    let start = Instant::now();

    require_non_negative("original_price", input.original_price)?;
    require_non_negative("discount_percent", input.discount_percent)?;
    require_non_negative("tax_percent", input.tax_percent)?;
    if input.discount_percent > dec!(100) {
        return Err(CalcError::invalid(
            "discount_percent",
            "Discount cannot exceed 100%",
        ));
    }

    let savings = input.original_price * percent_to_rate(input.discount_percent);
    let sale_price = input.original_price - savings;
    let tax = checked_product("tax_percent", &[sale_price, percent_to_rate(input.tax_percent)])?;

    let output = DiscountOutput {
        savings,
        sale_price,
        tax,
        final_price: checked_sum("tax_percent", &[sale_price, tax])?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata("Discounted price", input, Vec::new(), elapsed, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_discount_with_tax() {
        let input = DiscountInput {
            original_price: dec!(80),
            discount_percent: dec!(25),
            tax_percent: dec!(10),
        };
        let out = calculate_discount(&input).unwrap().result;
        assert_eq!(out.savings, dec!(20));
        assert_eq!(out.sale_price, dec!(60));
        assert_eq!(out.tax, dec!(6));
        assert_eq!(out.final_price, dec!(66));
    }

    #[test]
    fn test_over_hundred_percent_rejected() {
        let input = DiscountInput {
            original_price: dec!(80),
            discount_percent: dec!(101),
            tax_percent: Decimal::ZERO,
        };
        assert!(calculate_discount(&input).is_err());
    }

    #[test]
    fn test_unrepresentable_tax_is_an_error() {
        let input = DiscountInput {
            original_price: dec!(1000),
            discount_percent: Decimal::ZERO,
            tax_percent: dec!(70000000000000000000000000000),
        };
        assert!(matches!(
            calculate_discount(&input),
            Err(CalcError::InvalidInput { ref field, .. }) if field == "tax_percent"
        ));
    }
}
