//! Raw form fields to explicit calculation states.
//!
//! A calculator front end holds its inputs as text. An empty field and a
//! field holding `0` must not both turn into a computed `0`: empty required
//! fields make the calculation [`Calculation::NotReady`], unparseable or
//! negative fields make it [`Calculation::Invalid`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::amortization::{amortize, AmortizationResult, LoanTerms};
use crate::error::CalcError;
use crate::CalcResult;

/// A single text field after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Empty,
    Value(Decimal),
    Malformed(String),
}

/// Parse a text field. Whitespace, a leading `$` and `,` separators are
/// ignored.
pub fn parse_field(raw: Option<&str>) -> FieldValue {
    let Some(raw) = raw else {
        return FieldValue::Empty;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldValue::Empty;
    }
    let cleaned: String = trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match Decimal::from_str(cleaned.trim()) {
        Ok(v) => FieldValue::Value(v),
        Err(_) => FieldValue::Malformed(raw.to_string()),
    }
}

/// Outcome of evaluating a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Calculation<T> {
    /// Required fields are still blank or zero.
    NotReady { missing: Vec<String> },
    Ready(T),
    Invalid { field: String, reason: String },
}

impl<T> Calculation<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Calculation::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Calculation::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Calculation<U> {
        match self {
            Calculation::Ready(v) => Calculation::Ready(f(v)),
            Calculation::NotReady { missing } => Calculation::NotReady { missing },
            Calculation::Invalid { field, reason } => Calculation::Invalid { field, reason },
        }
    }
}

/// Collects required fields, tracking which are missing.
#[derive(Debug, Default)]
struct Gate {
    missing: Vec<String>,
    invalid: Option<(String, String)>,
}

impl Gate {
    /// A field that must be present and strictly positive.
    fn required(&mut self, name: &str, raw: Option<&str>) -> Decimal {
        let v = self.non_negative(name, raw);
        if v.is_zero() && self.invalid.is_none() {
            self.missing.push(name.to_string());
        }
        v
    }

    /// A field that may be blank (treated as zero) but not negative.
    fn non_negative(&mut self, name: &str, raw: Option<&str>) -> Decimal {
        match parse_field(raw) {
            FieldValue::Empty => Decimal::ZERO,
            FieldValue::Value(v) if v < Decimal::ZERO => {
                self.reject(name, "must not be negative");
                Decimal::ZERO
            }
            FieldValue::Value(v) => v,
            FieldValue::Malformed(text) => {
                self.reject(name, &format!("'{text}' is not a number"));
                Decimal::ZERO
            }
        }
    }

    fn reject(&mut self, name: &str, reason: &str) {
        if self.invalid.is_none() {
            self.invalid = Some((name.to_string(), reason.to_string()));
        }
    }

    fn finish<T>(self, compute: impl FnOnce() -> CalcResult<T>) -> Calculation<T> {
        if let Some((field, reason)) = self.invalid {
            return Calculation::Invalid { field, reason };
        }
        if !self.missing.is_empty() {
            return Calculation::NotReady {
                missing: self.missing,
            };
        }
        match compute() {
            Ok(value) => Calculation::Ready(value),
            Err(CalcError::InvalidInput { field, reason }) => Calculation::Invalid { field, reason },
            Err(e) => Calculation::Invalid {
                field: String::new(),
                reason: e.to_string(),
            },
        }
    }
}

/// Loan fields exactly as typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanForm {
    #[serde(default)]
    pub principal: Option<String>,
    #[serde(default)]
    pub annual_rate_percent: Option<String>,
    #[serde(default)]
    pub term_periods: Option<String>,
}

impl LoanForm {
    /// Principal and term are required; a blank rate means 0%.
    pub fn evaluate(&self, include_schedule: bool) -> Calculation<AmortizationResult> {
        let mut gate = Gate::default();
        let principal = gate.required("principal", self.principal.as_deref());
        let rate = gate.non_negative("annual_rate_percent", self.annual_rate_percent.as_deref());
        let term = gate.required("term_periods", self.term_periods.as_deref());

        let periods = match term.to_u32() {
            Some(n) if term.fract().is_zero() => n,
            _ => {
                gate.reject("term_periods", "must be a whole number of months");
                0
            }
        };

        gate.finish(|| amortize(&LoanTerms::new(principal, rate, periods), include_schedule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn form(p: Option<&str>, r: Option<&str>, n: Option<&str>) -> LoanForm {
        LoanForm {
            principal: p.map(String::from),
            annual_rate_percent: r.map(String::from),
            term_periods: n.map(String::from),
        }
    }

    #[test]
    fn test_parse_field_variants() {
        assert_eq!(parse_field(None), FieldValue::Empty);
        assert_eq!(parse_field(Some("   ")), FieldValue::Empty);
        assert_eq!(parse_field(Some("$200,000")), FieldValue::Value(dec!(200000)));
        assert_eq!(parse_field(Some(" 6.5 ")), FieldValue::Value(dec!(6.5)));
        assert_eq!(
            parse_field(Some("abc")),
            FieldValue::Malformed("abc".to_string())
        );
    }

    #[test]
    fn test_blank_form_is_not_ready() {
        let calc = form(None, None, Some("")).evaluate(false);
        assert_eq!(
            calc.map(|r| r.periodic_payment),
            Calculation::NotReady {
                missing: vec!["principal".to_string(), "term_periods".to_string()]
            }
        );
    }

    #[test]
    fn test_zero_principal_is_not_ready_rather_than_zero_payment() {
        let calc = form(Some("0"), Some("5"), Some("60")).evaluate(false);
        assert!(!calc.is_ready());
        assert!(matches!(calc, Calculation::NotReady { .. }));
    }

    #[test]
    fn test_malformed_is_invalid() {
        let calc = form(Some("10k"), Some("5"), Some("60")).evaluate(false);
        assert!(matches!(calc, Calculation::Invalid { ref field, .. } if field == "principal"));
    }

    #[test]
    fn test_negative_rate_is_invalid() {
        let calc = form(Some("1000"), Some("-1"), Some("12")).evaluate(false);
        assert!(
            matches!(calc, Calculation::Invalid { ref field, .. } if field == "annual_rate_percent")
        );
    }

    #[test]
    fn test_fractional_term_is_invalid() {
        let calc = form(Some("1000"), Some("5"), Some("12.5")).evaluate(false);
        assert!(matches!(calc, Calculation::Invalid { ref field, .. } if field == "term_periods"));
    }

    #[test]
    fn test_ready_form_computes() {
        let result = form(Some("10,000"), Some("5"), Some("60"))
            .evaluate(true)
            .ready()
            .unwrap();
        assert!((result.periodic_payment - dec!(188.71)).abs() < dec!(0.01));
        assert_eq!(result.schedule.unwrap().len(), 60);
    }

    #[test]
    fn test_blank_rate_is_zero_percent() {
        let result = form(Some("1200"), None, Some("12"))
            .evaluate(false)
            .ready()
            .unwrap();
        assert_eq!(result.periodic_payment, dec!(100));
    }

    #[test]
    fn test_unrepresentable_loan_is_invalid() {
        let calc = form(Some("70,000,000,000,000,000,000,000,000,000"), Some("50"), Some("360"))
            .evaluate(false);
        assert!(matches!(calc, Calculation::Invalid { ref field, .. } if field == "principal"));
    }
}
