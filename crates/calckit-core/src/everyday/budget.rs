use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::CalcError;
use crate::types::*;
use crate::CalcResult;

/// Bucket of the 50/30/20 guideline an expense belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    Needs,
    Wants,
    Savings,
}

impl ExpenseKind {
    /// Guideline share of take-home income.
    fn guideline_share(self) -> Rate {
        match self {
            ExpenseKind::Needs => dec!(0.50),
            ExpenseKind::Wants => dec!(0.30),
            ExpenseKind::Savings => dec!(0.20),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLine {
    pub name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub category: String,
    pub amount: Money,
    pub kind: ExpenseKind,
}

/// Monthly take-home income and spending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetInput {
    pub incomes: Vec<BudgetLine>,
    #[serde(default)]
    pub expenses: Vec<ExpenseLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindSummary {
    pub kind: ExpenseKind,
    pub actual: Money,
    pub share_of_income: Rate,
    pub guideline: Money,
    /// Guideline minus actual; negative means over the guideline
    pub variance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetOutput {
    pub total_income: Money,
    pub total_expenses: Money,
    pub remaining: Money,
    /// Savings lines plus unspent income, over income
    pub savings_rate: Rate,
    pub by_category: BTreeMap<String, Money>,
    pub by_kind: Vec<KindSummary>,
}

/// Totals, savings rate and a 50/30/20 comparison of a monthly budget.
pub fn calculate_budget(input: &BudgetInput) -> CalcResult<ComputationOutput<BudgetOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.incomes.is_empty() {
        return Err(CalcError::InsufficientData(
            "At least one income line is required".into(),
        ));
    }
    for line in &input.incomes {
        require_non_negative(&format!("incomes.{}", line.name), line.amount)?;
    }
    for line in &input.expenses {
        require_non_negative(&format!("expenses.{}", line.category), line.amount)?;
    }

    let incomes: Vec<Money> = input.incomes.iter().map(|l| l.amount).collect();
    let total_income = checked_sum("incomes", &incomes)?;
    if total_income.is_zero() {
        return Err(CalcError::invalid("incomes", "Total income must be positive"));
    }
    let expenses: Vec<Money> = input.expenses.iter().map(|l| l.amount).collect();
    let total_expenses = checked_sum("expenses", &expenses)?;
    let remaining = total_income - total_expenses;

    let mut by_category: BTreeMap<String, Money> = BTreeMap::new();
    let mut by_kind_totals: BTreeMap<ExpenseKind, Money> = BTreeMap::new();
    for line in &input.expenses {
        *by_category.entry(line.category.clone()).or_default() += line.amount;
        *by_kind_totals.entry(line.kind).or_default() += line.amount;
    }

    let by_kind = [ExpenseKind::Needs, ExpenseKind::Wants, ExpenseKind::Savings]
        .into_iter()
        .map(|kind| -> CalcResult<KindSummary> {
            let actual = by_kind_totals.get(&kind).copied().unwrap_or_default();
            let guideline = total_income * kind.guideline_share();
            Ok(KindSummary {
                kind,
                actual,
                share_of_income: actual
                    .checked_div(total_income)
                    .ok_or_else(|| out_of_range("expenses"))?,
                guideline,
                variance: guideline - actual,
            })
        })
        .collect::<CalcResult<Vec<_>>>()?;

    let saved = by_kind_totals
        .get(&ExpenseKind::Savings)
        .copied()
        .unwrap_or_default()
        + remaining.max(Decimal::ZERO);
    let savings_rate = saved / total_income;

    if remaining < Decimal::ZERO {
        warnings.push(format!(
            "Expenses exceed income by {}",
            (-remaining).round_dp(2)
        ));
    }
    for summary in &by_kind {
        if summary.kind != ExpenseKind::Savings && summary.variance < Decimal::ZERO {
            warnings.push(format!(
                "{:?} spending is {} over the 50/30/20 guideline",
                summary.kind,
                (-summary.variance).round_dp(2)
            ));
        }
    }

    let output = BudgetOutput {
        total_income,
        total_expenses,
        remaining,
        savings_rate,
        by_category,
        by_kind,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly budget with 50/30/20 guideline",
        &serde_json::json!({
            "income_lines": input.incomes.len(),
            "expense_lines": input.expenses.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn expense(category: &str, amount: Money, kind: ExpenseKind) -> ExpenseLine {
        ExpenseLine {
            category: category.into(),
            amount,
            kind,
        }
    }

    fn budget() -> BudgetInput {
        BudgetInput {
            incomes: vec![
                BudgetLine {
                    name: "salary".into(),
                    amount: dec!(4000),
                },
                BudgetLine {
                    name: "side".into(),
                    amount: dec!(1000),
                },
            ],
            expenses: vec![
                expense("rent", dec!(1800), ExpenseKind::Needs),
                expense("groceries", dec!(500), ExpenseKind::Needs),
                expense("dining", dec!(400), ExpenseKind::Wants),
                expense("401k", dec!(600), ExpenseKind::Savings),
                expense("groceries", dec!(100), ExpenseKind::Needs),
            ],
        }
    }

    #[test]
    fn test_budget_totals() {
        let out = calculate_budget(&budget()).unwrap();
        let r = &out.result;
        assert_eq!(r.total_income, dec!(5000));
        assert_eq!(r.total_expenses, dec!(3400));
        assert_eq!(r.remaining, dec!(1600));
        assert_eq!(r.by_category["groceries"], dec!(600));
        // (600 saved + 1600 unspent) / 5000
        assert_eq!(r.savings_rate, dec!(0.44));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_guideline_comparison() {
        let r = calculate_budget(&budget()).unwrap().result;
        let needs = &r.by_kind[0];
        assert_eq!(needs.kind, ExpenseKind::Needs);
        assert_eq!(needs.actual, dec!(2400));
        assert_eq!(needs.guideline, dec!(2500));
        assert_eq!(needs.variance, dec!(100));
    }

    #[test]
    fn test_overspending_warns() {
        let mut input = budget();
        input
            .expenses
            .push(expense("car", dec!(2000), ExpenseKind::Wants));
        let out = calculate_budget(&input).unwrap();
        assert!(out.result.remaining < Decimal::ZERO);
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_no_income_rejected() {
        let input = BudgetInput {
            incomes: vec![],
            expenses: vec![],
        };
        assert!(calculate_budget(&input).is_err());
    }

    #[test]
    fn test_expenses_beyond_range_are_errors() {
        let mut input = budget();
        input.expenses = vec![
            expense("rent", Decimal::MAX, ExpenseKind::Needs),
            expense("car", Decimal::MAX, ExpenseKind::Wants),
        ];
        match calculate_budget(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "expenses"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }

        // A sliver of income against a large bill has no representable share.
        input.incomes = vec![BudgetLine {
            name: "interest".into(),
            amount: dec!(0.0000000000000000000001),
        }];
        input.expenses = vec![expense("rent", dec!(100000000000), ExpenseKind::Needs)];
        assert!(calculate_budget(&input).is_err());
    }
}
