use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::{Category, Income, IncomeSource, Transaction};

/// Totals derived purely from collections already loaded for the current
/// month. No queries happen here; the app state recomputes these on every
/// refresh.
#[derive(Debug, Clone, Default)]
pub(crate) struct DerivedTotals {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub total_income: Decimal,
    /// `total_budget - total_spent`
    pub remaining: Decimal,
    /// Summed transaction amounts keyed by category id.
    pub spent_by_category: HashMap<i64, Decimal>,
}

impl DerivedTotals {
    pub(crate) fn compute(
        categories: &[Category],
        transactions: &[Transaction],
        incomes: &[Income],
    ) -> Self {
        let total_budget: Decimal = categories.iter().map(|c| c.budget).sum();
        let total_spent: Decimal = transactions.iter().map(|t| t.amount).sum();
        let total_income: Decimal = incomes.iter().map(|i| i.amount).sum();

        let mut spent_by_category: HashMap<i64, Decimal> = HashMap::new();
        for t in transactions {
            *spent_by_category.entry(t.category_id).or_default() += t.amount;
        }

        Self {
            total_budget,
            total_spent,
            total_income,
            remaining: total_budget - total_spent,
            spent_by_category,
        }
    }

    pub(crate) fn net_income(&self) -> Decimal {
        self.total_income - self.total_spent
    }

    pub(crate) fn spent_for(&self, category_id: Option<i64>) -> Decimal {
        category_id
            .and_then(|id| self.spent_by_category.get(&id).copied())
            .unwrap_or(Decimal::ZERO)
    }
}

/// Post-expense savings plan: 80% of net income to the main pot, plus two
/// independent 20% cuts of the same net figure for the goal and side pots.
/// The three figures intentionally do not partition the net amount.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SavingsSplit {
    pub main: Decimal,
    pub goal: Decimal,
    pub side: Decimal,
}

impl SavingsSplit {
    pub(crate) fn from_net_income(net_income: Decimal) -> Self {
        let pct = |n: i64| net_income * Decimal::new(n, 2);
        Self {
            main: pct(80),
            goal: pct(20),
            side: pct(20),
        }
    }
}

/// Implied hourly rate for tip income: total tips divided by total hours.
/// `None` when no tip income carries hours.
pub(crate) fn tips_hourly_rate(incomes: &[Income]) -> Option<Decimal> {
    let mut total = Decimal::ZERO;
    let mut hours = Decimal::ZERO;
    for i in incomes {
        if i.source == IncomeSource::Tips {
            if let Some(h) = i.hours_worked {
                total += i.amount;
                hours += h;
            }
        }
    }
    if hours > Decimal::ZERO {
        Some(total / hours)
    } else {
        None
    }
}
