use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::db::Database;
use crate::models::{Category, Income, IncomeSource, Transaction};

/// Display label for transactions whose category no longer resolves.
pub(crate) const UNCATEGORIZED: &str = "Uncategorized";

/// One expense bucket: transactions grouped by their resolved category.
#[derive(Debug, Clone)]
pub(crate) struct ExpenseGroup {
    /// `None` for the orphaned ("Uncategorized") bucket.
    pub category_id: Option<i64>,
    pub name: String,
    pub amount: Decimal,
    /// Budget resolved by category id first, then by name; zero otherwise.
    pub budget: Decimal,
    /// `budget - amount`; negative means the bucket is over budget.
    pub diff: Decimal,
    pub over_budget: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct IncomeGroup {
    pub source: IncomeSource,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MonthlySummary {
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub net: Decimal,
    /// Sorted descending by summed amount.
    pub expense_by_category: Vec<ExpenseGroup>,
    /// Sorted descending by summed amount.
    pub income_by_source: Vec<IncomeGroup>,
}

/// Aggregate one month's records. `categories` carries the month's budgets;
/// `names` resolves category ids to display names across all months.
///
/// Empty inputs produce zero totals and empty groupings. Transactions whose
/// category id resolves to no name all fold into a single "Uncategorized"
/// bucket.
pub(crate) fn summarize(
    transactions: &[Transaction],
    incomes: &[Income],
    categories: &[Category],
    names: &HashMap<i64, String>,
) -> MonthlySummary {
    let income_total: Decimal = incomes.iter().map(|i| i.amount).sum();
    let expense_total: Decimal = transactions.iter().map(|t| t.amount).sum();

    // Group expenses by resolved display name, remembering the first
    // resolvable id per bucket for budget lookup.
    let mut expense_buckets: HashMap<String, (Option<i64>, Decimal)> = HashMap::new();
    for t in transactions {
        let (name, id) = match names.get(&t.category_id) {
            Some(name) => (name.clone(), Some(t.category_id)),
            None => (UNCATEGORIZED.to_string(), None),
        };
        let bucket = expense_buckets.entry(name).or_insert((id, Decimal::ZERO));
        if bucket.0.is_none() {
            bucket.0 = id;
        }
        bucket.1 += t.amount;
    }

    let budget_by_id: HashMap<i64, Decimal> = categories
        .iter()
        .filter_map(|c| c.id.map(|id| (id, c.budget)))
        .collect();
    let budget_by_name: HashMap<&str, Decimal> = categories
        .iter()
        .map(|c| (c.name.as_str(), c.budget))
        .collect();

    let mut expense_by_category: Vec<ExpenseGroup> = expense_buckets
        .into_iter()
        .map(|(name, (category_id, amount))| {
            let budget = category_id
                .and_then(|id| budget_by_id.get(&id).copied())
                .or_else(|| budget_by_name.get(name.as_str()).copied())
                .unwrap_or(Decimal::ZERO);
            let diff = budget - amount;
            ExpenseGroup {
                category_id,
                name,
                amount,
                budget,
                diff,
                over_budget: diff < Decimal::ZERO,
            }
        })
        .collect();
    expense_by_category.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));

    let mut income_buckets: HashMap<IncomeSource, Decimal> = HashMap::new();
    for i in incomes {
        *income_buckets.entry(i.source).or_default() += i.amount;
    }
    let mut income_by_source: Vec<IncomeGroup> = income_buckets
        .into_iter()
        .map(|(source, amount)| IncomeGroup { source, amount })
        .collect();
    income_by_source
        .sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.source.as_str().cmp(b.source.as_str())));

    MonthlySummary {
        income_total,
        expense_total,
        net: income_total - expense_total,
        expense_by_category,
        income_by_source,
    }
}

/// Fetch and aggregate one month for a user. A month with no records yields
/// zeroed totals, never an error.
pub(crate) fn monthly_summary(
    db: &Database,
    user_id: i64,
    month: &str,
) -> Result<MonthlySummary> {
    let transactions = db.get_transactions(user_id, Some(month), None)?;
    let incomes = db.get_incomes(user_id, Some(month))?;
    let categories = db.get_categories(user_id, month)?;
    let names = db.category_names(user_id)?;
    Ok(summarize(&transactions, &incomes, &categories, &names))
}
