use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::db::Database;
use crate::models::{Income, MonthKey, Transaction};

/// One month of the net-worth series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NetWorthEntry {
    pub month: MonthKey,
    pub income: Decimal,
    pub spent: Decimal,
    pub net: Decimal,
    /// Sum of `net` over this and every earlier entry.
    pub cumulative_net: Decimal,
}

/// Bucket the full transaction and income history by month and walk the
/// months in chronological order, accumulating a running net total.
///
/// The series is sparse: a month with no records never appears and
/// contributes nothing to later months' cumulative figure. There is no
/// stored balance anywhere; the series is re-derived from the ledger on
/// every call.
pub(crate) fn rollup(transactions: &[Transaction], incomes: &[Income]) -> Vec<NetWorthEntry> {
    // (income, spent) per month; BTreeMap keeps MonthKey order.
    let mut buckets: BTreeMap<MonthKey, (Decimal, Decimal)> = BTreeMap::new();

    for income in incomes {
        if let Some(key) = MonthKey::parse(&income.month) {
            buckets.entry(key).or_default().0 += income.amount;
        }
    }
    for txn in transactions {
        if let Some(key) = MonthKey::parse(&txn.month) {
            buckets.entry(key).or_default().1 += txn.amount;
        }
    }

    let mut cumulative = Decimal::ZERO;
    buckets
        .into_iter()
        .map(|(month, (income, spent))| {
            let net = income - spent;
            cumulative += net;
            NetWorthEntry {
                month,
                income,
                spent,
                net,
                cumulative_net: cumulative,
            }
        })
        .collect()
}

/// The user's complete net-worth series, ascending by month.
pub(crate) fn net_worth_series(db: &Database, user_id: i64) -> Result<Vec<NetWorthEntry>> {
    let transactions = db.get_transactions(user_id, None, None)?;
    let incomes = db.get_incomes(user_id, None)?;
    Ok(rollup(&transactions, &incomes))
}
