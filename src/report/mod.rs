mod net_worth;
mod summary;
mod totals;

pub(crate) use net_worth::{net_worth_series, rollup, NetWorthEntry};
pub(crate) use summary::{monthly_summary, summarize, MonthlySummary, UNCATEGORIZED};
pub(crate) use totals::{tips_hourly_rate, DerivedTotals, SavingsSplit};
