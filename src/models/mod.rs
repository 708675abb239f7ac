mod category;
mod income;
mod month;
mod transaction;
mod user;

pub(crate) use category::Category;
pub(crate) use income::{Income, IncomeSource};
pub(crate) use month::{month_of, MonthKey};
pub(crate) use transaction::Transaction;
pub(crate) use user::User;

use rust_decimal::Decimal;
use std::str::FromStr;

/// Lenient amount parsing applied at every ingestion point: invalid or
/// missing numeric input defaults to zero. A partially-filled form or a
/// corrupt stored value must never abort aggregation.
pub(crate) fn amount_or_zero(s: &str) -> Decimal {
    Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests;
