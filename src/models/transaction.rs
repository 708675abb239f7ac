use rust_decimal::Decimal;

use super::month::month_of;

/// A single expense, always tied to a category owned by the same user.
///
/// `month` is derived from `date` at write time and must stay consistent
/// with it; editing the date moves the transaction between months.
#[derive(Debug, Clone)]
pub(crate) struct Transaction {
    pub id: Option<i64>,
    pub user_id: i64,
    pub category_id: i64,
    pub description: String,
    /// Positive magnitude; direction is implied by the collection.
    pub amount: Decimal,
    /// Format: "YYYY-MM-DD"
    pub date: String,
    /// Format: "YYYY-MM", always `date[..7]`
    pub month: String,
    pub created_at: String,
}

impl Transaction {
    pub(crate) fn new(
        user_id: i64,
        category_id: i64,
        description: String,
        amount: Decimal,
        date: String,
    ) -> Self {
        let description = description.trim().to_string();
        Self {
            id: None,
            user_id,
            category_id,
            description: if description.is_empty() {
                "Transaction".to_string()
            } else {
                description
            },
            amount,
            month: month_of(&date),
            date,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
