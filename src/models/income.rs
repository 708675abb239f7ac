use rust_decimal::Decimal;

use super::month::month_of;

/// Income records are tagged with a fixed source, not a category reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum IncomeSource {
    Tips,
    Checks,
    Other,
}

impl IncomeSource {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Tips => "Tips",
            Self::Checks => "Checks",
            Self::Other => "Other",
        }
    }

    /// Unknown or missing source strings fall back to `Other`.
    pub(crate) fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "tips" => Self::Tips,
            "checks" => Self::Checks,
            _ => Self::Other,
        }
    }

    pub(crate) fn all() -> &'static [IncomeSource] {
        &[Self::Tips, Self::Checks, Self::Other]
    }
}

impl std::fmt::Display for IncomeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Income {
    pub id: Option<i64>,
    pub user_id: i64,
    pub description: String,
    /// Positive magnitude; direction is implied by the collection.
    pub amount: Decimal,
    pub source: IncomeSource,
    /// Only meaningful for `Tips` income.
    pub hours_worked: Option<Decimal>,
    /// Format: "YYYY-MM-DD"
    pub date: String,
    /// Format: "YYYY-MM", always `date[..7]`
    pub month: String,
    pub created_at: String,
}

impl Income {
    pub(crate) fn new(
        user_id: i64,
        description: String,
        amount: Decimal,
        source: IncomeSource,
        hours_worked: Option<Decimal>,
        date: String,
    ) -> Self {
        let description = description.trim().to_string();
        Self {
            id: None,
            user_id,
            description: if description.is_empty() {
                "Income".to_string()
            } else {
                description
            },
            amount,
            source,
            // Hours only make sense for tip income.
            hours_worked: if source == IncomeSource::Tips {
                hours_worked
            } else {
                None
            },
            month: month_of(&date),
            date,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
