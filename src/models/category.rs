use rust_decimal::Decimal;

/// A monthly spending envelope. The same name may exist in several months,
/// each with its own budget.
#[derive(Debug, Clone)]
pub(crate) struct Category {
    pub id: Option<i64>,
    pub user_id: i64,
    pub name: String,
    /// Non-negative monthly budget.
    pub budget: Decimal,
    /// Format: "YYYY-MM"
    pub month: String,
    pub created_at: String,
}

impl Category {
    pub(crate) fn new(user_id: i64, name: String, budget: Decimal, month: String) -> Self {
        Self {
            id: None,
            user_id,
            name: name.trim().to_string(),
            budget,
            month,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub(crate) fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    /// Find a category by ID in a slice.
    pub(crate) fn find_by_id(categories: &[Category], id: i64) -> Option<&Category> {
        categories.iter().find(|c| c.id == Some(id))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
