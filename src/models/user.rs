#[derive(Debug, Clone)]
pub(crate) struct User {
    pub id: Option<i64>,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: String,
}

impl User {
    /// Emails are stored trimmed and lower-cased; lookups are case-insensitive.
    pub(crate) fn new(email: String, name: String) -> Self {
        Self {
            id: None,
            email: email.trim().to_lowercase(),
            password_hash: String::new(),
            name,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.email)
        } else {
            write!(f, "{}", self.name)
        }
    }
}
