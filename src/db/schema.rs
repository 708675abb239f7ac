pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL COLLATE NOCASE UNIQUE,
    password_hash TEXT NOT NULL DEFAULT '',
    name          TEXT NOT NULL DEFAULT '',
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    name        TEXT NOT NULL,
    budget      TEXT NOT NULL DEFAULT '0',
    month       TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- category_id carries no FK: ownership is validated at write time only,
-- and reads must tolerate dangling references.
CREATE TABLE IF NOT EXISTS transactions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    category_id INTEGER NOT NULL,
    description TEXT NOT NULL DEFAULT 'Transaction',
    amount      TEXT NOT NULL,
    date        TEXT NOT NULL,
    month       TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS incomes (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL REFERENCES users(id),
    description  TEXT NOT NULL DEFAULT 'Income',
    amount       TEXT NOT NULL,
    source       TEXT NOT NULL DEFAULT 'Other',
    hours_worked TEXT,
    date         TEXT NOT NULL,
    month        TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    user_id INTEGER NOT NULL REFERENCES users(id),
    key     TEXT NOT NULL,
    value   TEXT NOT NULL,
    PRIMARY KEY (user_id, key)
);

CREATE INDEX IF NOT EXISTS idx_categories_user_month ON categories(user_id, month);
CREATE INDEX IF NOT EXISTS idx_transactions_user_month ON transactions(user_id, month);
CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);
CREATE INDEX IF NOT EXISTS idx_incomes_user_month ON incomes(user_id, month);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // Future migrations go here:
    // (1, "ALTER TABLE incomes ADD COLUMN payer TEXT NOT NULL DEFAULT '';"),
];
