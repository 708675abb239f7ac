mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::models::*;

/// Every read and write below is scoped by the owning user. Operating on
/// another user's row behaves exactly like operating on a missing row, so
/// callers cannot tell foreign records from absent ones.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Users ─────────────────────────────────────────────────

    pub(crate) fn insert_user(&self, user: &User) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO users (email, password_hash, name, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user.email.trim().to_lowercase(),
                user.password_hash,
                user.name,
                user.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = self.conn.query_row(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE email = ?1",
            params![email.trim().to_lowercase()],
            row_to_user,
        );
        match result {
            Ok(u) => Ok(Some(u)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = self.conn.query_row(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE id = ?1",
            params![id],
            row_to_user,
        );
        match result {
            Ok(u) => Ok(Some(u)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn insert_category(&self, cat: &Category) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (user_id, name, budget, month, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                cat.user_id,
                cat.name,
                cat.budget.to_string(),
                cat.month,
                cat.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Categories for one month, in creation order.
    pub(crate) fn get_categories(&self, user_id: i64, month: &str) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, budget, month, created_at FROM categories
             WHERE user_id = ?1 AND month = ?2
             ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![user_id, month], row_to_category)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Every category name the user has ever defined, deduplicated by name
    /// keeping the most recently created row (and thus its budget). This is
    /// a display-time fold, not a storage constraint.
    pub(crate) fn get_known_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, budget, month, created_at FROM categories
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_category)?;
        let all = rows.collect::<std::result::Result<Vec<Category>, _>>()?;

        let mut seen = HashSet::new();
        Ok(all
            .into_iter()
            .filter(|c| seen.insert(c.name.clone()))
            .collect())
    }

    /// Display-name resolver across every month the user has data for.
    pub(crate) fn category_names(&self, user_id: i64) -> Result<HashMap<i64, String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories WHERE user_id = ?1")?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;
        Ok(rows.collect::<std::result::Result<HashMap<_, _>, _>>()?)
    }

    /// Returns false when the category does not resolve for this user.
    pub(crate) fn update_category(
        &self,
        user_id: i64,
        id: i64,
        name: Option<&str>,
        budget: Option<Decimal>,
    ) -> Result<bool> {
        let mut changed = false;
        if let Some(name) = name {
            changed |= self.conn.execute(
                "UPDATE categories SET name = ?1 WHERE id = ?2 AND user_id = ?3",
                params![name.trim(), id, user_id],
            )? > 0;
        }
        if let Some(budget) = budget {
            changed |= self.conn.execute(
                "UPDATE categories SET budget = ?1 WHERE id = ?2 AND user_id = ?3",
                params![budget.to_string(), id, user_id],
            )? > 0;
        }
        Ok(changed)
    }

    /// Deleting a category also deletes the owner's transactions that
    /// reference it. Both deletes run in one SQLite transaction: either the
    /// category and its dependents all go, or nothing does.
    pub(crate) fn delete_category(&mut self, user_id: i64, id: i64) -> Result<bool> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM transactions WHERE user_id = ?1 AND category_id = ?2",
            params![user_id, id],
        )?;
        let deleted = tx.execute(
            "DELETE FROM categories WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if deleted == 0 {
            // Unknown or foreign id: dropping the transaction rolls the
            // dependent delete back as well.
            return Ok(false);
        }
        tx.commit()?;
        Ok(true)
    }

    // ── Transactions ──────────────────────────────────────────

    /// Returns `None` when the referenced category does not resolve for
    /// this user; the transaction is not written.
    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<Option<i64>> {
        if !self.category_owned(txn.user_id, txn.category_id)? {
            return Ok(None);
        }
        self.conn.execute(
            "INSERT INTO transactions (user_id, category_id, description, amount, date, month, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                txn.user_id,
                txn.category_id,
                txn.description,
                txn.amount.to_string(),
                txn.date,
                txn.month,
                txn.created_at,
            ],
        )?;
        Ok(Some(self.conn.last_insert_rowid()))
    }

    pub(crate) fn get_transactions(
        &self,
        user_id: i64,
        month: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT id, user_id, category_id, description, amount, date, month, created_at
             FROM transactions WHERE user_id = ?1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(user_id)];

        if let Some(m) = month {
            sql.push_str(&format!(" AND month = ?{}", param_values.len() + 1));
            param_values.push(Box::new(m.to_string()));
        }
        if let Some(s) = search {
            sql.push_str(&format!(
                " AND description LIKE ?{}",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{s}%")));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn update_transaction_description(
        &self,
        user_id: i64,
        id: i64,
        description: &str,
    ) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE transactions SET description = ?1 WHERE id = ?2 AND user_id = ?3",
            params![description.trim(), id, user_id],
        )?;
        Ok(changed > 0)
    }

    pub(crate) fn update_transaction_amount(
        &self,
        user_id: i64,
        id: i64,
        amount: Decimal,
    ) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE transactions SET amount = ?1 WHERE id = ?2 AND user_id = ?3",
            params![amount.to_string(), id, user_id],
        )?;
        Ok(changed > 0)
    }

    /// Returns false when the transaction or the replacement category does
    /// not resolve for this user.
    pub(crate) fn update_transaction_category(
        &self,
        user_id: i64,
        id: i64,
        category_id: i64,
    ) -> Result<bool> {
        if !self.category_owned(user_id, category_id)? {
            return Ok(false);
        }
        let changed = self.conn.execute(
            "UPDATE transactions SET category_id = ?1 WHERE id = ?2 AND user_id = ?3",
            params![category_id, id, user_id],
        )?;
        Ok(changed > 0)
    }

    /// Moving a transaction to a new date re-derives its month, which may
    /// move it out of the currently-viewed month's list.
    pub(crate) fn update_transaction_date(
        &self,
        user_id: i64,
        id: i64,
        date: &str,
    ) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE transactions SET date = ?1, month = ?2 WHERE id = ?3 AND user_id = ?4",
            params![date, month_of(date), id, user_id],
        )?;
        Ok(changed > 0)
    }

    pub(crate) fn delete_transaction(&self, user_id: i64, id: i64) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    // ── Incomes ───────────────────────────────────────────────

    pub(crate) fn insert_income(&self, income: &Income) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO incomes (user_id, description, amount, source, hours_worked, date, month, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                income.user_id,
                income.description,
                income.amount.to_string(),
                income.source.as_str(),
                income.hours_worked.map(|h| h.to_string()),
                income.date,
                income.month,
                income.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_incomes(&self, user_id: i64, month: Option<&str>) -> Result<Vec<Income>> {
        let (sql, param_values): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match month {
            Some(m) => (
                "SELECT id, user_id, description, amount, source, hours_worked, date, month, created_at
                 FROM incomes WHERE user_id = ?1 AND month = ?2
                 ORDER BY date DESC, id DESC",
                vec![Box::new(user_id), Box::new(m.to_string())],
            ),
            None => (
                "SELECT id, user_id, description, amount, source, hours_worked, date, month, created_at
                 FROM incomes WHERE user_id = ?1
                 ORDER BY date DESC, id DESC",
                vec![Box::new(user_id)],
            ),
        };

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), row_to_income)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn update_income_date(&self, user_id: i64, id: i64, date: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE incomes SET date = ?1, month = ?2 WHERE id = ?3 AND user_id = ?4",
            params![date, month_of(date), id, user_id],
        )?;
        Ok(changed > 0)
    }

    pub(crate) fn delete_income(&self, user_id: i64, id: i64) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM incomes WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn get_setting(&self, user_id: i64, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM settings WHERE user_id = ?1 AND key = ?2",
            params![user_id, key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn set_setting(&self, user_id: i64, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (user_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, key) DO UPDATE SET value = ?3",
            params![user_id, key, value],
        )?;
        Ok(())
    }

    // ── Export ────────────────────────────────────────────────

    /// Write one month's transactions and incomes to a CSV file.
    /// Returns the number of records written.
    pub(crate) fn export_month_csv(
        &self,
        path: &str,
        user_id: i64,
        month: &str,
    ) -> Result<usize> {
        let txns = self.get_transactions(user_id, Some(month), None)?;
        let incomes = self.get_incomes(user_id, Some(month))?;
        let names = self.category_names(user_id)?;

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {path}"))?;
        writer.write_record(["kind", "date", "category", "description", "amount", "hours"])?;

        for t in &txns {
            let category = names
                .get(&t.category_id)
                .map(String::as_str)
                .unwrap_or("Uncategorized");
            let amount = t.amount.to_string();
            writer.write_record([
                "expense",
                t.date.as_str(),
                category,
                t.description.as_str(),
                amount.as_str(),
                "",
            ])?;
        }
        for i in &incomes {
            let amount = i.amount.to_string();
            let hours = i.hours_worked.map(|h| h.to_string()).unwrap_or_default();
            writer.write_record([
                "income",
                i.date.as_str(),
                i.source.as_str(),
                i.description.as_str(),
                amount.as_str(),
                hours.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(txns.len() + incomes.len())
    }

    // ── Helpers ───────────────────────────────────────────────

    fn category_owned(&self, user_id: i64, category_id: i64) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1 AND user_id = ?2)",
            params![category_id, user_id],
            |row| row.get(0),
        )?)
    }
}

// ── Row mappers ───────────────────────────────────────────────

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: Some(row.get(0)?),
        email: row.get(1)?,
        password_hash: row.get(2)?,
        name: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
    let budget: String = row.get(3)?;
    Ok(Category {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        name: row.get(2)?,
        budget: amount_or_zero(&budget),
        month: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let amount: String = row.get(4)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        description: row.get(3)?,
        amount: amount_or_zero(&amount),
        date: row.get(5)?,
        month: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn row_to_income(row: &Row) -> rusqlite::Result<Income> {
    let amount: String = row.get(3)?;
    let source: String = row.get(4)?;
    let hours: Option<String> = row.get(5)?;
    Ok(Income {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        description: row.get(2)?,
        amount: amount_or_zero(&amount),
        source: IncomeSource::parse(&source),
        hours_worked: hours.map(|h| amount_or_zero(&h)),
        date: row.get(6)?,
        month: row.get(7)?,
        created_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests;
