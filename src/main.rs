mod db;
mod models;
mod report;
mod run;
mod ui;

use anyhow::{Context, Result};

const DEFAULT_PROFILE_EMAIL: &str = "local@budgetbook";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    let mut db = db::Database::open(&db_path)?;
    let user = ensure_default_profile(&db)?;

    match args.len() {
        1 => run::as_tui(&mut db, &user),
        2.. => run::as_cli(&args, &mut db, &user),
        _ => {
            eprintln!("Usage: budgetbook [command]");
            Ok(())
        }
    }
}

/// Every record is owned by a user; a default local profile is created on
/// first launch so the single-user case needs no setup.
fn ensure_default_profile(db: &db::Database) -> Result<models::User> {
    if let Some(user) = db.get_user_by_email(DEFAULT_PROFILE_EMAIL)? {
        return Ok(user);
    }
    let user = models::User::new(DEFAULT_PROFILE_EMAIL.into(), "Local".into());
    let id = db.insert_user(&user)?;
    db.get_user_by_id(id)?
        .context("Failed to load default profile")
}

fn get_db_path() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "budgetbook", "BudgetBook")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("budgetbook.db"))
}
