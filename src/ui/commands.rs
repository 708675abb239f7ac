use std::collections::HashMap;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use std::str::FromStr;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::db::Database;
use crate::models::{Category, Income, IncomeSource, MonthKey, Transaction};
use crate::ui::theme::{Accent, ThemeMode};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit BudgetBook", cmd_quit, r);
    register_command!("quit", "Quit BudgetBook", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Expenses", cmd_transactions, r);
    register_command!("transactions", "Go to Expenses", cmd_transactions, r);
    register_command!("i", "Go to Income", cmd_incomes, r);
    register_command!("incomes", "Go to Income", cmd_incomes, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("w", "Go to Net Worth", cmd_net_worth, r);
    register_command!("networth", "Go to Net Worth", cmd_net_worth, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("month", "Set month (e.g. :month 2024-01)", cmd_month, r);
    register_command!("m", "Set month (e.g. :m 2024-01)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!(
        "category",
        "Add category (e.g. :category Groceries 400)",
        cmd_category,
        r
    );
    register_command!(
        "budget",
        "Set a category's budget (e.g. :budget Groceries 450)",
        cmd_budget,
        r
    );
    register_command!(
        "rename-cat",
        "Rename selected category (e.g. :rename-cat Food)",
        cmd_rename_category,
        r
    );
    register_command!(
        "delete-category",
        "Delete selected category and its transactions",
        cmd_delete_category,
        r
    );
    register_command!(
        "txn",
        "Add expense (e.g. :txn 12.50 Groceries -- milk run)",
        cmd_txn,
        r
    );
    register_command!(
        "expense",
        "Add expense (e.g. :expense 12.50 Groceries)",
        cmd_txn,
        r
    );
    register_command!("delete-txn", "Delete selected expense", cmd_delete_txn, r);
    register_command!(
        "rename",
        "Rename selected expense (e.g. :rename coffee beans)",
        cmd_rename,
        r
    );
    register_command!(
        "recat",
        "Re-categorize selected expense (e.g. :recat Dining)",
        cmd_recat,
        r
    );
    register_command!(
        "amount",
        "Change selected expense amount (e.g. :amount 19.99)",
        cmd_amount,
        r
    );
    register_command!(
        "move",
        "Move selected record to a date (e.g. :move 2024-02-03)",
        cmd_move,
        r
    );
    register_command!(
        "income",
        "Add income (e.g. :income 220 tips 6.5 -- friday shift)",
        cmd_income,
        r
    );
    register_command!(
        "delete-income",
        "Delete selected income",
        cmd_delete_income,
        r
    );
    register_command!("search", "Filter expenses (e.g. :search coffee)", cmd_search, r);
    register_command!("s", "Filter expenses (e.g. :s coffee)", cmd_search, r);
    register_command!("theme", "Switch theme (:theme dark|light)", cmd_theme, r);
    register_command!(
        "accent",
        "Switch accent color (e.g. :accent mauve)",
        cmd_accent,
        r
    );
    register_command!(
        "export",
        "Export this month to CSV (e.g. :export ~/feb.csv)",
        cmd_export,
        r
    );
    register_command!(
        "profile",
        "Switch local profile (e.g. :profile me@home.net)",
        cmd_profile,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        // Try fuzzy match
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Parsing helpers ──────────────────────────────────────────

/// Amounts typed into commands must be valid and non-negative; unlike
/// stored values there is no coerce-to-zero here, the command is refused.
fn parse_amount(s: &str) -> Result<Decimal, String> {
    match Decimal::from_str(s) {
        Ok(a) if a >= Decimal::ZERO => Ok(a),
        Ok(_) => Err(format!("Amount must be non-negative: {s}")),
        Err(_) => Err(format!("Invalid amount: {s}")),
    }
}

/// "today" or a valid "YYYY-MM-DD" date.
fn parse_date(s: &str) -> Option<String> {
    if s == "today" {
        return Some(chrono::Local::now().format("%Y-%m-%d").to_string());
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|_| s.to_string())
}

/// Split `"<main> -- <description>"` into its two halves.
fn split_description(args: &str) -> (&str, &str) {
    match args.split_once(" -- ") {
        Some((main, desc)) => (main.trim(), desc.trim()),
        None => (args.trim(), ""),
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_dashboard(db)?;
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    app.refresh_transactions(db)?;
    Ok(())
}

fn cmd_incomes(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Income;
    app.refresh_incomes(db)?;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    app.refresh_categories(db)?;
    Ok(())
}

fn cmd_net_worth(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::NetWorth;
    app.refresh_net_worth(db)?;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :month YYYY-MM (e.g. :month 2024-01)");
        return Ok(());
    }

    // Accept "2024-01" or a bare month number in the current year
    let month = if args.len() <= 2 {
        let year = app.month_key().year();
        MonthKey::parse(&format!("{year}-{args:0>2}"))
    } else {
        MonthKey::parse(args)
    };

    match month {
        Some(m) => {
            app.set_month(db, m)?;
            app.set_status(format!("Switched to {m}"));
        }
        None => app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-01)"),
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let next = app.month_key().next();
    app.set_month(db, next)?;
    app.set_status(format!("Switched to {next}"));
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let prev = app.month_key().prev();
    app.set_month(db, prev)?;
    app.set_status(format!("Switched to {prev}"));
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :category <name> [budget]");
        return Ok(());
    }

    // Last token is the budget when it parses as a number
    let (name, budget) = match args.rsplit_once(' ') {
        Some((head, tail)) => match parse_amount(tail) {
            Ok(b) => (head.trim(), b),
            Err(_) => (args, Decimal::ZERO),
        },
        None => (args, Decimal::ZERO),
    };

    if name.is_empty() {
        app.set_status("Usage: :category <name> [budget]");
        return Ok(());
    }

    let cat = Category::new(
        app.user_id,
        name.to_string(),
        budget,
        app.selected_month.clone(),
    );
    db.insert_category(&cat)?;
    app.refresh_all(db)?;
    app.set_status(format!("Added category: {name}"));
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some((name, amount_str)) = args.rsplit_once(' ') else {
        app.set_status("Usage: :budget <category_name> <amount>");
        return Ok(());
    };

    let budget = match parse_amount(amount_str) {
        Ok(b) => b,
        Err(e) => {
            app.set_status(e);
            return Ok(());
        }
    };

    let Some(cat) = Category::find_by_name(&app.categories, name.trim()) else {
        app.set_status(format!(
            "Category '{}' not found for {}",
            name.trim(),
            app.selected_month
        ));
        return Ok(());
    };
    let Some(id) = cat.id else {
        return Ok(());
    };

    if db.update_category(app.user_id, id, None, Some(budget))? {
        app.refresh_all(db)?;
        app.set_status(format!("Budget for {} set to {budget:.2}", name.trim()));
    } else {
        app.set_status("Category not found");
    }
    Ok(())
}

fn cmd_rename_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :rename-cat <new name>");
        return Ok(());
    }
    let Some(cat) = app.categories.get(app.category_index) else {
        app.set_status("No category selected");
        return Ok(());
    };
    let Some(id) = cat.id else {
        return Ok(());
    };
    let old = cat.name.clone();

    if db.update_category(app.user_id, id, Some(args), None)? {
        app.refresh_all(db)?;
        app.set_status(format!("Renamed {old} to {args}"));
    } else {
        app.set_status("Category not found");
    }
    Ok(())
}

fn cmd_delete_category(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(cat) = app.categories.get(app.category_index) else {
        app.set_status("No category selected");
        return Ok(());
    };
    let Some(id) = cat.id else {
        return Ok(());
    };
    app.confirm_message = format!("Delete category '{}' and all its expenses?", cat.name);
    app.pending_action = Some(PendingAction::DeleteCategory {
        id,
        name: cat.name.clone(),
    });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_txn(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let (main, description) = split_description(args);
    let Some((amount_str, category_name)) = main.split_once(' ') else {
        app.set_status("Usage: :txn <amount> <category> [-- description]");
        return Ok(());
    };

    let amount = match parse_amount(amount_str) {
        Ok(a) => a,
        Err(e) => {
            app.set_status(e);
            return Ok(());
        }
    };

    let Some(cat) = Category::find_by_name(&app.categories, category_name.trim()) else {
        app.set_status(format!(
            "Category '{}' not found for {}",
            category_name.trim(),
            app.selected_month
        ));
        return Ok(());
    };
    let Some(category_id) = cat.id else {
        return Ok(());
    };
    let cat_name = cat.name.clone();

    // New expenses land on the first of the selected month; :move adjusts.
    let date = format!("{}-01", app.selected_month);
    let txn = Transaction::new(
        app.user_id,
        category_id,
        description.to_string(),
        amount,
        date,
    );

    match db.insert_transaction(&txn)? {
        Some(_) => {
            app.refresh_all(db)?;
            app.set_status(format!("Added expense: {amount:.2} in {cat_name}"));
        }
        None => app.set_status("Category not found"),
    }
    Ok(())
}

fn cmd_delete_txn(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(txn) = app.transactions.get(app.transaction_index) else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let Some(id) = txn.id else {
        return Ok(());
    };
    app.confirm_message = format!("Delete expense '{}'?", txn.description);
    app.pending_action = Some(PendingAction::DeleteTransaction {
        id,
        description: txn.description.clone(),
    });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_rename(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :rename <new description>");
        return Ok(());
    }
    let Some(txn) = app.transactions.get(app.transaction_index) else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let Some(id) = txn.id else {
        return Ok(());
    };

    if db.update_transaction_description(app.user_id, id, args)? {
        app.refresh_all(db)?;
        app.set_status(format!("Renamed to: {args}"));
    } else {
        app.set_status("Expense not found");
    }
    Ok(())
}

fn cmd_recat(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :recat <category name>");
        return Ok(());
    }
    let Some(txn) = app.transactions.get(app.transaction_index) else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let Some(id) = txn.id else {
        return Ok(());
    };
    let Some(cat) = Category::find_by_name(&app.categories, args) else {
        app.set_status(format!("Category '{args}' not found for {}", app.selected_month));
        return Ok(());
    };
    let Some(category_id) = cat.id else {
        return Ok(());
    };
    let cat_name = cat.name.clone();

    if db.update_transaction_category(app.user_id, id, category_id)? {
        app.refresh_all(db)?;
        app.set_status(format!("Moved to category: {cat_name}"));
    } else {
        app.set_status("Expense not found");
    }
    Ok(())
}

fn cmd_amount(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let amount = match parse_amount(args) {
        Ok(a) => a,
        Err(e) => {
            app.set_status(e);
            return Ok(());
        }
    };
    let Some(txn) = app.transactions.get(app.transaction_index) else {
        app.set_status("No expense selected");
        return Ok(());
    };
    let Some(id) = txn.id else {
        return Ok(());
    };

    if db.update_transaction_amount(app.user_id, id, amount)? {
        app.refresh_all(db)?;
        app.set_status(format!("Amount set to {amount:.2}"));
    } else {
        app.set_status("Expense not found");
    }
    Ok(())
}

/// Moving a record to a date in another month makes it vanish from the
/// current month's list; that is the partitioning doing its job.
fn cmd_move(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(date) = parse_date(args) else {
        app.set_status("Usage: :move <YYYY-MM-DD|today>");
        return Ok(());
    };

    let moved = match app.screen {
        Screen::Income => {
            let Some(income) = app.incomes.get(app.income_index) else {
                app.set_status("No income selected");
                return Ok(());
            };
            match income.id {
                Some(id) => db.update_income_date(app.user_id, id, &date)?,
                None => return Ok(()),
            }
        }
        _ => {
            let Some(txn) = app.transactions.get(app.transaction_index) else {
                app.set_status("No expense selected");
                return Ok(());
            };
            match txn.id {
                Some(id) => db.update_transaction_date(app.user_id, id, &date)?,
                None => return Ok(()),
            }
        }
    };

    if moved {
        app.refresh_all(db)?;
        let month = crate::models::month_of(&date);
        if month == app.selected_month {
            app.set_status(format!("Moved to {date}"));
        } else {
            app.set_status(format!("Moved to {date}; now listed under {month}"));
        }
    } else {
        app.set_status("Record not found");
    }
    Ok(())
}

fn cmd_income(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let (main, description) = split_description(args);
    let mut tokens = main.split_whitespace();

    let amount = match tokens.next().map(parse_amount) {
        Some(Ok(a)) => a,
        Some(Err(e)) => {
            app.set_status(e);
            return Ok(());
        }
        None => {
            let sources: Vec<&str> = IncomeSource::all().iter().map(|s| s.as_str()).collect();
            app.set_status(format!(
                "Usage: :income <amount> <source> [hours] [-- description]. Sources: {}",
                sources.join(", ")
            ));
            return Ok(());
        }
    };

    // Unknown sources become Other; hours only stick to tip income.
    let source = IncomeSource::parse(tokens.next().unwrap_or("other"));
    let hours = match tokens.next() {
        Some(h) => match parse_amount(h) {
            Ok(h) => Some(h),
            Err(e) => {
                app.set_status(e);
                return Ok(());
            }
        },
        None => None,
    };

    let date = format!("{}-01", app.selected_month);
    let income = Income::new(
        app.user_id,
        description.to_string(),
        amount,
        source,
        hours,
        date,
    );
    db.insert_income(&income)?;
    app.refresh_all(db)?;
    app.set_status(format!("Added income: {amount:.2} ({source})"));
    Ok(())
}

fn cmd_delete_income(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(income) = app.incomes.get(app.income_index) else {
        app.set_status("No income selected");
        return Ok(());
    };
    let Some(id) = income.id else {
        return Ok(());
    };
    app.confirm_message = format!("Delete income '{}'?", income.description);
    app.pending_action = Some(PendingAction::DeleteIncome {
        id,
        description: income.description.clone(),
    });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Transactions;
    app.refresh_transactions(db)?;

    if args.is_empty() {
        app.set_status("Filter cleared");
    } else {
        app.set_status(format!("Filtering: {args}"));
    }
    Ok(())
}

fn cmd_theme(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    match ThemeMode::parse(args) {
        Some(mode) => {
            app.set_theme(db, mode)?;
            app.set_status(format!("Theme: {}", mode.as_str()));
        }
        None => app.set_status("Usage: :theme dark|light"),
    }
    Ok(())
}

fn cmd_accent(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    match Accent::parse(args) {
        Some(accent) => {
            app.set_accent(db, accent)?;
            app.set_status(format!("Accent: {}", accent.as_str()));
        }
        None => {
            let names: Vec<&str> = Accent::all().iter().map(|a| a.as_str()).collect();
            app.set_status(format!("Usage: :accent <{}>", names.join("|")));
        }
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/budgetbook-export-{}.csv", app.selected_month)
    } else {
        crate::run::cli::shellexpand(args)
    };

    let count = db.export_month_csv(&path, app.user_id, &app.selected_month)?;
    if count == 0 {
        app.set_status(format!("Nothing to export for {}", app.selected_month));
    } else {
        app.set_status(format!("Exported {count} records to {path}"));
    }
    Ok(())
}

fn cmd_profile(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut parts = args.splitn(2, ' ');
    let email = parts.next().unwrap_or("").trim();
    let name = parts.next().unwrap_or("").trim();

    if email.is_empty() {
        app.set_status("Usage: :profile <email> [name]");
        return Ok(());
    }

    let user = match db.get_user_by_email(email)? {
        Some(user) => user,
        None => {
            let user = crate::models::User::new(email.to_string(), name.to_string());
            let id = db.insert_user(&user)?;
            match db.get_user_by_id(id)? {
                Some(user) => user,
                None => return Ok(()),
            }
        }
    };

    let label = user.to_string();
    *app = App::load(db, &user)?;
    app.refresh_all(db)?;
    app.set_status(format!("Switched to profile: {label}"));
    Ok(())
}
