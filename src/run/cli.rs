use anyhow::{Context, Result};

use crate::db::Database;
use crate::models::{MonthKey, User};
use crate::report;

pub(crate) fn as_cli(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let user_id = user.id.context("user has no id")?;
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], db, user_id),
        "networth" | "nw" => cli_networth(db, user_id),
        "year" | "y" => cli_year(&args[2..], db, user_id),
        "categories" => cli_categories(&args[2..], db, user_id),
        "export" => cli_export(&args[2..], db, user_id),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgetbook {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("BudgetBook — local-only monthly budget and net-worth tracker");
    println!();
    println!("Usage: budgetbook [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary [YYYY-MM]             Print monthly summary with category breakdowns");
    println!("  networth                      Print the cumulative net-worth series");
    println!("  year [YYYY]                   Print income/expenses per month for a year");
    println!("  categories [--all]            List this month's categories (--all: every known name)");
    println!("  export [path]                 Export a month's records to CSV");
    println!("    --month <YYYY-MM>           Month to export (default: current)");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn current_month() -> String {
    MonthKey::current().to_string()
}

fn cli_summary(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    let month = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .cloned()
        .unwrap_or_else(current_month);

    let summary = report::monthly_summary(db, user_id, &month)?;

    println!("BudgetBook — {month}");
    println!("{}", "─".repeat(46));
    println!("  Income:    ${:.2}", summary.income_total);
    println!("  Expenses:  ${:.2}", summary.expense_total);
    println!("  Net:       ${:.2}", summary.net);

    if !summary.expense_by_category.is_empty() {
        println!();
        println!("Expenses by Category:");
        println!(
            "  {:<22} {:>10} {:>10} {:>10}",
            "Category", "Spent", "Budget", "Diff"
        );
        for group in &summary.expense_by_category {
            let flag = if group.over_budget { " !" } else { "" };
            println!(
                "  {:<22} {:>10.2} {:>10.2} {:>10.2}{flag}",
                group.name, group.amount, group.budget, group.diff
            );
        }
    }

    if !summary.income_by_source.is_empty() {
        println!();
        println!("Income by Source:");
        for group in &summary.income_by_source {
            println!("  {:<22} {:>10.2}", group.source.as_str(), group.amount);
        }
    }

    Ok(())
}

fn cli_networth(db: &mut Database, user_id: i64) -> Result<()> {
    let series = report::net_worth_series(db, user_id)?;
    if series.is_empty() {
        println!("No recorded history");
        return Ok(());
    }

    println!(
        "{:<9} {:>12} {:>12} {:>12} {:>14}",
        "Month", "Income", "Spent", "Net", "Cumulative"
    );
    println!("{}", "─".repeat(62));
    for entry in &series {
        println!(
            "{:<9} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            entry.month.to_string(),
            entry.income,
            entry.spent,
            entry.net,
            entry.cumulative_net
        );
    }
    Ok(())
}

fn cli_year(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    let year: i32 = args
        .first()
        .and_then(|a| a.parse().ok())
        .unwrap_or_else(|| MonthKey::current().year());

    println!("BudgetBook — {year}");
    println!(
        "{:<12} {:>12} {:>12} {:>12}",
        "Month", "Income", "Expenses", "Net"
    );
    println!("{}", "─".repeat(51));

    let mut income_total = rust_decimal::Decimal::ZERO;
    let mut expense_total = rust_decimal::Decimal::ZERO;
    for month in 1..=12u32 {
        let Some(key) = MonthKey::new(year, month) else {
            continue;
        };
        let summary = report::monthly_summary(db, user_id, &key.to_string())?;
        income_total += summary.income_total;
        expense_total += summary.expense_total;
        println!(
            "{:<12} {:>12.2} {:>12.2} {:>12.2}",
            key.label(),
            summary.income_total,
            summary.expense_total,
            summary.net
        );
    }

    println!("{}", "─".repeat(51));
    println!(
        "{:<12} {:>12.2} {:>12.2} {:>12.2}",
        "Total",
        income_total,
        expense_total,
        income_total - expense_total
    );
    Ok(())
}

fn cli_categories(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    let all = args.iter().any(|a| a == "--all");
    let categories = if all {
        db.get_known_categories(user_id)?
    } else {
        db.get_categories(user_id, &current_month())?
    };

    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }

    println!("{:<24} {:>10}  Month", "Name", "Budget");
    println!("{}", "─".repeat(45));
    for cat in &categories {
        println!("{:<24} {:>10.2}  {}", cat.name, cat.budget, cat.month);
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database, user_id: i64) -> Result<()> {
    let month = args
        .windows(2)
        .find(|w| w[0] == "--month")
        .map(|w| w[1].clone())
        .unwrap_or_else(current_month);

    // Output path is the first non-flag argument
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/budgetbook-export-{month}.csv")
        });

    let count = db.export_month_csv(&output_path, user_id, &month)?;
    if count == 0 {
        println!("No records for {month}");
    } else {
        println!("Exported {count} records to {output_path}");
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
