#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── MonthKey ──────────────────────────────────────────────────

#[test]
fn test_month_key_parse() {
    let key = MonthKey::parse("2024-03").unwrap();
    assert_eq!(key.to_string(), "2024-03");
}

#[test]
fn test_month_key_parse_rejects_bad_input() {
    assert!(MonthKey::parse("2024-13").is_none());
    assert!(MonthKey::parse("2024-00").is_none());
    assert!(MonthKey::parse("24-01").is_none());
    assert!(MonthKey::parse("2024-1").is_none());
    assert!(MonthKey::parse("2024").is_none());
    assert!(MonthKey::parse("garbage").is_none());
    assert!(MonthKey::parse("").is_none());
}

#[test]
fn test_month_key_ordering_is_chronological() {
    let nov = MonthKey::parse("2023-11").unwrap();
    let dec = MonthKey::parse("2023-12").unwrap();
    let jan = MonthKey::parse("2024-01").unwrap();
    assert!(nov < dec);
    assert!(dec < jan);

    let mut keys = vec![jan, nov, dec];
    keys.sort();
    assert_eq!(keys, vec![nov, dec, jan]);
}

#[test]
fn test_month_key_display_zero_pads() {
    let key = MonthKey::new(987, 4).unwrap();
    assert_eq!(key.to_string(), "0987-04");
}

#[test]
fn test_month_key_next_prev() {
    let dec = MonthKey::parse("2023-12").unwrap();
    assert_eq!(dec.next().to_string(), "2024-01");
    let jan = MonthKey::parse("2024-01").unwrap();
    assert_eq!(jan.prev().to_string(), "2023-12");
    let jun = MonthKey::parse("2024-06").unwrap();
    assert_eq!(jun.next().to_string(), "2024-07");
    assert_eq!(jun.prev().to_string(), "2024-05");
}

#[test]
fn test_month_key_label() {
    let key = MonthKey::parse("2024-01").unwrap();
    assert_eq!(key.label(), "January 2024");
}

#[test]
fn test_month_of() {
    assert_eq!(month_of("2024-03-15"), "2024-03");
    assert_eq!(month_of("2024-03"), "2024-03");
    // Short input falls back to the raw string
    assert_eq!(month_of("2024"), "2024");
}

// ── amount_or_zero ────────────────────────────────────────────

#[test]
fn test_amount_or_zero_valid() {
    assert_eq!(amount_or_zero("42.50"), dec!(42.50));
    assert_eq!(amount_or_zero(" 10 "), dec!(10));
}

#[test]
fn test_amount_or_zero_invalid_defaults_to_zero() {
    assert_eq!(amount_or_zero(""), Decimal::ZERO);
    assert_eq!(amount_or_zero("abc"), Decimal::ZERO);
    assert_eq!(amount_or_zero("12.3.4"), Decimal::ZERO);
}

// ── IncomeSource ──────────────────────────────────────────────

#[test]
fn test_income_source_parse() {
    assert_eq!(IncomeSource::parse("tips"), IncomeSource::Tips);
    assert_eq!(IncomeSource::parse("TIPS"), IncomeSource::Tips);
    assert_eq!(IncomeSource::parse("Checks"), IncomeSource::Checks);
    assert_eq!(IncomeSource::parse("other"), IncomeSource::Other);
}

#[test]
fn test_income_source_unknown_becomes_other() {
    assert_eq!(IncomeSource::parse("salary"), IncomeSource::Other);
    assert_eq!(IncomeSource::parse(""), IncomeSource::Other);
}

// ── Income ────────────────────────────────────────────────────

#[test]
fn test_income_keeps_hours_only_for_tips() {
    let tips = Income::new(
        1,
        "shift".into(),
        dec!(120),
        IncomeSource::Tips,
        Some(dec!(5.5)),
        "2024-01-12".into(),
    );
    assert_eq!(tips.hours_worked, Some(dec!(5.5)));

    let check = Income::new(
        1,
        "paycheck".into(),
        dec!(900),
        IncomeSource::Checks,
        Some(dec!(40)),
        "2024-01-12".into(),
    );
    assert_eq!(check.hours_worked, None);
}

#[test]
fn test_income_derives_month_and_default_description() {
    let income = Income::new(
        1,
        "   ".into(),
        dec!(50),
        IncomeSource::Other,
        None,
        "2024-07-04".into(),
    );
    assert_eq!(income.month, "2024-07");
    assert_eq!(income.description, "Income");
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_transaction_derives_month_and_default_description() {
    let txn = Transaction::new(1, 2, "".into(), dec!(9.99), "2024-03-20".into());
    assert_eq!(txn.month, "2024-03");
    assert_eq!(txn.description, "Transaction");

    let txn = Transaction::new(1, 2, " lunch ".into(), dec!(9.99), "2024-03-20".into());
    assert_eq!(txn.description, "lunch");
}

// ── User ──────────────────────────────────────────────────────

#[test]
fn test_user_email_normalized() {
    let user = User::new("  Me@Example.COM ".into(), "Me".into());
    assert_eq!(user.email, "me@example.com");
}

#[test]
fn test_user_display_falls_back_to_email() {
    let named = User::new("a@b.c".into(), "Alice".into());
    assert_eq!(named.to_string(), "Alice");
    let anon = User::new("a@b.c".into(), String::new());
    assert_eq!(anon.to_string(), "a@b.c");
}

// ── Category ──────────────────────────────────────────────────

fn make_category(id: i64, name: &str) -> Category {
    Category {
        id: Some(id),
        user_id: 1,
        name: name.into(),
        budget: dec!(100),
        month: "2024-01".into(),
        created_at: String::new(),
    }
}

#[test]
fn test_category_find_by_name_case_insensitive() {
    let cats = vec![make_category(1, "Groceries"), make_category(2, "Rent")];
    assert_eq!(
        Category::find_by_name(&cats, "groceries").and_then(|c| c.id),
        Some(1)
    );
    assert!(Category::find_by_name(&cats, "gas").is_none());
}

#[test]
fn test_category_find_by_id() {
    let cats = vec![make_category(1, "Groceries"), make_category(2, "Rent")];
    assert_eq!(
        Category::find_by_id(&cats, 2).map(|c| c.name.as_str()),
        Some("Rent")
    );
    assert!(Category::find_by_id(&cats, 99).is_none());
}
