#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn test_user(db: &Database, email: &str) -> i64 {
    db.insert_user(&User::new(email.into(), String::new()))
        .unwrap()
}

fn add_category(db: &Database, user_id: i64, name: &str, budget: Decimal, month: &str) -> i64 {
    db.insert_category(&Category::new(user_id, name.into(), budget, month.into()))
        .unwrap()
}

fn add_txn(db: &Database, user_id: i64, category_id: i64, amount: Decimal, date: &str) -> i64 {
    db.insert_transaction(&Transaction::new(
        user_id,
        category_id,
        "txn".into(),
        amount,
        date.into(),
    ))
    .unwrap()
    .unwrap()
}

fn add_income(db: &Database, user_id: i64, amount: Decimal, date: &str) -> i64 {
    db.insert_income(&Income::new(
        user_id,
        "income".into(),
        amount,
        IncomeSource::Other,
        None,
        date.into(),
    ))
    .unwrap()
}

// ── Users ─────────────────────────────────────────────────────

#[test]
fn test_user_insert_and_lookup() {
    let db = Database::open_in_memory().unwrap();
    let id = test_user(&db, "Me@Example.com");

    let by_id = db.get_user_by_id(id).unwrap().unwrap();
    assert_eq!(by_id.email, "me@example.com");

    // Lookup is case-insensitive
    let by_email = db.get_user_by_email("ME@EXAMPLE.COM").unwrap();
    assert_eq!(by_email.and_then(|u| u.id), Some(id));
}

#[test]
fn test_user_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_user_by_id(999).unwrap().is_none());
    assert!(db.get_user_by_email("nobody@nowhere").unwrap().is_none());
}

#[test]
fn test_user_email_unique() {
    let db = Database::open_in_memory().unwrap();
    test_user(&db, "me@example.com");
    let dup = db.insert_user(&User::new("ME@example.com".into(), String::new()));
    assert!(dup.is_err());
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_category_crud() {
    let db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");
    let id = add_category(&db, user, "Groceries", dec!(400), "2024-01");

    let cats = db.get_categories(user, "2024-01").unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Groceries");
    assert_eq!(cats[0].budget, dec!(400));

    assert!(db
        .update_category(user, id, Some("Food"), Some(dec!(450)))
        .unwrap());
    let cats = db.get_categories(user, "2024-01").unwrap();
    assert_eq!(cats[0].name, "Food");
    assert_eq!(cats[0].budget, dec!(450));

    // Other months see nothing
    assert!(db.get_categories(user, "2024-02").unwrap().is_empty());
}

#[test]
fn test_category_update_scoped_to_owner() {
    let db = Database::open_in_memory().unwrap();
    let alice = test_user(&db, "alice@a");
    let bob = test_user(&db, "bob@b");
    let id = add_category(&db, alice, "Rent", dec!(1000), "2024-01");

    // Bob's update reads as not-found, indistinguishable from a missing row
    assert!(!db.update_category(bob, id, None, Some(dec!(1))).unwrap());
    let cats = db.get_categories(alice, "2024-01").unwrap();
    assert_eq!(cats[0].budget, dec!(1000));
}

#[test]
fn test_known_categories_dedup_keeps_most_recent() {
    let db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");

    let mut old = Category::new(user, "Groceries".into(), dec!(300), "2024-01".into());
    old.created_at = "2024-01-01T00:00:00Z".into();
    db.insert_category(&old).unwrap();

    let mut newer = Category::new(user, "Groceries".into(), dec!(475), "2024-03".into());
    newer.created_at = "2024-03-01T00:00:00Z".into();
    db.insert_category(&newer).unwrap();

    let mut rent = Category::new(user, "Rent".into(), dec!(1200), "2024-02".into());
    rent.created_at = "2024-02-01T00:00:00Z".into();
    db.insert_category(&rent).unwrap();

    let known = db.get_known_categories(user).unwrap();
    assert_eq!(known.len(), 2);
    let groceries = known.iter().find(|c| c.name == "Groceries").unwrap();
    // The most recently created row wins the fold
    assert_eq!(groceries.budget, dec!(475));
    assert_eq!(groceries.month, "2024-03");
}

#[test]
fn test_category_names_resolver() {
    let db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");
    let id1 = add_category(&db, user, "Groceries", dec!(100), "2024-01");
    let id2 = add_category(&db, user, "Rent", dec!(900), "2024-02");

    let names = db.category_names(user).unwrap();
    assert_eq!(names.get(&id1).map(String::as_str), Some("Groceries"));
    assert_eq!(names.get(&id2).map(String::as_str), Some("Rent"));
    assert!(!names.contains_key(&999));
}

// ── Cascade delete ────────────────────────────────────────────

#[test]
fn test_delete_category_cascades_to_transactions() {
    let mut db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");
    let groceries = add_category(&db, user, "Groceries", dec!(400), "2024-01");
    let rent = add_category(&db, user, "Rent", dec!(1000), "2024-01");

    add_txn(&db, user, groceries, dec!(25), "2024-01-05");
    add_txn(&db, user, groceries, dec!(40), "2024-02-10"); // other month, same category
    add_txn(&db, user, rent, dec!(1000), "2024-01-01");

    assert!(db.delete_category(user, groceries).unwrap());

    // Every transaction referencing the category is gone, across months
    let remaining = db.get_transactions(user, None, None).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].category_id, rent);
    assert!(db.get_categories(user, "2024-01").unwrap().len() == 1);
}

#[test]
fn test_delete_category_not_found_leaves_data_alone() {
    let mut db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");
    let groceries = add_category(&db, user, "Groceries", dec!(400), "2024-01");
    add_txn(&db, user, groceries, dec!(25), "2024-01-05");

    assert!(!db.delete_category(user, 9999).unwrap());
    assert_eq!(db.get_transactions(user, None, None).unwrap().len(), 1);
}

#[test]
fn test_delete_category_scoped_to_owner() {
    let mut db = Database::open_in_memory().unwrap();
    let alice = test_user(&db, "alice@a");
    let bob = test_user(&db, "bob@b");
    let cat = add_category(&db, alice, "Rent", dec!(1000), "2024-01");
    add_txn(&db, alice, cat, dec!(1000), "2024-01-01");

    assert!(!db.delete_category(bob, cat).unwrap());
    assert_eq!(db.get_transactions(alice, None, None).unwrap().len(), 1);
    assert_eq!(db.get_categories(alice, "2024-01").unwrap().len(), 1);
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_transaction_requires_owned_category() {
    let db = Database::open_in_memory().unwrap();
    let alice = test_user(&db, "alice@a");
    let bob = test_user(&db, "bob@b");
    let alices_cat = add_category(&db, alice, "Groceries", dec!(400), "2024-01");

    // Bob referencing Alice's category reads as not-found
    let txn = Transaction::new(bob, alices_cat, "sneaky".into(), dec!(5), "2024-01-02".into());
    assert!(db.insert_transaction(&txn).unwrap().is_none());

    // A nonexistent category is rejected the same way
    let txn = Transaction::new(alice, 9999, "lost".into(), dec!(5), "2024-01-02".into());
    assert!(db.insert_transaction(&txn).unwrap().is_none());

    let txn = Transaction::new(alice, alices_cat, "ok".into(), dec!(5), "2024-01-02".into());
    assert!(db.insert_transaction(&txn).unwrap().is_some());
}

#[test]
fn test_transaction_month_filter_and_ordering() {
    let db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");
    let cat = add_category(&db, user, "Groceries", dec!(400), "2024-01");

    add_txn(&db, user, cat, dec!(10), "2024-01-05");
    add_txn(&db, user, cat, dec!(20), "2024-01-20");
    add_txn(&db, user, cat, dec!(30), "2024-02-01");

    let jan = db.get_transactions(user, Some("2024-01"), None).unwrap();
    assert_eq!(jan.len(), 2);
    // Newest first
    assert_eq!(jan[0].amount, dec!(20));
    assert_eq!(jan[1].amount, dec!(10));

    assert_eq!(db.get_transactions(user, None, None).unwrap().len(), 3);
    assert!(db
        .get_transactions(user, Some("2025-06"), None)
        .unwrap()
        .is_empty());
}

#[test]
fn test_transaction_search() {
    let db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");
    let cat = add_category(&db, user, "Groceries", dec!(400), "2024-01");

    db.insert_transaction(&Transaction::new(
        user,
        cat,
        "Coffee beans".into(),
        dec!(14),
        "2024-01-03".into(),
    ))
    .unwrap();
    db.insert_transaction(&Transaction::new(
        user,
        cat,
        "Bread".into(),
        dec!(4),
        "2024-01-04".into(),
    ))
    .unwrap();

    let hits = db
        .get_transactions(user, Some("2024-01"), Some("coffee"))
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].description, "Coffee beans");

    let none = db
        .get_transactions(user, Some("2024-01"), Some("pizza"))
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_transaction_updates() {
    let db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");
    let cat = add_category(&db, user, "Groceries", dec!(400), "2024-01");
    let other = add_category(&db, user, "Dining", dec!(150), "2024-01");
    let id = add_txn(&db, user, cat, dec!(10), "2024-01-05");

    assert!(db
        .update_transaction_description(user, id, "weekly shop")
        .unwrap());
    assert!(db.update_transaction_amount(user, id, dec!(12.50)).unwrap());
    assert!(db.update_transaction_category(user, id, other).unwrap());

    let txns = db.get_transactions(user, Some("2024-01"), None).unwrap();
    assert_eq!(txns[0].description, "weekly shop");
    assert_eq!(txns[0].amount, dec!(12.50));
    assert_eq!(txns[0].category_id, other);
}

#[test]
fn test_transaction_date_change_rederives_month() {
    let db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");
    let cat = add_category(&db, user, "Groceries", dec!(400), "2024-01");
    let id = add_txn(&db, user, cat, dec!(10), "2024-01-05");

    assert!(db.update_transaction_date(user, id, "2024-02-11").unwrap());

    // The record left January and now lives in February
    assert!(db
        .get_transactions(user, Some("2024-01"), None)
        .unwrap()
        .is_empty());
    let feb = db.get_transactions(user, Some("2024-02"), None).unwrap();
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0].date, "2024-02-11");
    assert_eq!(feb[0].month, "2024-02");
}

#[test]
fn test_transaction_ownership_isolation() {
    let db = Database::open_in_memory().unwrap();
    let alice = test_user(&db, "alice@a");
    let bob = test_user(&db, "bob@b");
    let cat = add_category(&db, alice, "Groceries", dec!(400), "2024-01");
    let id = add_txn(&db, alice, cat, dec!(10), "2024-01-05");

    assert!(db.get_transactions(bob, None, None).unwrap().is_empty());
    assert!(!db.update_transaction_description(bob, id, "mine now").unwrap());
    assert!(!db.update_transaction_date(bob, id, "2024-03-01").unwrap());
    assert!(!db.delete_transaction(bob, id).unwrap());

    // Alice's record is untouched
    let txns = db.get_transactions(alice, Some("2024-01"), None).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].description, "txn");
}

#[test]
fn test_update_transaction_category_rejects_foreign_category() {
    let db = Database::open_in_memory().unwrap();
    let alice = test_user(&db, "alice@a");
    let bob = test_user(&db, "bob@b");
    let alices_cat = add_category(&db, alice, "Groceries", dec!(400), "2024-01");
    let bobs_cat = add_category(&db, bob, "Groceries", dec!(100), "2024-01");
    let id = add_txn(&db, alice, alices_cat, dec!(10), "2024-01-05");

    assert!(!db.update_transaction_category(alice, id, bobs_cat).unwrap());
    let txns = db.get_transactions(alice, Some("2024-01"), None).unwrap();
    assert_eq!(txns[0].category_id, alices_cat);
}

// ── Incomes ───────────────────────────────────────────────────

#[test]
fn test_income_crud() {
    let db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");

    db.insert_income(&Income::new(
        user,
        "friday shift".into(),
        dec!(180),
        IncomeSource::Tips,
        Some(dec!(6)),
        "2024-01-12".into(),
    ))
    .unwrap();
    let id = add_income(&db, user, dec!(900), "2024-01-15");

    let jan = db.get_incomes(user, Some("2024-01")).unwrap();
    assert_eq!(jan.len(), 2);
    // Newest first
    assert_eq!(jan[0].amount, dec!(900));
    let tips = &jan[1];
    assert_eq!(tips.source, IncomeSource::Tips);
    assert_eq!(tips.hours_worked, Some(dec!(6)));

    assert!(db.delete_income(user, id).unwrap());
    assert_eq!(db.get_incomes(user, Some("2024-01")).unwrap().len(), 1);
}

#[test]
fn test_income_date_change_rederives_month() {
    let db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");
    let id = add_income(&db, user, dec!(100), "2024-01-15");

    assert!(db.update_income_date(user, id, "2023-12-31").unwrap());
    assert!(db.get_incomes(user, Some("2024-01")).unwrap().is_empty());
    let dec_rows = db.get_incomes(user, Some("2023-12")).unwrap();
    assert_eq!(dec_rows.len(), 1);
    assert_eq!(dec_rows[0].month, "2023-12");
}

#[test]
fn test_income_ownership_isolation() {
    let db = Database::open_in_memory().unwrap();
    let alice = test_user(&db, "alice@a");
    let bob = test_user(&db, "bob@b");
    let id = add_income(&db, alice, dec!(100), "2024-01-15");

    assert!(db.get_incomes(bob, None).unwrap().is_empty());
    assert!(!db.update_income_date(bob, id, "2024-02-01").unwrap());
    assert!(!db.delete_income(bob, id).unwrap());
    assert_eq!(db.get_incomes(alice, None).unwrap().len(), 1);
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn test_settings_round_trip() {
    let db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");

    assert!(db.get_setting(user, "theme").unwrap().is_none());
    db.set_setting(user, "theme", "light").unwrap();
    assert_eq!(db.get_setting(user, "theme").unwrap().as_deref(), Some("light"));

    // Overwrites in place
    db.set_setting(user, "theme", "dark").unwrap();
    assert_eq!(db.get_setting(user, "theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_settings_scoped_per_user() {
    let db = Database::open_in_memory().unwrap();
    let alice = test_user(&db, "alice@a");
    let bob = test_user(&db, "bob@b");

    db.set_setting(alice, "selected_month", "2024-01").unwrap();
    assert!(db.get_setting(bob, "selected_month").unwrap().is_none());
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_month_csv() {
    let db = Database::open_in_memory().unwrap();
    let user = test_user(&db, "a@a");
    let cat = add_category(&db, user, "Groceries", dec!(400), "2024-01");
    add_txn(&db, user, cat, dec!(25.10), "2024-01-05");
    add_income(&db, user, dec!(900), "2024-01-15");
    add_txn(&db, user, cat, dec!(10), "2024-02-01"); // outside the month

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");
    let count = db
        .export_month_csv(path.to_str().unwrap(), user, "2024-01")
        .unwrap();
    assert_eq!(count, 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3); // header + 2 records
    assert!(lines[0].starts_with("kind,date,category"));
    assert!(contents.contains("expense,2024-01-05,Groceries,txn,25.10,"));
    assert!(contents.contains("income,2024-01-15,Other,income,900,"));
}

// ── Open on disk ──────────────────────────────────────────────

#[test]
fn test_open_creates_and_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budgetbook.db");

    let user_id;
    {
        let db = Database::open(&path).unwrap();
        user_id = test_user(&db, "a@a");
    }

    let db = Database::open(&path).unwrap();
    let user = db.get_user_by_id(user_id).unwrap();
    assert!(user.is_some());
}
