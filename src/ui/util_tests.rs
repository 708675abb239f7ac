#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
}

#[test]
fn test_format_amount_no_commas() {
    assert_eq!(format_amount(dec!(999.99)), "$999.99");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50)), "-$42.50");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
}

#[test]
fn test_format_amount_pads_to_two_decimals() {
    assert_eq!(format_amount(dec!(1.5)), "$1.50");
    assert_eq!(format_amount(dec!(5)), "$5.00");
}

// ── budget_percent ────────────────────────────────────────────

#[test]
fn test_budget_percent_basic() {
    assert!((budget_percent(dec!(50), dec!(200)) - 25.0).abs() < 1e-9);
}

#[test]
fn test_budget_percent_clamps_overspend() {
    assert!((budget_percent(dec!(300), dec!(200)) - 100.0).abs() < 1e-9);
}

#[test]
fn test_budget_percent_zero_budget() {
    assert!((budget_percent(dec!(300), dec!(0))).abs() < 1e-9);
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_edge_lengths() {
    assert_eq!(truncate("", 5), "");
    assert_eq!(truncate("hello", 0), "");
    assert_eq!(truncate("hello", 1), "…");
}

#[test]
fn test_truncate_unicode() {
    // Multi-byte characters count as one
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── scroll helpers ────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_and_follows() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..12 {
        scroll_down(&mut index, &mut scroll, 20, 10);
    }
    assert_eq!(index, 12);
    // Cursor stays on the last visible row
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (4, 0);
    scroll_down(&mut index, &mut scroll, 5, 10);
    assert_eq!(index, 4);
}

#[test]
fn test_scroll_up_follows_cursor() {
    let (mut index, mut scroll) = (5, 5);
    scroll_up(&mut index, &mut scroll);
    assert_eq!(index, 4);
    assert_eq!(scroll, 4);

    let (mut index, mut scroll) = (0, 0);
    scroll_up(&mut index, &mut scroll);
    assert_eq!(index, 0);
}

#[test]
fn test_scroll_to_top_and_bottom() {
    let (mut index, mut scroll) = (7, 4);
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));

    scroll_to_bottom(&mut index, &mut scroll, 30, 10);
    assert_eq!(index, 29);
    assert_eq!(scroll, 20);

    // Empty lists stay put
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 0, 10);
    assert_eq!((index, scroll), (0, 0));
}
