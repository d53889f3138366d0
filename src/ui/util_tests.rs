#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_fits() {
    assert_eq!(truncate("rent", 10), "rent");
    assert_eq!(truncate("rent", 4), "rent");
    assert_eq!(truncate("", 3), "");
}

#[test]
fn test_truncate_long_description() {
    assert_eq!(truncate("Grocery run", 5), "Groc…");
    assert_eq!(truncate("Grocery run", 1), "…");
    assert_eq!(truncate("Grocery run", 0), "");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("café crème", 5), "café…");
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_separators() {
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
    assert_eq!(format_amount(dec!(999.99)), "$999.99");
    assert_eq!(format_amount(dec!(10000000)), "$10,000,000.00");
}

#[test]
fn test_format_amount_sign_and_padding() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
    assert_eq!(format_amount(dec!(-400)), "-$400.00");
    assert_eq!(format_amount(dec!(1.5)), "$1.50");
}

// ── progress_bar ──────────────────────────────────────────────

#[test]
fn test_format_signed_follows_kind() {
    use crate::models::TransactionKind;
    assert_eq!(format_signed(dec!(1200), TransactionKind::Income), "+$1,200.00");
    assert_eq!(format_signed(dec!(4.5), TransactionKind::Expense), "-$4.50");
}

#[test]
fn test_progress_bar_fill() {
    assert_eq!(progress_bar(dec!(0), 4), "[░░░░]");
    assert_eq!(progress_bar(dec!(50), 4), "[██░░]");
    assert_eq!(progress_bar(dec!(100), 4), "[████]");
}

#[test]
fn test_progress_bar_clamps_overspend() {
    assert_eq!(progress_bar(dec!(125), 4), "[████]");
    assert_eq!(progress_bar(dec!(-5), 4), "[░░░░]");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 10);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_up_pulls_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_to_bottom() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 0, 4);
    assert_eq!((index, scroll), (0, 0));
}
