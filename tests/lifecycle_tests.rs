// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bolsillo::config::BudgetAlertPolicy;
use bolsillo::error::PocketError;
use bolsillo::lifecycle::{
    add_category, budget_alert_after_expense, check_budget_threshold, delete_category,
    merge_categories, parse_budget_input, set_budget,
};
use bolsillo::models::{
    AppState, Category, CategoryDraft, CategoryKind, Entry, EntryKind, PALETTE, UNCATEGORIZED_ID,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn expense(id: &str, amount: &str, cat: &str) -> Entry {
    Entry {
        id: id.into(),
        kind: EntryKind::Expense,
        amount: dec(amount),
        date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        note: String::new(),
        category_id: cat.into(),
        created_at: None,
    }
}

fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.into(),
        name: name.into(),
        kind: CategoryKind::Both,
        color: "#123456".into(),
        created_at: None,
    }
}

#[test]
fn add_category_validates_and_records_budget() {
    let mut state = AppState::with_defaults(Utc::now());
    let err = add_category(&mut state, CategoryDraft::new("   ", CategoryKind::Expense), Utc::now())
        .unwrap_err();
    assert!(matches!(err, PocketError::Validation(_)));

    let cat = add_category(
        &mut state,
        CategoryDraft::new(" Transporte ", CategoryKind::Expense).budget("250"),
        Utc::now(),
    )
    .unwrap();
    assert_eq!(cat.name, "Transporte");
    assert!(cat.id.starts_with("c-"));
    assert!(PALETTE.contains(&cat.color.as_str()));
    assert_eq!(state.budgets.get(&cat.id), Some(&dec("250")));
    assert_eq!(state.categories.last().unwrap().id, cat.id);

    let colored = add_category(
        &mut state,
        CategoryDraft::new("Ocio", CategoryKind::Both).color("ABCDEF"),
        Utc::now(),
    )
    .unwrap();
    assert_eq!(colored.color, "#abcdef");

    for budget in ["2000000000000", "0.0000000000000000000000000001", "10.999"] {
        let err = add_category(
            &mut state,
            CategoryDraft::new("Viajes", CategoryKind::Expense).budget(budget),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, PocketError::Validation(_)));
    }
    assert!(!state.categories.iter().any(|c| c.name == "Viajes"));
}

#[test]
fn deleting_category_reassigns_entries_and_drops_budget() {
    let mut state = AppState::with_defaults(Utc::now());
    state.entries = vec![expense("1", "10", "c-food"), expense("2", "5", "c-salary")];
    state.budgets.insert("c-food".into(), dec("100"));

    let removal = delete_category(&mut state, "c-food").unwrap();
    assert_eq!(removal.reassigned, 1);
    assert!(removal.budget_removed);
    assert!(state.entries.iter().all(|e| e.category_id != "c-food"));
    assert!(state.entries.iter().all(|e| state.has_category(&e.category_id)));
    assert_eq!(state.entries[0].category_id, UNCATEGORIZED_ID);
    assert!(!state.budgets.contains_key("c-food"));
}

#[test]
fn sentinel_cannot_be_deleted() {
    let mut state = AppState::with_defaults(Utc::now());
    let before = state.categories.clone();
    let err = delete_category(&mut state, UNCATEGORIZED_ID).unwrap_err();
    assert!(matches!(err, PocketError::SentinelCategory));
    assert_eq!(state.categories, before);

    let err = delete_category(&mut state, "c-nope").unwrap_err();
    assert!(matches!(err, PocketError::NotFound { .. }));
}

#[test]
fn set_budget_clears_on_blank_and_rejects_non_positive() {
    let mut state = AppState::with_defaults(Utc::now());
    assert_eq!(set_budget(&mut state, "c-food", Some("120")).unwrap(), Some(dec("120")));
    assert_eq!(set_budget(&mut state, "c-food", Some("  ")).unwrap(), None);
    assert!(state.budgets.is_empty());

    set_budget(&mut state, "c-food", Some("80")).unwrap();
    assert_eq!(set_budget(&mut state, "c-food", Some("abc")).unwrap(), None);
    assert!(state.budgets.is_empty());

    let err = set_budget(&mut state, "c-food", Some("-5")).unwrap_err();
    assert!(matches!(err, PocketError::Validation(_)));
    let err = set_budget(&mut state, "c-missing", Some("5")).unwrap_err();
    assert!(matches!(err, PocketError::NotFound { .. }));
}

#[test]
fn parse_budget_input_handles_blank_and_garbage() {
    assert_eq!(parse_budget_input(None), None);
    assert_eq!(parse_budget_input(Some("")), None);
    assert_eq!(parse_budget_input(Some("x1")), None);
    assert_eq!(parse_budget_input(Some(" 12.5 ")), Some(dec("12.5")));
}

#[test]
fn threshold_fires_at_or_above_budget() {
    let mut state = AppState::with_defaults(Utc::now());
    state.budgets.insert("c-food".into(), dec("100"));
    state.entries = vec![expense("1", "60", "c-food")];
    assert!(check_budget_threshold(&state, "c-food").is_none());

    state.entries.insert(0, expense("2", "40", "c-food"));
    let alert = check_budget_threshold(&state, "c-food").unwrap();
    assert_eq!(alert.spent, dec("100"));
    assert_eq!(alert.category_name, "Alimentos");
    assert!(check_budget_threshold(&state, "c-salary").is_none());
}

#[test]
fn on_crossing_policy_alerts_once() {
    let mut state = AppState::with_defaults(Utc::now());
    state.budgets.insert("c-food".into(), dec("100"));
    state.entries = vec![expense("1", "60", "c-food"), expense("2", "50", "c-food")];

    let crossing = budget_alert_after_expense(&state, "c-food", dec("50"), BudgetAlertPolicy::OnCrossing);
    assert!(crossing.is_some());

    state.entries.insert(0, expense("3", "10", "c-food"));
    let again_every =
        budget_alert_after_expense(&state, "c-food", dec("10"), BudgetAlertPolicy::EveryAddition);
    let again_crossing =
        budget_alert_after_expense(&state, "c-food", dec("10"), BudgetAlertPolicy::OnCrossing);
    assert!(again_every.is_some());
    assert!(again_crossing.is_none());
}

#[test]
fn merge_keeps_existing_on_name_conflict_and_reports_remap() {
    let existing = vec![category("c-food", "Alimentos"), category("c-a", "Casa")];
    let incoming = vec![
        category("c-other", "alimentos"),
        category("c-new", "Viajes"),
        category("c-a", "Otra cosa"),
    ];
    let merge = merge_categories(&existing, &incoming);

    let names: Vec<&str> = merge.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alimentos", "Casa", "Viajes"]);
    assert_eq!(merge.added, 1);
    assert_eq!(merge.remap.get("c-other").map(String::as_str), Some("c-food"));
    assert_eq!(
        merge
            .categories
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case("alimentos"))
            .count(),
        1
    );
}
