// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bolsillo::config::{BudgetAlertPolicy, Config};
use bolsillo::db::{self, PIN_KEY, SNAPSHOT_KEY};
use bolsillo::error::PocketError;
use bolsillo::exchange::ExportFormat;
use bolsillo::filters::Scope;
use bolsillo::models::{
    CategoryDraft, CategoryKind, EntryDraft, EntryKind, QuickFilters, View, UNCATEGORIZED_ID,
};
use bolsillo::store::{self, Pocket};
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 10).unwrap()
}

fn expense(amount: &str, cat: &str) -> EntryDraft {
    EntryDraft::new(EntryKind::Expense, dec(amount), day())
        .unwrap()
        .category(cat)
}

#[test]
fn fresh_store_loads_seed_categories() {
    let conn = setup();
    let state = store::load(&conn);
    assert!(state.entries.is_empty());
    let ids: Vec<&str> = state.categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec![UNCATEGORIZED_ID, "c-food", "c-salary"]);
    assert!(state.budgets.is_empty());
}

#[test]
fn malformed_snapshot_falls_back_to_defaults() {
    let conn = setup();
    db::set_value(&conn, SNAPSHOT_KEY, "{not json").unwrap();
    let state = store::load(&conn);
    assert!(state.entries.is_empty());
    assert_eq!(state.categories.len(), 3);
}

#[test]
fn legacy_array_snapshot_loads_as_entries() {
    let conn = setup();
    db::set_value(
        &conn,
        SNAPSHOT_KEY,
        r#"[{"id":"old-1","type":"expense","amount":-12.5,"date":"2023-08-02"}]"#,
    )
    .unwrap();
    let state = store::load(&conn);
    assert_eq!(state.entries.len(), 1);
    let e = &state.entries[0];
    assert_eq!(e.amount, dec("12.5"));
    assert_eq!(e.category_id, UNCATEGORIZED_ID);
    assert_eq!(e.note, "");
    assert_eq!(state.categories.len(), 3);
}

#[test]
fn missing_sentinel_is_restored_and_extra_settings_kept() {
    let raw = r##"{
        "entries": [],
        "categories": [{"id":"c-x","name":"X","type":"expense","color":"#000000"}],
        "settings": {"view":"income","theme":"light"}
    }"##;
    let state = store::parse_snapshot(raw, Utc::now()).unwrap();
    assert_eq!(state.categories[0].id, UNCATEGORIZED_ID);
    assert_eq!(state.categories[1].id, "c-x");
    assert!(state.budgets.is_empty());
    assert_eq!(state.settings.view, View::Income);
    assert_eq!(state.settings.extra.get("theme").unwrap(), "light");

    let again = store::parse_snapshot(&store::serialize_snapshot(&state).unwrap(), Utc::now()).unwrap();
    assert_eq!(again, state);
}

#[test]
fn add_entry_prepends_and_persists() {
    let conn = setup();
    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    let first = pocket.add_entry(expense("50", "c-food")).unwrap();
    let second = pocket
        .add_entry(
            EntryDraft::new(EntryKind::Income, dec("900"), day())
                .unwrap()
                .note("  sueldo  "),
        )
        .unwrap();
    assert!(first.alert.is_none());
    assert_ne!(first.entry.id, second.entry.id);
    assert_eq!(second.entry.category_id, UNCATEGORIZED_ID);
    assert_eq!(second.entry.note, "sueldo");

    let reloaded = store::load(&conn);
    assert_eq!(reloaded.entries.len(), 2);
    assert_eq!(reloaded.entries[0].id, second.entry.id);

    let t = pocket.totals();
    assert_eq!(t.total, dec("850"));
}

#[test]
fn add_entry_rejects_unknown_category_and_bad_amount() {
    let conn = setup();
    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    let err = pocket.add_entry(expense("5", "c-missing")).unwrap_err();
    assert!(matches!(err, PocketError::NotFound { .. }));
    assert!(EntryDraft::new(EntryKind::Expense, Decimal::ZERO, day()).is_err());
    assert!(EntryDraft::new(EntryKind::Expense, dec("-3"), day()).is_err());
    assert!(pocket.state().entries.is_empty());
}

#[test]
fn budget_alert_fires_on_the_addition_that_reaches_it() {
    let conn = setup();
    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    pocket.set_budget("c-food", Some("100")).unwrap();

    let a = pocket.add_entry(expense("60", "c-food")).unwrap();
    assert!(a.alert.is_none());
    let b = pocket.add_entry(expense("50", "c-food")).unwrap();
    let alert = b.alert.expect("budget reached");
    assert_eq!(alert.spent, dec("110"));
    assert_eq!(alert.budget, dec("100"));

    // default policy re-alerts on every further expense
    let c = pocket.add_entry(expense("1", "c-food")).unwrap();
    assert!(c.alert.is_some());
    let income = pocket
        .add_entry(
            EntryDraft::new(EntryKind::Income, dec("1"), day())
                .unwrap()
                .category("c-food"),
        )
        .unwrap();
    assert!(income.alert.is_none());
}

#[test]
fn on_crossing_policy_is_configurable() {
    let conn = setup();
    let config = Config {
        budget_alerts: BudgetAlertPolicy::OnCrossing,
        ..Config::default()
    };
    let mut pocket = Pocket::open(&conn, &config).unwrap();
    pocket.set_budget("c-food", Some("100")).unwrap();
    assert!(pocket.add_entry(expense("100", "c-food")).unwrap().alert.is_some());
    assert!(pocket.add_entry(expense("5", "c-food")).unwrap().alert.is_none());
}

#[test]
fn delete_entry_and_clear_all() {
    let conn = setup();
    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    let added = pocket.add_entry(expense("5", "c-food")).unwrap();
    pocket
        .add_category(CategoryDraft::new("Ocio", CategoryKind::Expense).budget("40"))
        .unwrap();

    assert!(!pocket.delete_entry("nope").unwrap());
    assert!(pocket.delete_entry(&added.entry.id).unwrap());
    assert!(store::load(&conn).entries.is_empty());

    pocket.add_entry(expense("5", "c-food")).unwrap();
    pocket.clear_all().unwrap();
    let state = store::load(&conn);
    assert!(state.entries.is_empty());
    assert!(state.budgets.is_empty());
    assert_eq!(state.categories.len(), 3);
}

#[test]
fn locked_pocket_leaves_snapshot_untouched() {
    let conn = setup();
    {
        let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
        pocket.add_entry(expense("5", "c-food")).unwrap();
        pocket.set_pin(None, "1234").unwrap();
    }
    assert_eq!(db::get_value(&conn, PIN_KEY).unwrap().as_deref(), Some("1234"));
    let before = db::get_value(&conn, SNAPSHOT_KEY).unwrap();

    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    let id = pocket.state().entries[0].id.clone();
    let results = vec![
        pocket.add_entry(expense("5", "c-food")).map(|_| ()),
        pocket.delete_entry(&id).map(|_| ()),
        pocket.clear_all(),
        pocket
            .add_category(CategoryDraft::new("Nueva", CategoryKind::Both))
            .map(|_| ()),
        pocket.delete_category("c-food").map(|_| ()),
        pocket.set_budget("c-food", Some("10")).map(|_| ()),
        pocket.set_view_settings(View::Income, QuickFilters::default()),
        pocket.import_json("[]").map(|_| ()),
        pocket.export(ExportFormat::Json, &Scope::All).map(|_| ()),
    ];
    for r in results {
        assert!(matches!(r, Err(PocketError::Locked)));
    }
    assert_eq!(db::get_value(&conn, SNAPSHOT_KEY).unwrap(), before);

    // reads stay available
    assert_eq!(pocket.totals().expenses, dec("5"));

    assert!(pocket.unlock("0000").is_err());
    pocket.unlock("1234").unwrap();
    assert!(pocket.delete_entry(&id).unwrap());
}

#[test]
fn pin_status_and_clear() {
    let conn = setup();
    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    assert!(!pocket.pin_status().pin_set);
    pocket.set_pin(None, "2468").unwrap();
    assert!(pocket.pin_status().pin_set);
    assert!(pocket.pin_status().unlocked);

    assert!(pocket.clear_pin(Some("1111")).is_err());
    pocket.clear_pin(Some("2468")).unwrap();
    assert_eq!(db::get_value(&conn, PIN_KEY).unwrap(), None);
}

#[test]
fn view_settings_round_trip_through_storage() {
    let conn = setup();
    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    let filters = QuickFilters {
        start: Some(day()),
        end: None,
        query: "super".into(),
    };
    pocket.set_view_settings(View::Expense, filters.clone()).unwrap();

    let reopened = Pocket::open(&conn, &Config::default()).unwrap();
    assert_eq!(reopened.state().settings.view, View::Expense);
    assert_eq!(reopened.state().settings.filters, filters);
}

#[test]
fn deleting_category_persists_reassignment() {
    let conn = setup();
    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    pocket.add_entry(expense("5", "c-food")).unwrap();
    pocket.set_budget("c-food", Some("10")).unwrap();
    let removal = pocket.delete_category("c-food").unwrap();
    assert_eq!(removal.reassigned, 1);

    let state = store::load(&conn);
    assert_eq!(state.entries[0].category_id, UNCATEGORIZED_ID);
    assert!(state.budgets.is_empty());
    assert!(!state.has_category("c-food"));
}

#[test]
fn init_is_gated_and_keeps_existing_snapshot() {
    let conn = setup();
    let legacy = r#"[{"id":"old","type":"expense","amount":4,"date":"2024-01-02"}]"#;
    db::set_value(&conn, SNAPSHOT_KEY, legacy).unwrap();
    db::set_value(&conn, PIN_KEY, "1234").unwrap();

    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    assert!(matches!(pocket.init(), Err(PocketError::Locked)));
    assert_eq!(
        db::get_value(&conn, SNAPSHOT_KEY).unwrap().as_deref(),
        Some(legacy)
    );

    pocket.unlock("1234").unwrap();
    assert!(!pocket.init().unwrap());
    assert_eq!(
        db::get_value(&conn, SNAPSHOT_KEY).unwrap().as_deref(),
        Some(legacy)
    );
}

#[test]
fn init_writes_seed_snapshot_on_empty_storage() {
    let conn = setup();
    let pocket = Pocket::open(&conn, &Config::default()).unwrap();
    assert!(pocket.init().unwrap());
    let raw = db::get_value(&conn, SNAPSHOT_KEY).unwrap().unwrap();
    let state = store::parse_snapshot(&raw, Utc::now()).unwrap();
    assert_eq!(state.categories.len(), 3);
    assert!(!pocket.init().unwrap());
}

#[test]
fn oversized_amounts_are_rejected_before_arithmetic() {
    let conn = setup();
    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    pocket.add_entry(expense("5", "c-food")).unwrap();

    let huge = dec("50000000000000000000000000000");
    let err = EntryDraft::new(EntryKind::Expense, huge, day()).unwrap_err();
    assert!(matches!(err, PocketError::Validation(_)));
    let err = EntryDraft::new(EntryKind::Income, dec("12.345"), day()).unwrap_err();
    assert!(matches!(err, PocketError::Validation(_)));

    let err = pocket
        .set_budget("c-food", Some("0.0000000000000000000000000001"))
        .unwrap_err();
    assert!(matches!(err, PocketError::Validation(_)));
    assert!(pocket.state().budgets.is_empty());

    let incoming = r#"[{"id":"big","type":"income","amount":5e28,"date":"2024-01-01"}]"#;
    let err = pocket.import_json(incoming).unwrap_err();
    assert!(matches!(err, PocketError::Import(_)));
    assert_eq!(pocket.state().entries.len(), 1);

    assert_eq!(pocket.totals().expenses, dec("5"));
    assert!(pocket.budget_usage().is_empty());
}

#[test]
fn loaded_out_of_range_values_are_dropped() {
    let conn = setup();
    db::set_value(
        &conn,
        SNAPSHOT_KEY,
        r#"{"entries":[
                {"id":"a","type":"expense","amount":5e28,"date":"2024-01-01","categoryId":"c-food"},
                {"id":"b","type":"expense","amount":10.005,"date":"2024-01-02","categoryId":"c-food"}
            ],
            "budgets":{"c-food":1e-28}}"#,
    )
    .unwrap();
    let pocket = Pocket::open(&conn, &Config::default()).unwrap();
    let ids: Vec<&str> = pocket.state().entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);
    assert_eq!(pocket.state().entries[0].amount.scale(), 2);
    assert!(pocket.state().budgets.is_empty());
    assert!(pocket.budget_usage().is_empty());
}

#[test]
fn failed_pin_write_leaves_gate_unchanged() {
    let conn = setup();
    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    pocket.set_pin(None, "1234").unwrap();
    conn.execute("DROP TABLE storage", []).unwrap();

    let err = pocket.set_pin(Some("1234"), "5678").unwrap_err();
    assert!(matches!(err, PocketError::Storage(_)));
    assert!(matches!(
        pocket.clear_pin(Some("5678")),
        Err(PocketError::IncorrectPin)
    ));

    assert!(pocket.clear_pin(Some("1234")).is_err());
    assert!(pocket.pin_status().pin_set);
}
