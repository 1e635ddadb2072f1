// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bolsillo::backup::{backup_file_name, is_due, last_backup, run_if_due};
use bolsillo::config::{BudgetAlertPolicy, Config, DEFAULT_BACKUP_INTERVAL_DAYS};
use bolsillo::db::{self, LAST_BACKUP_KEY};
use bolsillo::error::PocketError;
use bolsillo::models::AppState;
use bolsillo::store::Pocket;
use bolsillo::{cli, commands};
use chrono::{Duration, TimeZone, Utc};
use rusqlite::Connection;
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

#[test]
fn writes_when_due_and_skips_within_interval() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let state = AppState::with_defaults(Utc::now());
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

    let first = run_if_due(&conn, &state, dir.path(), 7, t0, false).unwrap();
    let path = first.expect("first backup is always due");
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "mi-bolsillo-autobackup-2024-03-01.json"
    );
    assert_eq!(last_backup(&conn).unwrap(), Some(t0));

    let body: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(body["entries"].is_array());
    assert_eq!(body["categories"].as_array().unwrap().len(), 3);
    assert!(body["budgets"].is_object());
    assert!(body.get("settings").is_none());

    let soon = t0 + Duration::days(3);
    assert!(run_if_due(&conn, &state, dir.path(), 7, soon, false).unwrap().is_none());

    let later = t0 + Duration::days(8);
    assert!(run_if_due(&conn, &state, dir.path(), 7, later, false).unwrap().is_some());
    assert_eq!(last_backup(&conn).unwrap(), Some(later));
}

#[test]
fn force_ignores_interval() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let state = AppState::with_defaults(Utc::now());
    let now = Utc::now();
    run_if_due(&conn, &state, dir.path(), 7, now, false).unwrap();
    let forced = run_if_due(&conn, &state, dir.path(), 7, now, true).unwrap();
    assert!(forced.is_some());
}

#[test]
fn unreadable_last_backup_counts_as_never() {
    let conn = setup();
    db::set_value(&conn, LAST_BACKUP_KEY, "yesterday").unwrap();
    assert_eq!(last_backup(&conn).unwrap(), None);
    assert!(is_due(None, 7, Utc::now()));
}

#[test]
fn backup_name_uses_utc_date() {
    let t = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 0).unwrap();
    assert_eq!(backup_file_name(t), "mi-bolsillo-autobackup-2025-12-31.json");
}

#[test]
fn config_defaults_and_file_round_trip() {
    let dir = tempdir().unwrap();
    let cfg = Config::load_from(dir.path()).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.backup_interval_days, DEFAULT_BACKUP_INTERVAL_DAYS);
    assert_eq!(cfg.budget_alerts, BudgetAlertPolicy::EveryAddition);
    assert_eq!(cfg.recovery_pin(), None);

    std::fs::write(
        dir.path().join("config.json"),
        r#"{"budget_alerts":"on_crossing","recovery_pin":" 2012 "}"#,
    )
    .unwrap();
    let cfg = Config::load_from(dir.path()).unwrap();
    assert_eq!(cfg.budget_alerts, BudgetAlertPolicy::OnCrossing);
    assert_eq!(cfg.recovery_pin(), Some("2012"));
    assert_eq!(cfg.backup_interval_days, DEFAULT_BACKUP_INTERVAL_DAYS);

    let custom = Config {
        backup_interval_days: 3,
        ..Config::default()
    };
    custom.save_to(dir.path()).unwrap();
    assert_eq!(Config::load_from(dir.path()).unwrap(), custom);
}

#[test]
fn manual_backup_requires_unlocked_pocket() {
    let conn = setup();
    Pocket::open(&conn, &Config::default())
        .unwrap()
        .set_pin(None, "1234")
        .unwrap();
    let dir = tempdir().unwrap();
    let target = dir.path().join("out");
    let args = [
        "bolsillo",
        "backup",
        "--force",
        "--dir",
        target.to_str().unwrap(),
    ];

    let pocket = Pocket::open(&conn, &Config::default()).unwrap();
    let matches = cli::build_cli().get_matches_from(args);
    let (_, m) = matches.subcommand().unwrap();
    let err = commands::backup::handle(&pocket, m, &Config::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PocketError>(),
        Some(PocketError::Locked)
    ));
    assert!(!target.exists());
    assert_eq!(last_backup(&conn).unwrap(), None);

    let mut pocket = Pocket::open(&conn, &Config::default()).unwrap();
    pocket.unlock("1234").unwrap();
    commands::backup::handle(&pocket, m, &Config::default()).unwrap();
    assert_eq!(std::fs::read_dir(&target).unwrap().count(), 1);
}

#[test]
fn startup_backup_still_runs_while_locked() {
    let conn = setup();
    Pocket::open(&conn, &Config::default())
        .unwrap()
        .set_pin(None, "1234")
        .unwrap();
    let dir = tempdir().unwrap();
    let config = Config {
        backup_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    let pocket = Pocket::open(&conn, &config).unwrap();
    assert!(!pocket.pin_status().unlocked);
    commands::backup::auto(&pocket, &config);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
