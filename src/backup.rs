// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;

use crate::db::{self, LAST_BACKUP_KEY};
use crate::error::Result;
use crate::exchange::BackupDoc;
use crate::models::AppState;

pub fn backup_file_name(now: DateTime<Utc>) -> String {
    format!("mi-bolsillo-autobackup-{}.json", now.format("%Y-%m-%d"))
}

/// Last recorded backup time. An unreadable value counts as "never".
pub fn last_backup(conn: &Connection) -> Result<Option<DateTime<Utc>>> {
    let raw = db::get_value(conn, LAST_BACKUP_KEY)?;
    Ok(raw.and_then(|s| match DateTime::parse_from_rfc3339(&s) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(err) => {
            tracing::warn!(value = %s, error = %err, "ignoring unreadable last-backup time");
            None
        }
    }))
}

pub fn is_due(last: Option<DateTime<Utc>>, interval_days: u32, now: DateTime<Utc>) -> bool {
    match last {
        None => true,
        Some(t) => now - t > Duration::days(i64::from(interval_days)),
    }
}

/// Writes a backup into `dir` when one is due (or `force` is set) and returns its path.
pub fn run_if_due(
    conn: &Connection,
    state: &AppState,
    dir: &Path,
    interval_days: u32,
    now: DateTime<Utc>,
    force: bool,
) -> Result<Option<PathBuf>> {
    if !force && !is_due(last_backup(conn)?, interval_days, now) {
        tracing::debug!("automatic backup not due");
        return Ok(None);
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(backup_file_name(now));
    let body = serde_json::to_string_pretty(&BackupDoc::from(state))?;
    fs::write(&path, body)?;
    db::set_value(conn, LAST_BACKUP_KEY, &now.to_rfc3339())?;
    tracing::info!(path = %path.display(), "backup written");
    Ok(Some(path))
}
