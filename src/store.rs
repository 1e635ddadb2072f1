// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Snapshot persistence and the `Pocket` state container.
//!
//! Every mutator checks the gate first, changes the in-memory state and then overwrites the
//! whole snapshot. A locked pocket never touches storage.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{self, BudgetUsage, CategoryTotals, MonthBucket, Totals};
use crate::backup;
use crate::config::{BudgetAlertPolicy, Config};
use crate::db::{self, PIN_KEY, SNAPSHOT_KEY};
use crate::error::{PocketError, Result};
use crate::exchange::{self, ExportFormat, ImportSummary};
use crate::filters::{self, Scope};
use crate::gate::{Gate, GateState};
use crate::lifecycle::{self, BudgetAlert, CategoryRemoval};
use crate::models::{
    default_categories, AppState, Budgets, Category, CategoryDraft, Entry, EntryDraft, EntryKind,
    QuickFilters, Settings, View, UNCATEGORIZED_ID,
};

#[derive(Debug, Deserialize)]
struct SnapshotDoc {
    #[serde(default)]
    entries: Option<Vec<Entry>>,
    #[serde(default)]
    categories: Option<Vec<Category>>,
    #[serde(default)]
    budgets: Option<Budgets>,
    #[serde(default)]
    settings: Option<Settings>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    entries: &'a [Entry],
    categories: &'a [Category],
    budgets: &'a Budgets,
    settings: &'a Settings,
}

/// Parses a stored snapshot. A bare array is the legacy format: entries only.
pub fn parse_snapshot(raw: &str, now: DateTime<Utc>) -> Result<AppState> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let mut state = if value.is_array() {
        AppState {
            entries: serde_json::from_value(value)?,
            ..AppState::with_defaults(now)
        }
    } else {
        let doc: SnapshotDoc = serde_json::from_value(value)?;
        AppState {
            entries: doc.entries.unwrap_or_default(),
            categories: doc.categories.unwrap_or_else(|| default_categories(now)),
            budgets: doc.budgets.unwrap_or_default(),
            settings: doc.settings.unwrap_or_default(),
        }
    };
    state.normalize(now);
    Ok(state)
}

pub fn serialize_snapshot(state: &AppState) -> Result<String> {
    Ok(serde_json::to_string(&SnapshotRef {
        entries: &state.entries,
        categories: &state.categories,
        budgets: &state.budgets,
        settings: &state.settings,
    })?)
}

/// Loads the snapshot, failing open to defaults when it is absent or unreadable.
pub fn load(conn: &Connection) -> AppState {
    let now = Utc::now();
    let raw = match db::get_value(conn, SNAPSHOT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return AppState::with_defaults(now),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read snapshot; starting from defaults");
            return AppState::with_defaults(now);
        }
    };
    match parse_snapshot(&raw, now) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!(error = %err, "snapshot is malformed; starting from defaults");
            AppState::with_defaults(now)
        }
    }
}

pub fn save(conn: &Connection, state: &AppState) -> Result<()> {
    db::set_value(conn, SNAPSHOT_KEY, &serialize_snapshot(state)?)?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryAdded {
    pub entry: Entry,
    pub alert: Option<BudgetAlert>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PinStatus {
    pub pin_set: bool,
    pub unlocked: bool,
}

/// Explicit state container: the canonical collections, the gate and the storage handle.
pub struct Pocket<'c> {
    conn: &'c Connection,
    state: AppState,
    gate: Gate,
    alerts: BudgetAlertPolicy,
}

impl<'c> Pocket<'c> {
    pub fn open(conn: &'c Connection, config: &Config) -> Result<Self> {
        let state = load(conn);
        let saved_pin = db::get_value(conn, PIN_KEY)?;
        let gate = Gate::new(saved_pin, config.recovery_pin().map(str::to_string));
        Ok(Self {
            conn,
            state,
            gate,
            alerts: config.budget_alerts,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn conn(&self) -> &Connection {
        self.conn
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn pin_status(&self) -> PinStatus {
        PinStatus {
            pin_set: self.gate.has_pin(),
            unlocked: self.gate.is_unlocked(),
        }
    }

    pub fn unlock(&mut self, pin: &str) -> Result<()> {
        self.gate.unlock(pin)
    }

    fn persist(&self) -> Result<()> {
        save(self.conn, &self.state)
    }

    /// Writes the seed snapshot when storage holds none. An existing snapshot, legacy or
    /// unreadable ones included, is left as is. Returns whether anything was written.
    pub fn init(&self) -> Result<bool> {
        self.gate.ensure_unlocked()?;
        if db::get_value(self.conn, SNAPSHOT_KEY)?.is_some() {
            return Ok(false);
        }
        self.persist()?;
        tracing::info!("snapshot initialized");
        Ok(true)
    }

    /// Manual backup. The startup backup goes through `backup::run_if_due` directly.
    pub fn backup_now(
        &self,
        dir: &Path,
        interval_days: u32,
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<Option<PathBuf>> {
        self.gate.ensure_unlocked()?;
        backup::run_if_due(self.conn, &self.state, dir, interval_days, now, force)
    }

    pub fn add_entry(&mut self, draft: EntryDraft) -> Result<EntryAdded> {
        self.gate.ensure_unlocked()?;
        let category_id = draft
            .category_id
            .unwrap_or_else(|| UNCATEGORIZED_ID.to_string());
        if !self.state.has_category(&category_id) {
            return Err(PocketError::not_found("Category", category_id));
        }
        let entry = Entry {
            id: Uuid::new_v4().simple().to_string(),
            kind: draft.kind,
            amount: draft.amount,
            date: draft.date,
            note: draft.note.unwrap_or_default(),
            category_id,
            created_at: Some(Utc::now()),
        };
        self.state.entries.insert(0, entry.clone());
        self.persist()?;

        let alert = match entry.kind {
            EntryKind::Expense => lifecycle::budget_alert_after_expense(
                &self.state,
                &entry.category_id,
                entry.amount,
                self.alerts,
            ),
            EntryKind::Income => None,
        };
        if let Some(a) = &alert {
            tracing::warn!(
                category = %a.category_name,
                budget = %a.budget,
                spent = %a.spent,
                "budget reached"
            );
        }
        Ok(EntryAdded { entry, alert })
    }

    /// Returns whether an entry was removed.
    pub fn delete_entry(&mut self, id: &str) -> Result<bool> {
        self.gate.ensure_unlocked()?;
        let before = self.state.entries.len();
        self.state.entries.retain(|e| e.id != id);
        let removed = self.state.entries.len() != before;
        self.persist()?;
        Ok(removed)
    }

    /// Destructive reset to the seed state; the caller confirms intent beforehand.
    pub fn clear_all(&mut self) -> Result<()> {
        self.gate.ensure_unlocked()?;
        self.state.entries.clear();
        self.state.categories = default_categories(Utc::now());
        self.state.budgets.clear();
        self.persist()?;
        tracing::info!("all data cleared");
        Ok(())
    }

    pub fn add_category(&mut self, draft: CategoryDraft) -> Result<Category> {
        self.gate.ensure_unlocked()?;
        let cat = lifecycle::add_category(&mut self.state, draft, Utc::now())?;
        self.persist()?;
        Ok(cat)
    }

    pub fn delete_category(&mut self, id: &str) -> Result<CategoryRemoval> {
        self.gate.ensure_unlocked()?;
        let removal = lifecycle::delete_category(&mut self.state, id)?;
        self.persist()?;
        Ok(removal)
    }

    pub fn set_budget(
        &mut self,
        category_id: &str,
        raw: Option<&str>,
    ) -> Result<Option<Decimal>> {
        self.gate.ensure_unlocked()?;
        let value = lifecycle::set_budget(&mut self.state, category_id, raw)?;
        self.persist()?;
        Ok(value)
    }

    pub fn set_view_settings(&mut self, view: View, filters: QuickFilters) -> Result<()> {
        self.gate.ensure_unlocked()?;
        self.state.settings.view = view;
        self.state.settings.filters = filters;
        self.persist()
    }

    pub fn import_json(&mut self, raw: &str) -> Result<ImportSummary> {
        self.gate.ensure_unlocked()?;
        let (next, summary) = exchange::import_json(&self.state, raw)?;
        self.commit(next)?;
        Ok(summary)
    }

    pub fn import_csv(&mut self, raw: &str) -> Result<ImportSummary> {
        self.gate.ensure_unlocked()?;
        let (next, summary) = exchange::import_csv(&self.state, raw)?;
        self.commit(next)?;
        Ok(summary)
    }

    fn commit(&mut self, next: AppState) -> Result<()> {
        save(self.conn, &next)?;
        self.state = next;
        Ok(())
    }

    pub fn export(&self, format: ExportFormat, scope: &Scope) -> Result<String> {
        self.gate.ensure_unlocked()?;
        exchange::export(&self.state, format, scope, Utc::now())
    }

    /// Sets or replaces the PIN; replacing requires the current PIN.
    /// The gate only changes once storage has accepted the new value.
    pub fn set_pin(&mut self, current: Option<&str>, new_pin: &str) -> Result<()> {
        let mut next = self.gate.clone();
        let pin = next.set_pin(current, new_pin)?;
        db::set_value(self.conn, PIN_KEY, &pin)?;
        self.gate = next;
        tracing::info!("PIN saved");
        Ok(())
    }

    pub fn clear_pin(&mut self, current: Option<&str>) -> Result<()> {
        let mut next = self.gate.clone();
        next.clear_pin(current)?;
        db::remove_value(self.conn, PIN_KEY)?;
        self.gate = next;
        Ok(())
    }

    pub fn totals(&self) -> Totals {
        aggregate::compute_totals(&self.state.entries)
    }

    pub fn totals_for_period(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Totals {
        aggregate::compute_totals_for_period(&self.state.entries, start, end)
    }

    pub fn totals_by_category(&self) -> Vec<CategoryTotals> {
        aggregate::totals_by_category(&self.state.categories, &self.state.entries)
    }

    pub fn monthly(&self, months: usize, today: NaiveDate) -> Vec<MonthBucket> {
        aggregate::aggregate_monthly(&self.state.entries, months, today)
    }

    pub fn budget_usage(&self) -> Vec<BudgetUsage> {
        aggregate::budget_usage(&self.state.categories, &self.state.budgets, &self.state.entries)
    }

    /// Entries for the listing, using explicit overrides or the saved view settings.
    pub fn listing(&self, view: Option<View>, quick: Option<&QuickFilters>) -> Vec<Entry> {
        let settings = &self.state.settings;
        filters::apply_view_filters(
            &self.state.entries,
            view.unwrap_or(settings.view),
            quick.unwrap_or(&settings.filters),
        )
    }
}
