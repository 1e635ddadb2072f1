// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PocketError, Result};

pub const UNCATEGORIZED_ID: &str = "c-uncategorized";
pub const UNCATEGORIZED_NAME: &str = "Sin categoría";
pub const UNCATEGORIZED_COLOR: &str = "#9ca3af";

/// Largest amount or budget the ledger accepts (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Money has at most two decimal places.
pub const AMOUNT_SCALE: u32 = 2;

/// Checks that `value` is a positive amount within `MAX_AMOUNT` with at most two decimals.
pub fn validate_amount(what: &str, value: Decimal) -> Result<Decimal> {
    if value <= Decimal::ZERO {
        return Err(PocketError::validation(format!(
            "{} must be greater than zero (got {})",
            what, value
        )));
    }
    if value > MAX_AMOUNT {
        return Err(PocketError::validation(format!(
            "{} must not exceed {} (got {})",
            what, MAX_AMOUNT, value
        )));
    }
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(PocketError::validation(format!(
            "{} can have at most {} decimal places (got {})",
            what, AMOUNT_SCALE, value
        )));
    }
    Ok(value)
}

/// Display palette for categories created without an explicit color.
pub const PALETTE: [&str; 9] = [
    "#ef4444", "#f59e0b", "#10b981", "#3b82f6", "#8b5cf6", "#ec4899", "#06b6d4", "#f97316",
    "#60a5fa",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = PocketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "ingreso" => Ok(EntryKind::Income),
            "expense" | "egreso" | "gasto" => Ok(EntryKind::Expense),
            other => Err(PocketError::validation(format!(
                "Unknown entry type '{}' (use income|expense)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
    #[default]
    Both,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
            CategoryKind::Both => "both",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = PocketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            "both" | "" => Ok(CategoryKind::Both),
            other => Err(PocketError::validation(format!(
                "Unknown category type '{}' (use income|expense|both)",
                other
            ))),
        }
    }
}

fn uncategorized_id() -> String {
    UNCATEGORIZED_ID.to_string()
}

/// A single income or expense record. Amounts are magnitudes; the sign comes from `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    #[serde(default = "uncategorized_id")]
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// Signed contribution to the balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }

    /// `YYYY-MM` bucket key.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: CategoryKind,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_color() -> String {
    UNCATEGORIZED_COLOR.to_string()
}

impl Category {
    pub fn is_sentinel(&self) -> bool {
        self.id == UNCATEGORIZED_ID
    }

    pub fn sentinel(now: DateTime<Utc>) -> Self {
        Category {
            id: UNCATEGORIZED_ID.into(),
            name: UNCATEGORIZED_NAME.into(),
            kind: CategoryKind::Both,
            color: UNCATEGORIZED_COLOR.into(),
            created_at: Some(now),
        }
    }
}

/// Seed categories for a fresh pocket: the sentinel plus one expense and one income sample.
pub fn default_categories(now: DateTime<Utc>) -> Vec<Category> {
    vec![
        Category::sentinel(now),
        Category {
            id: "c-food".into(),
            name: "Alimentos".into(),
            kind: CategoryKind::Expense,
            color: "#ef4444".into(),
            created_at: Some(now),
        },
        Category {
            id: "c-salary".into(),
            name: "Sueldo".into(),
            kind: CategoryKind::Income,
            color: "#10b981".into(),
            created_at: Some(now),
        },
    ]
}

/// Category id -> spending ceiling.
pub type Budgets = BTreeMap<String, Decimal>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    All,
    Income,
    Expense,
}

impl View {
    pub fn kind(&self) -> Option<EntryKind> {
        match self {
            View::All => None,
            View::Income => Some(EntryKind::Income),
            View::Expense => Some(EntryKind::Expense),
        }
    }
}

impl FromStr for View {
    type Err = PocketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(View::All),
            "income" => Ok(View::Income),
            "expense" => Ok(View::Expense),
            other => Err(PocketError::validation(format!(
                "Unknown view '{}' (use all|income|expense)",
                other
            ))),
        }
    }
}

/// Quick filters applied to the on-screen listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuickFilters {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub query: String,
}

impl QuickFilters {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.query.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub filters: QuickFilters,
    /// Keys written by older versions are carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The aggregate root: everything that is persisted in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub entries: Vec<Entry>,
    pub categories: Vec<Category>,
    pub budgets: Budgets,
    pub settings: Settings,
}

impl AppState {
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        AppState {
            entries: Vec::new(),
            categories: default_categories(now),
            budgets: Budgets::new(),
            settings: Settings::default(),
        }
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Display name for a category id, falling back to the sentinel's name.
    pub fn category_name(&self, id: &str) -> &str {
        self.category(id)
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED_NAME)
    }

    pub fn has_category(&self, id: &str) -> bool {
        self.category(id).is_some()
    }

    /// Restores invariants on data that came from storage or an import:
    /// the sentinel exists, amounts are magnitudes, empty category refs point at the sentinel.
    pub fn normalize(&mut self, now: DateTime<Utc>) {
        if !self.categories.iter().any(Category::is_sentinel) {
            tracing::warn!("snapshot is missing the default category; restoring it");
            self.categories.insert(0, Category::sentinel(now));
        }
        for e in &mut self.entries {
            e.amount = e.amount.abs().round_dp(AMOUNT_SCALE);
            if e.category_id.trim().is_empty() {
                e.category_id = UNCATEGORIZED_ID.to_string();
            }
        }
        let before = self.entries.len();
        self.entries.retain(|e| e.amount <= MAX_AMOUNT);
        if self.entries.len() != before {
            tracing::warn!(
                dropped = before - self.entries.len(),
                "dropping entries above the amount limit"
            );
        }
        for v in self.budgets.values_mut() {
            *v = v.round_dp(AMOUNT_SCALE);
        }
        self.budgets
            .retain(|_, v| *v > Decimal::ZERO && *v <= MAX_AMOUNT);
    }
}

/// User input for a new entry, validated on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub category_id: Option<String>,
}

impl EntryDraft {
    pub fn new(kind: EntryKind, amount: Decimal, date: NaiveDate) -> Result<Self> {
        let amount = validate_amount("Amount", amount)?;
        Ok(Self {
            kind,
            amount,
            date,
            note: None,
            category_id: None,
        })
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        let trimmed = note.trim();
        self.note = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn category(mut self, category_id: impl Into<String>) -> Self {
        let id = category_id.into();
        self.category_id = if id.trim().is_empty() { None } else { Some(id) };
        self
    }
}

/// User input for a new category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryDraft {
    pub name: String,
    pub kind: CategoryKind,
    pub budget: Option<String>,
    pub color: Option<String>,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            budget: None,
            color: None,
        }
    }

    pub fn budget(mut self, raw: impl Into<String>) -> Self {
        self.budget = Some(raw.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
