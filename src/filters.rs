// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::within;
use crate::error::{PocketError, Result};
use crate::models::{Entry, EntryKind, QuickFilters, View};

/// Narrows an entry collection for export. Serialized in the shape export metadata uses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum Scope {
    #[default]
    All,
    Category {
        #[serde(rename = "categoryId", default)]
        category_id: String,
    },
    #[serde(rename = "date")]
    DateRange {
        #[serde(default)]
        start: Option<NaiveDate>,
        #[serde(default)]
        end: Option<NaiveDate>,
    },
    Notes {
        #[serde(rename = "notesText", default)]
        text: String,
    },
    Type {
        #[serde(rename = "type", default)]
        value: Option<EntryKind>,
    },
}

impl Scope {
    /// Short tag used in export file names.
    pub fn tag(&self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Category { .. } => "category",
            Scope::DateRange { .. } => "date",
            Scope::Notes { .. } => "notes",
            Scope::Type { .. } => "type",
        }
    }

    /// Builds a scope from CLI-style parts. Missing parameters mean "no filtering".
    pub fn from_parts(
        scope: &str,
        category_id: Option<String>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        text: Option<String>,
        kind: Option<EntryKind>,
    ) -> Result<Self> {
        match scope.trim().to_lowercase().as_str() {
            "all" | "" => Ok(Scope::All),
            "category" => Ok(Scope::Category {
                category_id: category_id.unwrap_or_default(),
            }),
            "date" | "daterange" => Ok(Scope::DateRange { start, end }),
            "notes" => Ok(Scope::Notes {
                text: text.unwrap_or_default(),
            }),
            "type" => Ok(Scope::Type { value: kind }),
            other => Err(PocketError::validation(format!(
                "Unknown scope '{}' (use all|category|date|notes|type)",
                other
            ))),
        }
    }
}

fn note_contains(entry: &Entry, needle_lower: &str) -> bool {
    entry.note.to_lowercase().contains(needle_lower)
}

/// Applies a scope descriptor. Entry order is preserved.
pub fn resolve_scope(entries: &[Entry], scope: &Scope) -> Vec<Entry> {
    match scope {
        Scope::All => entries.to_vec(),
        Scope::Category { category_id } if !category_id.is_empty() => entries
            .iter()
            .filter(|e| &e.category_id == category_id)
            .cloned()
            .collect(),
        Scope::DateRange { start, end } => entries
            .iter()
            .filter(|e| within(e.date, *start, *end))
            .cloned()
            .collect(),
        Scope::Notes { text } if !text.is_empty() => {
            let q = text.to_lowercase();
            entries
                .iter()
                .filter(|e| note_contains(e, &q))
                .cloned()
                .collect()
        }
        Scope::Type { value: Some(kind) } => entries
            .iter()
            .filter(|e| e.kind == *kind)
            .cloned()
            .collect(),
        _ => entries.to_vec(),
    }
}

/// Listing filter: quick date/note filters always apply, then the view narrows by type.
pub fn apply_view_filters(entries: &[Entry], view: View, quick: &QuickFilters) -> Vec<Entry> {
    let q = quick.query.trim().to_lowercase();
    entries
        .iter()
        .filter(|e| within(e.date, quick.start, quick.end))
        .filter(|e| q.is_empty() || note_contains(e, &q))
        .filter(|e| view.kind().is_none_or(|k| e.kind == k))
        .cloned()
        .collect()
}
