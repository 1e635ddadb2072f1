// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::aggregate::spent_in_category;
use crate::config::BudgetAlertPolicy;
use crate::error::{PocketError, Result};
use crate::models::{
    validate_amount, AppState, Category, CategoryDraft, PALETTE, UNCATEGORIZED_ID,
};

/// Raised when an expense leaves a category at or above its budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAlert {
    pub category_id: String,
    pub category_name: String,
    pub budget: Decimal,
    pub spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRemoval {
    pub category: Category,
    pub reassigned: usize,
    pub budget_removed: bool,
}

pub fn new_category_id() -> String {
    format!("c-{}", Uuid::new_v4().simple())
}

pub fn random_color() -> &'static str {
    let bytes = Uuid::new_v4();
    PALETTE[bytes.as_bytes()[0] as usize % PALETTE.len()]
}

/// Parses a budget input. `None` means "no budget" (empty or non-numeric input).
pub fn parse_budget_input(raw: Option<&str>) -> Option<Decimal> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<Decimal>().ok()
}

fn normalize_color(raw: &str) -> Result<String> {
    let c = raw.trim();
    let hex = c.strip_prefix('#').unwrap_or(c);
    let ok = matches!(hex.len(), 3 | 6) && hex.chars().all(|ch| ch.is_ascii_hexdigit());
    if !ok {
        return Err(PocketError::validation(format!(
            "Invalid color '{}', expected #rrggbb",
            raw
        )));
    }
    Ok(format!("#{}", hex.to_lowercase()))
}

pub fn add_category(
    state: &mut AppState,
    draft: CategoryDraft,
    now: DateTime<Utc>,
) -> Result<Category> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(PocketError::validation("Category name is required"));
    }
    let color = match draft.color.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => normalize_color(c)?,
        None => random_color().to_string(),
    };
    let budget = match draft.budget.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        Some(raw) => {
            let value = raw
                .parse::<Decimal>()
                .map_err(|_| PocketError::validation(format!("Invalid budget '{}'", raw)))?;
            Some(validate_amount("Budget", value)?)
        }
        None => None,
    };

    let cat = Category {
        id: new_category_id(),
        name: name.to_string(),
        kind: draft.kind,
        color,
        created_at: Some(now),
    };
    state.categories.push(cat.clone());
    if let Some(b) = budget {
        state.budgets.insert(cat.id.clone(), b);
    }
    tracing::debug!(id = %cat.id, name = %cat.name, "category added");
    Ok(cat)
}

/// Deletes a category, moving its entries to the sentinel and dropping its budget.
pub fn delete_category(state: &mut AppState, id: &str) -> Result<CategoryRemoval> {
    if id == UNCATEGORIZED_ID {
        return Err(PocketError::SentinelCategory);
    }
    let pos = state
        .categories
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| PocketError::not_found("Category", id))?;

    let mut reassigned = 0;
    for e in state.entries.iter_mut().filter(|e| e.category_id == id) {
        e.category_id = UNCATEGORIZED_ID.to_string();
        reassigned += 1;
    }
    let category = state.categories.remove(pos);
    let budget_removed = state.budgets.remove(id).is_some();
    tracing::debug!(id, reassigned, "category deleted");
    Ok(CategoryRemoval {
        category,
        reassigned,
        budget_removed,
    })
}

/// Sets or clears a budget. Empty or non-numeric input clears it; out-of-range input is rejected.
pub fn set_budget(
    state: &mut AppState,
    category_id: &str,
    raw: Option<&str>,
) -> Result<Option<Decimal>> {
    if !state.has_category(category_id) {
        return Err(PocketError::not_found("Category", category_id));
    }
    match parse_budget_input(raw) {
        None => {
            state.budgets.remove(category_id);
            Ok(None)
        }
        Some(value) => {
            let value = validate_amount("Budget", value)?;
            state.budgets.insert(category_id.to_string(), value);
            Ok(Some(value))
        }
    }
}

/// Spend for the category compared against its budget, if it has one.
pub fn check_budget_threshold(state: &AppState, category_id: &str) -> Option<BudgetAlert> {
    let budget = *state.budgets.get(category_id)?;
    if budget <= Decimal::ZERO {
        return None;
    }
    let spent = spent_in_category(&state.entries, category_id);
    if spent < budget {
        return None;
    }
    Some(BudgetAlert {
        category_id: category_id.to_string(),
        category_name: state.category_name(category_id).to_string(),
        budget,
        spent,
    })
}

/// Applies the alert policy to an expense of `added` that was just recorded.
pub fn budget_alert_after_expense(
    state: &AppState,
    category_id: &str,
    added: Decimal,
    policy: BudgetAlertPolicy,
) -> Option<BudgetAlert> {
    let alert = check_budget_threshold(state, category_id)?;
    match policy {
        BudgetAlertPolicy::EveryAddition => Some(alert),
        BudgetAlertPolicy::OnCrossing => (alert.spent - added < alert.budget).then_some(alert),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryMerge {
    pub categories: Vec<Category>,
    /// Incoming ids discarded on a name conflict -> id of the category that won.
    pub remap: HashMap<String, String>,
    pub added: usize,
}

/// Merges by case-insensitive name; existing categories win and keep their order.
pub fn merge_categories(existing: &[Category], incoming: &[Category]) -> CategoryMerge {
    let mut out = CategoryMerge {
        categories: existing.to_vec(),
        ..Default::default()
    };
    let mut by_name: HashMap<String, String> = existing
        .iter()
        .map(|c| (c.name.to_lowercase(), c.id.clone()))
        .collect();

    let mut ids: HashSet<String> = existing.iter().map(|c| c.id.clone()).collect();

    for ic in incoming {
        let key = ic.name.to_lowercase();
        match by_name.get(&key) {
            Some(winner) => {
                if winner != &ic.id {
                    out.remap.insert(ic.id.clone(), winner.clone());
                }
            }
            // same id under another name: the existing category keeps the id
            None if ids.contains(&ic.id) => {}
            None => {
                ids.insert(ic.id.clone());
                by_name.insert(key, ic.id.clone());
                out.categories.push(ic.clone());
                out.added += 1;
            }
        }
    }
    out
}
