// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use anyhow::Result;

use crate::models::AppState;
use crate::store::Pocket;
use crate::utils::pretty_table;

/// Consistency issues as `(kind, detail)` pairs.
pub fn find_issues(state: &AppState) -> Vec<(String, String)> {
    let mut rows = Vec::new();

    // 1) Entries pointing at categories that no longer exist
    let orphans: BTreeSet<&str> = state
        .entries
        .iter()
        .filter(|e| !state.has_category(&e.category_id))
        .map(|e| e.category_id.as_str())
        .collect();
    for id in orphans {
        rows.push(("entry_unknown_category".into(), id.to_string()));
    }

    // 2) Budgets for missing categories
    for id in state.budgets.keys().filter(|id| !state.has_category(id)) {
        rows.push(("budget_unknown_category".into(), id.clone()));
    }

    // 3) Duplicate entry ids
    let mut seen = BTreeSet::new();
    for e in &state.entries {
        if !seen.insert(e.id.as_str()) {
            rows.push(("duplicate_entry_id".into(), e.id.clone()));
        }
    }
    rows
}

pub fn handle(pocket: &Pocket) -> Result<()> {
    let rows: Vec<Vec<String>> = find_issues(pocket.state())
        .into_iter()
        .map(|(k, d)| vec![k, d])
        .collect();
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
