// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::exchange::ImportSummary;
use crate::store::Pocket;

pub fn handle(pocket: &mut Pocket, m: &clap::ArgMatches) -> Result<ImportSummary> {
    let path = m.get_one::<String>("path").unwrap().trim();
    let raw = std::fs::read_to_string(path).with_context(|| format!("Open {}", path))?;

    let format = match m.get_one::<String>("format") {
        Some(f) => f.trim().to_lowercase(),
        None => Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "json".into()),
    };
    let summary = match format.as_str() {
        "json" => pocket.import_json(&raw)?,
        "csv" => pocket.import_csv(&raw)?,
        other => return Err(anyhow!("Unknown import format: {} (use json|csv)", other)),
    };
    println!(
        "Imported {} entries ({} duplicates skipped), {} new categories, {} budgets",
        summary.entries_added,
        summary.entries_skipped,
        summary.categories_added,
        summary.budgets_merged
    );
    Ok(summary)
}
