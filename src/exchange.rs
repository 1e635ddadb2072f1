// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Export rendering (JSON, CSV, printable HTML) and import reconciliation.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::aggregate::{compute_totals, totals_by_category};
use crate::error::{PocketError, Result};
use crate::filters::{resolve_scope, Scope};
use crate::lifecycle::merge_categories;
use crate::models::{
    AppState, Budgets, Category, Entry, EntryKind, MAX_AMOUNT, UNCATEGORIZED_ID,
};
use crate::utils::{escape_html, fmt_money};

pub const CSV_HEADER: [&str; 6] = ["id", "tipo", "monto", "fecha", "nota", "categoria"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PocketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "html" | "pdf" | "print" => Ok(ExportFormat::Html),
            other => Err(PocketError::validation(format!(
                "Unknown format: {} (use json|csv|html)",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportMeta<'a> {
    generated_at: DateTime<Utc>,
    filters: &'a Scope,
}

#[derive(Debug, Serialize)]
struct JsonExport<'a> {
    meta: ExportMeta<'a>,
    entries: &'a [Entry],
    categories: &'a [Category],
    budgets: &'a Budgets,
}

/// Default download name: `mi-bolsillo-export[-scope]-YYYY-MM-DD.ext`.
pub fn export_file_name(format: ExportFormat, scope: &Scope, day: NaiveDate) -> String {
    let scope_part = match format {
        ExportFormat::Csv => format!("-{}", scope.tag()),
        _ => String::new(),
    };
    format!(
        "mi-bolsillo-export{}-{}.{}",
        scope_part,
        day.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Renders the scoped entries of `state` in the requested format.
pub fn export(
    state: &AppState,
    format: ExportFormat,
    scope: &Scope,
    now: DateTime<Utc>,
) -> Result<String> {
    let items = resolve_scope(&state.entries, scope);
    match format {
        ExportFormat::Json => export_json(state, &items, scope, now),
        ExportFormat::Csv => Ok(export_csv(state, &items)),
        ExportFormat::Html => Ok(export_html(state, &items)),
    }
}

fn export_json(
    state: &AppState,
    items: &[Entry],
    scope: &Scope,
    now: DateTime<Utc>,
) -> Result<String> {
    let doc = JsonExport {
        meta: ExportMeta {
            generated_at: now,
            filters: scope,
        },
        entries: items,
        categories: &state.categories,
        budgets: &state.budgets,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Text columns are always quoted; the rest are plain tokens.
fn export_csv(state: &AppState, items: &[Entry]) -> String {
    let mut out = CSV_HEADER.join(",");
    for e in items {
        out.push('\n');
        out.push_str(&format!(
            "{},{},{},{},{},{}",
            e.id,
            e.kind,
            e.amount.normalize(),
            e.date.format("%Y-%m-%d"),
            quoted(&e.note),
            quoted(state.category_name(&e.category_id)),
        ));
    }
    out
}

const HTML_STYLE: &str = "body{font-family:Arial,Helvetica,sans-serif;padding:20px;color:#111}\
h1{font-size:18px}table{width:100%;border-collapse:collapse}td,th{border:1px solid #ddd;padding:8px}";

fn export_html(state: &AppState, items: &[Entry]) -> String {
    let totals = compute_totals(items);
    let by_cat = totals_by_category(&state.categories, items);

    let mut html = String::new();
    html.push_str(&format!(
        "<html><head><meta charset=\"utf-8\"><title>Exportar — Mi bolsillo</title><style>{}</style></head><body>",
        HTML_STYLE
    ));
    html.push_str("<h1>Mi bolsillo — Exportación</h1>");
    html.push_str(&format!(
        "<p>Totales — Ingresos: {} · Egresos: {} · Balance: {}</p>",
        fmt_money(&totals.incomes),
        fmt_money(&totals.expenses),
        fmt_money(&totals.total)
    ));
    html.push_str("<h2>Por categoría</h2><table><thead><tr><th>Categoría</th><th>Ingresos</th><th>Egresos</th></tr></thead><tbody>");
    for row in &by_cat {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.name),
            fmt_money(&row.income),
            fmt_money(&row.expense)
        ));
    }
    html.push_str("</tbody></table><h2>Transacciones</h2><table><thead><tr><th>Fecha</th><th>Tipo</th><th>Monto</th><th>Categoría</th><th>Nota</th></tr></thead><tbody>");
    for e in items {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            e.date.format("%Y-%m-%d"),
            e.kind,
            fmt_money(&e.amount),
            escape_html(state.category_name(&e.category_id)),
            escape_html(&e.note)
        ));
    }
    html.push_str("</tbody></table></body></html>");
    html
}

/// Full backup document written by the automatic backup.
#[derive(Debug, Serialize)]
pub struct BackupDoc<'a> {
    pub entries: &'a [Entry],
    pub categories: &'a [Category],
    pub budgets: &'a Budgets,
}

impl<'a> From<&'a AppState> for BackupDoc<'a> {
    fn from(state: &'a AppState) -> Self {
        BackupDoc {
            entries: &state.entries,
            categories: &state.categories,
            budgets: &state.budgets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImportSummary {
    pub entries_added: usize,
    pub entries_skipped: usize,
    pub categories_added: usize,
    pub categories_remapped: usize,
    pub budgets_merged: usize,
}

#[derive(Debug, Deserialize)]
struct IncomingDoc {
    #[serde(default)]
    entries: Vec<Entry>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    budgets: Budgets,
}

/// Merges a JSON document into a copy of `state`. Accepts the snapshot/export object or a
/// bare entry array. `state` is left untouched unless the whole merge succeeds.
pub fn import_json(state: &AppState, raw: &str) -> Result<(AppState, ImportSummary)> {
    let value: Value = serde_json::from_str(raw).map_err(|e| PocketError::Import(e.to_string()))?;
    let doc = match value {
        Value::Array(_) => IncomingDoc {
            entries: serde_json::from_value(value).map_err(|e| PocketError::Import(e.to_string()))?,
            categories: Vec::new(),
            budgets: Budgets::new(),
        },
        Value::Object(_) => {
            serde_json::from_value(value).map_err(|e| PocketError::Import(e.to_string()))?
        }
        _ => {
            return Err(PocketError::Import(
                "expected a JSON object or an array of entries".into(),
            ));
        }
    };
    merge_incoming(state, doc)
}

fn merge_incoming(state: &AppState, doc: IncomingDoc) -> Result<(AppState, ImportSummary)> {
    if let Some(e) = doc.entries.iter().find(|e| e.amount.abs() > MAX_AMOUNT) {
        return Err(PocketError::Import(format!(
            "entry {}: amount {} is above the limit of {}",
            e.id, e.amount, MAX_AMOUNT
        )));
    }

    let mut next = state.clone();
    let mut summary = ImportSummary::default();

    let merge = merge_categories(&state.categories, &doc.categories);
    summary.categories_added = merge.added;
    summary.categories_remapped = merge.remap.len();
    next.categories = merge.categories;

    let mut seen: HashSet<String> = state.entries.iter().map(|e| e.id.clone()).collect();
    let mut fresh = Vec::with_capacity(doc.entries.len());
    for mut e in doc.entries {
        if !seen.insert(e.id.clone()) {
            summary.entries_skipped += 1;
            continue;
        }
        if let Some(winner) = merge.remap.get(&e.category_id) {
            e.category_id = winner.clone();
        }
        fresh.push(e);
    }
    summary.entries_added = fresh.len();
    fresh.append(&mut next.entries);
    next.entries = fresh;

    for (cat_id, amount) in doc.budgets {
        let cat_id = merge.remap.get(&cat_id).cloned().unwrap_or(cat_id);
        if next.has_category(&cat_id) && amount > Decimal::ZERO {
            next.budgets.insert(cat_id, amount);
            summary.budgets_merged += 1;
        } else {
            tracing::debug!(category = %cat_id, "dropping imported budget without a category");
        }
    }

    next.normalize(Utc::now());
    tracing::info!(
        added = summary.entries_added,
        skipped = summary.entries_skipped,
        "import merged"
    );
    Ok((next, summary))
}

/// Imports rows in the CSV export layout. Category names resolve case-insensitively to existing
/// categories; unknown names fall back to the sentinel.
pub fn import_csv(state: &AppState, raw: &str) -> Result<(AppState, ImportSummary)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let mut entries = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let rec = result.map_err(|e| PocketError::Import(e.to_string()))?;
        let row = line + 2;
        let field = |i: usize, name: &str| -> Result<String> {
            rec.get(i)
                .map(str::to_string)
                .ok_or_else(|| PocketError::Import(format!("row {}: {} missing", row, name)))
        };
        let id = field(0, "id")?;
        let kind = EntryKind::from_str(&field(1, "tipo")?)
            .map_err(|e| PocketError::Import(format!("row {}: {}", row, e)))?;
        let amount_raw = field(2, "monto")?;
        let amount = amount_raw
            .parse::<Decimal>()
            .map_err(|_| PocketError::Import(format!("row {}: invalid amount '{}'", row, amount_raw)))?;
        let date_raw = field(3, "fecha")?;
        let date = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d")
            .map_err(|_| PocketError::Import(format!("row {}: invalid date '{}'", row, date_raw)))?;
        let note = rec.get(4).unwrap_or("").to_string();
        let cat_name = rec.get(5).unwrap_or("").to_lowercase();
        let category_id = state
            .categories
            .iter()
            .find(|c| c.name.to_lowercase() == cat_name)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| UNCATEGORIZED_ID.to_string());

        entries.push(Entry {
            id: if id.is_empty() {
                Uuid::new_v4().simple().to_string()
            } else {
                id
            },
            kind,
            amount: amount.abs(),
            date,
            note,
            category_id,
            created_at: None,
        });
    }

    merge_incoming(
        state,
        IncomingDoc {
            entries,
            categories: Vec::new(),
            budgets: Budgets::new(),
        },
    )
}
