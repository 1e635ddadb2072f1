// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::lifecycle::BudgetAlert;
use crate::models::{EntryDraft, EntryKind, QuickFilters, View};
use crate::store::{EntryAdded, Pocket};
use crate::utils::{
    fmt_money, id_for_category, maybe_print_json, opt_date, parse_date, parse_decimal,
    pretty_table, today,
};

pub fn handle(pocket: &mut Pocket, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            add(pocket, sub)?;
        }
        Some(("list", sub)) => list(pocket, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            if pocket.delete_entry(id)? {
                println!("Removed entry {}", id);
            } else {
                println!("No entry with id {}", id);
            }
        }
        Some(("clear", sub)) => {
            if !sub.get_flag("yes") {
                bail!("Refusing to delete everything without --yes");
            }
            pocket.clear_all()?;
            println!("All entries, categories and budgets were reset");
        }
        _ => {}
    }
    Ok(())
}

pub fn add(pocket: &mut Pocket, sub: &clap::ArgMatches) -> Result<EntryAdded> {
    let kind = EntryKind::from_str(sub.get_one::<String>("type").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let mut draft = EntryDraft::new(kind, amount, date)?;
    if let Some(note) = sub.get_one::<String>("note") {
        draft = draft.note(note.as_str());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        draft = draft.category(id_for_category(pocket.state(), cat)?);
    }

    let added = pocket.add_entry(draft)?;
    let e = &added.entry;
    println!(
        "Recorded {} {} on {} ({})",
        e.kind,
        fmt_money(&e.amount),
        e.date,
        pocket.state().category_name(&e.category_id)
    );
    if let Some(alert) = &added.alert {
        print_alert(alert);
    }
    Ok(added)
}

pub fn print_alert(alert: &BudgetAlert) {
    println!(
        "⚠ Budget reached for '{}': spent {} of {}",
        alert.category_name,
        fmt_money(&alert.spent),
        fmt_money(&alert.budget)
    );
}

#[derive(Serialize)]
pub struct EntryRow {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub note: String,
}

/// Listing rows; flags override the saved view settings.
pub fn query_rows(pocket: &Pocket, sub: &clap::ArgMatches) -> Result<Vec<EntryRow>> {
    let view = sub
        .get_one::<String>("view")
        .map(|v| View::from_str(v))
        .transpose()?;
    let start = opt_date(sub, "from")?;
    let end = opt_date(sub, "to")?;
    let query = sub.get_one::<String>("query").cloned();
    let quick = if start.is_some() || end.is_some() || query.is_some() {
        Some(QuickFilters {
            start,
            end,
            query: query.unwrap_or_default(),
        })
    } else {
        None
    };

    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    let state = pocket.state();
    Ok(pocket
        .listing(view, quick.as_ref())
        .into_iter()
        .take(limit)
        .map(|e| EntryRow {
            category: state.category_name(&e.category_id).to_string(),
            id: e.id,
            date: e.date.to_string(),
            kind: e.kind.to_string(),
            amount: format!("{:.2}", e.amount),
            note: e.note,
        })
        .collect())
}

fn list(pocket: &Pocket, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(pocket, sub)?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.note.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Type", "Amount", "Category", "Note", "Id"], rows)
        );
    }
    Ok(())
}
