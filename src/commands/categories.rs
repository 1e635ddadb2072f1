// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use anyhow::Result;

use crate::models::{CategoryDraft, CategoryKind};
use crate::store::Pocket;
use crate::utils::{fmt_money, id_for_category, maybe_print_json, pretty_table};

pub fn handle(pocket: &mut Pocket, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = match sub.get_one::<String>("type") {
                Some(t) => CategoryKind::from_str(t)?,
                None => CategoryKind::default(),
            };
            let mut draft = CategoryDraft::new(name.as_str(), kind);
            if let Some(b) = sub.get_one::<String>("budget") {
                draft = draft.budget(b.as_str());
            }
            if let Some(c) = sub.get_one::<String>("color") {
                draft = draft.color(c.as_str());
            }
            let cat = pocket.add_category(draft)?;
            println!("Added category '{}' ({})", cat.name, cat.id);
        }
        Some(("list", sub)) => {
            let state = pocket.state();
            if !maybe_print_json(sub.get_flag("json"), &state.categories)? {
                let data: Vec<Vec<String>> = state
                    .categories
                    .iter()
                    .map(|c| {
                        vec![
                            c.name.clone(),
                            c.kind.to_string(),
                            c.color.clone(),
                            state.budgets.get(&c.id).map(fmt_money).unwrap_or_default(),
                            c.id.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Category", "Type", "Color", "Budget", "Id"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("category").unwrap();
            let id = id_for_category(pocket.state(), key)?;
            let removal = pocket.delete_category(&id)?;
            println!(
                "Removed category '{}'; {} entries moved to '{}'",
                removal.category.name,
                removal.reassigned,
                crate::models::UNCATEGORIZED_NAME
            );
        }
        _ => {}
    }
    Ok(())
}
