// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use anyhow::Result;

use crate::models::{QuickFilters, View};
use crate::store::Pocket;
use crate::utils::{maybe_print_json, opt_date, pretty_table};

pub fn handle(pocket: &mut Pocket, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let view = View::from_str(sub.get_one::<String>("view").unwrap())?;
            let filters = QuickFilters {
                start: opt_date(sub, "from")?,
                end: opt_date(sub, "to")?,
                query: sub.get_one::<String>("query").cloned().unwrap_or_default(),
            };
            pocket.set_view_settings(view, filters)?;
            println!("Saved view settings");
        }
        Some(("clear", _)) => {
            pocket.set_view_settings(View::All, QuickFilters::default())?;
            println!("Cleared view settings");
        }
        Some(("show", sub)) => {
            let settings = &pocket.state().settings;
            if !maybe_print_json(sub.get_flag("json"), settings)? {
                let f = &settings.filters;
                let show = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
                println!(
                    "{}",
                    pretty_table(
                        &["View", "From", "To", "Query"],
                        vec![vec![
                            format!("{:?}", settings.view).to_lowercase(),
                            show(f.start),
                            show(f.end),
                            f.query.clone(),
                        ]],
                    )
                );
            }
        }
        _ => {}
    }
    Ok(())
}
