// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::store::Pocket;
use crate::utils::{maybe_print_json, pretty_table};

/// `--current` falls back to the global `--pin` so a single flag works for both.
fn current_pin<'a>(sub: &'a clap::ArgMatches) -> Option<&'a str> {
    sub.get_one::<String>("current")
        .or_else(|| sub.get_one::<String>("pin"))
        .map(String::as_str)
}

pub fn handle(pocket: &mut Pocket, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let new_pin = sub.get_one::<String>("new").unwrap();
            pocket.set_pin(current_pin(sub), new_pin)?;
            println!("PIN saved");
        }
        Some(("clear", sub)) => {
            pocket.clear_pin(current_pin(sub))?;
            println!("PIN removed");
        }
        Some(("status", sub)) => {
            let status = pocket.pin_status();
            if !maybe_print_json(sub.get_flag("json"), &status)? {
                println!(
                    "{}",
                    pretty_table(
                        &["PIN set", "Unlocked"],
                        vec![vec![
                            yes_no(status.pin_set).into(),
                            yes_no(status.unlocked).into()
                        ]],
                    )
                );
            }
        }
        _ => {}
    }
    Ok(())
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
