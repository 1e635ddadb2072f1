// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::store::Pocket;
use crate::utils::{fmt_money, id_for_category, maybe_print_json, pretty_table};

pub fn handle(pocket: &mut Pocket, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(pocket, sub)?,
        Some(("list", sub)) => list(pocket, sub)?,
        Some(("status", sub)) => status(pocket, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(pocket: &mut Pocket, sub: &clap::ArgMatches) -> Result<()> {
    let cat = sub.get_one::<String>("category").unwrap();
    let cat_id = id_for_category(pocket.state(), cat)?;
    let raw = sub.get_one::<String>("amount").map(String::as_str);
    match pocket.set_budget(&cat_id, raw)? {
        Some(v) => println!("Budget set for {} = {}", cat, fmt_money(&v)),
        None => println!("Budget removed for {}", cat),
    }
    Ok(())
}

#[derive(Serialize)]
struct BudgetRow<'a> {
    category: &'a str,
    budget: String,
}

fn list(pocket: &Pocket, sub: &clap::ArgMatches) -> Result<()> {
    let state = pocket.state();
    let data: Vec<BudgetRow> = state
        .budgets
        .iter()
        .map(|(id, amount)| BudgetRow {
            category: state.category_name(id),
            budget: format!("{:.2}", amount),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows = data
            .iter()
            .map(|r| vec![r.category.to_string(), r.budget.clone()])
            .collect();
        println!("{}", pretty_table(&["Category", "Budget"], rows));
    }
    Ok(())
}

fn status(pocket: &Pocket, sub: &clap::ArgMatches) -> Result<()> {
    let usage = pocket.budget_usage();
    if !maybe_print_json(sub.get_flag("json"), &usage)? {
        let rows = usage
            .iter()
            .map(|u| {
                vec![
                    u.name.clone(),
                    fmt_money(&u.budget),
                    fmt_money(&u.spent),
                    fmt_money(&u.remaining),
                    format!("{}%", u.percent_used),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Budget", "Spent", "Remaining", "Used"], rows)
        );
    }
    Ok(())
}
