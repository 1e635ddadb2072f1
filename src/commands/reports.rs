// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::aggregate::{month_summary, Totals, DEFAULT_MONTHS};
use crate::store::Pocket;
use crate::utils::{fmt_money, maybe_print_json, opt_date, pretty_table, today};

pub fn handle(pocket: &Pocket, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("totals", sub)) => totals(pocket, sub)?,
        Some(("by-category", sub)) => by_category(pocket, sub)?,
        Some(("monthly", sub)) => monthly(pocket, sub)?,
        Some(("month", sub)) => {
            let t = month_summary(&pocket.state().entries, today());
            if !maybe_print_json(sub.get_flag("json"), &t)? {
                print_totals("This month", &t);
            }
        }
        _ => {}
    }
    Ok(())
}

fn print_totals(title: &str, t: &Totals) {
    println!(
        "{}",
        pretty_table(
            &[title, "Amount"],
            vec![
                vec!["Income".into(), fmt_money(&t.incomes)],
                vec!["Expense".into(), fmt_money(&t.expenses)],
                vec!["Balance".into(), fmt_money(&t.total)],
            ],
        )
    );
}

fn totals(pocket: &Pocket, sub: &clap::ArgMatches) -> Result<()> {
    let start = opt_date(sub, "from")?;
    let end = opt_date(sub, "to")?;
    let t = if start.is_some() || end.is_some() {
        pocket.totals_for_period(start, end)
    } else {
        pocket.totals()
    };
    if !maybe_print_json(sub.get_flag("json"), &t)? {
        print_totals("Totals", &t);
    }
    Ok(())
}

fn by_category(pocket: &Pocket, sub: &clap::ArgMatches) -> Result<()> {
    let data = pocket.totals_by_category();
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    fmt_money(&r.income),
                    fmt_money(&r.expense),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Income", "Expense"], rows));
    }
    Ok(())
}

fn monthly(pocket: &Pocket, sub: &clap::ArgMatches) -> Result<()> {
    let months = sub
        .get_one::<usize>("months")
        .copied()
        .unwrap_or(DEFAULT_MONTHS);
    let data = pocket.monthly(months, today());
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows = data
            .iter()
            .map(|b| {
                vec![
                    b.label.clone(),
                    format!("{:.2}", b.income),
                    format!("{:.2}", b.expense),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
    }
    Ok(())
}
