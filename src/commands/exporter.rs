// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::exchange::{export_file_name, ExportFormat};
use crate::filters::Scope;
use crate::models::EntryKind;
use crate::store::Pocket;
use crate::utils::{id_for_category, opt_date, today};

pub fn handle(pocket: &Pocket, m: &clap::ArgMatches) -> Result<PathBuf> {
    let format = ExportFormat::from_str(m.get_one::<String>("format").unwrap())?;
    let scope = scope_from_args(pocket, m)?;
    let body = pocket.export(format, &scope)?;

    let out = match m.get_one::<String>("out") {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(export_file_name(format, &scope, today())),
    };
    std::fs::write(&out, body).with_context(|| format!("Write export {}", out.display()))?;
    println!("Exported to {}", out.display());
    Ok(out)
}

pub fn scope_from_args(pocket: &Pocket, m: &clap::ArgMatches) -> Result<Scope> {
    let category = m
        .get_one::<String>("category")
        .map(|c| id_for_category(pocket.state(), c))
        .transpose()?;
    let kind = m
        .get_one::<String>("type")
        .map(|t| EntryKind::from_str(t))
        .transpose()?;
    Ok(Scope::from_parts(
        m.get_one::<String>("scope").map(String::as_str).unwrap_or("all"),
        category,
        opt_date(m, "from")?,
        opt_date(m, "to")?,
        m.get_one::<String>("text").cloned(),
        kind,
    )?)
}
