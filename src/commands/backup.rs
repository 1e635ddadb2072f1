// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use crate::backup::run_if_due;
use crate::config::Config;
use crate::db;
use crate::store::Pocket;

/// Configured backup directory, else `backups/` under the data dir.
pub fn backup_dir(config: &Config) -> Result<PathBuf> {
    match &config.backup_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(db::data_dir()?.join("backups")),
    }
}

pub fn handle(pocket: &Pocket, m: &clap::ArgMatches, config: &Config) -> Result<()> {
    let dir = match m.get_one::<String>("dir") {
        Some(d) => PathBuf::from(d),
        None => backup_dir(config)?,
    };
    let written = pocket.backup_now(
        &dir,
        config.backup_interval_days,
        Utc::now(),
        m.get_flag("force"),
    )?;
    match written {
        Some(path) => println!("Backup written to {}", path.display()),
        None => println!(
            "Backup not due (interval {} days); use --force to write one now",
            config.backup_interval_days
        ),
    }
    Ok(())
}

/// Startup check; runs while locked too. Failures are logged and never block the command.
pub fn auto(pocket: &Pocket, config: &Config) {
    let result = backup_dir(config).and_then(|dir| {
        Ok(run_if_due(
            pocket.conn(),
            pocket.state(),
            &dir,
            config.backup_interval_days,
            Utc::now(),
            false,
        )?)
    });
    if let Err(err) = result {
        tracing::warn!(error = %err, "automatic backup failed");
    }
}
