// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use bolsillo::config::Config;
use bolsillo::store::Pocket;
use bolsillo::{cli, commands, db, logging};

fn main() -> Result<()> {
    logging::init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let config = Config::load_from(&db::config_dir()?).context("Load config.json")?;
    let mut pocket = Pocket::open(&conn, &config)?;

    if let Some(pin) = matches.get_one::<String>("pin") {
        pocket.unlock(pin)?;
    }
    if matches.subcommand_name() != Some("backup") {
        commands::backup::auto(&pocket, &config);
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            let path = db::db_path()?;
            if pocket.init()? {
                println!("Database initialized at {}", path.display());
            } else {
                println!("Database already initialized at {}", path.display());
            }
        }
        Some(("entry", sub)) => commands::entries::handle(&mut pocket, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut pocket, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut pocket, sub)?,
        Some(("report", sub)) => commands::reports::handle(&pocket, sub)?,
        Some(("export", sub)) => {
            commands::exporter::handle(&pocket, sub)?;
        }
        Some(("import", sub)) => {
            commands::importer::handle(&mut pocket, sub)?;
        }
        Some(("pin", sub)) => commands::pin::handle(&mut pocket, sub)?,
        Some(("view", sub)) => commands::view::handle(&mut pocket, sub)?,
        Some(("backup", sub)) => commands::backup::handle(&pocket, sub, &config)?,
        Some(("doctor", _)) => commands::doctor::handle(&pocket)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
