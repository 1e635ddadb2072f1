// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn date_range_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("from").long("from").value_name("YYYY-MM-DD"))
        .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD"))
}

pub fn build_cli() -> Command {
    Command::new("bolsillo")
        .about("Mi bolsillo: personal income and expense tracker")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("pin")
                .long("pin")
                .global(true)
                .value_name("PIN")
                .help("Unlock a PIN-protected pocket for this command"),
        )
        .subcommand(Command::new("init").about("Create the database and seed categories"))
        .subcommand(
            Command::new("entry")
                .about("Record and list entries")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today"),
                        )
                        .arg(Arg::new("category").long("category").help("Category id or name"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(date_range_args(
                    Command::new("list")
                        .arg(Arg::new("view").long("view").help("all|income|expense"))
                        .arg(Arg::new("query").long("query").help("Note substring"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(json_flag()),
                ))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
                .subcommand(
                    Command::new("clear")
                        .about("Delete all entries, categories and budgets")
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .action(ArgAction::SetTrue)
                                .help("Confirm the reset"),
                        ),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("type").long("type").help("income|expense|both"))
                        .arg(Arg::new("budget").long("budget"))
                        .arg(Arg::new("color").long("color").value_name("#RRGGBB")),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("category")
                            .required(true)
                            .help("Category id or name"),
                    ),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Per-category spending ceilings")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .help("Leave empty to remove the budget"),
                        ),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(Command::new("status").arg(json_flag())),
        )
        .subcommand(
            Command::new("report")
                .about("Totals and summaries")
                .subcommand(date_range_args(Command::new("totals").arg(json_flag())))
                .subcommand(Command::new("by-category").arg(json_flag()))
                .subcommand(
                    Command::new("monthly")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize))
                                .default_value("6"),
                        )
                        .arg(json_flag()),
                )
                .subcommand(Command::new("month").arg(json_flag())),
        )
        .subcommand(date_range_args(
            Command::new("export")
                .about("Export entries as JSON, CSV or printable HTML")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("json")
                        .help("json|csv|html"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .help("Output file; defaults to a dated name in the current dir"),
                )
                .arg(
                    Arg::new("scope")
                        .long("scope")
                        .default_value("all")
                        .help("all|category|date|notes|type"),
                )
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("text").long("text"))
                .arg(Arg::new("type").long("type")),
        ))
        .subcommand(
            Command::new("import")
                .about("Merge a JSON backup/export or a CSV export")
                .arg(Arg::new("path").long("path").required(true))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .help("json|csv; inferred from the extension when omitted"),
                ),
        )
        .subcommand(
            Command::new("pin")
                .about("PIN protection")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("new").long("new").required(true))
                        .arg(Arg::new("current").long("current")),
                )
                .subcommand(Command::new("clear").arg(Arg::new("current").long("current")))
                .subcommand(Command::new("status").arg(json_flag())),
        )
        .subcommand(
            Command::new("view")
                .about("Saved listing view and quick filters")
                .subcommand(date_range_args(
                    Command::new("set")
                        .arg(Arg::new("view").long("view").default_value("all"))
                        .arg(Arg::new("query").long("query")),
                ))
                .subcommand(Command::new("clear"))
                .subcommand(Command::new("show").arg(json_flag())),
        )
        .subcommand(
            Command::new("backup")
                .about("Write a JSON backup now")
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Write even if the last backup is recent"),
                )
                .arg(Arg::new("dir").long("dir").help("Target directory")),
        )
        .subcommand(Command::new("doctor").about("Check data consistency"))
}
