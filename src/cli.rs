// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    )
}

fn member_arg() -> Arg {
    Arg::new("member")
        .long("member")
        .action(ArgAction::Append)
        .help("Member name; repeat for several")
}

pub fn build_cli() -> Command {
    Command::new("walletbook")
        .version(clap::crate_version!())
        .about("Wallets, savings goals and spending analytics")
        .arg(
            Arg::new("wallet")
                .long("wallet")
                .global(true)
                .help("Wallet id or name to act on (defaults to the active wallet)"),
        )
        .arg(
            Arg::new("yes")
                .long("yes")
                .short('y')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Answer yes to confirmation prompts"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("wallet")
                .about("Manage wallets")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("personal")
                                .value_parser(["personal", "shared"]),
                        )
                        .arg(member_arg()),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("use").arg(Arg::new("wallet_ref").required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record, remove and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .value_parser(["expense", "income", "savings"]),
                        )
                        .arg(Arg::new("amount").long("amount").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("title").long("title"))
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
                .subcommand(json_args(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("deadline").long("deadline"))
                        .arg(member_arg()),
                )
                .subcommand(
                    Command::new("contribute")
                        .about("Add to a goal; the savings entry goes on the active wallet")
                        .after_help("--wallet is not accepted here; switch with `wallet use` first.")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("amount").long("amount").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("by").long("by").default_value("You")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
                .subcommand(json_args(Command::new("list")))
                .subcommand(json_args(
                    Command::new("show").arg(Arg::new("id").long("id").required(true)),
                )),
        )
        .subcommand(
            Command::new("analytics")
                .about("Spending analytics")
                .subcommand(Command::new("refresh"))
                .subcommand(json_args(Command::new("history").arg(Arg::new("year").long("year"))))
                .subcommand(Command::new("archive").arg(Arg::new("year").long("year").required(true)))
                .subcommand(json_args(Command::new("breakdown")))
                .subcommand(json_args(
                    Command::new("trend").arg(
                        Arg::new("months")
                            .long("months")
                            .default_value("6")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(json_args(Command::new("overview"))),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .value_parser(["csv", "json"]),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Export every wallet instead of one"),
                    ),
            ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                ),
        )
        .subcommand(Command::new("categories").about("List categories"))
        .subcommand(Command::new("doctor").about("Check ledger consistency"))
}
