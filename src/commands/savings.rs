// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{LedgerStore, NewGoal};
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow, bail};
use serde_json::json;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("contribute", sub)) => {
            if let Some(w) = sub.try_get_one::<String>("wallet").ok().flatten() {
                bail!(
                    "goal contribute always records on the active wallet; run `wallet use {}` first",
                    w.trim()
                );
            }
            let id = sub.get_one::<String>("id").unwrap().trim();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let by = sub.get_one::<String>("by").unwrap();
            if store.contribute(id, amount, by)?.is_none() {
                println!("No saving goal with id {}", id);
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            if store.goal(id).is_none() {
                println!("No saving goal with id {}", id);
            } else if !store.delete_goal(id) {
                println!("Kept saving goal {}", id);
            }
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("show", sub)) => show(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub.get_one::<String>("title").unwrap();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;
    let mut input = NewGoal::new(title, target);
    if let Some(d) = sub.get_one::<String>("deadline") {
        input = input.with_deadline(parse_date(d)?);
    }
    if let Some(members) = sub.get_many::<String>("member") {
        for name in members {
            input = input.with_member(name);
        }
    }
    let goal = store.create_goal(input)?;
    println!("id: {}", goal.id);
    Ok(())
}

fn list(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let goals = store.savings_goals();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &goals)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = goals
        .iter()
        .map(|g| {
            vec![
                g.id.clone(),
                g.title.clone(),
                fmt_money(&g.current_amount),
                fmt_money(&g.target_amount),
                fmt_percent(&g.progress_percent()),
                g.deadline.map(|d| d.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Title", "Saved", "Target", "Progress", "Deadline"], rows)
    );
    println!("Total saved: {}", fmt_money(&store.total_saved()));
    Ok(())
}

fn show(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let goal = store
        .goal(id)
        .ok_or_else(|| anyhow!("Saving goal '{}' not found", id))?;
    let shares = store.member_shares(id);
    let doc = json!({ "goal": goal, "members": shares });
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &doc)? {
        return Ok(());
    }
    println!("{}", goal.title);
    println!("Target Amount: {}", fmt_money(&goal.target_amount));
    println!("Current Amount: {}", fmt_money(&goal.current_amount));
    if let Some(d) = goal.deadline {
        println!("Deadline: {}", d);
    }
    let rows: Vec<Vec<String>> = shares
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                fmt_money(&s.contribution),
                fmt_percent(&s.percent_of_target),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Member", "Contribution", "Of target"], rows));
    Ok(())
}
