// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::target_wallet;
use crate::models::saturating_sum;
use crate::store::LedgerStore;
use crate::utils::{MONTH_NAMES, fmt_money, fmt_percent, maybe_print_json, parse_year, pretty_table};
use anyhow::Result;
use std::collections::BTreeMap;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("refresh", sub)) => {
            let wallet_id = target_wallet(store, sub)?;
            if store.recompute_current_year(&wallet_id) {
                println!("Analytics for {} updated", store.current_year());
            } else {
                println!("Analytics for {} already up to date", store.current_year());
            }
        }
        Some(("history", sub)) => history(store, sub)?,
        Some(("archive", sub)) => {
            let wallet_id = target_wallet(store, sub)?;
            let year = parse_year(sub.get_one::<String>("year").unwrap())?;
            if store.archive_year(&wallet_id, year)? {
                println!("Archived {}", year);
            } else {
                println!("{} is already archived", year);
            }
        }
        Some(("breakdown", sub)) => breakdown(store, sub)?,
        Some(("trend", sub)) => trend(store, sub)?,
        Some(("overview", sub)) => overview(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn history(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    // The current year is a live view; bring it up to date before reading.
    let wallet_id = target_wallet(store, sub)?;
    store.recompute_current_year(&wallet_id);

    let years = match sub.get_one::<String>("year") {
        Some(y) => vec![parse_year(y)?],
        None => store.history_years(),
    };
    let mut selected = BTreeMap::new();
    for y in years {
        if let Some(totals) = store.history_for(y) {
            selected.insert(y, *totals);
        }
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &selected)? {
        return Ok(());
    }
    if selected.is_empty() {
        println!("No analytics history yet");
        return Ok(());
    }
    let mut headers = vec!["Year"];
    headers.extend(MONTH_NAMES);
    headers.push("Total");
    let rows: Vec<Vec<String>> = selected
        .iter()
        .rev()
        .map(|(y, totals)| {
            let mut row = vec![y.to_string()];
            row.extend(totals.iter().map(fmt_money));
            row.push(fmt_money(&saturating_sum(totals.iter().copied())));
            row
        })
        .collect();
    println!("{}", pretty_table(&headers, rows));
    Ok(())
}

fn breakdown(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = target_wallet(store, sub)?;
    let data = store.category_breakdown(&wallet_id);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("Start adding expenses to see analytics");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|c| vec![c.name.clone(), fmt_money(&c.total), fmt_percent(&c.percent)])
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    Ok(())
}

fn trend(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = target_wallet(store, sub)?;
    let months = *sub.get_one::<usize>("months").unwrap_or(&6);
    let data = store.monthly_trend(&wallet_id, months);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|m| {
            vec![
                format!("{} {}", MONTH_NAMES[(m.month - 1) as usize], m.year),
                fmt_money(&m.expenses),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Expenses"], rows));
    Ok(())
}

fn overview(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = target_wallet(store, sub)?;
    let o = store.overview(&wallet_id);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &o)? {
        return Ok(());
    }
    let month = format!("{} {}", MONTH_NAMES[(o.focus_month - 1) as usize], o.focus_year);
    let rows = vec![
        vec!["All-time income".into(), fmt_money(&o.income)],
        vec!["All-time outflow".into(), fmt_money(&o.outflow)],
        vec!["All-time net".into(), fmt_money(&o.net)],
        vec![format!("{} income", month), fmt_money(&o.month_income)],
        vec![format!("{} expenses", month), fmt_money(&o.month_expenses)],
        vec![format!("{} savings", month), fmt_money(&o.month_savings)],
        vec![format!("{} net", month), fmt_money(&o.month_net)],
        vec!["Saved across goals".into(), fmt_money(&o.total_saved)],
    ];
    println!("{}", pretty_table(&["", "Amount"], rows));
    if !o.recent.is_empty() {
        let recent: Vec<Vec<String>> = o
            .recent
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.title.clone().unwrap_or_else(|| t.category.clone()),
                    fmt_money(&t.amount),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Type", "Title", "Amount"], recent));
    }
    Ok(())
}
