// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::target_wallet;
use crate::models::Transaction;
use crate::store::LedgerStore;
use anyhow::{Context, Result};
use serde_json::json;

pub fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut rows: Vec<&Transaction> = if sub.get_flag("all") {
        store.transactions().iter().collect()
    } else {
        let wallet_id = target_wallet(store, sub)?;
        store.transactions_for_wallet(&wallet_id)
    };
    // The log is newest-first; exports read oldest-first.
    rows.reverse();
    rows.sort_by(|a, b| a.date.cmp(&b.date));

    let wallet_name = |id: &str| {
        store
            .wallet(id)
            .map(|w| w.name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "id", "date", "wallet", "type", "category", "title", "note", "amount", "goal",
            ])?;
            for t in &rows {
                wtr.write_record([
                    t.id.clone(),
                    t.date.to_string(),
                    wallet_name(&t.wallet_id),
                    t.kind.to_string(),
                    t.category.clone(),
                    t.title.clone().unwrap_or_default(),
                    t.note.clone().unwrap_or_default(),
                    t.amount.to_string(),
                    t.goal_id.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.date.to_string(), "wallet": wallet_name(&t.wallet_id),
                        "type": t.kind, "category": t.category, "title": t.title, "note": t.note,
                        "amount": t.amount.to_string(), "goal": t.goal_id
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
