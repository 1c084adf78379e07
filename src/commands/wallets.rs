// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::KEY_ACTIVE_WALLET;
use crate::db::SqliteStore;
use crate::models::WalletKind;
use crate::store::LedgerStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle(store: &mut LedgerStore, db: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = WalletKind::parse(sub.get_one::<String>("type").unwrap())
                .ok_or_else(|| anyhow!("Wallet type must be personal or shared"))?;
            let members: Vec<String> = sub
                .get_many::<String>("member")
                .map(|v| v.cloned().collect())
                .unwrap_or_default();
            let w = store.create_wallet(name, kind, &members)?;
            println!("id: {}", w.id);
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("use", sub)) => {
            let r = sub.get_one::<String>("wallet_ref").unwrap();
            let id = store
                .find_wallet(r)
                .map(|w| w.id.clone())
                .ok_or_else(|| anyhow!("Wallet '{}' not found", r.trim()))?;
            store.set_active_wallet(&id);
            db.set_setting(KEY_ACTIVE_WALLET, &id)?;
            println!("Active wallet is now {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn list(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let wallets = store.list_wallets();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &wallets)? {
        return Ok(());
    }
    let active = store.active_wallet_id();
    let rows: Vec<Vec<String>> = wallets
        .iter()
        .map(|w| {
            vec![
                if w.id == active { "*".into() } else { String::new() },
                w.id.clone(),
                w.name.clone(),
                w.kind.to_string(),
                w.members.join(", "),
                fmt_money(&w.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["", "ID", "Name", "Type", "Members", "Balance"], rows)
    );
    Ok(())
}
