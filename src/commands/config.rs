// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{
    KEY_ACTIVE_WALLET, KEY_RETRY_ATTEMPTS, KEY_RETRY_BACKOFF_MS, KEY_SAVINGS_BALANCE,
    LedgerConfig, from_settings, validate_setting,
};
use crate::db::{SqliteStore, db_path};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(db: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(db)?,
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = validate_setting(key, sub.get_one::<String>("value").unwrap())?;
            db.set_setting(key, &value)?;
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}

fn show(db: &SqliteStore) -> Result<()> {
    let stored = db.settings()?;
    let cfg = from_settings(stored.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .unwrap_or_else(|err| {
            tracing::warn!("showing defaults, stored settings are invalid: {err:#}");
            LedgerConfig::default()
        });
    let active = db.get_setting(KEY_ACTIVE_WALLET)?.unwrap_or_default();
    let rows = vec![
        vec![KEY_SAVINGS_BALANCE.to_string(), cfg.savings_balance.to_string()],
        vec![KEY_RETRY_ATTEMPTS.to_string(), cfg.retry.max_attempts.to_string()],
        vec![
            KEY_RETRY_BACKOFF_MS.to_string(),
            cfg.retry.backoff.as_millis().to_string(),
        ],
        vec![KEY_ACTIVE_WALLET.to_string(), active],
        vec!["database".to_string(), db_path()?.display().to_string()],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}
