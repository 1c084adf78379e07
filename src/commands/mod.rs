// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analytics;
pub mod categories;
pub mod config;
pub mod console;
pub mod doctor;
pub mod exporter;
pub mod savings;
pub mod transactions;
pub mod wallets;

use crate::store::LedgerStore;
use anyhow::{Result, anyhow};

/// Wallet named by the global `--wallet` flag, else the active wallet.
pub fn target_wallet(store: &LedgerStore, m: &clap::ArgMatches) -> Result<String> {
    match m.try_get_one::<String>("wallet").ok().flatten() {
        Some(r) => store
            .find_wallet(r)
            .map(|w| w.id.clone())
            .ok_or_else(|| anyhow!("Wallet '{}' not found", r.trim())),
        None => Ok(store.active_wallet_id().to_string()),
    }
}
