// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use walletbook::commands::console::{ConsoleNotifier, StdinConfirm};
use walletbook::config::{KEY_ACTIVE_WALLET, LedgerConfig, from_settings};
use walletbook::ports::AutoConfirm;
use walletbook::store::{LedgerEvent, LedgerStore};
use walletbook::{cli, commands, db};

/// Log filter variable, e.g. `WALLETBOOK_LOG=walletbook=debug`.
const LOG_ENV: &str = "WALLETBOOK_LOG";

fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = cli::build_cli().get_matches();

    let sqlite = db::SqliteStore::open_or_init()?;
    let settings = sqlite.settings()?;
    let config = match from_settings(settings.iter().map(|(k, v)| (k.as_str(), v.as_str()))) {
        Ok(cfg) => cfg,
        Err(err) => {
            // Stay usable so `config set` can repair the bad value.
            tracing::warn!("ignoring stored settings: {err:#}");
            LedgerConfig::default()
        }
    };

    let builder = LedgerStore::builder(sqlite.clone())
        .notifier(ConsoleNotifier)
        .config(config);
    let builder = if matches.get_flag("yes") {
        builder.confirm(AutoConfirm(true))
    } else {
        builder.confirm(StdinConfirm)
    };
    let mut store = builder.open();

    if let Some(active) = sqlite.get_setting(KEY_ACTIVE_WALLET)? {
        if !store.set_active_wallet(&active) {
            tracing::warn!(wallet = %active, "saved active wallet no longer exists");
        }
    }

    // Keep the current-year snapshot in step with any change to the log.
    let dirty = Rc::new(Cell::new(false));
    let flag = Rc::clone(&dirty);
    store.subscribe(move |event| {
        if matches!(
            event,
            LedgerEvent::TransactionAdded { .. }
                | LedgerEvent::TransactionDeleted { .. }
                | LedgerEvent::GoalContributed { .. }
                | LedgerEvent::GoalDeleted { .. }
        ) {
            flag.set(true);
        }
    });

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("wallet", sub)) => commands::wallets::handle(&mut store, &sqlite, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("goal", sub)) => commands::savings::handle(&mut store, sub)?,
        Some(("analytics", sub)) => commands::analytics::handle(&mut store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("config", sub)) => commands::config::handle(&sqlite, sub)?,
        Some(("categories", _)) => commands::categories::handle()?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    if dirty.get() {
        let active = store.active_wallet_id().to_string();
        store.recompute_current_year(&active);
    }
    Ok(())
}
