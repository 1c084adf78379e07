// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::rc::Rc;
use walletbook::config::{LedgerConfig, RetryPolicy};
use walletbook::models::{DEFAULT_WALLET_ID, LoadedState, Wallet, WalletKind};
use walletbook::ports::{
    Clock, CollectionKind, FixedClock, MemoryPersistence, NoticeKind, NoticeLog,
};
use walletbook::store::{LedgerEvent, LedgerStore};

fn setup() -> (LedgerStore, MemoryPersistence, NoticeLog) {
    let db = MemoryPersistence::new();
    let notes = NoticeLog::new();
    let store = LedgerStore::builder(db.clone())
        .notifier(notes.clone())
        .clock(FixedClock::on(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()))
        .config(LedgerConfig::default().with_retry(RetryPolicy::none()))
        .open();
    (store, db, notes)
}

#[test]
fn empty_ledger_is_seeded_with_default_wallet() {
    let (store, db, _) = setup();
    let wallets = store.list_wallets();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].id, DEFAULT_WALLET_ID);
    assert_eq!(wallets[0].name, "My Wallet");
    assert_eq!(wallets[0].kind, WalletKind::Personal);
    assert_eq!(wallets[0].balance, Decimal::ZERO);
    assert_eq!(store.active_wallet_id(), DEFAULT_WALLET_ID);
    // Seeding is not a mutation; nothing is written until something changes.
    assert_eq!(db.total_writes(), 0);
}

#[test]
fn loaded_wallets_are_kept_and_first_becomes_active() {
    let mut shared = Wallet::seed();
    shared.id = "w1".into();
    shared.name = "House".into();
    shared.kind = WalletKind::Shared;
    let state = LoadedState {
        wallets: vec![shared, Wallet::seed()],
        ..LoadedState::default()
    };
    let store = LedgerStore::builder(MemoryPersistence::with_state(state)).open();
    assert_eq!(store.list_wallets().len(), 2);
    assert_eq!(store.active_wallet_id(), "w1");
}

#[test]
fn create_wallet_trims_and_dedupes_members() {
    let (mut store, db, notes) = setup();
    let members = vec![" Ana ".to_string(), "".to_string(), "Ana".to_string(), "Ben".to_string()];
    let w = store
        .create_wallet("  Main  ", WalletKind::Shared, &members)
        .unwrap();
    assert_eq!(w.name, "Main");
    assert_eq!(w.members, vec!["Ana".to_string(), "Ben".to_string()]);
    assert_eq!(w.balance, Decimal::ZERO);
    assert_eq!(store.list_wallets().len(), 2);
    assert_eq!(db.writes(CollectionKind::Wallets), 1);
    assert_eq!(db.state().wallets.len(), 2);
    assert_eq!(
        notes.last(),
        Some((NoticeKind::Success, "Wallet 'Main' created!".to_string()))
    );
}

#[test]
fn blank_wallet_name_is_rejected_without_writes() {
    let (mut store, db, notes) = setup();
    let err = store
        .create_wallet("   ", WalletKind::Personal, &[])
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.list_wallets().len(), 1);
    assert_eq!(db.total_writes(), 0);
    assert_eq!(
        notes.last(),
        Some((NoticeKind::Error, "Please enter a wallet name".to_string()))
    );
}

#[test]
fn ids_are_unique_when_clock_stands_still() {
    let (mut store, _, _) = setup();
    let a = store.create_wallet("A", WalletKind::Personal, &[]).unwrap();
    let b = store.create_wallet("B", WalletKind::Personal, &[]).unwrap();
    assert_ne!(a.id, b.id);
    let (na, nb): (i64, i64) = (a.id.parse().unwrap(), b.id.parse().unwrap());
    assert_eq!(nb, na + 1);
}

#[test]
fn ids_follow_the_clock_once_it_moves() {
    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    let mut store = LedgerStore::builder(MemoryPersistence::new())
        .clock(clock.clone())
        .open();
    let start = clock.now().timestamp_millis();

    let a = store.create_wallet("A", WalletKind::Personal, &[]).unwrap();
    assert_eq!(a.id, start.to_string());

    clock.advance(chrono::Duration::seconds(1));
    let b = store.create_wallet("B", WalletKind::Personal, &[]).unwrap();
    assert_eq!(b.id, (start + 1000).to_string());

    // A clock that steps backwards still yields increasing ids.
    clock.set(clock.now() - chrono::Duration::hours(1));
    let c = store.create_wallet("C", WalletKind::Personal, &[]).unwrap();
    assert_eq!(c.id, (start + 1001).to_string());
}

#[test]
fn active_wallet_accepts_unknown_ids() {
    let (mut store, _, _) = setup();
    let w = store.create_wallet("Trip", WalletKind::Shared, &[]).unwrap();
    assert!(store.set_active_wallet(&w.id));
    assert_eq!(store.active_wallet().map(|x| x.name.as_str()), Some("Trip"));

    assert!(!store.set_active_wallet("nope"));
    assert_eq!(store.active_wallet_id(), "nope");
    assert!(store.active_wallet().is_none());
}

#[test]
fn find_wallet_matches_id_then_name() {
    let (mut store, _, _) = setup();
    let w = store.create_wallet("Trip", WalletKind::Shared, &[]).unwrap();
    assert_eq!(store.find_wallet(&w.id).map(|x| x.id.clone()), Some(w.id.clone()));
    assert_eq!(store.find_wallet(" Trip ").map(|x| x.id.clone()), Some(w.id));
    assert!(store.find_wallet("trip").is_none());
}

#[test]
fn subscribers_hear_wallet_events_until_unsubscribed() {
    let (mut store, _, _) = setup();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = store.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    let w = store.create_wallet("Main", WalletKind::Personal, &[]).unwrap();
    store.set_active_wallet(&w.id);
    // Same id again is not a change.
    store.set_active_wallet(&w.id);
    assert_eq!(
        *seen.borrow(),
        vec![
            LedgerEvent::WalletCreated { wallet_id: w.id.clone() },
            LedgerEvent::ActiveWalletChanged { wallet_id: w.id.clone() },
        ]
    );

    assert!(store.unsubscribe(sub));
    assert!(!store.unsubscribe(sub));
    store.create_wallet("Other", WalletKind::Personal, &[]).unwrap();
    assert_eq!(seen.borrow().len(), 2);
}
