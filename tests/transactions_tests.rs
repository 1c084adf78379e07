// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use walletbook::config::{LedgerConfig, RetryPolicy, SavingsBalancePolicy};
use walletbook::models::{NewTransaction, TransactionKind, WalletKind};
use walletbook::ports::{CollectionKind, FixedClock, MemoryPersistence, NoticeKind, NoticeLog};
use walletbook::store::LedgerStore;
use walletbook::{cli, commands::transactions};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup_with(policy: SavingsBalancePolicy) -> (LedgerStore, MemoryPersistence, NoticeLog) {
    let db = MemoryPersistence::new();
    let notes = NoticeLog::new();
    let store = LedgerStore::builder(db.clone())
        .notifier(notes.clone())
        .clock(FixedClock::on(day("2025-03-14")))
        .config(
            LedgerConfig::default()
                .with_savings_balance(policy)
                .with_retry(RetryPolicy::none()),
        )
        .open();
    (store, db, notes)
}

fn setup() -> (LedgerStore, MemoryPersistence, NoticeLog) {
    setup_with(SavingsBalancePolicy::default())
}

fn balance(store: &LedgerStore, wallet_id: &str) -> Decimal {
    store.wallet(wallet_id).unwrap().balance
}

#[test]
fn income_expense_delete_scenario() {
    let (mut store, db, notes) = setup();
    let main = store.create_wallet("Main", WalletKind::Personal, &[]).unwrap();
    assert_eq!(balance(&store, &main.id), Decimal::ZERO);

    store
        .add_transaction(NewTransaction::new(
            TransactionKind::Income,
            d("100"),
            "income",
            day("2025-03-01"),
            &main.id,
        ))
        .unwrap();
    assert_eq!(balance(&store, &main.id), d("100.00"));

    let expense = store
        .add_transaction(
            NewTransaction::new(TransactionKind::Expense, d("40"), "food", day("2025-03-02"), &main.id)
                .with_title("Groceries"),
        )
        .unwrap();
    assert_eq!(balance(&store, &main.id), d("60.00"));
    assert_eq!(notes.last(), Some((NoticeKind::Success, "Transaction added!".to_string())));

    let removed = store.delete_transaction(&expense.id).unwrap();
    assert_eq!(removed.id, expense.id);
    assert_eq!(balance(&store, &main.id), d("100.00"));
    assert_eq!(store.transactions().len(), 1);

    // Each add and delete writes transactions and wallets once.
    assert_eq!(db.writes(CollectionKind::Transactions), 3);
    assert_eq!(db.state().transactions.len(), 1);
    assert_eq!(db.state().wallets[1].balance, d("100"));
}

#[test]
fn add_then_delete_restores_prior_state_exactly() {
    let (mut store, _, _) = setup();
    let wid = store.active_wallet_id().to_string();
    store
        .add_transaction(NewTransaction::new(TransactionKind::Income, d("12.34"), "income", day("2025-01-05"), &wid))
        .unwrap();
    let before = store.snapshot();

    let tx = store
        .add_transaction(NewTransaction::new(TransactionKind::Expense, d("0.1"), "bills", day("2025-01-06"), &wid))
        .unwrap();
    store.delete_transaction(&tx.id).unwrap();

    let after = store.snapshot();
    assert_eq!(after.transactions, before.transactions);
    assert_eq!(after.wallets, before.wallets);
}

#[test]
fn balance_matches_signed_sum_under_every_policy() {
    for policy in [
        SavingsBalancePolicy::Excluded,
        SavingsBalancePolicy::Credit,
        SavingsBalancePolicy::Debit,
    ] {
        let (mut store, _, _) = setup_with(policy);
        let wid = store.active_wallet_id().to_string();
        let mut ids = Vec::new();
        for (kind, amount, cat) in [
            (TransactionKind::Income, "250", "income"),
            (TransactionKind::Expense, "19.99", "transport"),
            (TransactionKind::Savings, "30", "savings"),
            (TransactionKind::Expense, "5.01", "food"),
            (TransactionKind::Savings, "12.5", ""),
        ] {
            let tx = store
                .add_transaction(NewTransaction::new(kind, d(amount), cat, day("2025-02-10"), &wid))
                .unwrap();
            ids.push(tx.id);
        }
        store.delete_transaction(&ids[1]).unwrap();
        store.delete_transaction(&ids[2]).unwrap();

        assert_eq!(balance(&store, &wid), store.derived_balance(&wid), "{policy}");
        let expected = match policy {
            SavingsBalancePolicy::Excluded => d("244.99"),
            SavingsBalancePolicy::Credit => d("257.49"),
            SavingsBalancePolicy::Debit => d("232.49"),
        };
        assert_eq!(balance(&store, &wid), expected, "{policy}");
    }
}

#[test]
fn balance_tracks_log_over_long_mixed_sequence() {
    let (mut store, _, _) = setup_with(SavingsBalancePolicy::Debit);
    let first = store.active_wallet_id().to_string();
    let second = store.create_wallet("Shared", WalletKind::Shared, &[]).unwrap().id;
    let wallets = [first, second];

    // Small linear congruential generator; the sequence is the same every run.
    let mut seed: u64 = 0x2545_f491;
    let mut next = move |bound: u64| {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) % bound
    };

    let mut live: Vec<String> = Vec::new();
    for step in 0..200 {
        let wid = &wallets[next(2) as usize];
        if !live.is_empty() && next(3) == 0 {
            let id = live.remove(next(live.len() as u64) as usize);
            store.delete_transaction(&id).unwrap();
        } else {
            let (kind, cat) = match next(3) {
                0 => (TransactionKind::Income, "income"),
                1 => (TransactionKind::Expense, "food"),
                _ => (TransactionKind::Savings, "savings"),
            };
            let amount = Decimal::new(next(100_000) as i64 + 1, 2);
            let tx = store
                .add_transaction(NewTransaction::new(kind, amount, cat, day("2025-02-10"), wid))
                .unwrap();
            live.push(tx.id);
        }
        for w in &wallets {
            assert_eq!(balance(&store, w), store.derived_balance(w), "step {step} wallet {w}");
        }
    }
    assert_eq!(store.transactions().len(), live.len());
}

#[test]
fn overflowing_amount_is_rejected() {
    let (mut store, db, notes) = setup();
    let wid = store.active_wallet_id().to_string();
    store
        .add_transaction(NewTransaction::new(TransactionKind::Income, Decimal::MAX, "income", day("2025-03-01"), &wid))
        .unwrap();
    let before = store.snapshot();
    let writes = db.total_writes();

    let err = store
        .add_transaction(NewTransaction::new(TransactionKind::Income, Decimal::MAX, "income", day("2025-03-02"), &wid))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.snapshot(), before);
    assert_eq!(db.total_writes(), writes);
    assert_eq!(notes.last(), Some((NoticeKind::Error, "Amount is too large".to_string())));

    // Moving back toward zero is still fine.
    store
        .add_transaction(NewTransaction::new(TransactionKind::Expense, Decimal::MAX, "bills", day("2025-03-03"), &wid))
        .unwrap();
    assert_eq!(balance(&store, &wid), Decimal::ZERO);
}

#[test]
fn non_positive_amounts_change_nothing() {
    let (mut store, db, notes) = setup();
    let wid = store.active_wallet_id().to_string();
    let before = store.snapshot();
    for amount in ["0", "-5"] {
        let err = store
            .add_transaction(NewTransaction::new(TransactionKind::Expense, d(amount), "food", day("2025-03-01"), &wid))
            .unwrap_err();
        assert!(err.is_validation());
    }
    assert_eq!(store.snapshot(), before);
    assert_eq!(db.total_writes(), 0);
    assert_eq!(notes.count(NoticeKind::Error), 2);
    assert_eq!(notes.last(), Some((NoticeKind::Error, "Amount must be positive".to_string())));
}

#[test]
fn categories_must_fit_the_transaction_type() {
    let (mut store, _, notes) = setup();
    let wid = store.active_wallet_id().to_string();
    let date = day("2025-03-01");

    assert!(store
        .add_transaction(NewTransaction::new(TransactionKind::Income, d("10"), "food", date, &wid))
        .is_err());
    assert!(store
        .add_transaction(NewTransaction::new(TransactionKind::Expense, d("10"), "income", date, &wid))
        .is_err());
    assert!(store
        .add_transaction(NewTransaction::new(TransactionKind::Expense, d("10"), "bogus", date, &wid))
        .is_err());
    assert_eq!(notes.last(), Some((NoticeKind::Error, "Unknown category 'bogus'".to_string())));
    assert!(store
        .add_transaction(NewTransaction::new(TransactionKind::Expense, d("10"), "  ", date, &wid))
        .is_err());
    assert_eq!(notes.last(), Some((NoticeKind::Error, "Please fill in required fields".to_string())));
    assert!(store.transactions().is_empty());

    let saved = store
        .add_transaction(NewTransaction::new(TransactionKind::Savings, d("10"), "", date, &wid))
        .unwrap();
    assert_eq!(saved.category, "savings");
    assert_eq!(notes.last(), Some((NoticeKind::Success, "Great job saving!".to_string())));
}

#[test]
fn blank_title_and_note_are_dropped() {
    let (mut store, _, _) = setup();
    let wid = store.active_wallet_id().to_string();
    let tx = store
        .add_transaction(
            NewTransaction::new(TransactionKind::Expense, d("3"), "food", day("2025-03-01"), &wid)
                .with_title("  ")
                .with_note(" coffee "),
        )
        .unwrap();
    assert_eq!(tx.title, None);
    assert_eq!(tx.note.as_deref(), Some("coffee"));
}

#[test]
fn unknown_wallet_keeps_transaction_but_moves_no_balance() {
    let (mut store, _, _) = setup();
    let tx = store
        .add_transaction(NewTransaction::new(TransactionKind::Income, d("50"), "income", day("2025-03-01"), "ghost"))
        .unwrap();
    assert_eq!(store.transaction(&tx.id).map(|t| t.wallet_id.as_str()), Some("ghost"));
    assert!(store.list_wallets().iter().all(|w| w.balance.is_zero()));
}

#[test]
fn deleting_unknown_transaction_is_silent() {
    let (mut store, db, notes) = setup();
    assert!(store.delete_transaction("missing").is_none());
    assert_eq!(db.total_writes(), 0);
    assert!(notes.entries().is_empty());
}

#[test]
fn month_view_is_newest_date_first() {
    let (mut store, _, _) = setup();
    let wid = store.active_wallet_id().to_string();
    for (date, amount) in [("2025-02-03", "1"), ("2025-02-20", "2"), ("2025-01-31", "3"), ("2025-02-11", "4")] {
        store
            .add_transaction(NewTransaction::new(TransactionKind::Expense, d(amount), "food", day(date), &wid))
            .unwrap();
    }
    let feb: Vec<String> = store
        .transactions_in_month(&wid, 2025, 2)
        .iter()
        .map(|t| t.date.to_string())
        .collect();
    assert_eq!(feb, vec!["2025-02-20", "2025-02-11", "2025-02-03"]);

    let recent = store.recent_transactions(&wid, 2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].amount, d("2"));
}

#[test]
fn list_limit_respected() {
    let (mut store, _, _) = setup();
    let wid = store.active_wallet_id().to_string();
    for i in 1..=3 {
        store
            .add_transaction(NewTransaction::new(
                TransactionKind::Expense,
                d("10"),
                "food",
                day(&format!("2025-01-0{}", i)),
                &wid,
            ))
            .unwrap();
    }
    let matches = cli::build_cli().get_matches_from(["walletbook", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&store, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
            assert_eq!(rows[0].amount, "-$10.00");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_by_month_and_wallet_name() {
    let (mut store, _, _) = setup();
    let trip = store.create_wallet("Trip", WalletKind::Shared, &[]).unwrap();
    store
        .add_transaction(NewTransaction::new(TransactionKind::Expense, d("8"), "food", day("2025-02-01"), &trip.id))
        .unwrap();
    store
        .add_transaction(NewTransaction::new(TransactionKind::Expense, d("9"), "food", day("2025-03-01"), &trip.id))
        .unwrap();
    let matches = cli::build_cli().get_matches_from([
        "walletbook", "--wallet", "Trip", "tx", "list", "--month", "2025-02",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    let rows = transactions::query_rows(&store, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2025-02-01");
}
