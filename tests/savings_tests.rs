// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use walletbook::config::{LedgerConfig, RetryPolicy, SavingsBalancePolicy};
use walletbook::models::{NewTransaction, TransactionKind};
use walletbook::ports::{AutoConfirm, CollectionKind, FixedClock, MemoryPersistence, NoticeKind, NoticeLog};
use walletbook::store::{LedgerStore, NewGoal};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup(confirm: bool) -> (LedgerStore, MemoryPersistence, NoticeLog) {
    let db = MemoryPersistence::new();
    let notes = NoticeLog::new();
    let store = LedgerStore::builder(db.clone())
        .notifier(notes.clone())
        .confirm(AutoConfirm(confirm))
        .clock(FixedClock::on(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()))
        .config(LedgerConfig::default().with_retry(RetryPolicy::none()))
        .open();
    (store, db, notes)
}

#[test]
fn trip_contributions_cap_at_target() {
    let (mut store, db, notes) = setup(true);
    let trip = store.create_goal(NewGoal::new("Trip", d("500"))).unwrap();
    assert_eq!(
        notes.last(),
        Some((NoticeKind::Success, "Saving created successfully!".to_string()))
    );

    store.contribute(&trip.id, d("200"), "Alice").unwrap().unwrap();
    store.contribute(&trip.id, d("150"), "Bob").unwrap().unwrap();
    store.contribute(&trip.id, d("200"), "Alice").unwrap().unwrap();

    let goal = store.goal(&trip.id).unwrap();
    assert_eq!(goal.current_amount, d("500"));
    assert_eq!(goal.total_contributed(), d("550"));
    assert_eq!(goal.members.len(), 2);
    assert_eq!(goal.members[0].name, "Alice");
    assert_eq!(goal.members[0].contributed(), d("400"));
    assert_eq!(goal.members[1].contributed(), d("150"));
    assert_eq!(goal.progress_percent(), d("100"));

    let linked: Vec<_> = store
        .transactions()
        .iter()
        .filter(|t| t.goal_id.as_deref() == Some(trip.id.as_str()))
        .collect();
    assert_eq!(linked.len(), 3);
    for t in &linked {
        assert_eq!(t.kind, TransactionKind::Savings);
        assert_eq!(t.category, "savings");
        assert_eq!(t.title.as_deref(), Some("Saved to Trip"));
        assert_eq!(t.wallet_id, store.active_wallet_id());
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }
    assert_eq!(linked[0].note.as_deref(), Some("Contributor: Alice"));
    assert_eq!(
        notes.last(),
        Some((NoticeKind::Success, "Added $200 to Trip by Alice!".to_string()))
    );

    assert_eq!(db.writes(CollectionKind::SavingsGoals), 4);
    assert_eq!(db.writes(CollectionKind::Transactions), 3);
    assert_eq!(db.writes(CollectionKind::Wallets), 3);
    assert_eq!(db.state().savings_goals[0].current_amount, d("500"));
}

#[test]
fn current_amount_tracks_min_of_target_and_sum() {
    let (mut store, _, _) = setup(true);
    let goal = store.create_goal(NewGoal::new("Bike", d("100"))).unwrap();
    let mut sum = Decimal::ZERO;
    for (amount, who) in [("30", "A"), ("0.5", "B"), ("45", "A"), ("40", "C"), ("1", "B")] {
        store.contribute(&goal.id, d(amount), who).unwrap();
        sum += d(amount);
        let g = store.goal(&goal.id).unwrap();
        assert_eq!(g.current_amount, sum.min(d("100")));
        assert!(g.current_amount <= g.target_amount);
    }
}

#[test]
fn seeded_members_start_empty() {
    let (mut store, _, _) = setup(true);
    let goal = store
        .create_goal(
            NewGoal::new("  Holiday ", d("900"))
                .with_member("Ana")
                .with_member(" ")
                .with_member("Ana")
                .with_member("Ben")
                .with_deadline(NaiveDate::from_ymd_opt(2025, 12, 24).unwrap()),
        )
        .unwrap();
    assert_eq!(goal.title, "Holiday");
    assert_eq!(goal.current_amount, Decimal::ZERO);
    assert_eq!(goal.members.len(), 2);
    assert!(goal.members.iter().all(|m| m.contribution.is_none()));

    store.contribute(&goal.id, d("90"), "Ben").unwrap();
    let shares = store.member_shares(&goal.id);
    assert_eq!(shares[0].contribution, Decimal::ZERO);
    assert_eq!(shares[1].contribution, d("90"));
    assert_eq!(shares[1].percent_of_target, d("10"));
}

#[test]
fn goal_validation() {
    let (mut store, db, notes) = setup(true);
    assert!(store.create_goal(NewGoal::new(" ", d("10"))).unwrap_err().is_validation());
    assert_eq!(
        notes.last(),
        Some((NoticeKind::Error, "Please enter a saving name".to_string()))
    );
    assert!(store.create_goal(NewGoal::new("Car", d("0"))).is_err());
    assert_eq!(
        notes.last(),
        Some((NoticeKind::Error, "Target amount must be greater than 0".to_string()))
    );
    assert!(store.savings_goals().is_empty());
    assert_eq!(db.total_writes(), 0);
}

#[test]
fn non_positive_contribution_changes_nothing() {
    let (mut store, db, notes) = setup(true);
    let goal = store.create_goal(NewGoal::new("Car", d("1000"))).unwrap();
    let before = store.snapshot();
    let writes = db.total_writes();

    assert!(store.contribute(&goal.id, d("0"), "Ana").unwrap_err().is_validation());
    assert!(store.contribute(&goal.id, d("-20"), "Ana").is_err());
    assert!(store.contribute(&goal.id, d("20"), "  ").is_err());

    assert_eq!(store.snapshot(), before);
    assert_eq!(db.total_writes(), writes);
    assert_eq!(notes.count(NoticeKind::Error), 3);
}

#[test]
fn overflowing_contribution_is_rejected() {
    let (mut store, _, notes) = setup(true);
    let goal = store.create_goal(NewGoal::new("Moon", Decimal::MAX)).unwrap();
    store.contribute(&goal.id, Decimal::MAX, "Ana").unwrap();
    let before = store.snapshot();

    assert!(store.contribute(&goal.id, d("1"), "Ana").unwrap_err().is_validation());
    assert_eq!(store.snapshot(), before);
    assert_eq!(notes.last(), Some((NoticeKind::Error, "Amount is too large".to_string())));

    // Another member starts from zero, and the aggregate clamps instead of panicking.
    store.contribute(&goal.id, d("1"), "Ben").unwrap();
    assert_eq!(store.goal(&goal.id).unwrap().current_amount, Decimal::MAX);
    assert_eq!(store.total_saved(), Decimal::MAX);
}

#[test]
fn contributing_to_unknown_goal_is_silent() {
    let (mut store, db, notes) = setup(true);
    assert!(store.contribute("missing", d("5"), "Ana").unwrap().is_none());
    assert!(store.transactions().is_empty());
    assert_eq!(db.total_writes(), 0);
    assert!(notes.entries().is_empty());
}

#[test]
fn declined_delete_keeps_goal_and_transactions() {
    let (mut store, db, _) = setup(false);
    let goal = store.create_goal(NewGoal::new("Trip", d("500"))).unwrap();
    store.contribute(&goal.id, d("50"), "Ana").unwrap();
    let before = store.snapshot();
    let writes = db.total_writes();

    assert!(!store.delete_goal(&goal.id));
    assert_eq!(store.snapshot(), before);
    assert_eq!(db.total_writes(), writes);
}

#[test]
fn accepted_delete_removes_only_linked_transactions() {
    let (mut store, db, notes) = setup(true);
    let wid = store.active_wallet_id().to_string();
    // Ids are consecutive, so one may be a prefix of another; linkage must not care.
    let a = store.create_goal(NewGoal::new("A", d("100"))).unwrap();
    let b = store.create_goal(NewGoal::new("B", d("100"))).unwrap();
    store.contribute(&a.id, d("10"), "Ana").unwrap();
    store.contribute(&b.id, d("20"), "Ana").unwrap();
    store.contribute(&a.id, d("30"), "Ben").unwrap();
    store
        .add_transaction(NewTransaction::new(
            TransactionKind::Savings,
            d("7"),
            "savings",
            store.today(),
            &wid,
        ))
        .unwrap();

    assert!(store.delete_goal(&a.id));
    assert!(store.goal(&a.id).is_none());
    assert!(store.goal(&b.id).is_some());
    assert_eq!(store.transactions().len(), 2);
    assert!(store
        .transactions()
        .iter()
        .all(|t| t.goal_id.as_deref() != Some(a.id.as_str())));
    assert_eq!(db.state().transactions.len(), 2);
    assert_eq!(db.state().savings_goals.len(), 1);
    assert_eq!(
        notes.last(),
        Some((NoticeKind::Success, "Saving goal deleted!".to_string()))
    );
}

#[test]
fn goal_delete_reverses_balance_under_debit_policy() {
    let db = MemoryPersistence::new();
    let mut store = LedgerStore::builder(db)
        .confirm(AutoConfirm(true))
        .config(
            LedgerConfig::default()
                .with_savings_balance(SavingsBalancePolicy::Debit)
                .with_retry(RetryPolicy::none()),
        )
        .open();
    let wid = store.active_wallet_id().to_string();
    let goal = store.create_goal(NewGoal::new("Fund", d("100"))).unwrap();
    store.contribute(&goal.id, d("25"), "Ana").unwrap();
    assert_eq!(store.wallet(&wid).unwrap().balance, d("-25"));

    store.delete_goal(&goal.id);
    assert_eq!(store.wallet(&wid).unwrap().balance, Decimal::ZERO);
    assert_eq!(store.wallet(&wid).unwrap().balance, store.derived_balance(&wid));
}

#[test]
fn total_saved_sums_current_amounts() {
    let (mut store, _, _) = setup(true);
    let a = store.create_goal(NewGoal::new("A", d("50"))).unwrap();
    let b = store.create_goal(NewGoal::new("B", d("500"))).unwrap();
    store.contribute(&a.id, d("80"), "Ana").unwrap();
    store.contribute(&b.id, d("120"), "Ana").unwrap();
    assert_eq!(store.total_saved(), d("170"));
}
