// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Collaborators the ledger store talks to: storage, user-facing notices,
//! yes/no confirmation and the clock. Each comes with a small in-process
//! implementation that embedders and tests can use directly.

use crate::error::PersistenceError;
use crate::models::{AnalyticsHistory, LoadedState, SavingsGoal, Transaction, Wallet};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionKind {
    Transactions,
    Wallets,
    SavingsGoals,
    AnalyticsHistory,
}

impl CollectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            CollectionKind::Transactions => "transactions",
            CollectionKind::Wallets => "wallets",
            CollectionKind::SavingsGoals => "savingsGoals",
            CollectionKind::AnalyticsHistory => "analyticsHistory",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One whole collection, borrowed from the store for a write.
#[derive(Debug, Clone, Copy)]
pub enum Collection<'a> {
    Transactions(&'a [Transaction]),
    Wallets(&'a [Wallet]),
    SavingsGoals(&'a [SavingsGoal]),
    AnalyticsHistory(&'a AnalyticsHistory),
}

impl Collection<'_> {
    pub fn kind(&self) -> CollectionKind {
        match self {
            Collection::Transactions(_) => CollectionKind::Transactions,
            Collection::Wallets(_) => CollectionKind::Wallets,
            Collection::SavingsGoals(_) => CollectionKind::SavingsGoals,
            Collection::AnalyticsHistory(_) => CollectionKind::AnalyticsHistory,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

pub trait Persistence {
    /// Read every collection. Missing collections come back empty.
    fn load_all(&self) -> Result<LoadedState, PersistenceError>;

    /// Replace one collection in durable storage.
    fn save_collection(&self, collection: Collection<'_>) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

pub trait Notifier {
    fn notify(&self, kind: NoticeKind, message: &str);
}

pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Midnight UTC on the given day.
    pub fn on(date: NaiveDate) -> Self {
        Self::at(Utc.from_utc_datetime(&date.and_time(NaiveTime::default())))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// Keeps every notice in memory. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    entries: Rc<RefCell<Vec<(NoticeKind, String)>>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(NoticeKind, String)> {
        self.entries.borrow().clone()
    }

    pub fn last(&self) -> Option<(NoticeKind, String)> {
        self.entries.borrow().last().cloned()
    }

    pub fn count(&self, kind: NoticeKind) -> usize {
        self.entries.borrow().iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.entries.borrow_mut().push((kind, message.to_string()));
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    state: LoadedState,
    writes: HashMap<CollectionKind, usize>,
    failures: usize,
    fail_next: usize,
}

/// Storage that lives only as long as the process. Clones share one backing
/// state, so a caller can keep a handle after giving one to the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: LoadedState) -> Self {
        let me = Self::default();
        me.inner.borrow_mut().state = state;
        me
    }

    /// Make the next `n` writes fail.
    pub fn fail_next_writes(&self, n: usize) {
        self.inner.borrow_mut().fail_next = n;
    }

    /// Successful writes of one collection so far.
    pub fn writes(&self, kind: CollectionKind) -> usize {
        self.inner.borrow().writes.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_writes(&self) -> usize {
        self.inner.borrow().writes.values().sum()
    }

    pub fn failures(&self) -> usize {
        self.inner.borrow().failures
    }

    pub fn state(&self) -> LoadedState {
        self.inner.borrow().state.clone()
    }
}

impl Persistence for MemoryPersistence {
    fn load_all(&self) -> Result<LoadedState, PersistenceError> {
        Ok(self.inner.borrow().state.clone())
    }

    fn save_collection(&self, collection: Collection<'_>) -> Result<(), PersistenceError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_next > 0 {
            inner.fail_next -= 1;
            inner.failures += 1;
            return Err(PersistenceError::Unavailable(format!(
                "{} write rejected",
                collection.name()
            )));
        }
        match collection {
            Collection::Transactions(v) => inner.state.transactions = v.to_vec(),
            Collection::Wallets(v) => inner.state.wallets = v.to_vec(),
            Collection::SavingsGoals(v) => inner.state.savings_goals = v.to_vec(),
            Collection::AnalyticsHistory(v) => inner.state.analytics_history = v.clone(),
        }
        *inner.writes.entry(collection.kind()).or_insert(0) += 1;
        Ok(())
    }
}
