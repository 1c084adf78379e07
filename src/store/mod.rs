// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger store: one owner for wallets, transactions, savings goals and
//! the analytics history.
//!
//! Every mutation runs to completion before the next one starts. It applies
//! its change in memory, then writes each affected collection through the
//! [`Persistence`] port, retrying with backoff. A write that still fails is
//! logged and reported through the [`Notifier`]; the in-memory state is kept
//! as it is. Subscribers hear about a change once both phases are done.

mod analytics;
mod savings;
mod transactions;
mod wallets;

pub use analytics::{CategoryTotal, MonthTotal, Overview};
pub use savings::{MemberShare, NewGoal};

use crate::config::LedgerConfig;
use crate::models::{
    AnalyticsHistory, DEFAULT_WALLET_ID, LoadedState, SavingsGoal, Transaction, Wallet,
};
use crate::ports::{
    AutoConfirm, Clock, Collection, CollectionKind, Confirm, NoticeKind, Notifier, Persistence,
    SystemClock,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    WalletCreated { wallet_id: String },
    ActiveWalletChanged { wallet_id: String },
    TransactionAdded { transaction_id: String },
    TransactionDeleted { transaction_id: String },
    GoalCreated { goal_id: String },
    GoalContributed { goal_id: String, transaction_id: String },
    GoalDeleted { goal_id: String, removed_transactions: usize },
    AnalyticsUpdated { year: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&LedgerEvent)>;

/// Hands out time-derived ids, bumping past the last one when the clock
/// has not moved.
#[derive(Debug, Default)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    fn observe(&mut self, id: &str) {
        if let Ok(n) = id.parse::<i64>() {
            self.last = self.last.max(n);
        }
    }

    fn next(&mut self, now_millis: i64) -> String {
        self.last = if now_millis > self.last {
            now_millis
        } else {
            self.last + 1
        };
        self.last.to_string()
    }
}

pub struct StoreBuilder {
    persistence: Box<dyn Persistence>,
    notifier: Option<Box<dyn Notifier>>,
    confirm: Option<Box<dyn Confirm>>,
    clock: Option<Box<dyn Clock>>,
    config: LedgerConfig,
}

impl StoreBuilder {
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Some(Box::new(confirm));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    /// Load saved state once and build the store.
    pub fn open(self) -> LedgerStore {
        let notifier = self.notifier.unwrap_or_else(|| Box::new(LogNotifier));
        let loaded = match self.persistence.load_all() {
            Ok(state) => state,
            Err(err) => {
                tracing::error!("Failed to load saved data: {err}");
                notifier.notify(NoticeKind::Error, "Failed to load saved data");
                LoadedState::default()
            }
        };

        let mut wallets = loaded.wallets;
        if wallets.is_empty() {
            wallets.push(Wallet::seed());
        }
        let active_wallet = wallets
            .first()
            .map(|w| w.id.clone())
            .unwrap_or_else(|| DEFAULT_WALLET_ID.to_string());

        let mut ids = IdGenerator::default();
        for id in wallets
            .iter()
            .map(|w| &w.id)
            .chain(loaded.transactions.iter().map(|t| &t.id))
            .chain(loaded.savings_goals.iter().map(|g| &g.id))
        {
            ids.observe(id);
        }

        tracing::info!(
            wallets = wallets.len(),
            transactions = loaded.transactions.len(),
            goals = loaded.savings_goals.len(),
            years = loaded.analytics_history.len(),
            "ledger loaded"
        );

        LedgerStore {
            transactions: loaded.transactions,
            wallets,
            savings_goals: loaded.savings_goals,
            analytics_history: loaded.analytics_history,
            active_wallet,
            config: self.config,
            persistence: self.persistence,
            notifier,
            confirm: self.confirm.unwrap_or_else(|| Box::new(AutoConfirm(false))),
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            ids,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }
}

/// Used when the embedder gives no notifier: notices go to the log only.
struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => tracing::info!("{message}"),
            NoticeKind::Error => tracing::warn!("{message}"),
        }
    }
}

pub struct LedgerStore {
    transactions: Vec<Transaction>,
    wallets: Vec<Wallet>,
    savings_goals: Vec<SavingsGoal>,
    analytics_history: AnalyticsHistory,
    active_wallet: String,
    config: LedgerConfig,
    persistence: Box<dyn Persistence>,
    notifier: Box<dyn Notifier>,
    confirm: Box<dyn Confirm>,
    clock: Box<dyn Clock>,
    ids: IdGenerator,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl LedgerStore {
    pub fn builder(persistence: impl Persistence + 'static) -> StoreBuilder {
        StoreBuilder {
            persistence: Box::new(persistence),
            notifier: None,
            confirm: None,
            clock: None,
            config: LedgerConfig::default(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Clone of all four collections, in storage shape.
    pub fn snapshot(&self) -> LoadedState {
        LoadedState {
            transactions: self.transactions.clone(),
            wallets: self.wallets.clone(),
            savings_goals: self.savings_goals.clone(),
            analytics_history: self.analytics_history.clone(),
        }
    }

    pub fn subscribe(&mut self, f: impl Fn(&LedgerEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn emit(&self, event: LedgerEvent) {
        tracing::debug!(?event, "ledger changed");
        for (_, f) in &self.subscribers {
            f(&event);
        }
    }

    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notifier.notify(kind, message);
    }

    fn next_id(&mut self) -> String {
        let now = self.clock.now().timestamp_millis();
        self.ids.next(now)
    }

    /// Balance effect of a transaction under the configured savings policy.
    fn signed_delta(&self, tx: &Transaction) -> Decimal {
        self.config.savings_balance.signed_delta(tx.kind, tx.amount)
    }

    fn collection(&self, kind: CollectionKind) -> Collection<'_> {
        match kind {
            CollectionKind::Transactions => Collection::Transactions(&self.transactions),
            CollectionKind::Wallets => Collection::Wallets(&self.wallets),
            CollectionKind::SavingsGoals => Collection::SavingsGoals(&self.savings_goals),
            CollectionKind::AnalyticsHistory => {
                Collection::AnalyticsHistory(&self.analytics_history)
            }
        }
    }

    /// Durable phase of a mutation. Returns false if any collection could not
    /// be written after all retries.
    fn persist(&self, kinds: &[CollectionKind]) -> bool {
        let retry = self.config.retry;
        let attempts = retry.max_attempts.max(1);
        let mut all_saved = true;
        for &kind in kinds {
            let mut attempt = 1;
            loop {
                match self.persistence.save_collection(self.collection(kind)) {
                    Ok(()) => break,
                    Err(err) if attempt < attempts => {
                        let delay = retry.delay_for(attempt);
                        tracing::warn!(
                            collection = kind.name(),
                            attempt,
                            "write failed, retrying in {delay:?}: {err}"
                        );
                        if !delay.is_zero() {
                            std::thread::sleep(delay);
                        }
                        attempt += 1;
                    }
                    Err(err) => {
                        tracing::error!(
                            collection = kind.name(),
                            attempts,
                            "giving up on write: {err}"
                        );
                        self.notify(NoticeKind::Error, &format!("Failed to save {}", kind.name()));
                        all_saved = false;
                        break;
                    }
                }
            }
        }
        all_saved
    }
}
