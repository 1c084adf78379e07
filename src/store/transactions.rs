// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{LedgerEvent, LedgerStore};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    NewTransaction, SAVINGS_CATEGORY, Transaction, TransactionKind, find_category, saturating_sum,
};
use crate::ports::{CollectionKind, NoticeKind};
use chrono::Datelike;
use rust_decimal::Decimal;

impl LedgerStore {
    /// Record a new transaction and move its wallet balance.
    pub fn add_transaction(&mut self, input: NewTransaction) -> LedgerResult<Transaction> {
        if input.amount <= Decimal::ZERO {
            self.notify(NoticeKind::Error, "Amount must be positive");
            return Err(LedgerError::validation("amount must be positive"));
        }

        let mut category = input.category.trim().to_string();
        if category.is_empty() && input.kind == TransactionKind::Savings {
            category = SAVINGS_CATEGORY.to_string();
        }
        if category.is_empty() {
            self.notify(NoticeKind::Error, "Please fill in required fields");
            return Err(LedgerError::validation("category is required"));
        }
        match find_category(&category) {
            Some(c) if c.accepts(input.kind) => {}
            Some(_) => {
                self.notify(
                    NoticeKind::Error,
                    &format!("Category '{}' is not valid for {}", category, input.kind),
                );
                return Err(LedgerError::validation(format!(
                    "category '{}' cannot hold {} transactions",
                    category, input.kind
                )));
            }
            None => {
                self.notify(NoticeKind::Error, &format!("Unknown category '{}'", category));
                return Err(LedgerError::validation(format!(
                    "unknown category '{}'",
                    category
                )));
            }
        }

        let delta = self.config.savings_balance.signed_delta(input.kind, input.amount);
        if !self.balance_accepts(&input.wallet_id, delta) {
            self.notify(NoticeKind::Error, "Amount is too large");
            return Err(LedgerError::validation("amount would overflow the wallet balance"));
        }

        let tx = Transaction {
            id: self.next_id(),
            kind: input.kind,
            amount: input.amount,
            category,
            title: non_blank(input.title),
            note: non_blank(input.note),
            date: input.date,
            wallet_id: input.wallet_id,
            goal_id: None,
        };
        self.record(tx.clone());

        self.persist(&[CollectionKind::Transactions, CollectionKind::Wallets]);
        let msg = if tx.kind == TransactionKind::Savings {
            "Great job saving!"
        } else {
            "Transaction added!"
        };
        self.notify(NoticeKind::Success, msg);
        self.emit(LedgerEvent::TransactionAdded {
            transaction_id: tx.id.clone(),
        });
        Ok(tx)
    }

    /// Remove a transaction and undo its balance effect. Unknown ids are a no-op.
    pub fn delete_transaction(&mut self, id: &str) -> Option<Transaction> {
        let pos = self.transactions.iter().position(|t| t.id == id)?;
        let tx = self.unrecord(pos);

        self.persist(&[CollectionKind::Transactions, CollectionKind::Wallets]);
        self.emit(LedgerEvent::TransactionDeleted {
            transaction_id: tx.id.clone(),
        });
        Some(tx)
    }

    /// Prepend to the log and apply the balance delta.
    pub(crate) fn record(&mut self, tx: Transaction) {
        let delta = self.signed_delta(&tx);
        if !delta.is_zero() {
            self.adjust_balance(&tx.wallet_id, delta);
        }
        tracing::debug!(tx = %tx.id, kind = %tx.kind, amount = %tx.amount, wallet = %tx.wallet_id, "transaction recorded");
        self.transactions.insert(0, tx);
    }

    /// Take the entry at `pos` out of the log and reverse its balance delta.
    pub(crate) fn unrecord(&mut self, pos: usize) -> Transaction {
        let tx = self.transactions.remove(pos);
        let delta = self.signed_delta(&tx);
        if !delta.is_zero() {
            self.adjust_balance(&tx.wallet_id, -delta);
        }
        tracing::debug!(tx = %tx.id, wallet = %tx.wallet_id, "transaction removed");
        tx
    }

    /// The whole log, newest insertion first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn transactions_for_wallet(&self, wallet_id: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.wallet_id == wallet_id)
            .collect()
    }

    /// A wallet's transactions for one month (1-12), latest date first.
    pub fn transactions_in_month(&self, wallet_id: &str, year: i32, month: u32) -> Vec<&Transaction> {
        let mut rows: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.wallet_id == wallet_id && t.date.year() == year && t.date.month() == month)
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    /// The `limit` latest-dated transactions of a wallet.
    pub fn recent_transactions(&self, wallet_id: &str, limit: usize) -> Vec<&Transaction> {
        let mut rows = self.transactions_for_wallet(wallet_id);
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.truncate(limit);
        rows
    }

    /// Balance a wallet should hold given the transactions present now.
    pub fn derived_balance(&self, wallet_id: &str) -> Decimal {
        saturating_sum(
            self.transactions
                .iter()
                .filter(|t| t.wallet_id == wallet_id)
                .map(|t| self.signed_delta(t)),
        )
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
