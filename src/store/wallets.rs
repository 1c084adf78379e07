// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{LedgerEvent, LedgerStore};
use crate::error::{LedgerError, LedgerResult};
use crate::ports::{CollectionKind, NoticeKind};
use crate::models::{Wallet, WalletKind};
use rust_decimal::Decimal;

impl LedgerStore {
    pub fn create_wallet(
        &mut self,
        name: &str,
        kind: WalletKind,
        members: &[String],
    ) -> LedgerResult<Wallet> {
        let name = name.trim();
        if name.is_empty() {
            self.notify(NoticeKind::Error, "Please enter a wallet name");
            return Err(LedgerError::validation("wallet name must not be blank"));
        }
        let mut kept: Vec<String> = Vec::new();
        for m in members.iter().map(|m| m.trim()).filter(|m| !m.is_empty()) {
            if !kept.iter().any(|k| k == m) {
                kept.push(m.to_string());
            }
        }

        let wallet = Wallet {
            id: self.next_id(),
            name: name.to_string(),
            kind,
            members: kept,
            balance: Decimal::ZERO,
        };
        self.wallets.push(wallet.clone());
        tracing::debug!(wallet = %wallet.id, name = %wallet.name, "wallet created");

        self.persist(&[CollectionKind::Wallets]);
        self.notify(NoticeKind::Success, &format!("Wallet '{}' created!", wallet.name));
        self.emit(LedgerEvent::WalletCreated {
            wallet_id: wallet.id.clone(),
        });
        Ok(wallet)
    }

    /// Whether moving `wallet_id` by `delta` stays inside the `Decimal`
    /// range. Unknown wallets never move, so they always accept.
    pub(crate) fn balance_accepts(&self, wallet_id: &str, delta: Decimal) -> bool {
        self.wallet(wallet_id)
            .is_none_or(|w| w.balance.checked_add(delta).is_some())
    }

    /// Move a wallet balance by `delta`. Unknown wallets are left alone.
    pub(crate) fn adjust_balance(&mut self, wallet_id: &str, delta: Decimal) -> bool {
        match self.wallets.iter_mut().find(|w| w.id == wallet_id) {
            Some(wallet) => {
                wallet.balance = match wallet.balance.checked_add(delta) {
                    Some(b) => b,
                    None => {
                        tracing::warn!(wallet = wallet_id, %delta, "balance out of range, clamped");
                        wallet.balance.saturating_add(delta)
                    }
                };
                true
            }
            None => {
                tracing::warn!(wallet = wallet_id, %delta, "no such wallet, balance untouched");
                false
            }
        }
    }

    pub fn list_wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    pub fn wallet(&self, id: &str) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.id == id)
    }

    /// Look a wallet up by id, then by exact name.
    pub fn find_wallet(&self, id_or_name: &str) -> Option<&Wallet> {
        let key = id_or_name.trim();
        self.wallet(key)
            .or_else(|| self.wallets.iter().find(|w| w.name == key))
    }

    pub fn active_wallet_id(&self) -> &str {
        &self.active_wallet
    }

    /// `None` when the active id does not name a known wallet.
    pub fn active_wallet(&self) -> Option<&Wallet> {
        self.wallet(&self.active_wallet)
    }

    /// Switch the active wallet. The id is taken even if unknown; the return
    /// value says whether it names a wallet.
    pub fn set_active_wallet(&mut self, id: &str) -> bool {
        let known = self.wallet(id).is_some();
        if !known {
            tracing::debug!(wallet = id, "active wallet set to an unknown id");
        }
        if self.active_wallet != id {
            self.active_wallet = id.to_string();
            self.emit(LedgerEvent::ActiveWalletChanged {
                wallet_id: id.to_string(),
            });
        }
        known
    }
}
