// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{LedgerEvent, LedgerStore};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AnalyticsHistory, MonthlyTotals, Transaction, TransactionKind, categories, saturating_sum,
};
use crate::ports::{CollectionKind, NoticeKind};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub name: String,
    pub total: Decimal,
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub expenses: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub wallet_id: String,
    pub income: Decimal,
    /// Expenses plus savings.
    pub outflow: Decimal,
    pub net: Decimal,
    pub focus_year: i32,
    pub focus_month: u32,
    pub month_income: Decimal,
    pub month_expenses: Decimal,
    pub month_savings: Decimal,
    pub month_net: Decimal,
    pub total_saved: Decimal,
    pub recent: Vec<Transaction>,
}

/// Expense totals per month of `year` for one wallet.
fn bucket_expenses<'a, I>(txs: I, wallet_id: &str, year: i32) -> MonthlyTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = [Decimal::ZERO; 12];
    for t in txs {
        if t.kind == TransactionKind::Expense && t.wallet_id == wallet_id && t.date.year() == year {
            let slot = &mut totals[t.date.month0() as usize];
            *slot = slot.saturating_add(t.amount);
        }
    }
    totals
}

fn sum_kind(txs: &[&Transaction], kind: TransactionKind) -> Decimal {
    saturating_sum(txs.iter().filter(|t| t.kind == kind).map(|t| t.amount))
}

impl LedgerStore {
    pub fn current_year(&self) -> i32 {
        self.clock.today().year()
    }

    /// Live expense totals for a wallet and year, straight from the log.
    pub fn monthly_expenses(&self, wallet_id: &str, year: i32) -> MonthlyTotals {
        bucket_expenses(&self.transactions, wallet_id, year)
    }

    /// Rebuild the current year's snapshot for a wallet. Writes only when a
    /// month changed; returns whether it wrote.
    pub fn recompute_current_year(&mut self, wallet_id: &str) -> bool {
        let year = self.current_year();
        let totals = self.monthly_expenses(wallet_id, year);
        if self.analytics_history.get(&year) == Some(&totals) {
            return false;
        }
        self.analytics_history.insert(year, totals);
        tracing::debug!(year, wallet = wallet_id, "current-year analytics refreshed");

        self.persist(&[CollectionKind::AnalyticsHistory]);
        self.emit(LedgerEvent::AnalyticsUpdated { year });
        true
    }

    /// Freeze a closed year. An existing snapshot is never replaced.
    pub fn archive_year(&mut self, wallet_id: &str, year: i32) -> LedgerResult<bool> {
        if year >= self.current_year() {
            self.notify(NoticeKind::Error, "Only past years can be archived");
            return Err(LedgerError::validation(format!(
                "year {} is still open",
                year
            )));
        }
        if self.analytics_history.contains_key(&year) {
            return Ok(false);
        }
        let totals = bucket_expenses(&self.transactions, wallet_id, year);
        self.analytics_history.insert(year, totals);
        tracing::info!(year, wallet = wallet_id, "analytics snapshot archived");

        self.persist(&[CollectionKind::AnalyticsHistory]);
        self.emit(LedgerEvent::AnalyticsUpdated { year });
        Ok(true)
    }

    pub fn analytics_history(&self) -> &AnalyticsHistory {
        &self.analytics_history
    }

    pub fn history_for(&self, year: i32) -> Option<&MonthlyTotals> {
        self.analytics_history.get(&year)
    }

    /// Years with a snapshot, newest first.
    pub fn history_years(&self) -> Vec<i32> {
        self.analytics_history.keys().rev().copied().collect()
    }

    /// All-time expense totals per category, largest first; empty categories
    /// are left out.
    pub fn category_breakdown(&self, wallet_id: &str) -> Vec<CategoryTotal> {
        let mut sums: HashMap<&str, Decimal> = HashMap::new();
        for t in self
            .transactions
            .iter()
            .filter(|t| t.wallet_id == wallet_id && t.kind == TransactionKind::Expense)
        {
            let sum = sums.entry(t.category.as_str()).or_insert(Decimal::ZERO);
            *sum = sum.saturating_add(t.amount);
        }

        // Only known categories are reported; shares are of what is reported.
        let mut rows: Vec<CategoryTotal> = categories()
            .iter()
            .filter_map(|c| {
                let total = sums.get(c.id).copied().unwrap_or(Decimal::ZERO);
                (total > Decimal::ZERO).then(|| CategoryTotal {
                    category: c.id.to_string(),
                    name: c.name.to_string(),
                    total,
                    percent: Decimal::ZERO,
                })
            })
            .collect();
        let grand = saturating_sum(rows.iter().map(|r| r.total));
        for row in &mut rows {
            row.percent = row
                .total
                .checked_div(grand)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::ONE_HUNDRED);
        }
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows
    }

    /// Expense totals for the last `months` months ending with the current
    /// one, oldest first.
    pub fn monthly_trend(&self, wallet_id: &str, months: usize) -> Vec<MonthTotal> {
        let today = self.clock.today();
        let anchor = today.year() * 12 + today.month0() as i32;
        let mut out: Vec<MonthTotal> = (0..months as i32)
            .rev()
            .map(|back| {
                let idx = anchor - back;
                MonthTotal {
                    year: idx.div_euclid(12),
                    month: idx.rem_euclid(12) as u32 + 1,
                    expenses: Decimal::ZERO,
                }
            })
            .collect();
        for t in self
            .transactions
            .iter()
            .filter(|t| t.wallet_id == wallet_id && t.kind == TransactionKind::Expense)
        {
            if let Some(slot) = out
                .iter_mut()
                .find(|m| m.year == t.date.year() && m.month == t.date.month())
            {
                slot.expenses = slot.expenses.saturating_add(t.amount);
            }
        }
        out
    }

    /// Dashboard figures for a wallet. The focus month is the month of the
    /// latest-dated transaction, or today's month for an empty wallet.
    pub fn overview(&self, wallet_id: &str) -> Overview {
        let all = self.transactions_for_wallet(wallet_id);
        let income = sum_kind(&all, TransactionKind::Income);
        let outflow = sum_kind(&all, TransactionKind::Expense)
            .saturating_add(sum_kind(&all, TransactionKind::Savings));

        let focus: NaiveDate = all
            .iter()
            .map(|t| t.date)
            .max()
            .unwrap_or_else(|| self.clock.today());
        let month: Vec<&Transaction> = all
            .iter()
            .copied()
            .filter(|t| t.date.year() == focus.year() && t.date.month() == focus.month())
            .collect();
        let month_income = sum_kind(&month, TransactionKind::Income);
        let month_expenses = sum_kind(&month, TransactionKind::Expense);
        let month_savings = sum_kind(&month, TransactionKind::Savings);

        Overview {
            wallet_id: wallet_id.to_string(),
            income,
            outflow,
            net: income.saturating_sub(outflow),
            focus_year: focus.year(),
            focus_month: focus.month(),
            month_income,
            month_expenses,
            month_savings,
            month_net: month_income
                .saturating_sub(month_expenses)
                .saturating_sub(month_savings),
            total_saved: self.total_saved(),
            recent: self
                .recent_transactions(wallet_id, 5)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}
