// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Id of the wallet every fresh ledger starts with.
pub const DEFAULT_WALLET_ID: &str = "personal";

/// Category id carried by every savings transaction.
pub const SAVINGS_CATEGORY: &str = "savings";

/// Category id reserved for income.
pub const INCOME_CATEGORY: &str = "income";

/// Sum that clamps at the `Decimal` range instead of panicking.
pub fn saturating_sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    Personal,
    Shared,
}

impl WalletKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletKind::Personal => "personal",
            WalletKind::Shared => "shared",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Some(WalletKind::Personal),
            "shared" => Some(WalletKind::Shared),
            _ => None,
        }
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WalletKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    pub balance: Decimal,
}

impl Wallet {
    /// The wallet seeded into an empty ledger.
    pub fn seed() -> Self {
        Self {
            id: DEFAULT_WALLET_ID.to_string(),
            name: "My Wallet".to_string(),
            kind: WalletKind::Personal,
            members: Vec::new(),
            balance: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
    Savings,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
            TransactionKind::Savings => "savings",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Some(TransactionKind::Expense),
            "income" => Some(TransactionKind::Income),
            "savings" | "saving" => Some(TransactionKind::Savings),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date: NaiveDate,
    pub wallet_id: String,
    /// Goal this transaction was recorded against, for contribution entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
}

/// Caller-supplied fields of a new transaction; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub title: Option<String>,
    pub note: Option<String>,
    pub date: NaiveDate,
    pub wallet_id: String,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        category: &str,
        date: NaiveDate,
        wallet_id: &str,
    ) -> Self {
        Self {
            kind,
            amount,
            category: category.to_string(),
            title: None,
            note: None,
            date,
            wallet_id: wallet_id.to_string(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

static CATEGORIES: [Category; 11] = [
    Category { id: "food", name: "Food", icon: "🍔", color: "hsl(30 85% 82%)" },
    Category { id: "saving", name: "Saving", icon: "💰", color: "hsl(340 80% 85%)" },
    Category { id: "personal-funds", name: "Personal Funds", icon: "👤", color: "hsl(340 80% 85%)" },
    Category { id: "parent", name: "Parent", icon: "👪", color: "hsl(340 80% 85%)" },
    Category { id: "shopping", name: "Shopping", icon: "🛍️", color: "hsl(340 80% 85%)" },
    Category { id: "bills", name: "Bills", icon: "📄", color: "hsl(270 60% 88%)" },
    Category { id: "transport", name: "Transport", icon: "🚗", color: "hsl(200 70% 85%)" },
    Category { id: "entertainment", name: "Entertainment", icon: "🎮", color: "hsl(280 70% 85%)" },
    Category { id: "health", name: "Health", icon: "💊", color: "hsl(160 60% 85%)" },
    Category { id: "income", name: "Income", icon: "💰", color: "hsl(140 55% 80%)" },
    Category { id: "savings", name: "Savings", icon: "🐱", color: "hsla(44, 85%, 60%, 0.62)" },
];

/// Fixed category reference data.
pub fn categories() -> &'static [Category] {
    &CATEGORIES
}

pub fn find_category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

impl Category {
    /// Whether a transaction of `kind` may be filed under this category.
    pub fn accepts(&self, kind: TransactionKind) -> bool {
        match kind {
            TransactionKind::Income => self.id == INCOME_CATEGORY,
            TransactionKind::Savings => self.id == SAVINGS_CATEGORY,
            TransactionKind::Expense => self.id != INCOME_CATEGORY && self.id != SAVINGS_CATEGORY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution: Option<Decimal>,
}

impl Member {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            contribution: None,
        }
    }

    pub fn contributed(&self) -> Decimal {
        self.contribution.unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub title: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl SavingsGoal {
    /// Sum of every member's recorded contribution, uncapped.
    pub fn total_contributed(&self) -> Decimal {
        saturating_sum(self.members.iter().map(Member::contributed))
    }

    /// Progress toward the target in percent, 0..=100.
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount.is_zero() {
            return Decimal::ZERO;
        }
        self.current_amount
            .checked_div(self.target_amount)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ONE_HUNDRED, |p| p.min(Decimal::ONE_HUNDRED))
    }
}

/// Per-year monthly expense totals, index 0 = January.
pub type MonthlyTotals = [Decimal; 12];

pub type AnalyticsHistory = BTreeMap<i32, MonthlyTotals>;

/// Everything the persistence layer hands back at start-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedState {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub wallets: Vec<Wallet>,
    #[serde(default)]
    pub savings_goals: Vec<SavingsGoal>,
    #[serde(default)]
    pub analytics_history: AnalyticsHistory,
}
