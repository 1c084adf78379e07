// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionKind;
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How savings transactions move a wallet balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsBalancePolicy {
    /// Savings never touch the balance.
    #[default]
    Excluded,
    /// Savings add to the balance like income.
    Credit,
    /// Savings leave the balance like an expense.
    Debit,
}

impl SavingsBalancePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SavingsBalancePolicy::Excluded => "excluded",
            SavingsBalancePolicy::Credit => "credit",
            SavingsBalancePolicy::Debit => "debit",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "excluded" | "none" | "false" => Ok(SavingsBalancePolicy::Excluded),
            "credit" | "true" => Ok(SavingsBalancePolicy::Credit),
            "debit" => Ok(SavingsBalancePolicy::Debit),
            other => Err(anyhow!(
                "Invalid savings balance policy '{}', expected excluded|credit|debit",
                other
            )),
        }
    }

    /// Signed effect of a transaction on its wallet balance.
    pub fn signed_delta(&self, kind: TransactionKind, amount: Decimal) -> Decimal {
        match kind {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
            TransactionKind::Savings => match self {
                SavingsBalancePolicy::Excluded => Decimal::ZERO,
                SavingsBalancePolicy::Credit => amount,
                SavingsBalancePolicy::Debit => -amount,
            },
        }
    }
}

impl fmt::Display for SavingsBalancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retry schedule for durable writes: `backoff`, then doubled each attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.backoff.saturating_mul(factor)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerConfig {
    pub savings_balance: SavingsBalancePolicy,
    pub retry: RetryPolicy,
}

impl LedgerConfig {
    pub fn with_savings_balance(mut self, policy: SavingsBalancePolicy) -> Self {
        self.savings_balance = policy;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

pub const KEY_SAVINGS_BALANCE: &str = "savings_balance";
pub const KEY_RETRY_ATTEMPTS: &str = "retry_attempts";
pub const KEY_RETRY_BACKOFF_MS: &str = "retry_backoff_ms";
pub const KEY_ACTIVE_WALLET: &str = "active_wallet";

pub const SETTING_KEYS: [&str; 4] = [
    KEY_SAVINGS_BALANCE,
    KEY_RETRY_ATTEMPTS,
    KEY_RETRY_BACKOFF_MS,
    KEY_ACTIVE_WALLET,
];

/// Build a config from stored key/value settings; unknown keys are ignored.
pub fn from_settings<'a, I>(settings: I) -> Result<LedgerConfig>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut cfg = LedgerConfig::default();
    for (key, value) in settings {
        match key {
            KEY_SAVINGS_BALANCE => cfg.savings_balance = SavingsBalancePolicy::parse(value)?,
            KEY_RETRY_ATTEMPTS => {
                let n: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("Invalid retry_attempts '{}'", value))?;
                cfg.retry.max_attempts = n.max(1);
            }
            KEY_RETRY_BACKOFF_MS => {
                let ms: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("Invalid retry_backoff_ms '{}'", value))?;
                cfg.retry.backoff = Duration::from_millis(ms);
            }
            _ => {}
        }
    }
    Ok(cfg)
}

/// Check a setting before it is written.
pub fn validate_setting(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    match key {
        KEY_SAVINGS_BALANCE => Ok(SavingsBalancePolicy::parse(value)?.as_str().to_string()),
        KEY_RETRY_ATTEMPTS => {
            value
                .parse::<u32>()
                .map_err(|_| anyhow!("Setting '{}' expects an integer in 0..={}", key, u32::MAX))?;
            Ok(value.to_string())
        }
        KEY_RETRY_BACKOFF_MS => {
            value
                .parse::<u64>()
                .map_err(|_| anyhow!("Setting '{}' expects a non-negative integer", key))?;
            Ok(value.to_string())
        }
        KEY_ACTIVE_WALLET if !value.is_empty() => Ok(value.to_string()),
        KEY_ACTIVE_WALLET => Err(anyhow!("Setting '{}' cannot be blank", key)),
        other => Err(anyhow!(
            "Unknown setting '{}', expected one of {}",
            other,
            SETTING_KEYS.join(", ")
        )),
    }
}
