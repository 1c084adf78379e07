// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LedgerStore;
use crate::utils::{fmt_money, pretty_table};
use anyhow::Result;

/// Consistency checks over the loaded ledger. Each row is `[issue, detail]`.
pub fn find_issues(store: &LedgerStore) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Stored balance disagrees with the transaction log
    for w in store.list_wallets() {
        let derived = store.derived_balance(&w.id);
        if derived != w.balance {
            rows.push(vec![
                "balance_drift".into(),
                format!(
                    "{} stored {} derived {}",
                    w.id,
                    fmt_money(&w.balance),
                    fmt_money(&derived)
                ),
            ]);
        }
    }

    // 2) Transactions booked against a wallet that does not exist
    for t in store.transactions() {
        if store.wallet(&t.wallet_id).is_none() {
            rows.push(vec![
                "txn_unknown_wallet".into(),
                format!("{} -> {}", t.id, t.wallet_id),
            ]);
        }
        if let Some(goal_id) = &t.goal_id {
            if store.goal(goal_id).is_none() {
                rows.push(vec![
                    "txn_unknown_goal".into(),
                    format!("{} -> {}", t.id, goal_id),
                ]);
            }
        }
    }

    // 3) Goal progress out of step with member contributions
    for g in store.savings_goals() {
        let expected = g.total_contributed().min(g.target_amount);
        if g.current_amount != expected {
            rows.push(vec![
                "goal_progress_mismatch".into(),
                format!(
                    "{} current {} expected {}",
                    g.id,
                    fmt_money(&g.current_amount),
                    fmt_money(&expected)
                ),
            ]);
        }
    }

    rows
}

pub fn handle(store: &LedgerStore) -> Result<()> {
    let rows = find_issues(store);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
