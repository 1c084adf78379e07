// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{TransactionKind, categories};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle() -> Result<()> {
    let mut data = Vec::new();
    for c in categories() {
        let kinds: Vec<&str> = [
            TransactionKind::Expense,
            TransactionKind::Income,
            TransactionKind::Savings,
        ]
        .into_iter()
        .filter(|k| c.accepts(*k))
        .map(|k| k.as_str())
        .collect();
        data.push(vec![
            c.id.to_string(),
            format!("{} {}", c.icon, c.name),
            kinds.join(", "),
        ]);
    }
    println!("{}", pretty_table(&["ID", "Category", "Used for"], data));
    Ok(())
}
