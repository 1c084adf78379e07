// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::target_wallet;
use crate::models::{NewTransaction, Transaction, TransactionKind};
use crate::store::LedgerStore;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table};
use anyhow::{Result, anyhow};
use serde::Serialize;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            match store.delete_transaction(id) {
                Some(tx) => println!("Removed {} {} ({})", tx.kind, fmt_money(&tx.amount), tx.id),
                None => println!("No transaction with id {}", id),
            }
        }
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let kind = TransactionKind::parse(sub.get_one::<String>("type").unwrap())
        .ok_or_else(|| anyhow!("Transaction type must be expense, income or savings"))?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => store.today(),
    };
    let wallet_id = target_wallet(store, sub)?;
    let category = sub.get_one::<String>("category").map(|s| s.as_str()).unwrap_or("");

    let mut input = NewTransaction::new(kind, amount, category, date, &wallet_id);
    input.title = sub.get_one::<String>("title").cloned();
    input.note = sub.get_one::<String>("note").cloned();

    let tx = store.add_transaction(input)?;
    println!("id: {}", tx.id);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub title: String,
    pub amount: String,
    pub note: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        let sign = match t.kind {
            TransactionKind::Income => "+",
            TransactionKind::Expense => "-",
            TransactionKind::Savings => "",
        };
        Self {
            id: t.id.clone(),
            date: t.date.to_string(),
            kind: t.kind.to_string(),
            category: t.category.clone(),
            title: t.title.clone().unwrap_or_default(),
            amount: format!("{}{}", sign, fmt_money(&t.amount)),
            note: t.note.clone().unwrap_or_default(),
        }
    }
}

pub fn query_rows(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let wallet_id = target_wallet(store, sub)?;
    let mut txs = match sub.get_one::<String>("month") {
        Some(month) => {
            let (y, m) = parse_month(month)?;
            store.transactions_in_month(&wallet_id, y, m)
        }
        None => store.recent_transactions(&wallet_id, usize::MAX),
    };
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }
    Ok(txs.into_iter().map(TransactionRow::from).collect())
}

fn list(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.title.clone(),
                    r.amount.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Category", "Title", "Amount", "Note"],
                rows
            )
        );
    }
    Ok(())
}
