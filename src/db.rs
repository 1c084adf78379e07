// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::PersistenceError;
use crate::models::{
    AnalyticsHistory, LoadedState, Member, SavingsGoal, Transaction, TransactionKind, Wallet,
    WalletKind,
};
use crate::ports::{Collection, Persistence};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Walletbook", "walletbook"));

/// Environment variable that overrides the database location.
pub const DB_ENV: &str = "WALLETBOOK_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("walletbook.sqlite"))
}

/// SQLite-backed storage for the ledger collections and CLI settings.
/// Clones share one connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Rc<Connection>,
}

impl SqliteStore {
    pub fn open_or_init() -> Result<Self> {
        let path = db_path()?;
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Rc::new(conn),
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn settings(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM settings ORDER BY key")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn load_wallets(&self) -> Result<Vec<Wallet>, PersistenceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, type, members, balance FROM wallets ORDER BY position")?;
        let mut cur = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = cur.next()? {
            let id: String = r.get(0)?;
            let kind_s: String = r.get(2)?;
            let members_s: String = r.get(3)?;
            let balance_s: String = r.get(4)?;
            let kind = WalletKind::parse(&kind_s).ok_or_else(|| {
                PersistenceError::Corrupt(format!("wallet {} has type '{}'", id, kind_s))
            })?;
            out.push(Wallet {
                name: r.get(1)?,
                kind,
                members: serde_json::from_str(&members_s)?,
                balance: parse_amount(&balance_s, "wallet balance")?,
                id,
            });
        }
        Ok(out)
    }

    fn load_transactions(&self) -> Result<Vec<Transaction>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, type, amount, category, title, note, date, wallet_id, goal_id
             FROM transactions ORDER BY position",
        )?;
        let mut cur = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = cur.next()? {
            let id: String = r.get(0)?;
            let kind_s: String = r.get(1)?;
            let amount_s: String = r.get(2)?;
            let kind = TransactionKind::parse(&kind_s).ok_or_else(|| {
                PersistenceError::Corrupt(format!("transaction {} has type '{}'", id, kind_s))
            })?;
            out.push(Transaction {
                kind,
                amount: parse_amount(&amount_s, "transaction amount")?,
                category: r.get(3)?,
                title: r.get(4)?,
                note: r.get(5)?,
                date: r.get(6)?,
                wallet_id: r.get(7)?,
                goal_id: r.get(8)?,
                id,
            });
        }
        Ok(out)
    }

    fn load_goals(&self) -> Result<Vec<SavingsGoal>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, target_amount, current_amount, deadline
             FROM savings_goals ORDER BY position",
        )?;
        let mut members_stmt = self.conn.prepare(
            "SELECT name, contribution FROM goal_members WHERE goal_id=?1 ORDER BY position",
        )?;
        let mut cur = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = cur.next()? {
            let id: String = r.get(0)?;
            let target_s: String = r.get(2)?;
            let current_s: String = r.get(3)?;

            let mut members = Vec::new();
            let mut mcur = members_stmt.query(params![&id])?;
            while let Some(m) = mcur.next()? {
                let contribution: Option<String> = m.get(1)?;
                members.push(Member {
                    name: m.get(0)?,
                    contribution: contribution
                        .map(|c| parse_amount(&c, "member contribution"))
                        .transpose()?,
                });
            }

            out.push(SavingsGoal {
                title: r.get(1)?,
                target_amount: parse_amount(&target_s, "goal target")?,
                current_amount: parse_amount(&current_s, "goal amount")?,
                deadline: r.get(4)?,
                members,
                id,
            });
        }
        Ok(out)
    }

    fn load_history(&self) -> Result<AnalyticsHistory, PersistenceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT year, month, expenses FROM analytics_history ORDER BY year, month")?;
        let mut cur = stmt.query([])?;
        let mut out = AnalyticsHistory::new();
        while let Some(r) = cur.next()? {
            let year: i32 = r.get(0)?;
            let month: u32 = r.get(1)?;
            let expenses_s: String = r.get(2)?;
            if !(1..=12).contains(&month) {
                return Err(PersistenceError::Corrupt(format!(
                    "analytics month {} for {}",
                    month, year
                )));
            }
            let totals = out.entry(year).or_insert([Decimal::ZERO; 12]);
            totals[(month - 1) as usize] = parse_amount(&expenses_s, "analytics total")?;
        }
        Ok(out)
    }
}

impl Persistence for SqliteStore {
    fn load_all(&self) -> Result<LoadedState, PersistenceError> {
        Ok(LoadedState {
            transactions: self.load_transactions()?,
            wallets: self.load_wallets()?,
            savings_goals: self.load_goals()?,
            analytics_history: self.load_history()?,
        })
    }

    fn save_collection(&self, collection: Collection<'_>) -> Result<(), PersistenceError> {
        let tx = self.conn.unchecked_transaction()?;
        match collection {
            Collection::Wallets(wallets) => {
                tx.execute("DELETE FROM wallets", [])?;
                let mut stmt = tx.prepare(
                    "INSERT INTO wallets(position, id, name, type, members, balance)
                     VALUES (?1,?2,?3,?4,?5,?6)",
                )?;
                for (pos, w) in wallets.iter().enumerate() {
                    stmt.execute(params![
                        pos as i64,
                        w.id,
                        w.name,
                        w.kind.as_str(),
                        serde_json::to_string(&w.members)?,
                        w.balance.to_string(),
                    ])?;
                }
            }
            Collection::Transactions(txs) => {
                tx.execute("DELETE FROM transactions", [])?;
                let mut stmt = tx.prepare(
                    "INSERT INTO transactions(position, id, type, amount, category, title, note, date, wallet_id, goal_id)
                     VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
                )?;
                for (pos, t) in txs.iter().enumerate() {
                    stmt.execute(params![
                        pos as i64,
                        t.id,
                        t.kind.as_str(),
                        t.amount.to_string(),
                        t.category,
                        t.title,
                        t.note,
                        t.date,
                        t.wallet_id,
                        t.goal_id,
                    ])?;
                }
            }
            Collection::SavingsGoals(goals) => {
                tx.execute("DELETE FROM goal_members", [])?;
                tx.execute("DELETE FROM savings_goals", [])?;
                let mut goal_stmt = tx.prepare(
                    "INSERT INTO savings_goals(position, id, title, target_amount, current_amount, deadline)
                     VALUES (?1,?2,?3,?4,?5,?6)",
                )?;
                let mut member_stmt = tx.prepare(
                    "INSERT INTO goal_members(goal_id, position, name, contribution)
                     VALUES (?1,?2,?3,?4)",
                )?;
                for (pos, g) in goals.iter().enumerate() {
                    goal_stmt.execute(params![
                        pos as i64,
                        g.id,
                        g.title,
                        g.target_amount.to_string(),
                        g.current_amount.to_string(),
                        g.deadline,
                    ])?;
                    for (mpos, m) in g.members.iter().enumerate() {
                        member_stmt.execute(params![
                            g.id,
                            mpos as i64,
                            m.name,
                            m.contribution.map(|c| c.to_string()),
                        ])?;
                    }
                }
            }
            Collection::AnalyticsHistory(history) => {
                tx.execute("DELETE FROM analytics_history", [])?;
                let mut stmt = tx.prepare(
                    "INSERT INTO analytics_history(year, month, expenses) VALUES (?1,?2,?3)",
                )?;
                for (year, totals) in history {
                    for (idx, v) in totals.iter().enumerate() {
                        stmt.execute(params![year, (idx + 1) as i64, v.to_string()])?;
                    }
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn parse_amount(s: &str, what: &str) -> Result<Decimal, PersistenceError> {
    s.parse::<Decimal>()
        .map_err(|_| PersistenceError::Corrupt(format!("invalid {} '{}'", what, s)))
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS wallets(
        position INTEGER NOT NULL,
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('personal','shared')),
        members TEXT NOT NULL DEFAULT '[]', -- JSON array of names
        balance TEXT NOT NULL
    );

    -- wallet_id and goal_id are plain columns: collections are written independently
    CREATE TABLE IF NOT EXISTS transactions(
        position INTEGER NOT NULL,
        id TEXT PRIMARY KEY,
        type TEXT NOT NULL CHECK(type IN ('expense','income','savings')),
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        title TEXT,
        note TEXT,
        date TEXT NOT NULL,
        wallet_id TEXT NOT NULL,
        goal_id TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_wallet_date ON transactions(wallet_id, date);

    CREATE TABLE IF NOT EXISTS savings_goals(
        position INTEGER NOT NULL,
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        target_amount TEXT NOT NULL,
        current_amount TEXT NOT NULL,
        deadline TEXT
    );

    CREATE TABLE IF NOT EXISTS goal_members(
        goal_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        name TEXT NOT NULL,
        contribution TEXT,
        PRIMARY KEY(goal_id, name),
        FOREIGN KEY(goal_id) REFERENCES savings_goals(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS analytics_history(
        year INTEGER NOT NULL,
        month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
        expenses TEXT NOT NULL,
        PRIMARY KEY(year, month)
    );
    "#,
    )?;
    Ok(())
}
