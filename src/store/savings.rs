// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{LedgerEvent, LedgerStore};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Member, SAVINGS_CATEGORY, SavingsGoal, Transaction, TransactionKind, saturating_sum,
};
use crate::ports::{CollectionKind, NoticeKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewGoal {
    pub title: String,
    pub target_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    pub members: Vec<String>,
}

impl NewGoal {
    pub fn new(title: &str, target_amount: Decimal) -> Self {
        Self {
            title: title.to_string(),
            target_amount,
            ..Self::default()
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_member(mut self, name: &str) -> Self {
        self.members.push(name.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberShare {
    pub name: String,
    pub contribution: Decimal,
    /// Share of the goal target, not capped at 100.
    pub percent_of_target: Decimal,
}

impl LedgerStore {
    pub fn create_goal(&mut self, input: NewGoal) -> LedgerResult<SavingsGoal> {
        let title = input.title.trim();
        if title.is_empty() {
            self.notify(NoticeKind::Error, "Please enter a saving name");
            return Err(LedgerError::validation("goal title must not be blank"));
        }
        if input.target_amount <= Decimal::ZERO {
            self.notify(NoticeKind::Error, "Target amount must be greater than 0");
            return Err(LedgerError::validation("target amount must be positive"));
        }

        // Seeded members start with nothing contributed.
        let mut members: Vec<Member> = Vec::new();
        for name in input.members.iter().map(|m| m.trim()).filter(|m| !m.is_empty()) {
            if !members.iter().any(|m| m.name == name) {
                members.push(Member::named(name));
            }
        }

        let goal = SavingsGoal {
            id: self.next_id(),
            title: title.to_string(),
            target_amount: input.target_amount,
            current_amount: Decimal::ZERO,
            deadline: input.deadline,
            members,
        };
        self.savings_goals.push(goal.clone());
        tracing::debug!(goal = %goal.id, title = %goal.title, target = %goal.target_amount, "goal created");

        self.persist(&[CollectionKind::SavingsGoals]);
        self.notify(NoticeKind::Success, "Saving created successfully!");
        self.emit(LedgerEvent::GoalCreated {
            goal_id: goal.id.clone(),
        });
        Ok(goal)
    }

    /// Add `amount` to `contributor`'s share of a goal and record a matching
    /// savings transaction on the active wallet. Unknown goals are a no-op.
    pub fn contribute(
        &mut self,
        goal_id: &str,
        amount: Decimal,
        contributor: &str,
    ) -> LedgerResult<Option<Transaction>> {
        if amount <= Decimal::ZERO {
            self.notify(NoticeKind::Error, "Amount must be positive");
            return Err(LedgerError::validation("amount must be positive"));
        }
        let contributor = contributor.trim();
        if contributor.is_empty() {
            self.notify(NoticeKind::Error, "Please enter a contributor name");
            return Err(LedgerError::validation("contributor name must not be blank"));
        }
        let Some(pos) = self.savings_goals.iter().position(|g| g.id == goal_id) else {
            tracing::debug!(goal = goal_id, "contribution to unknown goal ignored");
            return Ok(None);
        };

        let so_far = self.savings_goals[pos]
            .members
            .iter()
            .find(|m| m.name == contributor)
            .map_or(Decimal::ZERO, Member::contributed);
        let delta = self
            .config
            .savings_balance
            .signed_delta(TransactionKind::Savings, amount);
        if so_far.checked_add(amount).is_none() || !self.balance_accepts(&self.active_wallet, delta) {
            self.notify(NoticeKind::Error, "Amount is too large");
            return Err(LedgerError::validation("contribution would overflow"));
        }

        let goal = &mut self.savings_goals[pos];
        // Members are keyed by exact display name.
        match goal.members.iter_mut().find(|m| m.name == contributor) {
            Some(member) => member.contribution = Some(member.contributed() + amount),
            None => goal.members.push(Member {
                name: contributor.to_string(),
                contribution: Some(amount),
            }),
        }
        goal.current_amount = goal.total_contributed().min(goal.target_amount);
        let goal_title = goal.title.clone();
        let goal_id = goal.id.clone();

        let tx = Transaction {
            id: self.next_id(),
            kind: TransactionKind::Savings,
            amount,
            category: SAVINGS_CATEGORY.to_string(),
            title: Some(format!("Saved to {}", goal_title)),
            note: Some(format!("Contributor: {}", contributor)),
            date: self.clock.today(),
            wallet_id: self.active_wallet.clone(),
            goal_id: Some(goal_id.clone()),
        };
        self.record(tx.clone());

        self.persist(&[
            CollectionKind::SavingsGoals,
            CollectionKind::Transactions,
            CollectionKind::Wallets,
        ]);
        self.notify(
            NoticeKind::Success,
            &format!("Added ${} to {} by {}!", amount.normalize(), goal_title, contributor),
        );
        self.emit(LedgerEvent::GoalContributed {
            goal_id,
            transaction_id: tx.id.clone(),
        });
        Ok(Some(tx))
    }

    /// Delete a goal and every transaction recorded against it, after the
    /// user confirms. Returns whether anything was deleted.
    pub fn delete_goal(&mut self, goal_id: &str) -> bool {
        let Some(pos) = self.savings_goals.iter().position(|g| g.id == goal_id) else {
            return false;
        };
        let prompt = format!(
            "Are you sure you want to delete \"{}\"?",
            self.savings_goals[pos].title
        );
        if !self.confirm.confirm(&prompt) {
            tracing::debug!(goal = goal_id, "goal deletion declined");
            return false;
        }

        let goal = self.savings_goals.remove(pos);
        let mut removed = 0;
        let mut i = 0;
        while i < self.transactions.len() {
            if self.transactions[i].goal_id.as_deref() == Some(goal.id.as_str()) {
                self.unrecord(i);
                removed += 1;
            } else {
                i += 1;
            }
        }
        tracing::debug!(goal = %goal.id, removed, "goal deleted");

        self.persist(&[
            CollectionKind::SavingsGoals,
            CollectionKind::Transactions,
            CollectionKind::Wallets,
        ]);
        self.notify(NoticeKind::Success, "Saving goal deleted!");
        self.emit(LedgerEvent::GoalDeleted {
            goal_id: goal.id,
            removed_transactions: removed,
        });
        true
    }

    pub fn savings_goals(&self) -> &[SavingsGoal] {
        &self.savings_goals
    }

    pub fn goal(&self, id: &str) -> Option<&SavingsGoal> {
        self.savings_goals.iter().find(|g| g.id == id)
    }

    /// Sum of current amounts across all goals.
    pub fn total_saved(&self) -> Decimal {
        saturating_sum(self.savings_goals.iter().map(|g| g.current_amount))
    }

    pub fn member_shares(&self, goal_id: &str) -> Vec<MemberShare> {
        let Some(goal) = self.goal(goal_id) else {
            return Vec::new();
        };
        goal.members
            .iter()
            .map(|m| MemberShare {
                name: m.name.clone(),
                contribution: m.contributed(),
                percent_of_target: m
                    .contributed()
                    .checked_div(goal.target_amount)
                    .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                    .unwrap_or(Decimal::MAX),
            })
            .collect()
    }
}
