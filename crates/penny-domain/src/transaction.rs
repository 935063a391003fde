//! Domain models for concrete, dated transactions.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        };
        f.write_str(label)
    }
}

/// A dated ledger entry. Expenses carry negative amounts, income positive.
///
/// User-created transactions get a fresh UUID string id; materialized
/// instances carry the deterministic `"{base_id}_{index}"` id from their
/// definition, so re-writing the same instance collapses into one record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub category: String,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_index: Option<u32>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        amount_cents: i64,
        category: impl Into<String>,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            amount_cents,
            category: category.into(),
            kind,
            date,
            note: None,
            recurring_id: None,
            instance_index: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.kind, TransactionKind::Expense)
    }

    /// Unsigned amount, used wherever totals ignore direction.
    pub fn magnitude_cents(&self) -> i64 {
        self.amount_cents.abs()
    }
}
