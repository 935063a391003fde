//! Recurring definitions and their calendar stepping.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{shift_month, shift_year};
use crate::transaction::{Transaction, TransactionKind};

/// Cadence of a recurring definition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Next date after `from`. Month-based steps clamp to the last day of
    /// shorter target months and re-base from the clamped day.
    pub fn next_date(self, from: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => from + Duration::days(1),
            Frequency::Weekly => from + Duration::days(7),
            Frequency::Biweekly => from + Duration::days(14),
            Frequency::Monthly => shift_month(from, 1),
            Frequency::Quarterly => shift_month(from, 3),
            Frequency::Yearly => shift_year(from, 1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Biweekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Transaction template a definition stamps onto each materialized
/// instance. The template id seeds the deterministic instance ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaseTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub category: String,
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl BaseTransaction {
    pub fn new(
        user_id: Uuid,
        amount_cents: i64,
        category: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount_cents,
            category: category.into(),
            kind,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A rule producing a potentially unbounded stream of dated instances.
///
/// `end_date` and `occurrences` are mutually exclusive; both unset means
/// open-ended. Only the materializer mutates `created_instances`,
/// `last_created_date`, and `active`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringDefinition {
    pub id: Uuid,
    pub base: BaseTransaction,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<u32>,
    #[serde(default)]
    pub created_instances: u32,
    #[serde(default)]
    pub last_created_date: Option<NaiveDate>,
    pub active: bool,
}

impl RecurringDefinition {
    pub fn new(base: BaseTransaction, frequency: Frequency, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            base,
            frequency,
            start_date,
            end_date: None,
            occurrences: None,
            created_instances: 0,
            last_created_date: None,
            active: true,
        }
    }

    pub fn ending_on(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn capped_at(mut self, occurrences: u32) -> Self {
        self.occurrences = Some(occurrences);
        self
    }

    /// Deterministic id of the instance at `index`.
    pub fn instance_id(&self, index: u32) -> String {
        format!("{}_{}", self.base.id, index)
    }

    /// Stamps the template into a concrete dated instance.
    pub fn instance_at(&self, date: NaiveDate, index: u32) -> Transaction {
        Transaction {
            id: self.instance_id(index),
            user_id: self.base.user_id,
            amount_cents: self.base.amount_cents,
            category: self.base.category.clone(),
            kind: self.base.kind,
            date,
            note: self.base.note.clone(),
            recurring_id: Some(self.id),
            instance_index: Some(index),
        }
    }

    pub fn cap_reached(&self) -> bool {
        self.occurrences
            .map(|cap| self.created_instances >= cap)
            .unwrap_or(false)
    }
}
