//! User profile and per-month budget alert state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub currency_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_budget_cents: Option<i64>,
}

impl User {
    pub fn new(currency_code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            currency_code: currency_code.into(),
            monthly_budget_cents: None,
        }
    }

    pub fn with_budget(mut self, monthly_budget_cents: i64) -> Self {
        self.monthly_budget_cents = Some(monthly_budget_cents);
        self
    }
}

/// Cache payload remembering the highest budget threshold fired in a
/// month. Month rollover is implicit: the cache key embeds (year, month),
/// so a new month starts from a missing entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetThresholdState {
    pub last_threshold: u8,
    pub updated_at: DateTime<Utc>,
}
