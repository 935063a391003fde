//! Bills and their due cadence.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_BILL_CATEGORY: &str = "bills";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillFrequency {
    Once,
    Monthly,
    Quarterly,
    Yearly,
}

impl fmt::Display for BillFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BillFrequency::Once => "Once",
            BillFrequency::Monthly => "Monthly",
            BillFrequency::Quarterly => "Quarterly",
            BillFrequency::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

/// A named obligation due on a particular day. Amounts are positive
/// magnitudes; a bill is always owed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub frequency: BillFrequency,
    #[serde(default = "default_bill_category")]
    pub category: String,
}

fn default_bill_category() -> String {
    DEFAULT_BILL_CATEGORY.into()
}

impl Bill {
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        amount_cents: i64,
        due_date: NaiveDate,
        frequency: BillFrequency,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            amount_cents: amount_cents.abs(),
            due_date,
            frequency,
            category: default_bill_category(),
        }
    }
}
