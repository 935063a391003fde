//! Ports consumed by the engine: record persistence and the key/value
//! cache backing idempotency state.

use chrono::NaiveDate;
use uuid::Uuid;

use penny_domain::{Bill, RecurringDefinition, Transaction, User};

use crate::EngineError;

/// Read/write access to a user's financial records.
///
/// Implementations key every collection by id. `upsert_transaction` must
/// be idempotent on `Transaction::id`, which together with deterministic
/// instance ids collapses duplicate materializations into one record.
pub trait TransactionStore: Send + Sync {
    fn get_user(&self, user_id: Uuid) -> Result<User, EngineError>;

    fn list_recurring_definitions(
        &self,
        user_id: Uuid,
        only_active: bool,
    ) -> Result<Vec<RecurringDefinition>, EngineError>;

    /// Upserts a definition by id.
    fn write_definition(&self, def: &RecurringDefinition) -> Result<(), EngineError>;

    /// Compare-and-set update of a definition's materialization cursor
    /// fields. Succeeds only while the stored `last_created_date` still
    /// equals `expected`; `Ok(false)` means another writer advanced it
    /// first.
    fn advance_cursor(
        &self,
        updated: &RecurringDefinition,
        expected: Option<NaiveDate>,
    ) -> Result<bool, EngineError>;

    fn list_bills(&self, user_id: Uuid) -> Result<Vec<Bill>, EngineError>;

    /// Expense transactions dated within `[from, to]`, ascending by date.
    fn list_expenses(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Transaction>, EngineError>;

    /// Idempotent on `txn.id`; returns whether a new record was created.
    fn upsert_transaction(&self, txn: &Transaction) -> Result<bool, EngineError>;
}

/// Key/value store with compare-and-set semantics, used to remember which
/// alerts already fired.
pub trait StateCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, EngineError>;

    /// Writes `value` only if the current entry equals `expected`
    /// (`None` = entry absent). Returns whether the write happened.
    fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, EngineError>;
}

/// Cache key for the per-month budget alert state.
pub fn budget_state_key(user_id: Uuid, year: i32, month: u32) -> String {
    format!("budget_notification_{}_{}_{}", user_id, year, month)
}
