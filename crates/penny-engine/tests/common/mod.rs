//! In-memory store and cache fixtures shared by the engine tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use penny_domain::{Bill, RecurringDefinition, Transaction, TransactionKind, User};
use penny_engine::{EngineError, StateCache, TransactionStore};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoreData>,
}

#[derive(Default)]
struct StoreData {
    users: HashMap<Uuid, User>,
    transactions: HashMap<String, Transaction>,
    bills: Vec<Bill>,
    definitions: HashMap<Uuid, RecurringDefinition>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_user(&self, user: User) {
        lock(&self.inner).users.insert(user.id, user);
    }

    pub fn put_definition(&self, def: RecurringDefinition) {
        lock(&self.inner).definitions.insert(def.id, def);
    }

    pub fn put_bill(&self, bill: Bill) {
        lock(&self.inner).bills.push(bill);
    }

    pub fn put_transaction(&self, txn: Transaction) {
        lock(&self.inner).transactions.insert(txn.id.clone(), txn);
    }

    pub fn remove_transaction(&self, id: &str) {
        lock(&self.inner).transactions.remove(id);
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        let mut all: Vec<Transaction> = lock(&self.inner).transactions.values().cloned().collect();
        all.sort_by(|a, b| (a.date, a.id.clone()).cmp(&(b.date, b.id.clone())));
        all
    }

    pub fn definition(&self, id: Uuid) -> Option<RecurringDefinition> {
        lock(&self.inner).definitions.get(&id).cloned()
    }
}

impl TransactionStore for MemoryStore {
    fn get_user(&self, user_id: Uuid) -> Result<User, EngineError> {
        lock(&self.inner)
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| EngineError::PermissionDenied(format!("unknown user {user_id}")))
    }

    fn list_recurring_definitions(
        &self,
        user_id: Uuid,
        only_active: bool,
    ) -> Result<Vec<RecurringDefinition>, EngineError> {
        let data = lock(&self.inner);
        let mut defs: Vec<RecurringDefinition> = data
            .definitions
            .values()
            .filter(|def| def.base.user_id == user_id && (!only_active || def.active))
            .cloned()
            .collect();
        defs.sort_by_key(|def| def.id);
        Ok(defs)
    }

    fn write_definition(&self, def: &RecurringDefinition) -> Result<(), EngineError> {
        lock(&self.inner).definitions.insert(def.id, def.clone());
        Ok(())
    }

    fn advance_cursor(
        &self,
        updated: &RecurringDefinition,
        expected: Option<NaiveDate>,
    ) -> Result<bool, EngineError> {
        let mut data = lock(&self.inner);
        let current = match data.definitions.get(&updated.id) {
            Some(def) => def,
            None => return Ok(false),
        };
        if current.last_created_date != expected {
            return Ok(false);
        }
        data.definitions.insert(updated.id, updated.clone());
        Ok(true)
    }

    fn list_bills(&self, user_id: Uuid) -> Result<Vec<Bill>, EngineError> {
        Ok(lock(&self.inner)
            .bills
            .iter()
            .filter(|bill| bill.user_id == user_id)
            .cloned()
            .collect())
    }

    fn list_expenses(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Transaction>, EngineError> {
        let data = lock(&self.inner);
        let mut expenses: Vec<Transaction> = data
            .transactions
            .values()
            .filter(|txn| {
                txn.user_id == user_id
                    && txn.kind == TransactionKind::Expense
                    && txn.date >= from
                    && txn.date <= to
            })
            .cloned()
            .collect();
        expenses.sort_by_key(|txn| txn.date);
        Ok(expenses)
    }

    fn upsert_transaction(&self, txn: &Transaction) -> Result<bool, EngineError> {
        let mut data = lock(&self.inner);
        if data.transactions.contains_key(&txn.id) {
            return Ok(false);
        }
        data.transactions.insert(txn.id.clone(), txn.clone());
        Ok(true)
    }
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, EngineError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, EngineError> {
        let mut entries = lock(&self.entries);
        if entries.get(key).map(String::as_str) != expected {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(true)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
