//! penny-storage-json
//!
//! Filesystem-backed JSON persistence implementing the engine's store and
//! cache ports. Each user's records live in one keyed document; writes go
//! through a temp file and an atomic rename. A process-wide lock
//! serializes read-modify-write cycles so compare-and-set stays atomic.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use penny_domain::{Bill, RecurringDefinition, Transaction, TransactionKind, User};
use penny_engine::{EngineError, StateCache, TransactionStore};

const DOC_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const STATE_FILE: &str = "state.json";

/// One user's persisted records, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default)]
    pub transactions: BTreeMap<String, Transaction>,
    #[serde(default)]
    pub bills: BTreeMap<Uuid, Bill>,
    #[serde(default)]
    pub definitions: BTreeMap<Uuid, RecurringDefinition>,
}

/// JSON-file store for user records plus the idempotency cache.
pub struct JsonStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(root: PathBuf) -> Result<Self, EngineError> {
        fs::create_dir_all(&root).map_err(io_err)?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, user_id: Uuid) -> PathBuf {
        self.root.join(format!("{}.{}", user_id, DOC_EXTENSION))
    }

    fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    pub fn load_document(&self, user_id: Uuid) -> Result<UserDocument, EngineError> {
        load_json(&self.document_path(user_id))
    }

    fn save_document(&self, user_id: Uuid, doc: &UserDocument) -> Result<(), EngineError> {
        save_json(&self.document_path(user_id), doc)
    }

    pub fn put_user(&self, user: &User) -> Result<(), EngineError> {
        let _guard = guard(&self.lock);
        let mut doc = self.load_document(user.id)?;
        doc.user = Some(user.clone());
        self.save_document(user.id, &doc)
    }

    pub fn put_bill(&self, bill: &Bill) -> Result<(), EngineError> {
        let _guard = guard(&self.lock);
        let mut doc = self.load_document(bill.user_id)?;
        doc.bills.insert(bill.id, bill.clone());
        self.save_document(bill.user_id, &doc)
    }

    pub fn remove_transaction(&self, user_id: Uuid, txn_id: &str) -> Result<bool, EngineError> {
        let _guard = guard(&self.lock);
        let mut doc = self.load_document(user_id)?;
        let removed = doc.transactions.remove(txn_id).is_some();
        if removed {
            self.save_document(user_id, &doc)?;
        }
        Ok(removed)
    }

    /// Every stored transaction for the user, ascending by date.
    pub fn transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>, EngineError> {
        let doc = self.load_document(user_id)?;
        let mut all: Vec<Transaction> = doc.transactions.into_values().collect();
        all.sort_by(|a, b| (a.date, a.id.clone()).cmp(&(b.date, b.id.clone())));
        Ok(all)
    }

    pub fn definition(&self, user_id: Uuid, def_id: Uuid) -> Result<Option<RecurringDefinition>, EngineError> {
        Ok(self.load_document(user_id)?.definitions.get(&def_id).cloned())
    }
}

impl TransactionStore for JsonStore {
    fn get_user(&self, user_id: Uuid) -> Result<User, EngineError> {
        self.load_document(user_id)?
            .user
            .ok_or_else(|| EngineError::PermissionDenied(format!("unknown user {user_id}")))
    }

    fn list_recurring_definitions(
        &self,
        user_id: Uuid,
        only_active: bool,
    ) -> Result<Vec<RecurringDefinition>, EngineError> {
        let doc = self.load_document(user_id)?;
        Ok(doc
            .definitions
            .into_values()
            .filter(|def| !only_active || def.active)
            .collect())
    }

    fn write_definition(&self, def: &RecurringDefinition) -> Result<(), EngineError> {
        let _guard = guard(&self.lock);
        let mut doc = self.load_document(def.base.user_id)?;
        doc.definitions.insert(def.id, def.clone());
        self.save_document(def.base.user_id, &doc)
    }

    fn advance_cursor(
        &self,
        updated: &RecurringDefinition,
        expected: Option<NaiveDate>,
    ) -> Result<bool, EngineError> {
        let _guard = guard(&self.lock);
        let mut doc = self.load_document(updated.base.user_id)?;
        let current = match doc.definitions.get(&updated.id) {
            Some(def) => def,
            None => return Ok(false),
        };
        if current.last_created_date != expected {
            return Ok(false);
        }
        doc.definitions.insert(updated.id, updated.clone());
        self.save_document(updated.base.user_id, &doc)?;
        Ok(true)
    }

    fn list_bills(&self, user_id: Uuid) -> Result<Vec<Bill>, EngineError> {
        Ok(self.load_document(user_id)?.bills.into_values().collect())
    }

    fn list_expenses(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Transaction>, EngineError> {
        let doc = self.load_document(user_id)?;
        let mut expenses: Vec<Transaction> = doc
            .transactions
            .into_values()
            .filter(|txn| {
                txn.kind == TransactionKind::Expense && txn.date >= from && txn.date <= to
            })
            .collect();
        expenses.sort_by_key(|txn| txn.date);
        Ok(expenses)
    }

    fn upsert_transaction(&self, txn: &Transaction) -> Result<bool, EngineError> {
        let _guard = guard(&self.lock);
        let mut doc = self.load_document(txn.user_id)?;
        if doc.transactions.contains_key(&txn.id) {
            return Ok(false);
        }
        doc.transactions.insert(txn.id.clone(), txn.clone());
        self.save_document(txn.user_id, &doc)?;
        Ok(true)
    }
}

impl StateCache for JsonStore {
    fn get(&self, key: &str) -> Result<Option<String>, EngineError> {
        let entries: BTreeMap<String, String> = load_json(&self.state_path())?;
        Ok(entries.get(key).cloned())
    }

    fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, EngineError> {
        let _guard = guard(&self.lock);
        let mut entries: BTreeMap<String, String> = load_json(&self.state_path())?;
        if entries.get(key).map(String::as_str) != expected {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_string());
        save_json(&self.state_path(), &entries)?;
        Ok(true)
    }
}

fn load_json<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T, EngineError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let data = fs::read_to_string(path).map_err(io_err)?;
    serde_json::from_str(&data).map_err(|err| EngineError::Serde(err.to_string()))
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), EngineError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|err| EngineError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(data.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    Ok(())
}

fn io_err(err: std::io::Error) -> EngineError {
    EngineError::StoreUnavailable(err.to_string())
}

fn guard(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
