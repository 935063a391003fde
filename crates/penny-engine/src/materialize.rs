//! Persists newly-due instances and advances definition cursors.

use chrono::{Duration, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use penny_domain::RecurringDefinition;

use crate::expand::expand;
use crate::store::TransactionStore;
use crate::EngineError;

/// Materializes every instance of the user's active definitions dated in
/// `(last_created_date, as_of]` and returns how many new records were
/// persisted. Safe to re-run and to race against itself: instance ids are
/// deterministic and the cursor only ever moves forward.
pub fn materialize_due(
    store: &dyn TransactionStore,
    user_id: Uuid,
    as_of: NaiveDate,
) -> Result<usize, EngineError> {
    let mut emitted = 0;
    for def in store.list_recurring_definitions(user_id, true)? {
        emitted += materialize_definition(store, &def, as_of)?;
    }
    Ok(emitted)
}

fn materialize_definition(
    store: &dyn TransactionStore,
    def: &RecurringDefinition,
    as_of: NaiveDate,
) -> Result<usize, EngineError> {
    let expected = def.last_created_date;
    // the cursor is an exclusive lower bound for the next window
    let from = match expected {
        Some(cursor) => cursor + Duration::days(1),
        None => def.start_date,
    };
    if from > as_of {
        return Ok(0);
    }

    let instances = expand(def, from, as_of)?;
    if instances.is_empty() {
        return Ok(0);
    }

    let mut inserted = 0;
    for txn in &instances {
        if store.upsert_transaction(txn)? {
            inserted += 1;
        }
    }

    let last = &instances[instances.len() - 1];
    let mut updated = def.clone();
    updated.last_created_date = Some(last.date);
    if let Some(index) = last.instance_index {
        updated.created_instances = index + 1;
    }
    if updated.cap_reached() {
        updated.active = false;
    }
    commit_cursor(store, updated, expected)?;

    debug!(definition = %def.id, inserted, "materialized recurring instances");
    Ok(inserted)
}

/// Compare-and-set loop keeping `last_created_date` monotone under
/// concurrent invocations: the further-advanced cursor wins.
fn commit_cursor(
    store: &dyn TransactionStore,
    updated: RecurringDefinition,
    mut expected: Option<NaiveDate>,
) -> Result<(), EngineError> {
    loop {
        if store.advance_cursor(&updated, expected)? {
            return Ok(());
        }
        let fresh = store
            .list_recurring_definitions(updated.base.user_id, false)?
            .into_iter()
            .find(|d| d.id == updated.id);
        let fresh = match fresh {
            Some(def) => def,
            None => return Ok(()),
        };
        if fresh.last_created_date >= updated.last_created_date {
            return Ok(());
        }
        expected = fresh.last_created_date;
    }
}
