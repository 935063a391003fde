//! Cross-crate scenarios: the engine driving the JSON backend end to end.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use tempfile::tempdir;

use penny_core::domain::{
    BaseTransaction, Bill, BillFrequency, Frequency, RecurringDefinition, Transaction,
    TransactionKind, User,
};
use penny_core::engine::{
    FixedClock, RecordingNotifier, ReminderEngine, StateCache, TransactionStore,
};
use penny_core::{engine_with_notifier, Config, JsonStore};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn engine_over(
    store: Arc<JsonStore>,
    notifier: Arc<RecordingNotifier>,
    clock: FixedClock,
) -> ReminderEngine {
    let cache: Arc<dyn StateCache> = store.clone();
    let txn_store: Arc<dyn TransactionStore> = store;
    ReminderEngine::new(txn_store, notifier, cache, Arc::new(clock))
}

#[test]
fn maintenance_tick_runs_the_whole_engine_over_the_json_backend() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonStore::new(dir.path().to_path_buf()).unwrap());

    let user = User::new("USD").with_budget(100_000);
    let user_id = user.id;
    store.put_user(&user).unwrap();

    let rent = BaseTransaction::new(user_id, -30_000, "bills", TransactionKind::Expense)
        .with_note("Rent");
    let rent_def = RecurringDefinition::new(rent, Frequency::Monthly, date(2024, 4, 1));
    let rent_def_id = rent_def.id;
    store.write_definition(&rent_def).unwrap();

    store
        .put_bill(&Bill::new(user_id, "Internet", 6_000, date(2024, 5, 28), BillFrequency::Monthly))
        .unwrap();

    let groceries = Transaction::new(
        user_id,
        -55_000,
        "food",
        TransactionKind::Expense,
        date(2024, 6, 3),
    );
    store.upsert_transaction(&groceries).unwrap();

    let now = Utc.with_ymd_and_hms(2024, 6, 5, 10, 0, 0).unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = engine_over(store.clone(), notifier.clone(), FixedClock(now));

    let report = engine.tick(user_id).unwrap();

    // April through June instances of the rent definition
    assert_eq!(report.materialized, 3);
    let instances: Vec<NaiveDate> = store
        .transactions(user_id)
        .unwrap()
        .into_iter()
        .filter(|txn| txn.recurring_id.is_some())
        .map(|txn| txn.date)
        .collect();
    assert_eq!(instances, vec![date(2024, 4, 1), date(2024, 5, 1), date(2024, 6, 1)]);

    // June spend: 550 groceries + 300 materialized rent = 85% of budget
    assert_eq!(report.threshold_event.map(|e| e.percent), Some(80));

    // two due-day groups (rent day 1 rolled to July, internet day 28)
    assert_eq!(report.reminders.scheduled, 4);
    let scheduled = notifier.scheduled();
    assert_eq!(scheduled.len(), 5, "four bill notifications plus the budget alert");
    assert_eq!(
        scheduled.iter().filter(|n| n.title == "Budget Alert").count(),
        1
    );

    // a second pass converges: nothing new to materialize, no rung re-fires
    let report = engine.tick(user_id).unwrap();
    assert_eq!(report.materialized, 0);
    assert!(report.threshold_event.is_none());
    assert_eq!(report.reminders.scheduled, 4);
    assert_eq!(notifier.scheduled().len(), 4);

    // cursor state survived on disk
    let stored = store.definition(user_id, rent_def_id).unwrap().unwrap();
    assert_eq!(stored.last_created_date, Some(date(2024, 6, 1)));
    assert_eq!(stored.created_instances, 3);
}

#[test]
fn engine_from_config_uses_the_configured_data_root() {
    let dir = tempdir().unwrap();
    let mut config = Config::default();
    config.data_root = Some(dir.path().to_path_buf());

    let seed = JsonStore::new(dir.path().to_path_buf()).unwrap();
    let user = User::new("USD");
    let user_id = user.id;
    seed.put_user(&user).unwrap();
    let base = BaseTransaction::new(user_id, -4_500, "bills", TransactionKind::Expense)
        .with_note("Gym");
    seed.write_definition(&RecurringDefinition::new(base, Frequency::Monthly, date(2024, 1, 15)))
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let engine = engine_with_notifier(&config, notifier).unwrap();

    let as_of = Utc.with_ymd_and_hms(2024, 4, 20, 9, 0, 0).unwrap();
    assert_eq!(engine.materialize_due(user_id, as_of).unwrap(), 4);
    assert_eq!(seed.transactions(user_id).unwrap().len(), 4);
}

#[test]
fn expansion_is_exposed_on_the_facade() {
    let base = BaseTransaction::new(User::new("USD").id, -1_000, "bills", TransactionKind::Expense);
    let def = RecurringDefinition::new(base, Frequency::Biweekly, date(2024, 3, 1)).capped_at(6);
    let instances = ReminderEngine::expand(&def, date(2024, 1, 1), date(2030, 1, 1)).unwrap();
    assert_eq!(instances.len(), 6);
    assert_eq!(instances.last().unwrap().date, date(2024, 5, 10));
}
