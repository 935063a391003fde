//! Wires configuration, storage, and the system clock into a ready engine.

use std::sync::Arc;

use thiserror::Error;

use penny_config::{Config, ConfigError, ConfigManager};
use penny_engine::{
    EngineError, EngineSettings, LogNotifier, Notifier, ReminderEngine, StateCache, SystemClock,
    TransactionStore,
};
use penny_storage_json::JsonStore;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Loads the persisted configuration (or defaults) and builds the engine
/// over the JSON backend, with a tracing-backed notification dispatcher.
pub fn open_default_engine() -> Result<ReminderEngine, BootstrapError> {
    let config = ConfigManager::default_location()?.load()?;
    engine_from_config(&config)
}

/// Builds an engine over the JSON backend described by `config`.
pub fn engine_from_config(config: &Config) -> Result<ReminderEngine, BootstrapError> {
    engine_with_notifier(config, Arc::new(LogNotifier))
}

/// Same as [`engine_from_config`] but with a caller-supplied dispatcher;
/// the mobile shell passes its platform notifier here.
pub fn engine_with_notifier(
    config: &Config,
    notifier: Arc<dyn Notifier>,
) -> Result<ReminderEngine, BootstrapError> {
    let store = Arc::new(JsonStore::new(config.resolve_data_root())?);
    let settings = EngineSettings {
        reminder_lead_days: config.reminder_lead_days,
        notify_hour: config.notify_hour,
    };
    let cache: Arc<dyn StateCache> = store.clone();
    let txn_store: Arc<dyn TransactionStore> = store;
    Ok(ReminderEngine::with_settings(
        txn_store,
        notifier,
        cache,
        Arc::new(SystemClock),
        settings,
    ))
}
