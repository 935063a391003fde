#![doc(test(attr(deny(warnings))))]

//! Penny Core ties the recurring-transaction and bill-reminder engine to
//! its JSON storage backend and user configuration for headless runs and
//! integration tests.

pub mod runtime;

pub use penny_config::{Config, ConfigError, ConfigManager};
pub use penny_domain as domain;
pub use penny_engine as engine;
pub use penny_storage_json::JsonStore;
pub use runtime::{engine_from_config, engine_with_notifier, open_default_engine, BootstrapError};

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT.call_once(|| {
        penny_engine::init();
        tracing::info!("Penny core initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
