//! penny-engine
//!
//! Recurring-transaction and bill-reminder engine for Penny. Expands
//! definitions into dated instances, materializes the due ones exactly
//! once, watches the monthly budget ladder, and keeps bill reminders
//! scheduled. Depends on penny-domain; all I/O goes through injected
//! ports. No UI, no direct storage.

pub mod bills;
pub mod budget;
pub mod categorize;
pub mod engine;
pub mod error;
pub mod expand;
pub mod materialize;
pub mod notify;
pub mod store;
pub mod telemetry;
pub mod time;

pub use bills::{rebuild_bill_reminders, ScheduleOutcome};
pub use budget::{check_budget_thresholds, ThresholdEvent, THRESHOLD_LADDER};
pub use categorize::categorize;
pub use engine::{EngineSettings, MaintenanceReport, ReminderEngine};
pub use error::EngineError;
pub use expand::expand;
pub use materialize::materialize_due;
pub use notify::{
    LogNotifier, NotificationPayload, Notifier, RecordingNotifier, ScheduledNotification,
};
pub use store::{budget_state_key, StateCache, TransactionStore};
pub use time::{Clock, FixedClock, SystemClock};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        telemetry::init_tracing();
        tracing::info!("Penny engine tracing initialized.");
    });
}
