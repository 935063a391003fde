//! The engine facade: injected dependencies and the public operations.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::warn;
use uuid::Uuid;

use penny_domain::{RecurringDefinition, Transaction};

use crate::bills::{self, ScheduleOutcome};
use crate::budget::{self, ThresholdEvent};
use crate::expand;
use crate::materialize;
use crate::notify::{budget_alert_body, NotificationPayload, Notifier, BUDGET_ALERT_TITLE};
use crate::store::{StateCache, TransactionStore};
use crate::time::Clock;
use crate::EngineError;

/// Tunables for reminder scheduling. The defaults match the product
/// contract: reminders three days ahead, notifications at 09:00.
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub reminder_lead_days: i64,
    pub notify_hour: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            reminder_lead_days: 3,
            notify_hour: 9,
        }
    }
}

/// Summary of one maintenance pass over a user's records.
#[derive(Debug)]
pub struct MaintenanceReport {
    pub materialized: usize,
    pub threshold_event: Option<ThresholdEvent>,
    pub reminders: ScheduleOutcome,
}

/// Recurring-transaction and bill-reminder engine.
///
/// All I/O flows through the injected ports; operations take an explicit
/// `as_of` instant so behavior is reproducible, while [`ReminderEngine::tick`]
/// runs a whole maintenance pass at the injected clock's current instant.
pub struct ReminderEngine {
    store: Arc<dyn TransactionStore>,
    notifier: Arc<dyn Notifier>,
    cache: Arc<dyn StateCache>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
}

impl ReminderEngine {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        notifier: Arc<dyn Notifier>,
        cache: Arc<dyn StateCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_settings(store, notifier, cache, clock, EngineSettings::default())
    }

    pub fn with_settings(
        store: Arc<dyn TransactionStore>,
        notifier: Arc<dyn Notifier>,
        cache: Arc<dyn StateCache>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            cache,
            clock,
            settings,
        }
    }

    /// Pure expansion of a definition over a date window.
    pub fn expand(
        def: &RecurringDefinition,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Transaction>, EngineError> {
        expand::expand(def, from, to)
    }

    /// Persists all newly-due instances up to `as_of`.
    pub fn materialize_due(&self, user_id: Uuid, as_of: DateTime<Utc>) -> Result<usize, EngineError> {
        materialize::materialize_due(self.store.as_ref(), user_id, as_of.date_naive())
    }

    /// Checks the month-to-date spend against the threshold ladder. When a
    /// new rung is crossed the matching alert is also handed to the
    /// notifier; a notifier outage does not suppress the event.
    pub fn check_budget_thresholds(
        &self,
        user_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<Option<ThresholdEvent>, EngineError> {
        let event =
            budget::check_budget_thresholds(self.store.as_ref(), self.cache.as_ref(), user_id, as_of)?;
        if let Some(event) = &event {
            // dispatchers drop past instants, so aim at the next minute
            let at = as_of + Duration::minutes(1);
            let body = budget_alert_body(event);
            let payload = NotificationPayload::BudgetAlert {
                percent: event.percent,
            };
            if let Err(err) = self
                .notifier
                .schedule(user_id, at, BUDGET_ALERT_TITLE, &body, &payload)
            {
                warn!(%user_id, error = %err, "budget alert could not be scheduled");
            }
        }
        Ok(event)
    }

    /// Cancels and re-creates the user's bill notifications.
    pub fn rebuild_bill_reminders(
        &self,
        user_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<ScheduleOutcome, EngineError> {
        bills::rebuild_bill_reminders(
            self.store.as_ref(),
            self.notifier.as_ref(),
            user_id,
            as_of,
            self.settings.reminder_lead_days,
            self.settings.notify_hour,
        )
    }

    /// One maintenance pass at the current instant: materialize due
    /// instances, rebuild bill reminders, then check the budget ladder.
    /// The reminder rebuild runs before the budget check because its
    /// cancel-all step would drop a just-scheduled budget alert. The host
    /// app runs this on foreground and screen-focus events.
    pub fn tick(&self, user_id: Uuid) -> Result<MaintenanceReport, EngineError> {
        let as_of = self.clock.now();
        let materialized = self.materialize_due(user_id, as_of)?;
        let reminders = self.rebuild_bill_reminders(user_id, as_of)?;
        let threshold_event = self.check_budget_thresholds(user_id, as_of)?;
        Ok(MaintenanceReport {
            materialized,
            threshold_event,
            reminders,
        })
    }
}
