//! Notification port plus the copy the engine emits through it.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use penny_domain::format_minor_units;

use crate::budget::ThresholdEvent;
use crate::EngineError;

pub const BILL_REMINDER_TITLE: &str = "Upcoming Bills Reminder";
pub const BILL_DUE_TITLE: &str = "Bills Due Today";
pub const BUDGET_ALERT_TITLE: &str = "Budget Alert";

/// Machine-readable payload attached to every scheduled notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationPayload {
    BillReminder { day_of_month: u32 },
    BillDueToday { day_of_month: u32 },
    BudgetAlert { percent: u8 },
}

/// Local notification dispatcher consumed by the engine.
///
/// `schedule` with `at` not in the future is a no-op on the dispatcher
/// side; the engine additionally skips such calls so its returned counts
/// only cover notifications that will fire.
pub trait Notifier: Send + Sync {
    /// Drops every notification previously scheduled for the user.
    fn cancel_all_for_user(&self, user_id: Uuid) -> Result<(), EngineError>;

    fn schedule(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
        title: &str,
        body: &str,
        payload: &NotificationPayload,
    ) -> Result<(), EngineError>;
}

/// Ordinal day-of-month label: 1st, 2nd, 3rd, 11th-13th, 21st, ...
pub fn ordinal_day(day: u32) -> String {
    let suffix = match day % 100 {
        11 | 12 | 13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{day}{suffix}")
}

/// Body of the three-days-ahead reminder for one due-day group.
pub fn bill_reminder_body(day: u32, names: &[String], total_cents: i64, currency_code: &str) -> String {
    format!(
        "You have bills due on the {}: {} (Total: {})",
        ordinal_day(day),
        names.join(", "),
        format_minor_units(total_cents, currency_code)
    )
}

/// Body of the due-today alert for one due-day group.
pub fn bill_due_body(names: &[String], total_cents: i64, currency_code: &str) -> String {
    format!(
        "Don't forget to pay today's bills: {} (Total: {})",
        names.join(", "),
        format_minor_units(total_cents, currency_code)
    )
}

/// Fixed alert line for each budget threshold rung.
pub fn threshold_message(percent: u8) -> &'static str {
    match percent {
        80 => "You have used 80% of your monthly budget.",
        90 => "You have used 90% of your monthly budget! Be careful with additional expenses.",
        100 => "You have reached your monthly budget limit!",
        _ => "Warning: You have exceeded your monthly budget by 10%!",
    }
}

pub fn budget_alert_body(event: &ThresholdEvent) -> String {
    format!(
        "{} ({} of {})",
        threshold_message(event.percent),
        format_minor_units(event.total_spent_cents, &event.currency_code),
        format_minor_units(event.monthly_budget_cents, &event.currency_code)
    )
}

/// A notification captured by [`RecordingNotifier`], in schedule order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledNotification {
    pub user_id: Uuid,
    pub at: DateTime<Utc>,
    pub title: String,
    pub body: String,
    pub payload: NotificationPayload,
}

/// Notifier that records schedules in memory. Used by tests and as the
/// reference behavior for the cancel-then-schedule contract.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    scheduled: Mutex<Vec<ScheduledNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the currently scheduled notifications.
    pub fn scheduled(&self) -> Vec<ScheduledNotification> {
        lock(&self.scheduled).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn cancel_all_for_user(&self, user_id: Uuid) -> Result<(), EngineError> {
        lock(&self.scheduled).retain(|item| item.user_id != user_id);
        Ok(())
    }

    fn schedule(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
        title: &str,
        body: &str,
        payload: &NotificationPayload,
    ) -> Result<(), EngineError> {
        lock(&self.scheduled).push(ScheduledNotification {
            user_id,
            at,
            title: title.to_string(),
            body: body.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

/// Dispatcher for headless runs: every schedule goes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn cancel_all_for_user(&self, user_id: Uuid) -> Result<(), EngineError> {
        tracing::debug!(%user_id, "cancelled scheduled notifications");
        Ok(())
    }

    fn schedule(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
        title: &str,
        body: &str,
        _payload: &NotificationPayload,
    ) -> Result<(), EngineError> {
        tracing::info!(%user_id, %at, title, body, "scheduled notification");
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
