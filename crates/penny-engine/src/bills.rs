//! Bill reminder scheduling.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::warn;
use uuid::Uuid;

use penny_domain::{date_with_clamped_day, shift_month, TransactionKind, DEFAULT_BILL_CATEGORY};

use crate::notify::{
    bill_due_body, bill_reminder_body, NotificationPayload, Notifier, BILL_DUE_TITLE,
    BILL_REMINDER_TITLE,
};
use crate::store::TransactionStore;
use crate::EngineError;

/// Result of a reminder rebuild. A notifier outage is reported here
/// rather than failing the call; the user's tag-space is left empty in
/// that case.
#[derive(Debug)]
pub struct ScheduleOutcome {
    pub scheduled: usize,
    pub notifier_error: Option<EngineError>,
}

struct DueGroup {
    names: Vec<String>,
    total_cents: i64,
}

/// Rebuilds the user's bill notifications from scratch: cancel everything
/// tagged for the user, then schedule one reminder and one due-day alert
/// per day-of-month group. Re-running with unchanged data reproduces the
/// same schedule.
pub fn rebuild_bill_reminders(
    store: &dyn TransactionStore,
    notifier: &dyn Notifier,
    user_id: Uuid,
    as_of: DateTime<Utc>,
    lead_days: i64,
    notify_hour: u32,
) -> Result<ScheduleOutcome, EngineError> {
    let user = store.get_user(user_id)?;

    let mut groups: BTreeMap<u32, DueGroup> = BTreeMap::new();
    for bill in store.list_bills(user_id)? {
        push_entry(&mut groups, bill.due_date.day(), bill.name, bill.amount_cents.abs());
    }
    for def in store.list_recurring_definitions(user_id, true)? {
        if def.base.category == DEFAULT_BILL_CATEGORY && def.base.kind == TransactionKind::Expense {
            let name = def
                .base
                .note
                .clone()
                .unwrap_or_else(|| def.base.category.clone());
            push_entry(&mut groups, def.start_date.day(), name, def.base.amount_cents.abs());
        }
    }

    // the rebuild is the sole mutator of the user's tag-space
    if let Err(err) = notifier.cancel_all_for_user(user_id) {
        warn!(%user_id, error = %err, "bill reminder rebuild aborted");
        return Ok(ScheduleOutcome {
            scheduled: 0,
            notifier_error: Some(err),
        });
    }

    let mut scheduled = 0;
    for (day, mut group) in groups {
        group.names.sort();
        let due_date = next_due_date(as_of.date_naive(), day);
        let due_at = at_hour(due_date, notify_hour);
        let reminder_at = at_hour(due_date - Duration::days(lead_days), notify_hour);

        if reminder_at > as_of {
            let body =
                bill_reminder_body(due_date.day(), &group.names, group.total_cents, &user.currency_code);
            let payload = NotificationPayload::BillReminder {
                day_of_month: due_date.day(),
            };
            match notifier.schedule(user_id, reminder_at, BILL_REMINDER_TITLE, &body, &payload) {
                Ok(()) => scheduled += 1,
                Err(err) => return abort_rebuild(notifier, user_id, err),
            }
        }
        if due_at > as_of {
            let body = bill_due_body(&group.names, group.total_cents, &user.currency_code);
            let payload = NotificationPayload::BillDueToday {
                day_of_month: due_date.day(),
            };
            match notifier.schedule(user_id, due_at, BILL_DUE_TITLE, &body, &payload) {
                Ok(()) => scheduled += 1,
                Err(err) => return abort_rebuild(notifier, user_id, err),
            }
        }
    }

    Ok(ScheduleOutcome {
        scheduled,
        notifier_error: None,
    })
}

fn push_entry(groups: &mut BTreeMap<u32, DueGroup>, day: u32, name: String, amount_cents: i64) {
    let group = groups.entry(day).or_insert_with(|| DueGroup {
        names: Vec::new(),
        total_cents: 0,
    });
    group.names.push(name);
    group.total_cents += amount_cents;
}

/// Next calendar date carrying the requested day-of-month, clamped to
/// shorter months, never before `today`.
fn next_due_date(today: NaiveDate, day: u32) -> NaiveDate {
    let candidate = date_with_clamped_day(today.year(), today.month(), day);
    if candidate < today {
        let next_month = shift_month(candidate.with_day(1).unwrap(), 1);
        date_with_clamped_day(next_month.year(), next_month.month(), day)
    } else {
        candidate
    }
}

fn at_hour(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    let naive = date.and_hms_opt(hour.min(23), 0, 0).unwrap();
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

fn abort_rebuild(
    notifier: &dyn Notifier,
    user_id: Uuid,
    err: EngineError,
) -> Result<ScheduleOutcome, EngineError> {
    // leave the tag-space empty rather than half-built
    if let Err(cleanup) = notifier.cancel_all_for_user(user_id) {
        warn!(%user_id, error = %cleanup, "cleanup after failed rebuild also failed");
    }
    warn!(%user_id, error = %err, "bill reminder rebuild failed");
    Ok(ScheduleOutcome {
        scheduled: 0,
        notifier_error: Some(err),
    })
}
