//! Budget threshold monitoring.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use uuid::Uuid;

use penny_domain::{month_bounds, BudgetThresholdState};

use crate::store::{budget_state_key, StateCache, TransactionStore};
use crate::EngineError;

/// Percent-of-budget rungs that trigger an alert, lowest first.
pub const THRESHOLD_LADDER: [u8; 4] = [80, 90, 100, 110];

/// Emitted when current-month spending crosses a new threshold rung.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ThresholdEvent {
    pub percent: u8,
    pub total_spent_cents: i64,
    pub monthly_budget_cents: i64,
    pub currency_code: String,
}

/// Compares month-to-date spending against the ladder and returns the
/// highest newly-crossed rung, at most once per (user, year, month).
///
/// The threshold state is persisted before the event is returned, through
/// a compare-and-set so concurrent checks collapse into a single emission.
/// Within a month the rung never moves down, even when expenses are
/// deleted or the budget is lowered afterwards.
pub fn check_budget_thresholds(
    store: &dyn TransactionStore,
    cache: &dyn StateCache,
    user_id: Uuid,
    as_of: DateTime<Utc>,
) -> Result<Option<ThresholdEvent>, EngineError> {
    let user = store.get_user(user_id)?;
    let budget = match user.monthly_budget_cents {
        Some(cents) if cents > 0 => cents,
        _ => return Ok(None),
    };

    let today = as_of.date_naive();
    let (month_start, month_end) = month_bounds(today);
    let total_spent: i64 = store
        .list_expenses(user_id, month_start, month_end)?
        .iter()
        .filter(|txn| txn.is_expense())
        .map(|txn| txn.magnitude_cents())
        .sum();

    let key = budget_state_key(user_id, today.year(), today.month());
    let raw = cache.get(&key)?;
    let last_threshold = match raw.as_deref() {
        Some(data) => decode_state(data)?.last_threshold,
        None => 0,
    };

    // integer comparison: spent/budget >= t/100  <=>  spent*100 >= t*budget
    let crossed = THRESHOLD_LADDER
        .iter()
        .copied()
        .filter(|&t| t > last_threshold && total_spent * 100 >= i64::from(t) * budget)
        .max();
    let percent = match crossed {
        Some(percent) => percent,
        None => return Ok(None),
    };

    let state = BudgetThresholdState {
        last_threshold: percent,
        updated_at: as_of,
    };
    let encoded =
        serde_json::to_string(&state).map_err(|err| EngineError::Serde(err.to_string()))?;
    if !cache.compare_and_set(&key, raw.as_deref(), &encoded)? {
        // a concurrent check already raised the rung
        return Ok(None);
    }

    Ok(Some(ThresholdEvent {
        percent,
        total_spent_cents: total_spent,
        monthly_budget_cents: budget,
        currency_code: user.currency_code,
    }))
}

fn decode_state(data: &str) -> Result<BudgetThresholdState, EngineError> {
    serde_json::from_str(data).map_err(|err| EngineError::Serde(err.to_string()))
}
