//! Pure expansion of recurring definitions into dated instances.

use chrono::NaiveDate;

use penny_domain::{RecurringDefinition, Transaction};

use crate::EngineError;

/// Upper bound on instances produced by a single expansion; a daily
/// definition over a runaway window stops here instead of spinning.
const MAX_EXPANSION: usize = 4096;

/// Expands `def` into the dated instances falling inside `[from, to]`.
///
/// The walk always starts at `def.start_date`, so instance indexes are
/// stable regardless of the query window. Output is ordered by date
/// ascending; identical inputs always produce identical output.
pub fn expand(
    def: &RecurringDefinition,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Transaction>, EngineError> {
    validate(def)?;

    let from = from.max(def.start_date);
    let mut instances = Vec::new();
    let mut cursor = def.start_date;
    let mut index = 0u32;

    while instances.len() < MAX_EXPANSION {
        if let Some(end) = def.end_date {
            if cursor > end {
                break;
            }
        }
        if let Some(cap) = def.occurrences {
            if index >= cap {
                break;
            }
        }
        if cursor > to {
            break;
        }
        if cursor >= from {
            instances.push(def.instance_at(cursor, index));
        }
        cursor = def.frequency.next_date(cursor);
        index += 1;
    }

    Ok(instances)
}

fn validate(def: &RecurringDefinition) -> Result<(), EngineError> {
    if def.end_date.is_some() && def.occurrences.is_some() {
        return Err(EngineError::InvalidDefinition(
            "end date and occurrence cap are mutually exclusive".into(),
        ));
    }
    if let Some(end) = def.end_date {
        if def.start_date > end {
            return Err(EngineError::InvalidDefinition(format!(
                "start date {} is after end date {}",
                def.start_date, end
            )));
        }
    }
    Ok(())
}
