use chrono::{DateTime, NaiveDate, Utc};

/// Clock abstracts access to the current instant so the engine stays
/// deterministic in tests. The engine runs entirely on this timeline; the
/// host app is responsible for handing it the user's local zone.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current date on the engine timeline. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock implementation used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
