use chrono::{Local, NaiveDateTime};

/// Source of "now". Predictions read the clock through this so tests can pin the time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Process-local wall clock (whatever timezone the server runs in).
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Short name for a Monday = 0 day-of-week index.
pub fn weekday_name(day_of_week: u32) -> &'static str {
    WEEKDAY_NAMES
        .get(day_of_week as usize)
        .copied()
        .unwrap_or("???")
}
