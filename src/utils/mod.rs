mod time_utils;

pub use time_utils::{Clock, FixedClock, LocalClock, WEEKDAY_NAMES, weekday_name};
