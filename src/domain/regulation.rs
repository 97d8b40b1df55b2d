//! Parking regulations: the fixed set the map generators pick from, plus helpers that
//! read a time limit out of free-form street segment properties.

use {
    serde_json::{Map, Value},
    strum_macros::{Display, EnumIter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum Regulation {
    #[strum(to_string = "NO PARKING 8AM-6PM")]
    NoParking,
    #[strum(to_string = "2 HR PARKING 9AM-6PM")]
    TwoHour,
    #[strum(to_string = "1 HR PARKING 9AM-6PM")]
    OneHour,
    #[strum(to_string = "4 HR PARKING 9AM-6PM")]
    FourHour,
    #[strum(to_string = "STREET CLEANING THU 12PM-2PM")]
    StreetCleaning,
}

impl Regulation {
    /// Time limit in hours. Zero means you cannot park there at all.
    pub fn max_hours(self) -> u32 {
        match self {
            Regulation::NoParking | Regulation::StreetCleaning => 0,
            Regulation::OneHour => 1,
            Regulation::TwoHour => 2,
            Regulation::FourHour => 4,
        }
    }
}

const NO_PARKING_MARKERS: &[&str] = &["NO PARKING", "TOW-AWAY", "NO STOPPING"];

// Checked in order, so "12 HR" resolves to 2 via its "2 HR" substring.
const HOUR_MARKERS: &[(f64, &[&str])] = &[
    (1.0, &["1 HR", "1HR", "1 HOUR"]),
    (2.0, &["2 HR", "2HR", "2 HOUR"]),
    (3.0, &["3 HR", "3HR", "3 HOUR"]),
    (4.0, &["4 HR", "4HR", "4 HOUR"]),
];

pub const COLOR_UNKNOWN: &str = "#808080";
pub const COLOR_NO_PARKING: &str = "#FF0000";
pub const COLOR_ONE_HOUR: &str = "#FFFF00";
pub const COLOR_TWO_HOURS: &str = "#FFA500";
pub const COLOR_LONG_STAY: &str = "#00FF00";

/// Work out the parking time limit (hours) for a street segment.
///
/// Resolution order:
/// 1. an explicit non-null `max_hours`
/// 2. the `hrs_begin` / `hrs_end` window (HHMM integers, either case of key)
/// 3. keywords in the `regulation` text
///
/// Returns None when nothing usable is found.
pub fn max_hours(properties: &Map<String, Value>) -> Option<f64> {
    if let Some(explicit) = properties.get("max_hours").filter(|v| !v.is_null()) {
        return value_as_f64(explicit);
    }

    let begin = first_truthy(properties, &["hrs_begin", "HRS_BEGIN"]);
    let end = first_truthy(properties, &["hrs_end", "HRS_END"]);
    if let Some(duration) = window_hours(begin, end) {
        return Some(duration);
    }

    let rule = first_truthy(properties, &["regulation", "REGULATION"])
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_uppercase();

    if NO_PARKING_MARKERS.iter().any(|m| rule.contains(m)) {
        return Some(0.0);
    }

    HOUR_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| rule.contains(m)))
        .map(|(hours, _)| *hours)
}

/// Map color for a time limit.
pub fn color_for_hours(hours: Option<f64>) -> &'static str {
    match hours {
        None => COLOR_UNKNOWN,
        Some(h) if h <= 0.0 => COLOR_NO_PARKING,
        Some(h) if h == 1.0 => COLOR_ONE_HOUR,
        Some(h) if h == 2.0 => COLOR_TWO_HOURS,
        Some(_) => COLOR_LONG_STAY,
    }
}

// Duration of an HHMM window. Any unparsable bound abandons the window entirely.
fn window_hours(begin: Option<&Value>, end: Option<&Value>) -> Option<f64> {
    let begin_num = match begin {
        Some(v) => hhmm_as_int(v)?,
        None => 0,
    };
    let end_num = match end {
        Some(v) => hhmm_as_int(v)?,
        None => 0,
    };

    if begin_num <= 0 || end_num <= 0 {
        return None;
    }

    let to_hours = |n: i64| (n / 100) as f64 + (n % 100) as f64 / 60.0;
    let duration = to_hours(end_num) - to_hours(begin_num);
    (duration > 0.0).then_some(duration)
}

fn hhmm_as_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

// First value under any of `keys` that is not null, empty or zero.
fn first_truthy<'a>(properties: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| properties.get(*k))
        .find(|v| is_truthy(v))
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
