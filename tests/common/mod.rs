#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use zone_patrol::domain::{Event, LatLon};

pub const ZONE_A: LatLon = LatLon::new(37.770, -122.450);
pub const ZONE_B: LatLon = LatLon::new(37.780, -122.420);
pub const ZONE_C: LatLon = LatLon::new(37.760, -122.470);

/// 2024-01-02 is a Tuesday (day-of-week 1).
pub fn tuesday_at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// `n` events jittered within ~0.0005 deg of `center`, all at `when`.
pub fn cluster(center: LatLon, n: usize, when: NaiveDateTime) -> Vec<Event> {
    (0..n)
        .map(|i| {
            let dx = ((i % 5) as f64 - 2.0) * 0.00025;
            let dy = ((i / 5 % 5) as f64 - 2.0) * 0.00025;
            Event::new(Some(when), LatLon::new(center.lat + dx, center.lon + dy))
        })
        .collect()
}

/// A at 08:00, B at 20:00, C at 14:00, every event on Tuesday.
pub fn three_zone_events() -> Vec<Event> {
    let mut events = cluster(ZONE_A, 12, tuesday_at(8));
    events.extend(cluster(ZONE_B, 12, tuesday_at(20)));
    events.extend(cluster(ZONE_C, 12, tuesday_at(14)));
    events
}

pub fn mean_of(events: &[Event]) -> LatLon {
    LatLon::mean_of(events.iter().map(|e| &e.position)).unwrap()
}
