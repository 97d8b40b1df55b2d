use {
    crate::domain::LatLon,
    chrono::{Datelike, NaiveDateTime, Timelike},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// A single historical citation. Non-finite coordinates are dropped before clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// None when the source row had no timestamp. Such events still cluster, but never train.
    pub issued_at: Option<NaiveDateTime>,
    pub position: LatLon,
}

impl Event {
    pub fn new(issued_at: Option<NaiveDateTime>, position: LatLon) -> Self {
        Self { issued_at, position }
    }

    pub fn time_key(&self) -> Option<TimeKey> {
        self.issued_at.as_ref().map(TimeKey::from_datetime)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(u32);

impl ZoneId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of density clustering for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClusterLabel {
    /// Not dense enough for any zone. One shared label for all such points.
    #[default]
    Unclustered,
    Zone(ZoneId),
}

impl ClusterLabel {
    pub fn zone(self) -> Option<ZoneId> {
        match self {
            ClusterLabel::Zone(id) => Some(id),
            ClusterLabel::Unclustered => None,
        }
    }
}

/// The two classifier features: hour of day (0-23) and day of week (Monday = 0 .. Sunday = 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeKey {
    hour: u8,
    day_of_week: u8,
}

impl TimeKey {
    pub const HOURS: u32 = 24;
    pub const DAYS: u32 = 7;

    /// None if either component is out of range.
    pub fn new(hour: u32, day_of_week: u32) -> Option<Self> {
        if hour >= Self::HOURS || day_of_week >= Self::DAYS {
            return None;
        }
        Some(Self {
            hour: hour as u8,
            day_of_week: day_of_week as u8,
        })
    }

    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            hour: dt.hour() as u8,
            day_of_week: dt.weekday().num_days_from_monday() as u8,
        }
    }

    #[inline]
    pub fn hour(self) -> u32 {
        self.hour as u32
    }

    #[inline]
    pub fn day_of_week(self) -> u32 {
        self.day_of_week as u32
    }

    /// Feature vector in classifier column order.
    pub fn features(self) -> [f64; 2] {
        [self.hour as f64, self.day_of_week as f64]
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hour {:02} / day {}", self.hour, self.day_of_week)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn time_key_uses_monday_as_zero() {
        // 2024-01-01 was a Monday
        let dt = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let key = TimeKey::from_datetime(&dt);
        assert_eq!((key.hour(), key.day_of_week()), (8, 0));

        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let key = TimeKey::from_datetime(&sunday);
        assert_eq!((key.hour(), key.day_of_week()), (23, 6));
    }

    #[test]
    fn time_key_rejects_out_of_range() {
        assert!(TimeKey::new(24, 0).is_none());
        assert!(TimeKey::new(0, 7).is_none());
        assert!(TimeKey::new(23, 6).is_some());
    }

    #[test]
    fn only_zones_carry_an_id() {
        assert_eq!(ClusterLabel::Unclustered.zone(), None);
        assert_eq!(ClusterLabel::Zone(ZoneId::new(3)).zone(), Some(ZoneId::new(3)));
    }
}
