use serde::{Deserialize, Serialize};

/// A WGS84 coordinate, latitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Straight-line distance in degrees. Fine at city scale, which is all we cluster over.
    #[inline]
    pub fn distance_deg(&self, other: &LatLon) -> f64 {
        let d_lat = self.lat - other.lat;
        let d_lon = self.lon - other.lon;
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Plain arithmetic mean of latitudes and longitudes, taken independently.
    /// Returns None for an empty input.
    pub fn mean_of<'a>(points: impl IntoIterator<Item = &'a LatLon>) -> Option<LatLon> {
        let (n, sum_lat, sum_lon) = points
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, la, lo), p| (n + 1, la + p.lat, lo + p.lon));
        if n == 0 {
            return None;
        }
        Some(LatLon::new(sum_lat / n as f64, sum_lon / n as f64))
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Axis-aligned lat/lon box, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoBounds {
    pub fn contains(&self, p: &LatLon) -> bool {
        (self.lat_min..=self.lat_max).contains(&p.lat)
            && (self.lon_min..=self.lon_max).contains(&p.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert!(LatLon::mean_of(&[] as &[LatLon]).is_none());
    }

    #[test]
    fn mean_of_is_componentwise() {
        let pts = [LatLon::new(1.0, 10.0), LatLon::new(3.0, 20.0)];
        assert_eq!(LatLon::mean_of(&pts), Some(LatLon::new(2.0, 15.0)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let b = GeoBounds {
            lat_min: 0.0,
            lat_max: 1.0,
            lon_min: -1.0,
            lon_max: 0.0,
        };
        assert!(b.contains(&LatLon::new(1.0, -1.0)));
        assert!(!b.contains(&LatLon::new(1.0001, -0.5)));
    }
}
