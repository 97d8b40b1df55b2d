use {
    crate::domain::{LatLon, TimeKey, ZoneId},
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

/// Representative coordinate of a zone (plain mean of its members).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneCentroid {
    pub zone_id: ZoneId,
    pub position: LatLon,
    /// Events assigned to the zone
    pub members: usize,
}

/// Zone id -> centroid. Never contains the unclustered label (it has no ZoneId to key on).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CentroidTable {
    by_zone: BTreeMap<ZoneId, ZoneCentroid>,
}

impl CentroidTable {
    pub fn get(&self, zone_id: ZoneId) -> Option<&ZoneCentroid> {
        self.by_zone.get(&zone_id)
    }

    pub fn contains(&self, zone_id: ZoneId) -> bool {
        self.by_zone.contains_key(&zone_id)
    }

    /// Ascending by zone id
    pub fn iter(&self) -> impl Iterator<Item = &ZoneCentroid> {
        self.by_zone.values()
    }

    pub fn len(&self) -> usize {
        self.by_zone.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_zone.is_empty()
    }
}

impl FromIterator<ZoneCentroid> for CentroidTable {
    fn from_iter<I: IntoIterator<Item = ZoneCentroid>>(iter: I) -> Self {
        Self {
            by_zone: iter.into_iter().map(|c| (c.zone_id, c)).collect(),
        }
    }
}

/// One row of the classifier's training table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub zone_id: ZoneId,
    pub key: TimeKey,
    /// Events behind this row. Kept for inspection; training ignores it.
    pub count: usize,
}

/// What the predictor answers with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZonePrediction {
    pub zone_id: ZoneId,
    pub latitude: f64,
    pub longitude: f64,
}

impl ZonePrediction {
    pub fn from_centroid(c: &ZoneCentroid) -> Self {
        Self {
            zone_id: c.zone_id,
            latitude: c.position.lat,
            longitude: c.position.lon,
        }
    }
}
