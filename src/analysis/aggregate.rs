//! Per-zone summaries derived from the cluster labels: centroids and the (zone, hour, day) table.

use {
    crate::{
        domain::{ClusterLabel, Event, LatLon, TimeKey, ZoneId},
        models::{AggregateRow, CentroidTable, ZoneCentroid},
    },
    itertools::Itertools,
};

/// Mean coordinate of every zone. `labels` is index-aligned with `events`.
pub fn zone_centroids(events: &[Event], labels: &[ClusterLabel]) -> CentroidTable {
    debug_assert_eq!(events.len(), labels.len());

    events
        .iter()
        .zip(labels)
        .filter_map(|(e, l)| l.zone().map(|id| (id, e.position)))
        .into_group_map()
        .into_iter()
        .filter_map(|(zone_id, members)| {
            LatLon::mean_of(&members).map(|position| ZoneCentroid {
                zone_id,
                position,
                members: members.len(),
            })
        })
        .collect()
}

/// Event counts per (zone, hour, day-of-week), ordered by zone then time.
/// Unclustered events and events without a timestamp contribute nothing.
pub fn temporal_aggregate(events: &[Event], labels: &[ClusterLabel]) -> Vec<AggregateRow> {
    debug_assert_eq!(events.len(), labels.len());

    events
        .iter()
        .zip(labels)
        .filter_map(|(e, l)| Some((l.zone()?, e.time_key()?)))
        .counts()
        .into_iter()
        .map(|((zone_id, key), count): ((ZoneId, TimeKey), usize)| AggregateRow {
            zone_id,
            key,
            count,
        })
        .sorted_by_key(|row| (row.zone_id, row.key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, lat: f64, lon: f64) -> Event {
        // January 2024 starts on a Monday, so day-of-week = day - 1 for the first week
        let dt = NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Event::new(Some(dt), LatLon::new(lat, lon))
    }

    fn zone(id: u32) -> ClusterLabel {
        ClusterLabel::Zone(ZoneId::new(id))
    }

    #[test]
    fn centroid_is_mean_of_exactly_its_members() {
        let events = vec![
            at(1, 8, 1.0, 10.0),
            at(1, 8, 100.0, 100.0), // noise, must not leak in
            at(1, 8, 3.0, 20.0),
            at(1, 8, 50.0, 50.0),
        ];
        let labels = vec![zone(0), ClusterLabel::Unclustered, zone(0), zone(1)];

        let table = zone_centroids(&events, &labels);
        assert_eq!(table.len(), 2);

        let z0 = table.get(ZoneId::new(0)).unwrap();
        assert_eq!(z0.position, LatLon::new(2.0, 15.0));
        assert_eq!(z0.members, 2);
        assert_eq!(table.get(ZoneId::new(1)).unwrap().position, LatLon::new(50.0, 50.0));
    }

    #[test]
    fn centroid_ignores_input_order() {
        let events = vec![at(1, 8, 1.0, 4.0), at(1, 9, 2.0, 5.0), at(1, 10, 6.0, 0.0)];
        let labels = vec![zone(0); 3];
        let reversed: Vec<Event> = events.iter().rev().cloned().collect();

        let a = zone_centroids(&events, &labels);
        let b = zone_centroids(&reversed, &labels);
        let (pa, pb) = (a.get(ZoneId::new(0)).unwrap(), b.get(ZoneId::new(0)).unwrap());
        assert!((pa.position.lat - pb.position.lat).abs() < 1e-12);
        assert!((pa.position.lon - pb.position.lon).abs() < 1e-12);
    }

    #[test]
    fn aggregate_counts_and_skips_noise_and_undated() {
        let events = vec![
            at(1, 8, 0.0, 0.0),
            at(1, 8, 0.0, 0.0),
            at(2, 8, 0.0, 0.0),
            at(1, 20, 0.0, 0.0),
            Event::new(None, LatLon::new(0.0, 0.0)),
        ];
        let labels = vec![
            zone(0),
            zone(0),
            zone(0),
            ClusterLabel::Unclustered,
            zone(0),
        ];

        let rows = temporal_aggregate(&events, &labels);
        let flat: Vec<(u32, u32, u32, usize)> = rows
            .iter()
            .map(|r| (r.zone_id.value(), r.key.hour(), r.key.day_of_week(), r.count))
            .collect();
        assert_eq!(flat, vec![(0, 8, 0, 2), (0, 8, 1, 1)]);
    }
}
