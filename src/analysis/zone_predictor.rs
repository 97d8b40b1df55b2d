//! Zone predictor: cluster citations, aggregate per (zone, hour, day), fit a classifier,
//! answer "where is the busiest zone right now".

use {
    crate::{
        analysis::{
            aggregate::{temporal_aggregate, zone_centroids},
            boosting::{BoostedClassifier, FitError},
            dbscan::dbscan,
        },
        config::ZoneModelConfig,
        data::{DatasetError, load_citations},
        domain::{ClusterLabel, Event, TimeKey, ZoneId},
        models::{AggregateRow, CentroidTable, ZonePrediction},
        utils::{Clock, LocalClock},
    },
    std::path::Path,
};

/// Startup failures. Any of these means the server must not start.
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("no zones found: {events} events, none dense enough (min_samples {min_samples})")]
    NoZones { events: usize, min_samples: usize },

    #[error("{zones} zones found but none of their events carry a timestamp")]
    NoTrainingRows { zones: usize },

    #[error("classifier fit failed: {0}")]
    Fit(#[from] FitError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("predicted zone {0} has no centroid")]
    UnknownZone(ZoneId),

    #[error("invalid time: hour {hour}, day of week {day_of_week}")]
    InvalidTime { hour: u32, day_of_week: u32 },
}

/// Counts from the fitting run, for logging and inspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitSummary {
    pub events: usize,
    pub unclustered: usize,
    pub zones: usize,
    pub training_rows: usize,
}

/// Immutable once fitted. Share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ZonePredictor {
    centroids: CentroidTable,
    aggregate: Vec<AggregateRow>,
    classifier: BoostedClassifier<ZoneId, 2>,
    summary: FitSummary,
}

impl ZonePredictor {
    /// Load the citations CSV and fit.
    pub fn from_csv(path: &Path, config: &ZoneModelConfig) -> Result<Self, ZoneError> {
        let citations = load_citations(path)?;
        Self::fit(&citations.events, config)
    }

    /// Events with a non-finite coordinate are treated as missing and dropped before clustering.
    pub fn fit(events: &[Event], config: &ZoneModelConfig) -> Result<Self, ZoneError> {
        // 1. Drop missing coordinates
        let dropped = events.iter().filter(|e| !e.position.is_finite()).count();
        let kept: Vec<Event>;
        let events = if dropped > 0 {
            log::warn!("Dropping {} events with non-finite coordinates", dropped);
            kept = events
                .iter()
                .filter(|e| e.position.is_finite())
                .cloned()
                .collect();
            &kept[..]
        } else {
            events
        };

        // 2. Spatial clustering
        let positions: Vec<_> = events.iter().map(|e| e.position).collect();
        let labels = dbscan(&positions, &config.dbscan);

        // 3. Centroids
        let centroids = zone_centroids(events, &labels);
        if centroids.is_empty() {
            return Err(ZoneError::NoZones {
                events: events.len(),
                min_samples: config.dbscan.min_samples,
            });
        }

        // 4. Training table. One row per distinct (zone, hour, day); the count is not a weight.
        let aggregate = temporal_aggregate(events, &labels);
        if aggregate.is_empty() {
            return Err(ZoneError::NoTrainingRows {
                zones: centroids.len(),
            });
        }
        let x: Vec<[f64; 2]> = aggregate.iter().map(|row| row.key.features()).collect();
        let y: Vec<ZoneId> = aggregate.iter().map(|row| row.zone_id).collect();

        // 5. Classifier
        let classifier = BoostedClassifier::fit(&x, &y, &config.booster)?;

        let summary = FitSummary {
            events: events.len(),
            unclustered: labels
                .iter()
                .filter(|l| **l == ClusterLabel::Unclustered)
                .count(),
            zones: centroids.len(),
            training_rows: aggregate.len(),
        };
        log::info!(
            "ZonePredictor ready: {} events, {} zones, {} unclustered, {} training rows",
            summary.events,
            summary.zones,
            summary.unclustered,
            summary.training_rows
        );

        Ok(Self {
            centroids,
            aggregate,
            classifier,
            summary,
        })
    }

    /// Predict for the current local wall-clock time.
    pub fn predict_now(&self) -> Result<ZonePrediction, PredictError> {
        self.predict_with(&LocalClock)
    }

    pub fn predict_with(&self, clock: &impl Clock) -> Result<ZonePrediction, PredictError> {
        self.predict_key(TimeKey::from_datetime(&clock.now()))
    }

    /// `day_of_week`: Monday = 0 .. Sunday = 6
    pub fn predict_at(&self, hour: u32, day_of_week: u32) -> Result<ZonePrediction, PredictError> {
        let key = TimeKey::new(hour, day_of_week)
            .ok_or(PredictError::InvalidTime { hour, day_of_week })?;
        self.predict_key(key)
    }

    pub fn predict_key(&self, key: TimeKey) -> Result<ZonePrediction, PredictError> {
        let zone_id = self.classifier.predict(&key.features());
        Self::resolve(&self.centroids, zone_id)
    }

    fn resolve(centroids: &CentroidTable, zone_id: ZoneId) -> Result<ZonePrediction, PredictError> {
        centroids
            .get(zone_id)
            .map(ZonePrediction::from_centroid)
            .ok_or(PredictError::UnknownZone(zone_id))
    }

    pub fn centroids(&self) -> &CentroidTable {
        &self.centroids
    }

    pub fn aggregate(&self) -> &[AggregateRow] {
        &self.aggregate
    }

    /// Zone ids the classifier can output, ascending.
    pub fn trained_zones(&self) -> &[ZoneId] {
        self.classifier.classes()
    }

    pub fn summary(&self) -> FitSummary {
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ZONE_MODEL, domain::LatLon, models::ZoneCentroid};
    use chrono::NaiveDate;

    #[test]
    fn resolve_reports_missing_zone() {
        let table: CentroidTable = [ZoneCentroid {
            zone_id: ZoneId::new(0),
            position: LatLon::new(1.0, 2.0),
            members: 1,
        }]
        .into_iter()
        .collect();

        assert_eq!(
            ZonePredictor::resolve(&table, ZoneId::new(5)),
            Err(PredictError::UnknownZone(ZoneId::new(5)))
        );
        assert_eq!(
            ZonePredictor::resolve(&table, ZoneId::new(0)).unwrap().latitude,
            1.0
        );
    }

    #[test]
    fn non_finite_coordinates_are_dropped_before_clustering() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let clean: Vec<Event> = (0..12)
            .map(|i| Event::new(Some(dt), LatLon::new(37.77 + i as f64 * 1e-4, -122.45)))
            .collect();
        let baseline = ZonePredictor::fit(&clean, &ZONE_MODEL).unwrap();

        let mut noisy = clean.clone();
        for bad in [
            LatLon::new(f64::NAN, -122.45),
            LatLon::new(f64::INFINITY, -122.45),
            LatLon::new(37.77, f64::NEG_INFINITY),
        ] {
            noisy.push(Event::new(Some(dt), bad));
        }
        let predictor = ZonePredictor::fit(&noisy, &ZONE_MODEL).unwrap();

        assert_eq!(predictor.summary(), baseline.summary());
        assert_eq!(predictor.summary().events, 12);
        assert_eq!(predictor.summary().unclustered, 0);
        assert_eq!(
            predictor.centroids().get(ZoneId::new(0)),
            baseline.centroids().get(ZoneId::new(0))
        );
    }

    #[test]
    fn zones_without_timestamps_cannot_train() {
        let events: Vec<Event> = (0..12)
            .map(|_| Event::new(None, LatLon::new(37.77, -122.45)))
            .collect();
        let err = ZonePredictor::fit(&events, &ZONE_MODEL).unwrap_err();
        assert!(matches!(err, ZoneError::NoTrainingRows { zones: 1 }));
    }

    #[test]
    fn predict_at_validates_range() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let events: Vec<Event> = (0..12)
            .map(|_| Event::new(Some(dt), LatLon::new(37.77, -122.45)))
            .collect();
        let predictor = ZonePredictor::fit(&events, &ZONE_MODEL).unwrap();

        assert_eq!(
            predictor.predict_at(24, 0),
            Err(PredictError::InvalidTime {
                hour: 24,
                day_of_week: 0
            })
        );
        assert_eq!(predictor.predict_at(3, 6).unwrap().zone_id, ZoneId::new(0));
    }
}
