// Zone pipeline: clustering -> aggregation -> classification -> lookup
pub mod aggregate;
pub mod boosting;
pub mod dbscan;
pub mod zone_predictor;

pub use zone_predictor::{FitSummary, PredictError, ZoneError, ZonePredictor};
