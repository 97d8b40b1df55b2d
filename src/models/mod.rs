mod zone;

pub use zone::{AggregateRow, CentroidTable, ZoneCentroid, ZonePrediction};
