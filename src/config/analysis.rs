//! Zone model configuration (clustering + classifier)

use serde::{Deserialize, Serialize};

/// Density clustering parameters.
#[derive(Clone, Debug, Copy, Serialize, Deserialize)]
pub struct DbscanParams {
    /// Neighbourhood radius in degrees (Euclidean over lat/lon). Inclusive.
    pub eps: f64,

    /// Minimum neighbourhood size for a core point, counting the point itself.
    pub min_samples: usize,
}

/// Gradient boosting parameters for the (hour, day-of-week) -> zone classifier.
#[derive(Clone, Debug, Copy, Serialize, Deserialize)]
pub struct BoosterParams {
    /// Boosting rounds. Each round grows one tree per class.
    pub n_rounds: usize,
    /// Shrinkage applied to every leaf weight.
    pub learning_rate: f64,
    pub max_depth: usize,
    /// L2 regularisation on leaf weights.
    pub lambda: f64,
    /// A split must improve the objective by more than this.
    pub min_split_gain: f64,
    /// Minimum summed hessian in each child of a split.
    // The training table holds one row per (zone, hour, day), so it is usually tiny.
    pub min_child_hessian: f64,
}

/// The Master Zone Model Configuration
#[derive(Clone, Debug, Copy, Serialize, Deserialize)]
pub struct ZoneModelConfig {
    pub dbscan: DbscanParams,
    pub booster: BoosterParams,
}

pub const ZONE_MODEL: ZoneModelConfig = ZoneModelConfig {
    dbscan: DbscanParams {
        eps: 0.002, // ~200m in latitude
        min_samples: 10,
    },

    booster: BoosterParams {
        n_rounds: 100,
        learning_rate: 0.3,
        max_depth: 5,
        lambda: 1.0,
        min_split_gain: 0.0,
        min_child_hessian: 1e-3,
    },
};

impl Default for ZoneModelConfig {
    fn default() -> Self {
        ZONE_MODEL
    }
}
