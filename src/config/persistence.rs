//! File locations read at startup

/// Where the citations dataset lives
pub struct DatasetConfig {
    /// CSV with `issue_datetime`, `latitude`, `longitude` columns
    pub citations_path: &'static str,
    pub timestamp_column: &'static str,
    pub latitude_column: &'static str,
    pub longitude_column: &'static str,
}

/// Street centerline GeoJSON used by the map generators
pub struct StreetsConfig {
    pub path: &'static str,
}

/// Built React app
pub struct StaticConfig {
    pub directory: &'static str,
    pub index_file: &'static str,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub dataset: DatasetConfig,
    pub streets: StreetsConfig,
    pub frontend: StaticConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    dataset: DatasetConfig {
        citations_path: "citations.csv",
        timestamp_column: "issue_datetime",
        latitude_column: "latitude",
        longitude_column: "longitude",
    },
    streets: StreetsConfig {
        path: "data/sf_streets.json",
    },
    frontend: StaticConfig {
        directory: "frontend/my-app/build",
        index_file: "index.html",
    },
};
