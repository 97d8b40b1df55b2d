//! HTTP server configuration

use std::time::Duration;

/// Open-data endpoints hit by the probe routes
pub struct ProbeConfig {
    pub timeout: Duration,
    /// SF 311 cases (usually reliable)
    pub cases_url: &'static str,
    pub cases_limit: u32,
    /// Parking regulations dataset (known to return empty objects)
    pub regulations_url: &'static str,
    pub regulations_limit: u32,
}

pub struct ServerConfig {
    pub host: &'static str,
    pub port: u16,
    /// Dev server of the React app
    pub cors_origin: &'static str,
    pub probe: ProbeConfig,
}

pub const SERVER: ServerConfig = ServerConfig {
    host: "127.0.0.1",
    port: 5001,
    cors_origin: "http://localhost:3000",
    probe: ProbeConfig {
        timeout: Duration::from_secs(10),
        cases_url: "https://data.sfgov.org/resource/vw6y-z8j6.json",
        cases_limit: 5,
        regulations_url: "https://data.sfgov.org/api/v3/views/hi6h-neyh/query.geojson",
        regulations_limit: 2,
    },
};
