//! Map area around USFCA used by the mock street/ticket generators

use crate::domain::{GeoBounds, LatLon};

pub struct TicketSpray {
    pub center: LatLon,
    pub count: usize,
    /// Full width of the square (degrees) tickets are scattered over
    pub spread_deg: f64,
}

pub struct CampusConfig {
    /// Street segments whose centroid falls inside are served
    pub bounds: GeoBounds,
    pub tickets: TicketSpray,
    /// `days` property stamped on every generated segment
    pub regulated_days: &'static str,
    pub hrs_begin: &'static str,
    pub hrs_end: &'static str,
}

pub const CAMPUS: CampusConfig = CampusConfig {
    bounds: GeoBounds {
        lat_min: 37.774,
        lat_max: 37.785,
        lon_min: -122.460,
        lon_max: -122.440,
    },
    tickets: TicketSpray {
        center: LatLon {
            lat: 37.7765,
            lon: -122.4505,
        },
        count: 200,
        spread_deg: 0.01, // ~0.5km either side
    },
    regulated_days: "MON_FRI",
    hrs_begin: "900",
    hrs_end: "1800",
};
