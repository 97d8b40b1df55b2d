// Domain types and value objects
mod event;
mod geo;
pub mod regulation;

// Re-export commonly used types to the world
pub use event::{ClusterLabel, Event, TimeKey, ZoneId};
pub use geo::{GeoBounds, LatLon};
pub use regulation::Regulation;
