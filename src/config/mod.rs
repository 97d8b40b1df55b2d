//! Configuration module for the zone-patrol server.

// Can all be private now because we have a public re-export.
mod analysis;
mod campus;
mod persistence;
mod server;

// Re-export commonly used items
pub use analysis::{BoosterParams, DbscanParams, ZONE_MODEL, ZoneModelConfig};
pub use campus::{CAMPUS, CampusConfig, TicketSpray};
pub use persistence::PERSISTENCE;
pub use server::{ProbeConfig, SERVER, ServerConfig};
