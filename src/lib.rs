#![allow(clippy::collapsible_if)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod server;
pub mod utils;

// Re-export commonly used types outside of crate (for the binaries and tests)
pub use analysis::{PredictError, ZoneError, ZonePredictor};
pub use models::ZonePrediction;

use {
    crate::config::{PERSISTENCE, SERVER, ZONE_MODEL},
    anyhow::{Context, Result},
    std::{net::SocketAddr, path::PathBuf},
};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Citations CSV the zone model is trained on
    #[arg(long, default_value = PERSISTENCE.dataset.citations_path)]
    pub citations: PathBuf,

    /// Street centerline GeoJSON for the map layers
    #[arg(long, default_value = PERSISTENCE.streets.path)]
    pub streets: PathBuf,

    /// Built React app to serve
    #[arg(long, default_value = PERSISTENCE.frontend.directory)]
    pub static_dir: PathBuf,

    #[arg(long, default_value = SERVER.host)]
    pub host: String,

    #[arg(long, default_value_t = SERVER.port)]
    pub port: u16,
}

impl Cli {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Startup: fit the predictor, load streets, then serve until Ctrl-C.
/// Anything failing before the listener is up aborts the process.
pub async fn run_server(args: Cli) -> Result<()> {
    let addr = args.socket_addr()?;

    // Fitting is CPU-bound and must finish before the first request.
    let citations = args.citations.clone();
    let fit = tokio::task::spawn_blocking(move || ZonePredictor::from_csv(&citations, &ZONE_MODEL));
    let predictor = fit
        .await
        .context("zone model task panicked")?
        .with_context(|| format!("failed to build zone model from {}", args.citations.display()))?;

    let streets = data::StreetCatalog::load(&args.streets)
        .with_context(|| format!("failed to load streets from {}", args.streets.display()))?;

    let state = server::AppState::new(predictor, streets)?;
    let app = server::router(state, &args.static_dir);

    server::serve(addr, app).await
}
