//! HTTP surface: prediction, mock map data, open-data probes and the React build.

mod map_data;
mod probe;
mod routes;

use {
    crate::{
        analysis::ZonePredictor,
        config::{CAMPUS, CampusConfig, SERVER},
        data::StreetCatalog,
    },
    anyhow::{Context, Result},
    axum::{Router, http::HeaderValue, routing::get},
    std::{net::SocketAddr, path::Path, sync::Arc},
    tower_http::{
        cors::CorsLayer,
        services::{ServeDir, ServeFile},
        trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    },
    tracing::Level,
};

pub use {
    map_data::{TicketPoint, street_feature_collection, ticket_points},
    probe::ProbeTargets,
    routes::ApiError,
};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<ZonePredictor>,
    pub streets: Arc<StreetCatalog>,
    pub campus: &'static CampusConfig,
    pub http: reqwest::Client,
    pub probes: Arc<ProbeTargets>,
}

impl AppState {
    pub fn new(predictor: ZonePredictor, streets: StreetCatalog) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(SERVER.probe.timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            predictor: Arc::new(predictor),
            streets: Arc::new(streets),
            campus: &CAMPUS,
            http,
            probes: Arc::new(ProbeTargets::default()),
        })
    }

    pub fn with_probes(mut self, probes: ProbeTargets) -> Self {
        self.probes = Arc::new(probes);
        self
    }
}

/// All routes. Anything unmatched falls through to the static build, and from there to
/// `index.html` so client-side routes resolve.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let index = static_dir.join(crate::config::PERSISTENCE.frontend.index_file);
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    let cors = CorsLayer::new().allow_origin(HeaderValue::from_static(SERVER.cors_origin));

    Router::new()
        .route("/predict", get(routes::predict))
        .route("/zones", get(routes::zones))
        .route("/parking-geojson", get(routes::parking_geojson))
        .route("/tickets", get(routes::tickets))
        .route("/real-api-test", get(routes::real_api_test))
        .route("/debug", get(routes::debug))
        .fallback_service(spa)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    log::info!("🚀 zone-patrol v{} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
