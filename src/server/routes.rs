//! API route handlers

use {
    super::{
        AppState,
        map_data::{TicketPoint, street_feature_collection, ticket_points},
        probe::{all_records_empty, error_chain, fetch_json, record_count},
    },
    crate::{analysis::PredictError, models::ZonePrediction},
    axum::{
        Json,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde_json::{Value, json},
};

/// JSON error reply: `{"error": "..."}` plus whatever extra fields the route wants.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiError {
    pub fn internal(message: impl ToString) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": message.to_string() }),
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        log::error!("/predict failed: {}", e);
        Self::internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub async fn predict(State(state): State<AppState>) -> Result<Json<ZonePrediction>, ApiError> {
    let prediction = state.predictor.predict_now()?;
    log::debug!("/predict -> zone {}", prediction.zone_id);
    Ok(Json(prediction))
}

pub async fn zones(State(state): State<AppState>) -> Json<Value> {
    log::info!("Generating sample parking zones around USFCA...");
    let mut rng = rand::thread_rng();
    Json(street_feature_collection(&state.streets, state.campus, false, &mut rng))
}

pub async fn parking_geojson(State(state): State<AppState>) -> Json<Value> {
    let mut rng = rand::thread_rng();
    Json(street_feature_collection(&state.streets, state.campus, true, &mut rng))
}

pub async fn tickets(State(state): State<AppState>) -> Json<Vec<TicketPoint>> {
    log::info!("Generating sample parking tickets around USFCA...");
    let points = ticket_points(state.campus, &mut rand::thread_rng());
    log::info!("✓ Generated {} sample ticket locations", points.len());
    Json(points)
}

pub async fn real_api_test(State(state): State<AppState>) -> Response {
    let targets = &state.probes;
    match fetch_json(&state.http, &targets.cases_url, targets.cases_limit).await {
        Ok(data) => Json(json!({
            "status": "success",
            "message": "SF API is working!",
            "sample_data": data,
        }))
        .into_response(),
        Err(e) => {
            log::warn!("/real-api-test: {}", e);
            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({
                    "status": "error",
                    "message": "SF API is not responding properly",
                    "error": e.to_string(),
                }),
            }
            .into_response()
        }
    }
}

pub async fn debug(State(state): State<AppState>) -> Response {
    let targets = &state.probes;
    match fetch_json(&state.http, &targets.regulations_url, targets.regulations_limit).await {
        Ok(data) => {
            let message = if all_records_empty(&data) {
                "API returned empty objects - dataset is broken"
            } else {
                "API working"
            };
            Json(json!({
                "status": "received_response",
                "record_count": record_count(&data),
                "records": data,
                "message": message,
            }))
            .into_response()
        }
        Err(e) => {
            log::warn!("/debug: {}", e);
            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({
                    "error": e.to_string(),
                    "traceback": error_chain(&e),
                }),
            }
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ZoneId;

    #[test]
    fn lookup_failure_becomes_500_json() {
        let err: ApiError = PredictError::UnknownZone(ZoneId::new(4)).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body["error"], "predicted zone 4 has no centroid");
    }
}
