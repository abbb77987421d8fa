use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use std::time::Instant;

use crate::error::PredictError;
use crate::model::{CarFeatures, PricePrediction};
use crate::observability;
use crate::server::types::*;

pub async fn health_check() -> &'static str {
    "OK"
}

/// State only exists once the model has loaded, so reaching this handler
/// means the service is ready.
pub async fn readiness(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        status: "ready",
        inputs: state.service.input_names(),
    })
}

pub async fn categories(State(state): State<Arc<AppState>>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.service.categories(),
    })
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CarFeatures>, JsonRejection>,
) -> Result<Json<PricePrediction>, PredictError> {
    // 1. Validate
    let Json(features) = payload.map_err(|rejection| {
        let error = PredictError::from(rejection);
        tracing::warn!(%error, "rejected prediction request");
        observability::record_outcome(error.kind());
        error
    })?;

    // 2. Inference, off the async workers: the session call is synchronous
    let service = state.service.clone();
    let company = features.company.clone();
    let start = Instant::now();
    let result = tokio::task::spawn_blocking(move || service.predict_rounded(&features))
        .await
        .map_err(PredictError::from)
        .and_then(|result| result);
    observability::record_inference(start.elapsed().as_secs_f64());

    // 3. Respond
    match result {
        Ok(prediction) => {
            observability::record_outcome("ok");
            Ok(Json(prediction))
        }
        Err(error) => {
            tracing::error!(%error, %company, "prediction failed");
            observability::record_outcome(error.kind());
            Err(error)
        }
    }
}
