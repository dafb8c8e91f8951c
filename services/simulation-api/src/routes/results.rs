// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Result retrieval route.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::SimulationResult;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/results/:id", get(get_result))
}

async fn get_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SimulationResult>, ApiError> {
    debug!(result_id = %id, "result lookup");
    state
        .store
        .get(&id)
        .map(Json)
        .ok_or(ApiError::UnknownResultId(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockSchedulerBackend;
    use crate::config::Settings;
    use crate::store::{InMemoryResultStore, ResultRepository};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> (Arc<AppState>, Arc<InMemoryResultStore>) {
        let store = Arc::new(InMemoryResultStore::new(16));
        let state = Arc::new(AppState::new(
            Settings::load().unwrap(),
            Arc::new(MockSchedulerBackend::new()),
            store.clone(),
        ));
        (state, store)
    }

    #[tokio::test]
    async fn test_get_stored_result() {
        let (state, store) = test_state();
        let payload = serde_json::json!({
            "totalExecutionTime": 10,
            "executionLog": [
                { "start": 0, "end": 5, "task": "A", "instance": 0, "affinity": 0 }
            ]
        });
        let stored = store.put(schedsim_core::finalize(&payload).unwrap());

        let app = crate::app(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/results/{}", stored.result_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["resultId"], stored.result_id);
        assert!(body["results"]["single"]["kpis"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (state, _) = test_state();
        let app = crate::app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/results/nope1234")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "RESULT_NOT_FOUND");
    }
}
