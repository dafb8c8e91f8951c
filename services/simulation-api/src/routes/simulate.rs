// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Simulation submission route.
//!
//! Forwards the configured task set to the scheduling backend, reconciles
//! the response through the core pipeline, and stores the finalized result
//! for later retrieval.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use crate::backend::BackendRequest;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::SimulationResult;

/// One task in the submitted configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Runnable {
    /// Task name, used as the key in the backend's runnables map.
    pub name: String,
    /// Names of tasks this one depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Remaining task properties (criticality, affinity, execution time,
    /// type, period, ...), forwarded to the backend untouched.
    #[serde(flatten)]
    pub properties: serde_json::Map<String, Value>,
}

/// Inbound simulate request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    /// Task set to schedule.
    #[serde(default)]
    pub runnables: Vec<Runnable>,
    /// Number of cores to simulate.
    pub num_cores: u32,
    /// Scheduling-algorithm selector. Defaults to running everything.
    #[serde(default)]
    pub algorithm: Option<String>,
    /// Allocation-policy selector for the main scheduler.
    #[serde(default)]
    pub allocation_policy: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/simulate", post(simulate))
}

/// Re-key the runnables list by name and mirror the dependency list under
/// the `deps` field the backend expects.
fn to_backend_runnables(runnables: &[Runnable]) -> BTreeMap<String, Value> {
    runnables
        .iter()
        .map(|r| {
            let mut spec = r.properties.clone();
            spec.insert("name".to_string(), Value::String(r.name.clone()));
            spec.insert(
                "deps".to_string(),
                Value::Array(
                    r.dependencies
                        .iter()
                        .map(|d| Value::String(d.clone()))
                        .collect(),
                ),
            );
            (r.name.clone(), Value::Object(spec))
        })
        .collect()
}

async fn simulate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SimulateRequest>,
) -> Result<(StatusCode, Json<SimulationResult>), ApiError> {
    if request.runnables.is_empty() {
        return Err(ApiError::InvalidRequest("no runnables provided".to_string()));
    }

    let backend_request = BackendRequest {
        runnables: to_backend_runnables(&request.runnables),
        num_cores: request.num_cores,
        simulation_time: state.settings.simulation_time,
        algorithm: request.algorithm.unwrap_or_else(|| "all".to_string()),
        allocation_policy: request
            .allocation_policy
            .unwrap_or_else(|| "static".to_string()),
    };

    let payload = state
        .backend
        .run_simulation(&backend_request)
        .await
        .map_err(|e| {
            error!(error = %e, "backend call failed");
            e
        })?;

    let results = schedsim_core::finalize(&payload)?;
    let stored = state.store.put(results);

    info!(
        result_id = %stored.result_id,
        variants = stored.results.len(),
        algorithm = %backend_request.algorithm,
        "simulation finalized"
    );

    Ok((StatusCode::OK, Json(stored)))
}
