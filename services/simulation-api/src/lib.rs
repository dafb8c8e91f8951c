// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Simulation API service.
//!
//! Accepts a task-set configuration, submits it to the external scheduling
//! backend, reconciles the backend's multi-variant result through
//! [`schedsim_core`], stores the finalized payload under an opaque result
//! id, and serves it back on retrieval requests.

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod backend;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the service router with all routes and layers applied.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::simulate::routes())
        .merge(routes::results::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
