// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Outbound client for the external scheduling backend.
//!
//! The backend call is the only suspension point in the end-to-end flow:
//! a single best-effort POST bounded by the configured timeout, with no
//! automatic retry.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Settings;
use crate::error::ApiError;

/// Maximum number of upstream-body bytes carried in a rejection error.
const BODY_EXCERPT_LEN: usize = 300;

/// Request body forwarded to the scheduling backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendRequest {
    /// Task specifications keyed by task name, each carrying its
    /// dependency list under `deps`.
    pub runnables: BTreeMap<String, Value>,
    /// Number of cores to simulate.
    pub num_cores: u32,
    /// Fixed simulation horizon.
    pub simulation_time: u64,
    /// Scheduling-algorithm selector (`"all"`, `"fcfs"`, ...).
    pub algorithm: String,
    /// Allocation-policy selector for the main scheduler.
    pub allocation_policy: String,
}

/// Seam for the outbound scheduler call, mockable in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulerBackend: Send + Sync {
    /// Run one simulation request against the backend, returning its raw
    /// JSON payload.
    async fn run_simulation(&self, request: &BackendRequest) -> Result<Value, ApiError>;
}

/// reqwest-based [`SchedulerBackend`] implementation.
pub struct HttpSchedulerBackend {
    client: reqwest::Client,
    target: String,
}

impl HttpSchedulerBackend {
    /// Build a client against the configured backend URL with the
    /// configured request timeout.
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            target: settings.backend_url.clone(),
        })
    }
}

#[async_trait]
impl SchedulerBackend for HttpSchedulerBackend {
    async fn run_simulation(&self, request: &BackendRequest) -> Result<Value, ApiError> {
        debug!(target = %self.target, algorithm = %request.algorithm, "calling scheduling backend");

        let response = self
            .client
            .post(&self.target)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::BackendUnreachable {
                target: self.target.clone(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
            return Err(ApiError::BackendRejected {
                status: status.as_u16(),
                body: excerpt,
            });
        }

        response.json().await.map_err(|e| ApiError::BackendRejected {
            status: status.as_u16(),
            body: format!("invalid JSON body: {e}"),
        })
    }
}
