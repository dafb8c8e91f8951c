// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Service configuration.
//!
//! Settings are read from the environment with the `SIMULATION_API_` prefix
//! (a `.env` file is honored via dotenvy in `main`), falling back to
//! defaults suitable for local development against a backend on port 5001.

use serde::Deserialize;

/// Runtime settings for the simulation API.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// URL of the external scheduling backend's schedule endpoint.
    pub backend_url: String,
    /// Fixed simulation horizon forwarded with every backend request.
    pub simulation_time: u64,
    /// Timeout for the outbound backend call, in seconds. The call is a
    /// single best-effort attempt with no retry.
    pub request_timeout_secs: u64,
    /// Maximum number of finalized results kept in the in-memory store
    /// before the oldest entry is evicted.
    pub store_capacity: usize,
}

impl Settings {
    /// Load settings from the environment, applying defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("bind_addr", "0.0.0.0:3001")?
            .set_default("backend_url", "http://backend:5001/api/schedule")?
            .set_default("simulation_time", 400)?
            .set_default("request_timeout_secs", 30)?
            .set_default("store_capacity", 256)?
            .add_source(config::Environment::with_prefix("SIMULATION_API"))
            .build()?
            .try_deserialize()
    }
}
