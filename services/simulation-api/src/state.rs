// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared application state.

use std::sync::Arc;

use crate::backend::SchedulerBackend;
use crate::config::Settings;
use crate::store::ResultRepository;

/// State shared across request handlers.
pub struct AppState {
    /// Runtime settings.
    pub settings: Settings,
    /// Outbound scheduler client.
    pub backend: Arc<dyn SchedulerBackend>,
    /// Finalized-result storage.
    pub store: Arc<dyn ResultRepository>,
}

impl AppState {
    /// Assemble state from its parts.
    pub fn new(
        settings: Settings,
        backend: Arc<dyn SchedulerBackend>,
        store: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            settings,
            backend,
            store,
        }
    }
}
