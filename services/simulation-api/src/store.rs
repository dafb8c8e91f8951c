// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Finalized-result storage.
//!
//! Results live between the producing simulate request and any number of
//! later retrieval requests. The store is process-wide shared state behind
//! the [`ResultRepository`] abstraction; the in-memory implementation is
//! bounded, evicting the oldest entry once the configured capacity is
//! exceeded. Entries are never updated in place.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use dashmap::DashMap;
use schedsim_core::AlgorithmResult;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// A finalized simulation payload as stored and served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Opaque identifier the payload is stored under.
    pub result_id: String,
    /// Finalized results keyed by composite variant key.
    pub results: BTreeMap<String, AlgorithmResult>,
}

/// Keyed storage for finalized simulation results.
pub trait ResultRepository: Send + Sync {
    /// Store a finalized result map under a freshly generated opaque id
    /// and return the stored payload.
    fn put(&self, results: BTreeMap<String, AlgorithmResult>) -> SimulationResult;

    /// Fetch the payload stored under `id`, if any.
    fn get(&self, id: &str) -> Option<SimulationResult>;
}

/// Bounded in-memory [`ResultRepository`] with insertion-order eviction.
pub struct InMemoryResultStore {
    entries: DashMap<String, SimulationResult>,
    order: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl InMemoryResultStore {
    /// Create a store holding at most `capacity` results.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Number of results currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no results.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Generate a short random alphanumeric token. Not guaranteed
    /// collision-free; a collision overwrites the older entry.
    fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    }
}

impl ResultRepository for InMemoryResultStore {
    fn put(&self, results: BTreeMap<String, AlgorithmResult>) -> SimulationResult {
        let payload = SimulationResult {
            result_id: Self::generate_id(),
            results,
        };
        self.entries
            .insert(payload.result_id.clone(), payload.clone());

        let mut order = self.order.lock().unwrap_or_else(|e| e.into_inner());
        order.push_back(payload.result_id.clone());
        while order.len() > self.capacity {
            if let Some(evicted) = order.pop_front() {
                self.entries.remove(&evicted);
                debug!(result_id = %evicted, "evicted oldest stored result");
            }
        }
        payload
    }

    fn get(&self, id: &str) -> Option<SimulationResult> {
        self.entries.get(id).map(|entry| entry.value().clone())
    }
}
