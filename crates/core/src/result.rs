// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-variant finalization: raw backend payload in, canonical results out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::kpi::{compute_kpis, KpiSummary};
use crate::log::{normalize_log, ExecutionLogEntry};
use crate::reconcile::{reconcile, RawVariantResult};

/// The finalized result of one (algorithm, allocation-policy) variant.
///
/// Computed once from an immutable raw payload and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmResult {
    /// Simulation horizon reported by the backend.
    pub total_execution_time: f64,
    /// Canonical execution log, in backend order.
    pub execution_log: Vec<ExecutionLogEntry>,
    /// Rendered Gantt chart, base64 or data-URI. Opaque to this layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gantt_chart: Option<String>,
    /// Derived per-core and aggregate KPIs.
    pub kpis: KpiSummary,
    /// Tasks defined but never scheduled within the horizon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_executed_tasks: Option<Vec<String>>,
    /// All tasks known to the scheduling run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_tasks: Option<Vec<String>>,
}

impl From<RawVariantResult> for AlgorithmResult {
    fn from(raw: RawVariantResult) -> Self {
        let execution_log = normalize_log(&raw.execution_log);
        let kpis = compute_kpis(&execution_log, raw.total_execution_time);
        Self {
            total_execution_time: raw.total_execution_time,
            execution_log,
            gantt_chart: raw.gantt_chart,
            kpis,
            non_executed_tasks: raw.non_executed_tasks,
            all_tasks: raw.all_tasks,
        }
    }
}

/// Reconcile a backend payload and derive KPIs for every variant it
/// contains.
///
/// Returns one [`AlgorithmResult`] per (algorithm, allocation-policy)
/// combination actually present, keyed by composite variant key, or
/// [`crate::Error::NoParsableResult`] when the payload yields none.
pub fn finalize(payload: &serde_json::Value) -> Result<BTreeMap<String, AlgorithmResult>> {
    let variants = reconcile(payload)?;
    debug!(variant_count = variants.len(), "reconciled backend payload");
    Ok(variants
        .into_iter()
        .map(|(key, raw)| (key, AlgorithmResult::from(raw)))
        .collect())
}
