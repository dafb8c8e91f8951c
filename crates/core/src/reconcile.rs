// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Backend response reconciliation.
//!
//! The scheduling backend's response shape varies with the algorithm
//! selector: running everything yields a named `results` collection whose
//! entries are either leaf results or allocation-policy sub-maps, running
//! the main scheduler alone can expose `static` / `dynamic` policy objects
//! at top level, and running a single algorithm returns the leaf result
//! directly. This module classifies the payload ONCE into an exhaustive
//! [`ResponseShape`] and flattens it into a uniform map from a composite
//! variant key (`"fcfs"`, `"main-static"`, ...) to a [`RawVariantResult`].
//!
//! The discriminant between a leaf result and a group of sub-variants is
//! structural: presence of the `executionLog` field on the candidate
//! object. The leaf check is always applied before group expansion, so a
//! payload that is itself a leaf is never misread as a nested group.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::log::RawLogEntry;

/// Control fields that never name a variant group.
const RESERVED_FIELDS: [&str; 4] = ["resultId", "success", "error", "status"];

/// Fields that belong to a leaf result rather than naming a sub-variant.
const RESULT_FIELDS: [&str; 7] = [
    "executionLog",
    "totalExecutionTime",
    "ganttChart",
    "nonExecutedTasks",
    "allTasks",
    "extraWait",
    "allocationPolicy",
];

/// Allocation-policy variants the main scheduler can expose at top level.
const POLICY_FIELDS: [&str; 2] = ["static", "dynamic"];

/// One algorithm variant's result as produced by the backend, before
/// normalization and KPI derivation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVariantResult {
    /// Simulation horizon for this variant. Defaults to 0 when absent.
    #[serde(default)]
    pub total_execution_time: f64,
    /// Raw execution trace. Defaults to empty when absent.
    #[serde(default)]
    pub execution_log: Vec<RawLogEntry>,
    /// Rendered Gantt chart, base64 or data-URI. Passed through opaquely.
    #[serde(default)]
    pub gantt_chart: Option<String>,
    /// Tasks defined but never scheduled within the horizon.
    #[serde(default)]
    pub non_executed_tasks: Option<Vec<String>>,
    /// All tasks known to the scheduling run.
    #[serde(default)]
    pub all_tasks: Option<Vec<String>>,
}

/// A named entry inside a results collection: either a leaf variant or an
/// allocation-policy sub-map to expand.
#[derive(Debug, Clone)]
pub enum VariantNode {
    /// The entry directly exposes an execution trace.
    Leaf(RawVariantResult),
    /// The entry is a mapping of sub-keys, each a leaf variant keyed
    /// `"<outerKey>-<innerKey>"`.
    Group(BTreeMap<String, RawVariantResult>),
}

/// The exhaustive set of backend response shapes, classified once at the
/// system boundary.
#[derive(Debug, Clone)]
pub enum ResponseShape {
    /// Payload carries a named `results` collection.
    KeyedResults(BTreeMap<String, VariantNode>),
    /// Payload exposes allocation-policy variants at top level; each is
    /// keyed `"main-<policyName>"`.
    PolicyFields(BTreeMap<String, RawVariantResult>),
    /// Payload itself directly exposes a trace and a horizon; the single
    /// variant is keyed `"single"`.
    Single(RawVariantResult),
    /// Generic fallback: every non-reserved, non-result top-level field is
    /// a named variant group.
    Grouped(BTreeMap<String, VariantNode>),
}

impl ResponseShape {
    /// Classify a backend payload into its response shape.
    ///
    /// Returns [`Error::NoParsableResult`] when the payload matches none of
    /// the recognized shapes.
    pub fn classify(payload: &Value) -> Result<Self> {
        let obj = payload.as_object().ok_or(Error::NoParsableResult)?;

        if let Some(results) = obj.get("results").and_then(Value::as_object) {
            let mut nodes = BTreeMap::new();
            for (key, value) in results {
                if let Some(node) = decode_node(key, value)? {
                    nodes.insert(key.clone(), node);
                }
            }
            return Ok(Self::KeyedResults(nodes));
        }

        let mut policies = BTreeMap::new();
        for policy in POLICY_FIELDS {
            if let Some(value) = obj.get(policy).filter(|v| v.is_object()) {
                policies.insert(policy.to_string(), decode_leaf(policy, value)?);
            }
        }
        if !policies.is_empty() {
            return Ok(Self::PolicyFields(policies));
        }

        // Leaf check before group expansion: a payload that carries its own
        // trace and horizon is a single variant, not a group of them.
        if has_trace(payload) && obj.get("totalExecutionTime").is_some() {
            return Ok(Self::Single(decode_leaf("single", payload)?));
        }

        let mut nodes = BTreeMap::new();
        for (key, value) in obj {
            if RESERVED_FIELDS.contains(&key.as_str()) || RESULT_FIELDS.contains(&key.as_str()) {
                continue;
            }
            if let Some(node) = decode_node(key, value)? {
                nodes.insert(key.clone(), node);
            }
        }
        if nodes.is_empty() {
            return Err(Error::NoParsableResult);
        }
        Ok(Self::Grouped(nodes))
    }

    /// Flatten the shape into a map from composite variant key to raw
    /// variant, failing when zero variants remain.
    pub fn into_variants(self) -> Result<BTreeMap<String, RawVariantResult>> {
        let mut variants = BTreeMap::new();
        match self {
            Self::KeyedResults(nodes) | Self::Grouped(nodes) => {
                for (outer, node) in nodes {
                    match node {
                        VariantNode::Leaf(variant) => {
                            variants.insert(outer, variant);
                        }
                        VariantNode::Group(group) => {
                            for (inner, variant) in group {
                                variants.insert(format!("{outer}-{inner}"), variant);
                            }
                        }
                    }
                }
            }
            Self::PolicyFields(policies) => {
                for (policy, variant) in policies {
                    variants.insert(format!("main-{policy}"), variant);
                }
            }
            Self::Single(variant) => {
                variants.insert("single".to_string(), variant);
            }
        }
        if variants.is_empty() {
            return Err(Error::NoParsableResult);
        }
        Ok(variants)
    }
}

/// Whether a candidate object directly exposes an execution trace.
fn has_trace(value: &Value) -> bool {
    value.get("executionLog").is_some()
}

fn decode_leaf(key: &str, value: &Value) -> Result<RawVariantResult> {
    RawVariantResult::deserialize(value).map_err(|e| Error::MalformedVariant {
        variant: key.to_string(),
        detail: e.to_string(),
    })
}

/// Decode a named results-collection entry. Non-object entries are skipped
/// (`None`), matching the original consumer's tolerance for stray scalars.
fn decode_node(key: &str, value: &Value) -> Result<Option<VariantNode>> {
    let Some(obj) = value.as_object() else {
        debug!(key, "skipping non-object results entry");
        return Ok(None);
    };

    if has_trace(value) {
        return Ok(Some(VariantNode::Leaf(decode_leaf(key, value)?)));
    }

    let mut group = BTreeMap::new();
    for (inner, sub) in obj {
        if !sub.is_object() {
            debug!(key, inner, "skipping non-object sub-variant");
            continue;
        }
        group.insert(
            inner.clone(),
            decode_leaf(&format!("{key}-{inner}"), sub)?,
        );
    }
    Ok(Some(VariantNode::Group(group)))
}

/// Flatten an opaque backend payload into a mapping from composite variant
/// key to raw per-variant result.
pub fn reconcile(payload: &Value) -> Result<BTreeMap<String, RawVariantResult>> {
    ResponseShape::classify(payload)?.into_variants()
}
