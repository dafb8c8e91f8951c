// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core reconciliation and KPI-derivation engine for scheduling-simulation
//! results.
//!
//! The external scheduling backend returns one of several response shapes
//! depending on the selected algorithm: a single-variant object, a flat
//! multi-algorithm map, or a multi-algorithm map with nested
//! allocation-policy sub-maps. This crate turns any of those into a uniform
//! mapping from a composite variant key (e.g. `"fcfs"`, `"main-static"`) to
//! an [`AlgorithmResult`] carrying a canonical execution log and derived
//! per-core utilization KPIs.
//!
//! Everything here is pure and synchronous: safe to run on any thread,
//! no suspension points, inputs are never mutated.
//!
//! # Pipeline
//!
//! ```text
//! raw backend payload
//!   -> reconcile::reconcile        (shape classification, variant keys)
//!   -> log::normalize_log          (field coalescing into canonical entries)
//!   -> kpi::compute_kpis           (per-core sweep + aggregates)
//!   -> result::finalize            (variant key -> AlgorithmResult)
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod kpi;
pub mod log;
pub mod reconcile;
pub mod result;

pub use error::{Error, Result};
pub use kpi::{compute_kpis, CoreKpi, KpiSummary};
pub use log::{normalize_log, normalize_log_strict, ExecutionLogEntry, RawLogEntry};
pub use reconcile::{reconcile, RawVariantResult, ResponseShape};
pub use result::{finalize, AlgorithmResult};
