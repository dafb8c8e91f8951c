// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-core and aggregate utilization KPIs derived from a sparse
//! execution trace.
//!
//! The trace is sparse: a core with no entries was idle for the whole
//! horizon, and gaps between consecutive entries on one core are idle time.
//! Core count is inferred from the trace itself as `max(affinity) + 1`, so
//! every integer core id from 0 upward is represented in the summary even
//! when it never executed anything.
//!
//! Entries on one core are assumed not to overlap in time. When they do,
//! the sweep logs a warning for that core and clips its utilization to 1.0
//! rather than reporting a percentage above 100%.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::log::ExecutionLogEntry;

/// Utilization figures for a single core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreKpi {
    /// Core id, 0-based.
    pub core_id: u32,
    /// Time spent executing tasks.
    pub busy_time: f64,
    /// Time spent idle within the horizon.
    pub idle_time: f64,
    /// `busy_time / horizon`, clipped to 1.0 when overlap was detected.
    pub utilization: f64,
    /// Number of trace entries executed on this core.
    pub task_count: usize,
}

/// Aggregate KPIs for one algorithm variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    /// The simulation horizon the figures are measured against.
    pub total_execution_time: f64,
    /// Mean utilization across all inferred cores.
    pub overall_utilization: f64,
    /// Summed idle time across cores divided by the number of executed
    /// trace entries.
    pub avg_idle_time_per_task: f64,
    /// Total trace entry count across the whole log.
    pub total_tasks_executed: usize,
    /// Per-core breakdown, indexed 0..core_count.
    pub cores: Vec<CoreKpi>,
}

impl KpiSummary {
    /// The all-zero summary returned for an empty log or a non-positive
    /// horizon.
    fn degenerate(total_execution_time: f64) -> Self {
        Self {
            total_execution_time,
            overall_utilization: 0.0,
            avg_idle_time_per_task: 0.0,
            total_tasks_executed: 0,
            cores: Vec::new(),
        }
    }
}

/// Compute per-core and aggregate KPIs from a canonical log and a horizon.
pub fn compute_kpis(log: &[ExecutionLogEntry], total_execution_time: f64) -> KpiSummary {
    if total_execution_time <= 0.0 || log.is_empty() {
        return KpiSummary::degenerate(total_execution_time);
    }

    let max_core_id = log.iter().map(|e| e.affinity).max().unwrap_or(0);
    let core_count = max_core_id + 1;

    let mut cores = Vec::with_capacity(core_count as usize);
    let mut total_busy = 0.0;
    let mut total_idle = 0.0;

    for core_id in 0..core_count {
        let mut entries: Vec<&ExecutionLogEntry> =
            log.iter().filter(|e| e.affinity == core_id).collect();
        entries.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut busy_time = 0.0;
        let mut idle_time = 0.0;
        let mut overlapping = false;

        if entries.is_empty() {
            idle_time = total_execution_time;
        } else {
            let mut last_end = 0.0_f64;
            for e in &entries {
                busy_time += (e.end - e.start).max(0.0);
                if e.start > last_end {
                    idle_time += e.start - last_end;
                } else if e.start < last_end {
                    overlapping = true;
                }
                last_end = last_end.max(e.end);
            }
            if last_end < total_execution_time {
                idle_time += total_execution_time - last_end;
            }
        }

        let mut utilization = busy_time / total_execution_time;
        if overlapping {
            warn!(
                core_id,
                utilization, "overlapping trace entries on core, clipping utilization"
            );
            utilization = utilization.min(1.0);
        }

        total_busy += busy_time;
        total_idle += idle_time;
        cores.push(CoreKpi {
            core_id,
            busy_time,
            idle_time,
            utilization,
            task_count: entries.len(),
        });
    }

    let total_tasks_executed = log.len();
    KpiSummary {
        total_execution_time,
        overall_utilization: total_busy / (total_execution_time * core_count as f64),
        avg_idle_time_per_task: total_idle / total_tasks_executed as f64,
        total_tasks_executed,
        cores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start: f64, end: f64, task: &str, affinity: u32) -> ExecutionLogEntry {
        ExecutionLogEntry {
            start,
            end,
            task: task.to_string(),
            instance: 0.0,
            affinity,
        }
    }

    #[test]
    fn test_back_to_back_entries_fully_utilize_core() {
        let log = vec![entry(0.0, 5.0, "A", 0), entry(5.0, 10.0, "B", 0)];
        let summary = compute_kpis(&log, 10.0);

        assert_eq!(summary.cores.len(), 1);
        assert_eq!(summary.cores[0].busy_time, 10.0);
        assert_eq!(summary.cores[0].idle_time, 0.0);
        assert_eq!(summary.cores[0].utilization, 1.0);
        assert_eq!(summary.overall_utilization, 1.0);
        assert_eq!(summary.total_tasks_executed, 2);
    }

    #[test]
    fn test_empty_log_is_degenerate() {
        let summary = compute_kpis(&[], 50.0);
        assert_eq!(summary.overall_utilization, 0.0);
        assert_eq!(summary.avg_idle_time_per_task, 0.0);
        assert_eq!(summary.total_tasks_executed, 0);
        assert!(summary.cores.is_empty());
        assert_eq!(summary.total_execution_time, 50.0);
    }

    #[test]
    fn test_non_positive_horizon_is_degenerate() {
        let log = vec![entry(0.0, 5.0, "A", 0)];
        assert!(compute_kpis(&log, 0.0).cores.is_empty());
        assert!(compute_kpis(&log, -3.0).cores.is_empty());
    }

    #[test]
    fn test_core_absent_from_log_is_fully_idle() {
        // Core 1 never appears; core 2 does, so cores 0..=2 are reported.
        let log = vec![entry(0.0, 4.0, "A", 0), entry(0.0, 6.0, "B", 2)];
        let summary = compute_kpis(&log, 20.0);

        assert_eq!(summary.cores.len(), 3);
        let idle_core = &summary.cores[1];
        assert_eq!(idle_core.core_id, 1);
        assert_eq!(idle_core.busy_time, 0.0);
        assert_eq!(idle_core.idle_time, 20.0);
        assert_eq!(idle_core.utilization, 0.0);
        assert_eq!(idle_core.task_count, 0);
    }

    #[test]
    fn test_leading_interior_and_trailing_gaps_count_as_idle() {
        // Idle 0..2, busy 2..5, idle 5..7, busy 7..8, idle 8..10.
        let log = vec![entry(7.0, 8.0, "B", 0), entry(2.0, 5.0, "A", 0)];
        let summary = compute_kpis(&log, 10.0);

        let core = &summary.cores[0];
        assert_eq!(core.busy_time, 4.0);
        assert_eq!(core.idle_time, 6.0);
        assert_eq!(core.busy_time + core.idle_time, 10.0);
    }

    #[test]
    fn test_busy_plus_idle_equals_horizon_without_overlap() {
        let log = vec![
            entry(0.0, 3.0, "A", 0),
            entry(4.0, 9.0, "B", 0),
            entry(1.0, 2.0, "C", 1),
            entry(6.0, 12.0, "D", 1),
        ];
        let summary = compute_kpis(&log, 15.0);
        for core in &summary.cores {
            assert_eq!(core.busy_time + core.idle_time, 15.0);
        }
    }

    #[test]
    fn test_negative_duration_contributes_no_busy_time() {
        let log = vec![entry(5.0, 3.0, "A", 0)];
        let summary = compute_kpis(&log, 10.0);
        assert_eq!(summary.cores[0].busy_time, 0.0);
    }

    #[test]
    fn test_overlap_clips_utilization() {
        // Two entries covering 0..8 and 2..10 overcount busy to 16 over a
        // horizon of 10; the clip keeps the reported figure at 100%.
        let log = vec![entry(0.0, 8.0, "A", 0), entry(2.0, 10.0, "B", 0)];
        let summary = compute_kpis(&log, 10.0);
        assert_eq!(summary.cores[0].utilization, 1.0);
        assert_eq!(summary.cores[0].busy_time, 16.0);
    }

    #[test]
    fn test_avg_idle_time_per_task() {
        // Core 0 idle 5, core 1 idle 15, 3 entries total.
        let log = vec![
            entry(0.0, 10.0, "A", 0),
            entry(10.0, 15.0, "B", 0),
            entry(0.0, 5.0, "C", 1),
        ];
        let summary = compute_kpis(&log, 20.0);
        assert_eq!(summary.avg_idle_time_per_task, 20.0 / 3.0);
    }

    #[test]
    fn test_overall_utilization_averages_across_cores() {
        // Core 0 busy 10/10, core 1 busy 0 -> overall 0.5.
        let log = vec![entry(0.0, 10.0, "A", 0), entry(0.0, 0.0, "B", 1)];
        let summary = compute_kpis(&log, 10.0);
        assert_eq!(summary.overall_utilization, 0.5);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = compute_kpis(&[entry(0.0, 5.0, "A", 0)], 10.0);
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("totalExecutionTime").is_some());
        assert!(json.get("overallUtilization").is_some());
        assert!(json["cores"][0].get("coreId").is_some());
        assert!(json["cores"][0].get("taskCount").is_some());
    }
}
