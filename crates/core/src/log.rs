// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Execution-trace normalization.
//!
//! Different algorithm families on the backend emit trace entries under
//! different field names: the FCFS and criticality schedulers use
//! `start` / `end` / `instance` / `affinity`, while the main scheduler uses
//! `start_time` / `finish_time` / `eligibleTime` / `core`. This module
//! coalesces both spellings into one canonical [`ExecutionLogEntry`] schema.
//!
//! Normalization preserves length and order: no reordering, no filtering,
//! no deduplication. In lenient mode a numeric field absent from every
//! accepted source name silently defaults to 0; this is specified lossy
//! behavior, not an error.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A raw trace entry as emitted by the backend, before field coalescing.
///
/// `task` is the only required field; everything else is optional and
/// producer-dependent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLogEntry {
    /// Task name. Required and passed through unchanged.
    pub task: String,
    /// Interval start (FCFS/criticality spelling).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// Interval start (main-scheduler spelling).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    /// Interval end (FCFS/criticality spelling).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    /// Interval end (main-scheduler spelling).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<f64>,
    /// Task instance number (FCFS/criticality spelling).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<f64>,
    /// Eligible time, reused as the instance slot by the main scheduler.
    #[serde(default, rename = "eligibleTime", skip_serializing_if = "Option::is_none")]
    pub eligible_time: Option<f64>,
    /// Core id (FCFS/criticality spelling).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<u32>,
    /// Core id (main-scheduler spelling).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core: Option<u32>,
}

/// A canonical execution-log entry.
///
/// `end >= start` is expected but not enforced at this layer; the KPI sweep
/// clamps negative durations to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLogEntry {
    /// Interval start.
    pub start: f64,
    /// Interval end.
    pub end: f64,
    /// Task name.
    pub task: String,
    /// Task instance number.
    pub instance: f64,
    /// Core id the interval executed on.
    pub affinity: u32,
}

/// Normalize raw trace entries into the canonical schema, defaulting
/// missing numeric fields to 0.
pub fn normalize_log(entries: &[RawLogEntry]) -> Vec<ExecutionLogEntry> {
    entries.iter().map(normalize_entry).collect()
}

/// Normalize raw trace entries, returning an error if any numeric field is
/// absent from every accepted source name.
pub fn normalize_log_strict(entries: &[RawLogEntry]) -> Result<Vec<ExecutionLogEntry>> {
    entries.iter().map(normalize_entry_strict).collect()
}

/// Normalize one raw entry. First populated source wins, default 0.
fn normalize_entry(raw: &RawLogEntry) -> ExecutionLogEntry {
    ExecutionLogEntry {
        start: raw.start.or(raw.start_time).unwrap_or(0.0),
        end: raw.end.or(raw.finish_time).unwrap_or(0.0),
        task: raw.task.clone(),
        instance: raw.instance.or(raw.eligible_time).unwrap_or(0.0),
        affinity: raw.affinity.or(raw.core).unwrap_or(0),
    }
}

fn normalize_entry_strict(raw: &RawLogEntry) -> Result<ExecutionLogEntry> {
    let missing = |field| Error::MissingField {
        task: raw.task.clone(),
        field,
    };
    Ok(ExecutionLogEntry {
        start: raw.start.or(raw.start_time).ok_or_else(|| missing("start"))?,
        end: raw.end.or(raw.finish_time).ok_or_else(|| missing("end"))?,
        task: raw.task.clone(),
        instance: raw
            .instance
            .or(raw.eligible_time)
            .ok_or_else(|| missing("instance"))?,
        affinity: raw.affinity.or(raw.core).ok_or_else(|| missing("affinity"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawLogEntry {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_fcfs_spelling() {
        let entry = raw(serde_json::json!({
            "start": 0, "end": 5, "task": "A", "instance": 1, "affinity": 2
        }));
        let log = normalize_log(&[entry]);
        assert_eq!(
            log[0],
            ExecutionLogEntry {
                start: 0.0,
                end: 5.0,
                task: "A".to_string(),
                instance: 1.0,
                affinity: 2,
            }
        );
    }

    #[test]
    fn test_main_scheduler_spelling() {
        let entry = raw(serde_json::json!({
            "start_time": 3, "finish_time": 9, "task": "B",
            "eligibleTime": 2, "core": 1
        }));
        let log = normalize_log(&[entry]);
        assert_eq!(log[0].start, 3.0);
        assert_eq!(log[0].end, 9.0);
        assert_eq!(log[0].instance, 2.0);
        assert_eq!(log[0].affinity, 1);
    }

    #[test]
    fn test_primary_name_wins_over_alias() {
        let entry = raw(serde_json::json!({
            "start": 1, "start_time": 7, "end": 2, "finish_time": 8, "task": "A"
        }));
        let log = normalize_log(&[entry]);
        assert_eq!(log[0].start, 1.0);
        assert_eq!(log[0].end, 2.0);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let entry = raw(serde_json::json!({ "task": "lonely" }));
        let log = normalize_log(&[entry]);
        assert_eq!(log[0].start, 0.0);
        assert_eq!(log[0].end, 0.0);
        assert_eq!(log[0].instance, 0.0);
        assert_eq!(log[0].affinity, 0);
        assert_eq!(log[0].task, "lonely");
    }

    #[test]
    fn test_preserves_length_and_order() {
        let entries: Vec<RawLogEntry> = (0..5)
            .map(|i| raw(serde_json::json!({ "task": format!("t{i}"), "start": i })))
            .collect();
        let log = normalize_log(&entries);
        assert_eq!(log.len(), 5);
        for (i, e) in log.iter().enumerate() {
            assert_eq!(e.task, format!("t{i}"));
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let entry = raw(serde_json::json!({
            "start_time": 3, "finish_time": 9, "task": "B", "core": 1
        }));
        let first = normalize_log(std::slice::from_ref(&entry));
        let second = normalize_log(std::slice::from_ref(&entry));
        assert_eq!(first, second);
    }

    #[test]
    fn test_strict_mode_rejects_missing_start() {
        let entry = raw(serde_json::json!({ "end": 5, "task": "A", "instance": 0, "affinity": 0 }));
        let err = normalize_log_strict(&[entry]).unwrap_err();
        assert!(err.to_string().contains("start"));
        assert!(err.to_string().contains("'A'"));
    }

    #[test]
    fn test_strict_mode_accepts_aliases() {
        let entry = raw(serde_json::json!({
            "start_time": 0, "finish_time": 5, "task": "A",
            "eligibleTime": 0, "core": 0
        }));
        assert!(normalize_log_strict(&[entry]).is_ok());
    }
}
