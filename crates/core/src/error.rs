// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the reconciliation and KPI engine.

use thiserror::Error;

/// Errors produced while reconciling a backend payload.
#[derive(Debug, Error)]
pub enum Error {
    /// The payload matched none of the recognized response shapes, or
    /// matched one but yielded zero variants.
    #[error("no parsable result in backend payload")]
    NoParsableResult,

    /// A variant carried a trace field that could not be decoded into
    /// raw log entries.
    #[error("variant '{variant}' is malformed: {detail}")]
    MalformedVariant {
        /// Composite variant key the decode failed under.
        variant: String,
        /// Underlying decode failure.
        detail: String,
    },

    /// Strict normalization found a field absent from every accepted
    /// source name. Lenient normalization defaults it to 0 instead.
    #[error("trace entry for task '{task}' is missing field '{field}'")]
    MissingField {
        /// Task name of the offending entry.
        task: String,
        /// Canonical name of the missing field.
        field: &'static str,
    },
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;
