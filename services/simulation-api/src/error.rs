// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Service error taxonomy and HTTP mapping.
//!
//! Structural failures inside a backend payload are resolved by the
//! reconciler's fallback rules wherever possible; only total failure to
//! extract any variant, or failure to reach the backend, surfaces here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the simulation API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The outbound call to the scheduling backend failed at the transport
    /// level. Not retried.
    #[error("failed to connect to scheduling backend at {target}: {detail}")]
    BackendUnreachable {
        /// Backend URL the call was made against.
        target: String,
        /// Transport-level failure detail.
        detail: String,
    },

    /// The scheduling backend responded with a non-success status.
    #[error("scheduling backend responded with status {status}")]
    BackendRejected {
        /// Upstream HTTP status code.
        status: u16,
        /// Upstream response body, truncated for diagnosis.
        body: String,
    },

    /// An otherwise successful backend response contained zero parsable
    /// variants. The request itself succeeded, so this is a not-found,
    /// not a server error.
    #[error("no parsable result in backend response")]
    UnparsableResult,

    /// Retrieval by an identifier not present in the store.
    #[error("result '{0}' not found")]
    UnknownResultId(String),

    /// The inbound request was malformed (e.g. no runnables provided).
    #[error("{0}")]
    InvalidRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BackendUnreachable { .. } | Self::BackendRejected { .. } => {
                StatusCode::BAD_GATEWAY
            }
            Self::UnparsableResult | Self::UnknownResultId(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BackendUnreachable { .. } => "BACKEND_UNREACHABLE",
            Self::BackendRejected { .. } => "BACKEND_REJECTED",
            Self::UnparsableResult => "RESULT_NOT_FOUND",
            Self::UnknownResultId(_) => "RESULT_NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }
}

impl From<schedsim_core::Error> for ApiError {
    fn from(err: schedsim_core::Error) -> Self {
        match err {
            schedsim_core::Error::NoParsableResult
            | schedsim_core::Error::MalformedVariant { .. } => Self::UnparsableResult,
            schedsim_core::Error::MissingField { .. } => Self::UnparsableResult,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut error = json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        if let Self::BackendRejected { status, body } = &self {
            error["upstreamStatus"] = json!(status);
            error["upstreamBody"] = json!(body);
        }
        if let Self::BackendUnreachable { target, .. } = &self {
            error["target"] = json!(target);
        }
        (self.status(), Json(json!({ "error": error }))).into_response()
    }
}
