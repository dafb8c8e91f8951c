// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP route handlers.

pub mod health;
pub mod results;
pub mod simulate;
