// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Clear API endpoint module

pub mod handler;

pub use handler::{clear_handler, ClearResponse};
