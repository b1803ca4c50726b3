// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload API endpoint module
//!
//! Provides POST /upload for attaching a document to the session.

pub mod handler;
pub mod response;

pub use handler::{upload_handler, UploadedFile, FILE_FIELD};
pub use response::{UploadResponse, NO_FILE_UPLOADED};
