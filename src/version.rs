// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the document QA server

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Capabilities exposed by this build
pub const FEATURES: &[&str] = &[
    "pdf-upload",
    "session-scoped-documents",
    "signed-session-cookies",
    "idle-session-sweeper",
    "remote-qa-engine",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Document QA Server {}", VERSION_NUMBER)
}
