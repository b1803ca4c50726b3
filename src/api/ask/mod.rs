// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ask API endpoint module
//!
//! Provides POST /ask for questions about the uploaded document.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::ask_handler;
pub use request::AskRequest;
pub use response::AskResponse;
