// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Uploaded documents and the index names bound to them

pub mod index_name;
pub mod storage;

pub use index_name::{generate_index_name, is_valid_index_name, INDEX_NAME_PREFIX};
pub use storage::{sanitize_file_name, StorageError, UploadStorage};
