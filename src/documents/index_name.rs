// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vector store index names

use rand::rngs::OsRng;
use rand::RngCore;

/// Fixed alphabetic prefix, so every name starts with a letter
pub const INDEX_NAME_PREFIX: &str = "Index";

/// Random bytes per name (rendered as twice as many hex characters)
const TOKEN_BYTES: usize = 4;

/// Generate a fresh index name such as `IndexA3f09b1c` or `Index7e21d0aa`.
///
/// The token comes from the operating system's CSPRNG and is capitalized:
/// first character upper-cased, the rest lower-cased.
pub fn generate_index_name() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    format!("{}{}", INDEX_NAME_PREFIX, capitalize(&hex::encode(bytes)))
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Whether `name` has the shape produced by [`generate_index_name`]
pub fn is_valid_index_name(name: &str) -> bool {
    let Some(token) = name.strip_prefix(INDEX_NAME_PREFIX) else {
        return false;
    };
    let mut chars = token.chars();
    let first_ok = chars
        .next()
        .map(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        .unwrap_or(false);

    first_ok
        && token.len() == TOKEN_BYTES * 2
        && chars.all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
