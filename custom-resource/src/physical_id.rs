// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use sha2::{Digest, Sha256};

use crate::errors::Error;
use crate::Result;

pub const AUTO_PHYSICAL_RESOURCE_ID_PREFIX: &str = "custom:";
pub const DEFAULT_MAX_LENGTH: usize = 1024;
pub const DEFAULT_HASH_LENGTH: usize = 10;

// hex encoded sha256
const HASH_HEX_LENGTH: usize = 64;

/// Derives the physical resource id assigned on `Create`, using the default limits.
///
/// The id is a readable `custom:<LogicalId>` prefix followed by a hash of the stack and
/// logical ids, so the same resource in the same stack always gets the same id.
pub fn make_physical_resource_id(stack_id: &str, logical_id: &str) -> String {
    build_physical_resource_id(stack_id, logical_id, DEFAULT_MAX_LENGTH, DEFAULT_HASH_LENGTH)
}

/// Same as [`make_physical_resource_id`] with explicit limits. The hash segment is never
/// truncated, so `max_length` must be able to hold it.
pub fn make_physical_resource_id_with(
    stack_id: &str,
    logical_id: &str,
    max_length: usize,
    hash_length: usize,
) -> Result<String> {
    let hashtag_length = hash_length.min(HASH_HEX_LENGTH) + 1;
    if max_length < hashtag_length {
        return Err(Error::IllegalArguments(format!(
            "can't have maxLength {max_length} < hash segment length {hashtag_length}"
        )));
    }
    Ok(build_physical_resource_id(
        stack_id,
        logical_id,
        max_length,
        hash_length,
    ))
}

fn build_physical_resource_id(
    stack_id: &str,
    logical_id: &str,
    max_length: usize,
    hash_length: usize,
) -> String {
    let name = readable_name(logical_id);
    let digest = content_hash(stack_id, logical_id);
    let hashtag = format!("-{}", &digest[..hash_length.min(digest.len())]);

    // `name` is ASCII only, byte slicing is safe
    let tagless_length = max_length.saturating_sub(hashtag.len());
    let name = &name[..tagless_length.min(name.len())];
    format!("{name}{hashtag}")
}

fn readable_name(logical_id: &str) -> String {
    let allowed = logical_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_');
    AUTO_PHYSICAL_RESOURCE_ID_PREFIX.chars().chain(allowed).collect()
}

fn content_hash(stack_id: &str, logical_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::json!([stack_id, logical_id]).to_string());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "physical_id_tests.rs"]
mod physical_id_tests;
