//! SHA-256 checksum utilities
//!
//! Reports carry `sha256:<hex>` checksums of the document before and after a
//! run so drift between runs can be spotted without diffing.

use sha2::{Digest, Sha256};

const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of string content as `"sha256:<hex>"`.
pub fn compute_content_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{}{:x}", PREFIX, hasher.finalize())
}
