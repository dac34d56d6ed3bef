// ABOUTME: Stable short content hash used for cache keys and episode ids.
// ABOUTME: SHA-256 over UTF-8 input, lower-hex, truncated to a fixed length.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
pub const HASH_LEN: usize = 16;

/// Hashes `input` deterministically. No salt, so the result is stable across
/// processes and runs.
pub fn stable_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(HASH_LEN);
    hex
}
