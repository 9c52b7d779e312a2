//! Freshness detection: content-hash (blake3) for sources, mtime for outputs.

mod mtime;

pub use mtime::{get_mtime, is_output_fresh};

/// Length of the hex identifier embedded in generated filenames.
const ID_LEN: usize = 12;

/// Compute blake3 hash for filename (12 hex chars).
///
/// Used for cache-correct file naming: content changes → filename changes.
pub fn content_id(content: &[u8]) -> String {
    let hash = blake3::hash(content);
    hash.to_hex()[..ID_LEN].to_string()
}
