//! Mtime-based freshness detection for generated files.
//!
//! A rendered variant is reused when it is at least as new as its local
//! source. Remote sources have no mtime; their outputs are reused whenever
//! they exist, since the default filename embeds a content hash.

use std::path::Path;
use std::time::SystemTime;

/// Check if output file is fresh relative to the source mtime
///
/// - `source_mtime = Some(t)`: fresh when output exists with mtime >= `t`
/// - `source_mtime = None`: fresh when output exists
pub fn is_output_fresh(output: &Path, source_mtime: Option<SystemTime>) -> bool {
    let Some(output_time) = get_mtime(output) else {
        return false;
    };

    match source_mtime {
        Some(source_time) => output_time >= source_time,
        None => true,
    }
}

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}
