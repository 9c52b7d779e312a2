//! Core types - pure abstractions shared across the codebase.

mod format;
mod url;

pub use format::ImageFormat;
pub use url::{SrcKind, is_remote_url, path_from_url, resolve_local, url_for_filename};
