//! Naming of generated image variants.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::core::ImageFormat;

/// `(id, src, width, format) -> filename`
pub type NameFn = dyn Fn(&str, &str, u32, ImageFormat) -> String + Send + Sync;

/// Shared naming function for generated files.
///
/// `id` is the content identifier of the source bytes, `src` the local path
/// or the remote URL's path.
#[derive(Clone)]
pub struct FilenameFormat(Arc<NameFn>);

impl FilenameFormat {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &str, u32, ImageFormat) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn format(&self, id: &str, src: &str, width: u32, format: ImageFormat) -> String {
        (self.0)(id, src, width, format)
    }
}

impl Default for FilenameFormat {
    fn default() -> Self {
        Self::new(default_filename)
    }
}

impl fmt::Debug for FilenameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FilenameFormat(..)")
    }
}

/// `<stem>-<id>-<width>w.<ext>`
pub fn default_filename(id: &str, src: &str, width: u32, format: ImageFormat) -> String {
    let stem = Path::new(src)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    format!("{stem}-{id}-{width}w.{}", format.extension())
}
