//! Image renderer contract.
//!
//! The transform never touches pixels itself. For every eligible `<img>` it
//! hands a [`RenderRequest`] to an [`ImageRenderer`] and builds markup from
//! the returned [`RenderResult`].
//!
//! [`FileRenderer`] is the bundled implementation: it decodes, resizes,
//! encodes and writes variants to disk.

mod encode;
mod fetch;
mod file;

pub use file::FileRenderer;

use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

use crate::config::{
    EncodeSection, FetchOptions, FilenameFormat, SvgCompression, SvgShortCircuit,
};
use crate::core::ImageFormat;

/// Where the renderer reads source bytes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// File under the input directory.
    Local(PathBuf),
    /// Absolute http(s) URL, passed through verbatim.
    Remote(String),
}

/// Everything a renderer needs for one source image.
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub source: ImageSource,
    /// Configured formats, most preferred first.
    pub formats: &'a [ImageFormat],
    /// Target widths in ladder order.
    pub widths: &'a [u32],
    pub output_dir: &'a Path,
    pub url_path: &'a str,
    pub filename_format: &'a FilenameFormat,
    pub encode: &'a EncodeSection,
    /// Compute metadata only, write nothing.
    pub dry_run: bool,
    pub fetch: FetchOptions,
    pub svg_short_circuit: SvgShortCircuit,
    /// How the SVG is measured against raster variants.
    pub svg_compression_size: Option<SvgCompression>,
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// MIME type, e.g. `image/webp`.
    pub source_type: String,
}

/// Renderer output for one source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResult {
    /// Variants per format, each list ascending by width.
    ///
    /// A configured format may be missing (e.g. `svg` for raster input).
    Formats(IndexMap<ImageFormat, Vec<Variant>>),
    /// A single asset to emit as a plain `<img>` (vector input served as-is).
    ShortCircuit(Variant),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("image decoding failed")]
    Image(#[from] image::ImageError),

    #[error("SVG parsing failed")]
    Svg(#[from] usvg::Error),

    #[error("fetching remote image failed")]
    Fetch(#[from] reqwest::Error),

    #[error("{format} encoding failed: {message}")]
    Encode {
        format: ImageFormat,
        message: String,
    },

    #[error("unsupported image: {0}")]
    Unsupported(String),
}

/// Produces resized and re-encoded variants of a source image.
///
/// Called concurrently from worker threads, once per eligible element.
pub trait ImageRenderer: Send + Sync {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderResult, RenderError>;
}

impl<R: ImageRenderer + ?Sized> ImageRenderer for &R {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderResult, RenderError> {
        (**self).render(request)
    }
}

/// Height for `width` keeping the `natural` aspect ratio, at least 1px.
pub fn scaled_height(natural: (u32, u32), width: u32) -> u32 {
    let (w0, h0) = natural;
    if w0 == 0 {
        return h0.max(1);
    }
    let height = (u64::from(width) * u64::from(h0) + u64::from(w0) / 2) / u64::from(w0);
    u32::try_from(height).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_height() {
        assert_eq!(scaled_height((1000, 500), 150), 75);
        assert_eq!(scaled_height((300, 200), 150), 100);
        assert_eq!(scaled_height((3, 2), 2), 1);
        assert_eq!(scaled_height((1000, 1), 10), 1);
        assert_eq!(scaled_height((0, 40), 10), 40);
    }
}
