//! `<img>` to `<picture>` transform.
//!
//! # Architecture
//!
//! ```text
//! transform(content, output_path)
//!        │
//!        ▼  not .html/.htm → returned unchanged
//! ┌──────────────┐
//! │  discover    │ ──► tl parse, <img> spans, eligibility filter
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │  render      │ ──► one ImageRenderer call per element (rayon)
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │  picture     │ ──► <picture> markup per element
//! └──────┬───────┘
//!        ▼
//!   splice replacements in document order
//! ```
//!
//! Any failing element fails the whole document; no partial output.

mod discover;
mod picture;
#[cfg(test)]
mod tests;

pub use discover::{ImageElement, find_images, source_for};
pub use picture::{Tag, build_markup};

use std::ops::Range;
use std::path::Path;

use rayon::prelude::*;
use thiserror::Error;

use crate::config::{ConfigError, TransformOptions};
use crate::debug;
use crate::image::render::{FileRenderer, ImageRenderer, ImageSource, RenderError, RenderRequest};
use crate::image::widths::{WidthError, generate_widths, parse_width_list};
use crate::utils::mime;

/// Exclude an `<img>` from processing, whatever its value.
pub const IGNORE_ATTR: &str = "data-img2picture-ignore";
/// Comma-separated widths overriding the configured range.
pub const WIDTHS_ATTR: &str = "data-img2picture-widths";
/// Class of the generated `<picture>`, overriding `picture_class`.
pub const PICTURE_CLASS_ATTR: &str = "data-img2picture-picture-class";

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTML parsing failed: {0}")]
    Parse(String),

    #[error("invalid widths for `{src}`")]
    Widths {
        src: String,
        #[source]
        source: WidthError,
    },

    #[error("rendering `{src}` failed")]
    Render {
        src: String,
        #[source]
        source: RenderError,
    },

    #[error("unusable render result for `{src}`: {message}")]
    Contract { src: String, message: String },
}

/// Rewrites eligible `<img>` elements of HTML documents into `<picture>`.
///
/// Options are validated and the default width ladder computed once, at
/// construction. A transformer is safe to share across threads and documents.
pub struct Img2Picture<R = FileRenderer> {
    options: TransformOptions,
    widths: Vec<u32>,
    renderer: R,
}

impl Img2Picture<FileRenderer> {
    pub fn new(options: TransformOptions) -> Result<Self, TransformError> {
        Self::with_renderer(options, FileRenderer)
    }
}

impl<R: ImageRenderer> Img2Picture<R> {
    /// Build a transformer rendering through `renderer`.
    pub fn with_renderer(options: TransformOptions, renderer: R) -> Result<Self, TransformError> {
        options.validate()?;
        let widths = generate_widths(options.min_width, options.max_width, options.width_step)
            .map_err(|source| TransformError::Widths {
                src: format!("[{}, {})", options.min_width, options.max_width),
                source,
            })?;

        Ok(Self {
            options,
            widths,
            renderer,
        })
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Default width ladder.
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// Transform one generated document.
    ///
    /// Documents whose `output_path` is not `.html`/`.htm` are returned as-is.
    pub fn transform(
        &self,
        content: &str,
        output_path: impl AsRef<Path>,
    ) -> Result<String, TransformError> {
        if !mime::is_html(output_path.as_ref()) {
            return Ok(content.to_string());
        }
        self.replace_images(content)
    }

    fn replace_images(&self, html: &str) -> Result<String, TransformError> {
        let images = find_images(html)?;
        let jobs: Vec<(&ImageElement, ImageSource)> = images
            .iter()
            .filter_map(|element| Some((element, source_for(element, &self.options)?)))
            .collect();

        if jobs.is_empty() {
            return Ok(html.to_string());
        }
        debug!("img2picture"; "{} of {} images eligible", jobs.len(), images.len());

        // Collecting into Result keeps input order and stops on the first error.
        let replacements = jobs
            .into_par_iter()
            .map(|(element, source)| {
                let markup = self.render_element(element, source)?;
                Ok((element.span.clone(), markup))
            })
            .collect::<Result<Vec<_>, TransformError>>()?;

        Ok(splice(html, &replacements))
    }

    fn render_element(
        &self,
        element: &ImageElement,
        source: ImageSource,
    ) -> Result<String, TransformError> {
        let src = element.src();
        debug!("img2picture"; "optimizing: {}", src);

        let override_widths = element
            .attrs
            .get(WIDTHS_ATTR)
            .map(String::as_str)
            .map(parse_width_list)
            .transpose()
            .map_err(|source| TransformError::Widths {
                src: src.to_string(),
                source,
            })?;

        let request = RenderRequest {
            source,
            formats: &self.options.formats,
            widths: override_widths.as_deref().unwrap_or(&self.widths),
            output_dir: &self.options.output_dir,
            url_path: &self.options.url_path,
            filename_format: &self.options.filename_format,
            encode: &self.options.encode,
            dry_run: self.options.dry_run,
            fetch: self.options.fetch,
            svg_short_circuit: self.options.svg_short_circuit,
            svg_compression_size: self.options.svg_compression_size,
        };

        let result = self
            .renderer
            .render(&request)
            .map_err(|source| TransformError::Render {
                src: src.to_string(),
                source,
            })?;

        build_markup(&element.attrs, &result, &self.options)
    }
}

/// Replace each span with its markup. Spans are sorted and disjoint.
fn splice(html: &str, replacements: &[(Range<usize>, String)]) -> String {
    let extra: usize = replacements.iter().map(|(_, markup)| markup.len()).sum();
    let mut out = String::with_capacity(html.len() + extra);
    let mut cursor = 0;
    for (span, markup) in replacements {
        out.push_str(&html[cursor..span.start]);
        out.push_str(markup);
        cursor = span.end;
    }
    out.push_str(&html[cursor..]);
    out
}
