//! Bundled renderer writing variants to the output directory.
//!
//! # Raster sources
//!
//! Widths above the source width are clamped to it, then deduplicated.
//! Each width is resized once (Lanczos3) and encoded to every raster format.
//! `svg` in the format list is skipped.
//!
//! # SVG sources
//!
//! The `svg` format yields one variant at intrinsic size with the bytes
//! copied as-is. Raster formats are rasterized at every width, upscaling
//! allowed. [`SvgShortCircuit`] then decides whether the SVG alone is emitted;
//! under `Size` the SVG is measured as served (`svg_compression_size`).
//!
//! # Caching
//!
//! An output that is not older than its local source is reused without
//! decoding. Remote sources have no mtime: their outputs are reused when
//! present.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use image::imageops::FilterType;
use indexmap::IndexMap;

use super::encode::encode;
use super::fetch::{self, SourceBytes};
use super::{ImageRenderer, RenderError, RenderRequest, RenderResult, Variant, scaled_height};
use crate::config::SvgShortCircuit;
use crate::core::{ImageFormat, url_for_filename};
use crate::debug;
use crate::freshness::{content_id, is_output_fresh};
use crate::image::svg::{SvgSource, rasterize, served_size};
use crate::utils::mime;

/// Renders with the `image`, `ravif` and `resvg` crates, writing to disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRenderer;

impl ImageRenderer for FileRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderResult, RenderError> {
        let source = fetch::load(&request.source, request.fetch)?;
        let id = content_id(&source.bytes);
        let sink = Sink {
            request,
            source: &source,
            id: &id,
        };

        if mime::from_path(Path::new(&source.name)) == mime::types::SVG {
            render_svg(&sink)
        } else {
            render_raster(&sink)
        }
    }
}

// ============================================================================
// output bookkeeping
// ============================================================================

/// Names, stores and describes the variants of one source.
struct Sink<'a> {
    request: &'a RenderRequest<'a>,
    source: &'a SourceBytes,
    id: &'a str,
}

impl Sink<'_> {
    fn filename(&self, format: ImageFormat, width: u32) -> String {
        self.request
            .filename_format
            .format(self.id, &self.source.name, width, format)
    }

    fn output_path(&self, filename: &str) -> PathBuf {
        self.request.output_dir.join(filename)
    }

    fn variant(&self, filename: &str, format: ImageFormat, width: u32, height: u32) -> Variant {
        Variant {
            url: url_for_filename(self.request.url_path, filename),
            width,
            height,
            source_type: format.mime().to_string(),
        }
    }

    /// Size of an up-to-date output, `None` if it must be (re)generated.
    fn fresh_len(&self, filename: &str) -> Option<u64> {
        if self.request.dry_run {
            return None;
        }
        let output = self.output_path(filename);
        if !is_output_fresh(&output, self.source.mtime) {
            return None;
        }
        output.metadata().ok().map(|m| m.len())
    }

    fn store(&self, filename: &str, bytes: &[u8]) -> Result<(), RenderError> {
        if self.request.dry_run {
            return Ok(());
        }
        let output = self.output_path(filename);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|err| RenderError::Io(parent.to_path_buf(), err))?;
        }
        fs::write(&output, bytes).map_err(|err| RenderError::Io(output.clone(), err))?;
        debug!("render"; "wrote {}", output.display());
        Ok(())
    }
}

/// Sorted, deduplicated widths, clamped to `max` when given.
fn normalize_widths(widths: &[u32], max: Option<u32>) -> Vec<u32> {
    let mut widths: Vec<u32> = widths
        .iter()
        .map(|&w| max.map_or(w, |max| w.min(max)))
        .collect();
    widths.sort_unstable();
    widths.dedup();
    widths
}

// ============================================================================
// raster sources
// ============================================================================

fn render_raster(sink: &Sink<'_>) -> Result<RenderResult, RenderError> {
    let request = sink.request;
    let bytes = &sink.source.bytes;

    let natural = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| RenderError::Io(PathBuf::from(&sink.source.name), err))?
        .into_dimensions()?;
    let widths = normalize_widths(request.widths, Some(natural.0));

    let raster_formats: Vec<ImageFormat> = request
        .formats
        .iter()
        .copied()
        .filter(|format| !format.is_vector())
        .collect();

    let mut decoded: Option<DynamicImage> = None;
    let mut formats: IndexMap<ImageFormat, Vec<Variant>> = IndexMap::new();

    for &width in &widths {
        let height = scaled_height(natural, width);
        let mut resized: Option<DynamicImage> = None;

        for &format in &raster_formats {
            let filename = sink.filename(format, width);

            if !request.dry_run && sink.fresh_len(&filename).is_none() {
                if resized.is_none() {
                    if decoded.is_none() {
                        decoded = Some(image::load_from_memory(bytes)?);
                    }
                    resized = decoded
                        .as_ref()
                        .map(|img| img.resize_exact(width, height, FilterType::Lanczos3));
                }
                if let Some(pixels) = &resized {
                    let encoded = encode(pixels, format, request.encode.get(format))?;
                    sink.store(&filename, &encoded)?;
                }
            }

            formats
                .entry(format)
                .or_default()
                .push(sink.variant(&filename, format, width, height));
        }
    }

    Ok(RenderResult::Formats(formats))
}

// ============================================================================
// svg sources
// ============================================================================

fn render_svg(sink: &Sink<'_>) -> Result<RenderResult, RenderError> {
    let request = sink.request;
    let svg = SvgSource::parse(&sink.source.bytes)?;
    let has_svg = request.formats.contains(&ImageFormat::Svg);

    let svg_variant = if has_svg {
        let filename = sink.filename(ImageFormat::Svg, svg.width);
        if sink.fresh_len(&filename).is_none() {
            sink.store(&filename, &sink.source.bytes)?;
        }
        Some(sink.variant(&filename, ImageFormat::Svg, svg.width, svg.height))
    } else {
        None
    };

    if request.svg_short_circuit == SvgShortCircuit::Always
        && let Some(variant) = svg_variant
    {
        return Ok(RenderResult::ShortCircuit(variant));
    }

    // Raster variants heavier than the SVG itself are pointless.
    let size_limit = match request.svg_short_circuit {
        SvgShortCircuit::Size if has_svg => Some(served_size(
            &sink.source.bytes,
            request.svg_compression_size,
        )?),
        _ => None,
    };

    let widths = normalize_widths(request.widths, None);
    let mut rasters: IndexMap<ImageFormat, Vec<Variant>> = IndexMap::new();

    for &width in &widths {
        let height = scaled_height((svg.width, svg.height), width);
        let mut pixels: Option<DynamicImage> = None;

        for &format in request.formats.iter().filter(|f| !f.is_vector()) {
            let filename = sink.filename(format, width);

            let len = match sink.fresh_len(&filename) {
                Some(len) => len,
                // sizes are only needed for pruning
                None if request.dry_run && size_limit.is_none() => 0,
                None => {
                    if pixels.is_none() {
                        pixels = Some(rasterize(&svg, width)?);
                    }
                    let Some(image) = &pixels else { continue };
                    let encoded = encode(image, format, request.encode.get(format))?;
                    if size_limit.is_some_and(|limit| encoded.len() as u64 > limit) {
                        continue;
                    }
                    sink.store(&filename, &encoded)?;
                    encoded.len() as u64
                }
            };

            if size_limit.is_some_and(|limit| len > limit) {
                continue;
            }
            rasters
                .entry(format)
                .or_default()
                .push(sink.variant(&filename, format, width, height));
        }
    }

    if size_limit.is_some()
        && rasters.is_empty()
        && let Some(variant) = svg_variant
    {
        debug!("render"; "{}: every raster variant exceeds the svg, short-circuiting", sink.source.name);
        return Ok(RenderResult::ShortCircuit(variant));
    }

    // Keep configured format order.
    let mut formats = IndexMap::new();
    for &format in request.formats {
        if format == ImageFormat::Svg {
            if let Some(variant) = &svg_variant {
                formats.insert(format, vec![variant.clone()]);
            }
        } else if let Some(variants) = rasters.swap_remove(&format) {
            formats.insert(format, variants);
        }
    }
    Ok(RenderResult::Formats(formats))
}
