//! SVG rasterization via resvg.

use image::{DynamicImage, RgbaImage};
use resvg::tiny_skia;

use super::SvgSource;
use crate::image::render::{RenderError, scaled_height};

/// Render `svg` at `width` pixels wide, keeping its aspect ratio.
///
/// Widths above the intrinsic size upscale, vectors lose nothing.
pub fn rasterize(svg: &SvgSource, width: u32) -> Result<DynamicImage, RenderError> {
    let height = scaled_height((svg.width, svg.height), width);
    let size = svg.tree.size();

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        RenderError::Unsupported(format!("cannot allocate {width}x{height} pixmap"))
    })?;

    #[allow(clippy::cast_precision_loss)]
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&svg.tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha
    let mut pixels = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    RgbaImage::from_raw(width, height, pixels)
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| RenderError::Unsupported("pixmap size mismatch".to_string()))
}
