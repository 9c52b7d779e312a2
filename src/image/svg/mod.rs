//! SVG sources.
//!
//! # Modules
//!
//! - [`rasterize`]: Render an SVG tree to pixels at a target width (resvg)

mod rasterize;

pub use rasterize::rasterize;

use std::io::Write;

use crate::config::SvgCompression;
use crate::core::ImageFormat;
use crate::image::render::RenderError;

const BROTLI_BUFFER: usize = 4096;
const BROTLI_QUALITY: u32 = 11;
const BROTLI_WINDOW: u32 = 22;

/// A parsed SVG with its intrinsic pixel size.
pub struct SvgSource {
    pub tree: usvg::Tree,
    pub width: u32,
    pub height: u32,
}

impl SvgSource {
    pub fn parse(data: &[u8]) -> Result<Self, RenderError> {
        let tree = usvg::Tree::from_data(data, &usvg::Options::default())?;
        let size = tree.size();
        let (width, height) = (round_px(size.width()), round_px(size.height()));
        if width == 0 || height == 0 {
            return Err(RenderError::Unsupported(format!(
                "SVG has zero size ({}x{})",
                size.width(),
                size.height()
            )));
        }
        Ok(Self {
            tree,
            width,
            height,
        })
    }
}

/// Byte size of `data` as it would be served under `compression`.
pub fn served_size(data: &[u8], compression: Option<SvgCompression>) -> Result<u64, RenderError> {
    let Some(SvgCompression::Br) = compression else {
        return Ok(data.len() as u64);
    };

    let mut writer =
        brotli::CompressorWriter::new(Vec::new(), BROTLI_BUFFER, BROTLI_QUALITY, BROTLI_WINDOW);
    writer
        .write_all(data)
        .map_err(|err| RenderError::Encode {
            format: ImageFormat::Svg,
            message: err.to_string(),
        })?;
    Ok(writer.into_inner().len() as u64)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_px(value: f32) -> u32 {
    value.round().max(0.0) as u32
}

#[cfg(test)]
pub(crate) const TEST_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="150" viewBox="0 0 300 150"><rect width="300" height="150" fill="#4a90d9"/><circle cx="75" cy="75" r="50" fill="#f5a623"/></svg>"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic_size() {
        let svg = SvgSource::parse(TEST_SVG.as_bytes()).unwrap();
        assert_eq!((svg.width, svg.height), (300, 150));
    }

    #[test]
    fn test_served_size() {
        let data = TEST_SVG.as_bytes();
        assert_eq!(served_size(data, None).unwrap(), data.len() as u64);

        let br = served_size(data, Some(SvgCompression::Br)).unwrap();
        assert!(br > 0);
        assert!(br < data.len() as u64);
    }

    #[test]
    fn test_invalid_svg() {
        assert!(matches!(
            SvgSource::parse(b"<not-svg"),
            Err(RenderError::Svg(_))
        ));
    }
}
