//! Pixel encoders per output format.

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;

use super::RenderError;
use crate::config::EncodeOptions;
use crate::core::ImageFormat;

const DEFAULT_JPEG_QUALITY: u8 = 80;
const DEFAULT_AVIF_QUALITY: u8 = 80;
const DEFAULT_AVIF_SPEED: u8 = 6;

/// Encode `image` as `format`.
///
/// WebP is written lossless, the `image` crate has no lossy WebP encoder.
pub fn encode(
    image: &DynamicImage,
    format: ImageFormat,
    options: EncodeOptions,
) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let quality = options.quality.unwrap_or(DEFAULT_JPEG_QUALITY);
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
        }
        ImageFormat::Png => {
            image.write_with_encoder(PngEncoder::new(&mut buf))?;
        }
        ImageFormat::Webp => {
            let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
            rgba.write_with_encoder(WebPEncoder::new_lossless(&mut buf))?;
        }
        ImageFormat::Avif => buf = encode_avif(image, options)?,
        ImageFormat::Svg => {
            return Err(RenderError::Encode {
                format,
                message: "cannot encode pixels as SVG".to_string(),
            });
        }
    }
    Ok(buf)
}

fn encode_avif(image: &DynamicImage, options: EncodeOptions) -> Result<Vec<u8>, RenderError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels: Vec<ravif::RGBA8> = rgba
        .pixels()
        .map(|p| ravif::RGBA8::new(p[0], p[1], p[2], p[3]))
        .collect();

    let quality = options.quality.unwrap_or(DEFAULT_AVIF_QUALITY);
    let speed = options.speed.unwrap_or(DEFAULT_AVIF_SPEED);

    let encoded = ravif::Encoder::new()
        .with_quality(f32::from(quality))
        .with_speed(speed)
        .encode_rgba(ravif::Img::new(
            pixels.as_slice(),
            width as usize,
            height as usize,
        ))
        .map_err(|err| RenderError::Encode {
            format: ImageFormat::Avif,
            message: err.to_string(),
        })?;

    Ok(encoded.avif_file)
}
