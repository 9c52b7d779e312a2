//! `[encode.*]` sections.
//!
//! # Example
//!
//! ```toml
//! [encode.avif]
//! quality = 60   # 1..=100
//! speed = 6      # 1..=10, higher is faster
//!
//! [encode.jpeg]
//! quality = 82
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::ImageFormat;

/// Encoder settings for one output format.
///
/// Unset fields fall back to the encoder's own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Lossy quality, 1..=100. Only avif and jpeg take it.
    pub quality: Option<u8>,
    /// Encoder speed, 1..=10. Only AVIF honours it.
    pub speed: Option<u8>,
}

/// Encoder settings keyed by format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSection {
    pub avif: EncodeOptions,
    pub webp: EncodeOptions,
    pub jpeg: EncodeOptions,
    pub png: EncodeOptions,
}

impl EncodeSection {
    /// Settings for `format`. SVG is copied verbatim and has none.
    pub fn get(&self, format: ImageFormat) -> EncodeOptions {
        match format {
            ImageFormat::Avif => self.avif,
            ImageFormat::Webp => self.webp,
            ImageFormat::Jpeg => self.jpeg,
            ImageFormat::Png => self.png,
            ImageFormat::Svg => EncodeOptions::default(),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let lossy = [
            (self.avif.quality, FieldPath::new("encode.avif.quality")),
            (self.jpeg.quality, FieldPath::new("encode.jpeg.quality")),
        ];
        for (quality, field) in lossy {
            if let Some(q) = quality
                && !(1..=100).contains(&q)
            {
                diag.error(field, format!("quality must be within 1..=100, got {q}"));
            }
        }

        // webp and png are written lossless
        let lossless = [
            (self.webp.quality, FieldPath::new("encode.webp.quality")),
            (self.png.quality, FieldPath::new("encode.png.quality")),
        ];
        for (quality, field) in lossless {
            if quality.is_some() {
                diag.error_with_hint(
                    field,
                    "this format is encoded lossless and takes no quality",
                    "remove the key, or use avif/jpeg for lossy output",
                );
            }
        }

        if let Some(speed) = self.avif.speed
            && !(1..=10).contains(&speed)
        {
            diag.error_with_hint(
                FieldPath::new("encode.avif.speed"),
                format!("speed must be within 1..=10, got {speed}"),
                "lower is slower but smaller, 6 is a good default",
            );
        }
        let speeds = [
            (self.webp.speed, FieldPath::new("encode.webp.speed")),
            (self.jpeg.speed, FieldPath::new("encode.jpeg.speed")),
            (self.png.speed, FieldPath::new("encode.png.speed")),
        ];
        for (speed, field) in speeds {
            if speed.is_some() {
                diag.error(field, "only avif takes a speed");
            }
        }
    }
}
