//! SVG short-circuit policy.
//!
//! ```toml
//! svg_short_circuit = "size"   # true | false | "size"
//! svg_compression_size = "br"  # measure the SVG brotli-compressed
//! ```

use serde::{Deserialize, Serialize};

/// What to do with vector sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Repr", into = "Repr")]
pub enum SvgShortCircuit {
    /// Always rasterize into every configured format.
    Never,
    /// Emit the SVG alone whenever `svg` is a configured format.
    Always,
    /// Drop raster variants larger than the SVG; emit the SVG alone if none survive.
    #[default]
    Size,
}

/// Compression applied to the SVG before the `"size"` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SvgCompression {
    /// Brotli, as served with `Content-Encoding: br`.
    Br,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Repr {
    Bool(bool),
    Mode(Mode),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Mode {
    Size,
}

impl From<Repr> for SvgShortCircuit {
    fn from(repr: Repr) -> Self {
        match repr {
            Repr::Bool(true) => Self::Always,
            Repr::Bool(false) => Self::Never,
            Repr::Mode(Mode::Size) => Self::Size,
        }
    }
}

impl From<SvgShortCircuit> for Repr {
    fn from(policy: SvgShortCircuit) -> Self {
        match policy {
            SvgShortCircuit::Always => Repr::Bool(true),
            SvgShortCircuit::Never => Repr::Bool(false),
            SvgShortCircuit::Size => Repr::Mode(Mode::Size),
        }
    }
}
