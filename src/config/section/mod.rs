//! Option sections nested under `TransformOptions`.
//!
//! | Module     | TOML                              | Purpose                          |
//! |------------|-----------------------------------|----------------------------------|
//! | `encode`   | `[encode.avif]`, `[encode.webp]`… | Per-format encoder settings      |
//! | `fetch`    | `[fetch]`                         | Remote image download settings   |
//! | `filename` | (code only)                       | Naming of generated variants     |
//! | `svg`      | `svg_short_circuit`, `svg_compression_size` | Vector input policy    |

mod encode;
mod fetch;
mod filename;
mod svg;

pub use encode::{EncodeOptions, EncodeSection};
pub use fetch::FetchOptions;
pub use filename::{FilenameFormat, NameFn, default_filename};
pub use svg::{SvgCompression, SvgShortCircuit};
