//! img2picture - responsive `<picture>` markup for generated HTML.
//!
//! Rewrites `<img>` elements of a built page into `<picture>` elements with
//! one `<source>` per output format, generating the resized variants on the
//! way.
//!
//! ```no_run
//! use img2picture::{Img2Picture, TransformOptions};
//!
//! let options = TransformOptions::from_path("img2picture.toml")?;
//! let transformer = Img2Picture::new(options)?;
//!
//! let html = std::fs::read_to_string("_site/index.html")?;
//! let html = transformer.transform(&html, "_site/index.html")?;
//! std::fs::write("_site/index.html", html)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod freshness;
pub mod image;
pub mod logger;
pub mod pipeline;
pub mod utils;

pub use crate::config::{
    ConfigError, EncodeOptions, FilenameFormat, SvgCompression, SvgShortCircuit, TransformOptions,
};
pub use crate::core::ImageFormat;
pub use crate::image::render::{
    FileRenderer, ImageRenderer, ImageSource, RenderError, RenderRequest, RenderResult, Variant,
};
pub use crate::image::widths::WidthError;
pub use crate::logger::set_verbose;
pub use crate::pipeline::{Img2Picture, TransformError};
