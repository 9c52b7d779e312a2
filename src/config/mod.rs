//! Transform configuration (`img2picture.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Nested option sections
//! │   ├── encode     # [encode.avif|webp|jpeg|png]
//! │   ├── fetch      # [fetch]
//! │   ├── filename   # Variant naming function
//! │   └── svg        # svg_short_circuit policy, svg_compression_size
//! ├── types/         # ConfigError, diagnostics, field paths
//! └── mod.rs         # TransformOptions (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! input_dir = "content"
//! output_dir = "_site/images"
//! url_path = "/images"
//! formats = ["avif", "webp", "jpeg"]
//! sizes = "(max-width: 60rem) 90vw, 60rem"
//! min_width = 150
//! max_width = 1500
//! width_step = 150
//! picture_class = "responsive"
//!
//! [encode.avif]
//! quality = 60
//! ```

pub mod section;
pub mod types;

pub use section::{
    EncodeOptions, EncodeSection, FetchOptions, FilenameFormat, NameFn, SvgCompression,
    SvgShortCircuit, default_filename,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::core::ImageFormat;
use crate::log;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// field paths
// ============================================================================

mod fields {
    use super::FieldPath;

    pub const FORMATS: FieldPath = FieldPath::new("formats");
    pub const MIN_WIDTH: FieldPath = FieldPath::new("min_width");
    pub const MAX_WIDTH: FieldPath = FieldPath::new("max_width");
    pub const WIDTH_STEP: FieldPath = FieldPath::new("width_step");
}

// ============================================================================
// root configuration
// ============================================================================

/// Options for one [`Img2Picture`](crate::Img2Picture) instance.
///
/// Every field has a default; values read from TOML are merged over them.
/// The value is immutable once handed to the transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Root that local `src` paths are resolved against.
    pub input_dir: PathBuf,

    /// Directory generated variants are written to.
    pub output_dir: PathBuf,

    /// Public URL prefix of `output_dir`.
    pub url_path: String,

    /// Source extensions eligible for processing (case-insensitive).
    pub extensions: Vec<String>,

    /// Output formats, most preferred first. The last present one is the fallback.
    pub formats: Vec<ImageFormat>,

    /// Default `sizes` attribute.
    pub sizes: String,

    /// Width ladder `[min_width, max_width)` stepped by `width_step`.
    pub min_width: u32,
    pub max_width: u32,
    pub width_step: u32,

    /// Download and process absolute http(s) sources.
    pub fetch_remote: bool,

    /// Compute variant metadata without writing any file.
    pub dry_run: bool,

    /// Move the `<img>` class onto the `<picture>` wrapper.
    pub hoist_img_class: bool,

    /// Default class of the `<picture>` wrapper.
    pub picture_class: Option<String>,

    pub svg_short_circuit: SvgShortCircuit,

    /// Compression the `"size"` policy measures SVGs under (`"br"`).
    pub svg_compression_size: Option<SvgCompression>,

    pub encode: EncodeSection,

    pub fetch: FetchOptions,

    #[serde(skip)]
    pub filename_format: FilenameFormat,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            output_dir: PathBuf::from("_site"),
            url_path: String::new(),
            extensions: ["jpg", "png", "jpeg", "svg"].map(String::from).to_vec(),
            formats: vec![
                ImageFormat::Avif,
                ImageFormat::Webp,
                ImageFormat::Svg,
                ImageFormat::Jpeg,
            ],
            sizes: "100vw".to_string(),
            min_width: 150,
            max_width: 1500,
            width_step: 150,
            fetch_remote: false,
            dry_run: false,
            hoist_img_class: true,
            picture_class: None,
            svg_short_circuit: SvgShortCircuit::default(),
            svg_compression_size: None,
            encode: EncodeSection::default(),
            fetch: FetchOptions::default(),
            filename_format: FilenameFormat::default(),
        }
    }
}

impl TransformOptions {
    /// Replace the variant naming function.
    pub fn with_filename_format<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, u32, ImageFormat) -> String + Send + Sync + 'static,
    {
        self.filename_format = FilenameFormat::new(f);
        self
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, None);
        }
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, Some(path));
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: Option<&Path>) {
        match path {
            Some(path) => log!("warning"; "unknown fields in {}, ignoring:", path.display()),
            None => log!("warning"; "unknown config fields, ignoring:"),
        }
        for field in fields {
            log!("warning"; "- {}", field);
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the options.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.validate_formats(&mut diag);
        self.validate_width_range(&mut diag);
        self.encode.validate(&mut diag);

        diag.into_result().map_err(ConfigError::Invalid)
    }

    fn validate_formats(&self, diag: &mut ConfigDiagnostics) {
        if self.formats.is_empty() {
            diag.error_with_hint(
                fields::FORMATS,
                "at least one output format is required",
                "e.g. formats = [\"avif\", \"webp\", \"jpeg\"]",
            );
            return;
        }

        for (i, format) in self.formats.iter().enumerate() {
            if self.formats[..i].contains(format) {
                diag.error(fields::FORMATS, format!("`{format}` is listed more than once"));
            }
        }
    }

    fn validate_width_range(&self, diag: &mut ConfigDiagnostics) {
        if self.width_step == 0 {
            diag.error(fields::WIDTH_STEP, "must be greater than zero");
        }
        if self.min_width == 0 {
            diag.error(fields::MIN_WIDTH, "must be greater than zero");
        }
        if self.min_width >= self.max_width {
            diag.error_with_hint(
                fields::MAX_WIDTH,
                format!(
                    "must be greater than min_width ({} >= {})",
                    self.min_width, self.max_width
                ),
                "the width range is [min_width, max_width), max_width itself is never generated",
            );
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse options from TOML.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_options(content: &str) -> TransformOptions {
    let (parsed, ignored) = TransformOptions::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
