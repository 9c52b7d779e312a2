//! `<picture>` markup synthesis.
//!
//! Builds the replacement for one `<img>` from its original attributes and
//! the renderer's variants. Markup goes through a small [`Tag`] model so
//! attribute escaping lives in one place ([`stringify_attributes`]).
//!
//! ```text
//! <picture class="...">
//!   <source type="image/avif" srcset="a-150w.avif 150w, ..." sizes="...">
//!   ...one <source> per configured format...
//!   <img src="<median fallback>" width="<largest>" height="<largest>" ... alt sizes loading decoding>
//! </picture>
//! ```

use crate::config::TransformOptions;
use crate::core::ImageFormat;
use crate::image::render::{RenderResult, Variant};
use crate::log;
use crate::utils::attrs::{Attrs, remove_properties, stringify_attributes};

use super::{IGNORE_ATTR, PICTURE_CLASS_ATTR, TransformError, WIDTHS_ATTR};

const VOID_ELEMENTS: &[&str] = &["img", "source"];

/// Dropped from the emitted `<img>`; `width`/`height` are re-synthesized.
const CLEANED: &[&str] = &[
    IGNORE_ATTR,
    WIDTHS_ATTR,
    PICTURE_CLASS_ATTR,
    "src",
    "width",
    "height",
];

// =============================================================================
// Tag model
// =============================================================================

/// An element with ordered attributes and child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: &'static str,
    attrs: Attrs,
    children: Vec<Tag>,
}

impl Tag {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Attrs::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute. An existing key keeps its position.
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    /// Append attributes in iteration order.
    pub fn attrs(mut self, attrs: Attrs) -> Self {
        for (key, value) in attrs {
            self.attrs.insert(key, value);
        }
        self
    }

    pub fn child(mut self, child: Tag) -> Self {
        self.children.push(child);
        self
    }

    /// Serialize without whitespace between elements.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.name);
        out.push_str(&stringify_attributes(&self.attrs));
        out.push('>');
        if VOID_ELEMENTS.contains(&self.name) {
            return;
        }
        for child in &self.children {
            child.render_into(out);
        }
        out.push_str("</");
        out.push_str(self.name);
        out.push('>');
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Build the markup replacing an `<img>` with attributes `attrs`.
///
/// Fails when the result contains none of the configured formats.
pub fn build_markup(
    attrs: &Attrs,
    result: &RenderResult,
    options: &TransformOptions,
) -> Result<String, TransformError> {
    let tag = match result {
        RenderResult::ShortCircuit(variant) => short_circuit_img(attrs, variant),
        RenderResult::Formats(_) => picture(attrs, result, options)?,
    };
    Ok(tag.render())
}

fn src_of(attrs: &Attrs) -> &str {
    attrs.get("src").map(String::as_str).unwrap_or_default()
}

/// Variants of `format`, if the renderer produced any.
fn variants_of(result: &RenderResult, format: ImageFormat) -> Option<&[Variant]> {
    match result {
        RenderResult::Formats(formats) => formats
            .get(&format)
            .map(Vec::as_slice)
            .filter(|v| !v.is_empty()),
        RenderResult::ShortCircuit(_) => None,
    }
}

fn picture(
    attrs: &Attrs,
    result: &RenderResult,
    options: &TransformOptions,
) -> Result<Tag, TransformError> {
    // Last configured format the renderer produced.
    let fallback = options
        .formats
        .iter()
        .rev()
        .find_map(|&format| variants_of(result, format))
        .ok_or_else(|| TransformError::Contract {
            src: src_of(attrs).to_string(),
            message: "render result contains none of the configured formats".to_string(),
        })?;

    let sizes = non_empty(attrs, "sizes").unwrap_or(&options.sizes);

    let mut picture = Tag::new("picture").attr("class", picture_class(attrs, options));
    for &format in &options.formats {
        let Some(variants) = variants_of(result, format) else {
            continue;
        };
        picture = picture.child(source(variants, sizes));
    }

    // median variant as src, largest one for the intrinsic size
    let representative = &fallback[fallback.len() / 2];
    let largest = &fallback[fallback.len() - 1];

    let mut hidden = CLEANED.to_vec();
    if options.hoist_img_class {
        hidden.push("class");
    }

    let img = Tag::new("img")
        .attr("src", &representative.url)
        .attr("width", largest.width.to_string())
        .attr("height", largest.height.to_string())
        .attrs(remove_properties(attrs, &hidden))
        .attr("alt", alt_of(attrs))
        .attr("sizes", sizes.as_str())
        .attr("loading", attr_or(attrs, "loading", "lazy"))
        .attr("decoding", attr_or(attrs, "decoding", "async"));

    Ok(picture.child(img))
}

fn source(variants: &[Variant], sizes: &str) -> Tag {
    let srcset = variants
        .iter()
        .map(|v| format!("{} {}w", v.url, v.width))
        .collect::<Vec<_>>()
        .join(", ");

    Tag::new("source")
        .attr("type", &variants[0].source_type)
        .attr("srcset", srcset)
        .attr("sizes", sizes)
}

/// Plain `<img>` for a single asset; the class stays on it.
fn short_circuit_img(attrs: &Attrs, variant: &Variant) -> Tag {
    Tag::new("img")
        .attr("src", &variant.url)
        .attr("width", variant.width.to_string())
        .attr("height", variant.height.to_string())
        .attrs(remove_properties(attrs, CLEANED))
        .attr("alt", alt_of(attrs))
        .attr("loading", attr_or(attrs, "loading", "lazy"))
        .attr("decoding", attr_or(attrs, "decoding", "async"))
}

/// Marker class, else configured class, then the hoisted `<img>` class.
fn picture_class(attrs: &Attrs, options: &TransformOptions) -> String {
    let base = attrs
        .get(PICTURE_CLASS_ATTR)
        .or(options.picture_class.as_ref())
        .map(String::as_str)
        .unwrap_or_default();

    match attrs.get("class") {
        Some(class) if options.hoist_img_class => format!("{base} {class}").trim().to_string(),
        _ => base.trim().to_string(),
    }
}

fn alt_of(attrs: &Attrs) -> String {
    match attrs.get("alt") {
        Some(alt) => alt.clone(),
        None => {
            log!("warning"; "missing alt on <img src=\"{}\">", src_of(attrs));
            String::new()
        }
    }
}

/// An empty value counts as absent.
fn non_empty<'a>(attrs: &'a Attrs, key: &str) -> Option<&'a String> {
    attrs.get(key).filter(|value| !value.is_empty())
}

fn attr_or(attrs: &Attrs, key: &str, default: &str) -> String {
    non_empty(attrs, key)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}
