//! `<img>` discovery and eligibility.
//!
//! The document is parsed with `tl` only to find elements and their
//! `<picture>` ancestry. Each `<img>` start tag is then located by byte span
//! in the original text and its attributes re-read from the raw tag, so the
//! transform can splice replacements without reserializing the rest.

use std::ops::Range;

use crate::config::TransformOptions;
use crate::core::{SrcKind, resolve_local};
use crate::debug;
use crate::image::render::ImageSource;
use crate::utils::attrs::{Attrs, is_allowed_extension};
use crate::utils::html::{parse_attributes, start_tag_attributes, start_tag_len, unescape};

use super::{IGNORE_ATTR, TransformError};

/// An `<img>` start tag found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageElement {
    /// Byte range of the start tag in the document.
    pub span: Range<usize>,
    /// Attributes in document order, names lower-cased, entities decoded.
    pub attrs: Attrs,
    /// Has a `<picture>` ancestor.
    pub in_picture: bool,
}

impl ImageElement {
    pub fn src(&self) -> &str {
        self.attrs.get("src").map(String::as_str).unwrap_or_default()
    }
}

/// All `<img>` elements of `html`, in document order.
pub fn find_images(html: &str) -> Result<Vec<ImageElement>, TransformError> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|err| TransformError::Parse(format!("{err:?}")))?;
    let parser = dom.parser();

    let mut images = Vec::new();
    let mut stack: Vec<(tl::NodeHandle, Ancestry)> = dom
        .children()
        .iter()
        .map(|&h| (h, Ancestry::default()))
        .collect();

    while let Some((handle, ancestry)) = stack.pop() {
        let Some(tl::Node::Tag(tag)) = handle.get(parser) else {
            continue;
        };
        let name = tag.name().as_utf8_str();

        // tl parses raw text as markup; an `<img>` there is script or style text
        if ancestry.in_raw_text {
            continue;
        }

        if name.eq_ignore_ascii_case("img") {
            match locate(html, tag.raw().as_bytes()) {
                Some(element) => images.push(ImageElement {
                    in_picture: ancestry.in_picture,
                    ..element
                }),
                None => debug!("img2picture"; "cannot locate <img> in source, skipping"),
            }
        }

        let ancestry = ancestry.enter(&name);
        let children = tag.children();
        stack.extend(children.top().iter().map(|&h| (h, ancestry)));
    }

    // traversal order is not document order
    images.sort_by_key(|image| image.span.start);
    images.dedup_by_key(|image| image.span.start);
    Ok(images)
}

/// Elements whose content is text, not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "template"];

/// What lies above a node in the tree walk.
#[derive(Debug, Clone, Copy, Default)]
struct Ancestry {
    in_picture: bool,
    in_raw_text: bool,
}

impl Ancestry {
    fn enter(self, name: &str) -> Self {
        Self {
            in_picture: self.in_picture || name.eq_ignore_ascii_case("picture"),
            in_raw_text: self.in_raw_text
                || RAW_TEXT_ELEMENTS
                    .iter()
                    .any(|raw| name.eq_ignore_ascii_case(raw)),
        }
    }
}

/// Map a tag's raw bytes back to a span of `html` and read its attributes.
fn locate(html: &str, raw: &[u8]) -> Option<ImageElement> {
    let mut start = (raw.as_ptr() as usize).checked_sub(html.as_ptr() as usize)?;
    if start > 0 && !html.get(start..)?.starts_with('<') && html.get(..start)?.ends_with('<') {
        start -= 1;
    }
    let rest = html.get(start..)?;
    let len = start_tag_len(rest)?;
    let tag = &rest[..len];

    Some(ImageElement {
        span: start..start + len,
        attrs: read_attributes(start_tag_attributes(tag, "img")?),
        in_picture: false,
    })
}

/// Lower-cased names; the first of duplicate attributes wins.
fn read_attributes(text: &str) -> Attrs {
    let mut attrs = Attrs::new();
    for (name, value) in parse_attributes(text) {
        let name = name.to_ascii_lowercase();
        if !attrs.contains_key(&name) {
            attrs.insert(name, unescape(&value).into_owned());
        }
    }
    attrs
}

/// Decide whether `element` is processed and where its bytes come from.
///
/// Filters, in order: `<picture>` ancestry, ignore marker, empty `src` or
/// extension list, generated output, remote policy, extension allow-list.
pub fn source_for(element: &ImageElement, options: &TransformOptions) -> Option<ImageSource> {
    if element.in_picture {
        return None;
    }
    if element.attrs.contains_key(IGNORE_ATTR) {
        return None;
    }

    let src = element.src();
    if src.is_empty() || options.extensions.is_empty() {
        return None;
    }
    if is_generated(src, &options.url_path) {
        debug!("img2picture"; "already generated, skipped: {}", src);
        return None;
    }

    match SrcKind::parse(src) {
        SrcKind::Remote { url, path } => {
            if !options.fetch_remote {
                debug!("img2picture"; "remote image skipped (fetch_remote = false): {}", url);
                return None;
            }
            is_allowed_extension(&path, &options.extensions)
                .then(|| ImageSource::Remote(url.to_string()))
        }
        SrcKind::Local(path) => is_allowed_extension(path, &options.extensions)
            .then(|| ImageSource::Local(resolve_local(&options.input_dir, path))),
        SrcKind::ProtocolRelative(_) | SrcKind::Foreign(_) => None,
    }
}

/// `src` points into `url_path`, i.e. at one of our own outputs.
///
/// Short-circuited sources are emitted as a bare `<img>`; this keeps a
/// second pass from feeding them back to the renderer.
fn is_generated(src: &str, url_path: &str) -> bool {
    let prefix = url_path.trim_end_matches('/');
    !prefix.is_empty()
        && src
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
