//! Attribute map helpers.
//!
//! An [`Attrs`] map keeps attributes in document order. Setting a key that
//! already exists keeps its position, so synthesized values land where the
//! author put them.

use indexmap::IndexMap;

use super::html::escape_attr;

/// Ordered attribute map (name -> value).
pub type Attrs = IndexMap<String, String>;

/// Check if the path ends with one of the allowed extensions.
///
/// Comparison is case-insensitive. An empty `extensions` list matches nothing.
pub fn is_allowed_extension(path: &str, extensions: &[String]) -> bool {
    let path = path.to_lowercase();
    extensions
        .iter()
        .any(|ext| path.ends_with(&ext.to_lowercase()))
}

/// Render attributes as ` key="value"` pairs in map order.
///
/// - `class` with an empty value is omitted
/// - `alt` is HTML-escaped
/// - every other value is written verbatim
pub fn stringify_attributes(attrs: &Attrs) -> String {
    let mut out = String::new();
    for (key, value) in attrs {
        if key == "class" && value.is_empty() {
            continue;
        }
        let value = if key == "alt" {
            escape_attr(value)
        } else {
            value.as_str().into()
        };
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&value);
        out.push('"');
    }
    out
}

/// Shallow copy of `attrs` without the named keys. Order is preserved.
pub fn remove_properties(attrs: &Attrs, keys: &[&str]) -> Attrs {
    attrs
        .iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
