//! HTML utility functions.
//!
//! Provides the low-level HTML text helpers used by discovery and markup
//! synthesis:
//! - `escape_attr()` - HTML entity escaping for attribute values
//! - `unescape()` - entity decoding for attribute values read from source
//! - `parse_attributes()` - order-preserving HTML attribute string parsing
//! - `start_tag_attributes()` - attribute text of a raw start tag
//! - `start_tag_len()` - byte length of a start tag, quotes respected

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML attribute values.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape_attr("a \"b\""), "a &quot;b&quot;");
/// assert_eq!(escape_attr("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Unescape HTML entities back to characters.
///
/// Handles common named entities and numeric character references.
/// Unknown entities are kept as written.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }

        // Collect entity
        let mut entity = String::new();
        let mut terminated = false;
        while let Some(&next) = chars.peek() {
            if next == ';' {
                chars.next();
                terminated = true;
                break;
            }
            if next == '&' || next.is_whitespace() || entity.len() > 10 {
                break;
            }
            entity.push(next);
            chars.next();
        }

        if !terminated {
            result.push('&');
            result.push_str(&entity);
            continue;
        }

        match decode_entity(&entity) {
            Some(decoded) => result.push(decoded),
            None => {
                result.push('&');
                result.push_str(&entity);
                result.push(';');
            }
        }
    }

    Cow::Owned(result)
}

/// Decode a single entity body (without `&` and `;`).
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s => {
            let num = s.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse().ok(),
            };
            code.and_then(char::from_u32)
        }
    }
}

// =============================================================================
// Attribute Parsing
// =============================================================================

/// Return the attribute portion of a raw start tag.
///
/// Input: `<img src="a.png" alt="A" />`
/// Output: `src="a.png" alt="A"`
///
/// Returns `None` if `raw` is not a start tag named `tag`.
pub fn start_tag_attributes<'a>(raw: &'a str, tag: &str) -> Option<&'a str> {
    let rest = raw.strip_prefix('<')?;
    let name = rest.get(..tag.len())?;
    if !name.eq_ignore_ascii_case(tag) {
        return None;
    }
    let rest = &rest[tag.len()..];
    // The name must end here (`<imgx` is not `<img`)
    if rest.chars().next().is_some_and(|c| !c.is_whitespace() && c != '>' && c != '/') {
        return None;
    }
    let rest = rest.strip_suffix('>').unwrap_or(rest);
    let rest = rest.trim_end();
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    Some(rest.trim())
}

/// Byte length of the start tag at the beginning of `s`, up to and including
/// the first `>` outside a quoted attribute value.
///
/// Returns `None` if `s` does not start with `<` or the tag is unterminated.
pub fn start_tag_len(s: &str) -> Option<usize> {
    if !s.starts_with('<') {
        return None;
    }
    let mut quote = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Parse HTML-style attributes from a string.
///
/// Attributes are returned in source order. Values are returned as written
/// (entities are not decoded).
///
/// Input: `viewBox="0 0 100 100" class="foo" disabled`
/// Output: `vec![("viewBox", "0 0 100 100"), ("class", "foo"), ("disabled", "")]`
pub fn parse_attributes(s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        // Stray slashes (`<img a="1" / b="2">`) carry no attribute
        if c.is_whitespace() || c == '/' {
            continue;
        }

        // Read attribute name
        let mut name = String::new();
        name.push(c);
        while let Some(next) = chars.next_if(|&n| n != '=' && !n.is_whitespace()) {
            name.push(next);
        }

        // Skip whitespace
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        // Check for value
        if chars.next_if_eq(&'=').is_none() {
            // Boolean attribute (no value)
            attrs.push((name, String::new()));
            continue;
        }

        // Skip whitespace
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        // Read value
        let value = match chars.next_if(|&c| c == '"' || c == '\'') {
            Some(quote) => {
                let mut val = String::new();
                for c in chars.by_ref() {
                    if c == quote {
                        break;
                    }
                    val.push(c);
                }
                val
            }
            None => {
                // Unquoted value (read until whitespace)
                let mut val = String::new();
                while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                    val.push(c);
                }
                val
            }
        };

        attrs.push((name, value));
    }

    attrs
}

// =============================================================================
// Tests
// =============================================================================
