//! Image source classification.
//!
//! Decides whether an `<img src>` points at a remote http(s) resource or a
//! local file under the input directory.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Check if `src` is an absolute `http:` or `https:` URL.
///
/// Relative and site-root paths fail to parse and yield `false`.
pub fn is_remote_url(src: &str) -> bool {
    url::Url::parse(src)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Path component of an absolute URL, query string and fragment stripped.
///
/// Returns `None` if `src` is not an absolute URL.
pub fn path_from_url(src: &str) -> Option<String> {
    url::Url::parse(src).ok().map(|url| url.path().to_string())
}

/// Syntactic classification of an image `src`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SrcKind<'a> {
    /// Absolute http(s) URL, with its path component.
    Remote { url: &'a str, path: String },
    /// Scheme-relative reference (`//host/x.png`); neither fetchable nor local.
    ProtocolRelative(&'a str),
    /// Absolute URL with a non-http scheme (`data:`, `ftp:`, ...).
    Foreign(&'a str),
    /// Local path, resolved against the input directory.
    Local(&'a str),
}

impl<'a> SrcKind<'a> {
    /// Parse a `src` value into its kind.
    pub fn parse(src: &'a str) -> Self {
        if src.starts_with("//") {
            return Self::ProtocolRelative(src);
        }
        match path_from_url(src) {
            Some(path) if is_remote_url(src) => Self::Remote { url: src, path },
            Some(_) => Self::Foreign(src),
            None => Self::Local(src),
        }
    }
}

/// Resolve a local `src` against the input directory.
///
/// Leading slashes are dropped (site-root paths live under `input_dir`)
/// and percent-encoding is decoded.
pub fn resolve_local(input_dir: &Path, src: &str) -> PathBuf {
    let decoded = percent_decode_str(src)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| src.to_string());
    input_dir.join(decoded.trim_start_matches('/'))
}

/// Public URL of a generated file: `url_path` joined to `filename` with `/`.
pub fn url_for_filename(url_path: &str, filename: &str) -> String {
    if url_path.is_empty() {
        return filename.to_string();
    }
    format!("{}/{}", url_path.trim_end_matches('/'), filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote_url() {
        assert!(is_remote_url("https://example.com"));
        assert!(is_remote_url("https://example.com/x.png"));
        assert!(is_remote_url("http://example.com/image.jpeg"));
    }

    #[test]
    fn test_is_not_remote_url() {
        assert!(!is_remote_url("/local/x.png"));
        assert!(!is_remote_url("images/x.png"));
        assert!(!is_remote_url("ftp://example.com/x"));
        assert!(!is_remote_url("//example.com/image.jpeg"));
        assert!(!is_remote_url("ssh://example.com/image.jpeg"));
        assert!(!is_remote_url(""));
    }

    #[test]
    fn test_path_from_url_strips_query() {
        assert_eq!(
            path_from_url("https://example.com/a/shapes.png?v=12345").as_deref(),
            Some("/a/shapes.png")
        );
        assert_eq!(
            path_from_url("https://example.com/x.jpg#top").as_deref(),
            Some("/x.jpg")
        );
        assert_eq!(path_from_url("/local/x.png"), None);
    }

    #[test]
    fn test_src_kind() {
        assert_eq!(SrcKind::parse("/a.png"), SrcKind::Local("/a.png"));
        assert_eq!(
            SrcKind::parse("//cdn.example.com/a.png"),
            SrcKind::ProtocolRelative("//cdn.example.com/a.png")
        );
        assert_eq!(
            SrcKind::parse("https://example.com/a.png?x=1"),
            SrcKind::Remote {
                url: "https://example.com/a.png?x=1",
                path: "/a.png".to_string()
            }
        );
        assert_eq!(
            SrcKind::parse("ftp://host/a.png"),
            SrcKind::Foreign("ftp://host/a.png")
        );
        assert_eq!(
            SrcKind::parse("data:image/png;base64,AAAA"),
            SrcKind::Foreign("data:image/png;base64,AAAA")
        );
    }

    #[test]
    fn test_resolve_local() {
        let root = Path::new("content");
        assert_eq!(
            resolve_local(root, "/images/a.png"),
            PathBuf::from("content/images/a.png")
        );
        assert_eq!(
            resolve_local(root, "images/my%20photo.jpg"),
            PathBuf::from("content/images/my photo.jpg")
        );
    }

    #[test]
    fn test_url_for_filename() {
        assert_eq!(url_for_filename("", "a-150w.webp"), "a-150w.webp");
        assert_eq!(url_for_filename("/images/", "a-150w.webp"), "/images/a-150w.webp");
        assert_eq!(url_for_filename("/images", "a-150w.webp"), "/images/a-150w.webp");
    }
}
