//! Type-safe config field path.

/// A config field path (e.g. `encode.avif.quality`) attached to diagnostics.
///
/// Paths are declared as constants next to the option structs so that
/// validation messages and hints always name the real TOML key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}
