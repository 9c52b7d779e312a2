//! Option loading and validation errors.
//!
//! Validation never stops at the first problem: every bad field is collected
//! into [`ConfigDiagnostics`] so one run reports them all.
//!
//! ```text
//! invalid img2picture options:
//!   width_step: must be greater than zero
//!   max_width: must be greater than min_width (1500 >= 150)
//!     hint: the width range is [min_width, max_width) ...
//! ```

use std::fmt;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use super::FieldPath;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read options file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed options TOML")]
    Parse(#[from] toml::de::Error),

    // printed in full by Display; a source() would repeat it
    #[error("{0}")]
    Invalid(ConfigDiagnostics),
}

/// One rejected option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDiagnostic {
    /// Dotted TOML key, e.g. `encode.avif.speed`.
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.as_str().cyan(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n    {} {hint}", "hint:".green())?;
        }
        Ok(())
    }
}

/// Every rejected option of one validation pass, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.errors.push(ConfigDiagnostic {
            field,
            message: message.into(),
            hint: None,
        });
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.errors.push(ConfigDiagnostic {
            field,
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    /// `Ok` when nothing was rejected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "invalid img2picture options:".red().bold())?;
        for diagnostic in &self.errors {
            write!(f, "\n  {diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_read_error_names_the_file() {
        let err = ConfigError::Read {
            path: PathBuf::from("img2picture.toml"),
            source: Error::new(ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "cannot read options file `img2picture.toml`");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_diagnostics_report_every_field() {
        let mut diag = ConfigDiagnostics::new();
        assert!(diag.clone().into_result().is_ok());

        diag.error(FieldPath::new("formats"), "at least one output format is required");
        diag.error_with_hint(
            FieldPath::new("width_step"),
            "must be greater than zero",
            "the default is 150",
        );
        assert_eq!(diag.len(), 2);
        assert_eq!(diag.errors()[1].hint.as_deref(), Some("the default is 150"));

        let text = ConfigError::Invalid(diag.clone()).to_string();
        assert!(text.contains("invalid img2picture options:"));
        assert!(text.contains("formats"));
        assert!(text.contains("must be greater than zero"));
        assert!(text.contains("the default is 150"));

        assert_eq!(diag.into_result().unwrap_err().len(), 2);
    }
}
