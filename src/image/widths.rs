//! Width ladder planning.
//!
//! A ladder is either stepped from the configured range or read from an
//! element's `data-img2picture-widths` override.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidthError {
    #[error("width step must be greater than zero")]
    ZeroStep,

    #[error("width range [{min}, {max}) is empty")]
    EmptyRange { min: u32, max: u32 },

    #[error("invalid width `{token}` in override list")]
    Invalid { token: String },
}

/// Widths `min, min + step, ...` strictly below `max`.
pub fn generate_widths(min: u32, max: u32, step: u32) -> Result<Vec<u32>, WidthError> {
    if step == 0 {
        return Err(WidthError::ZeroStep);
    }
    if min == 0 || min >= max {
        return Err(WidthError::EmptyRange { min, max });
    }
    Ok((min..max).step_by(step as usize).collect())
}

/// Parse a comma-separated override such as `"100, 150,200"`.
///
/// Values are used as given: no sorting and no clamping to the configured
/// range. Empty, zero or non-numeric tokens are rejected.
pub fn parse_width_list(list: &str) -> Result<Vec<u32>, WidthError> {
    list.split(',')
        .map(str::trim)
        .map(|token| match token.parse::<u32>() {
            Ok(width) if width > 0 => Ok(width),
            _ => Err(WidthError::Invalid {
                token: token.to_string(),
            }),
        })
        .collect()
}
