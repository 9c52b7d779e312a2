//! Utility modules shared by discovery, markup synthesis and rendering.

pub mod attrs;
pub mod html;
pub mod mime;
