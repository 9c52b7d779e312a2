//! Image processing.
//!
//! # Modules
//!
//! | Module   | Purpose                                                 |
//! |----------|---------------------------------------------------------|
//! | `render` | `ImageRenderer` seam and the file-writing renderer      |
//! | `svg`    | SVG parsing and rasterization                           |
//! | `widths` | Width ladders and `data-img2picture-widths` parsing     |

pub mod render;
pub mod svg;
pub mod widths;
