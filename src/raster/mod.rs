//! # Raster Data Model
//!
//! In-memory representation of decoded images: RGBA8 colors and fixed-size pixel grids.

pub mod types;

pub use types::{Color, ParseColorError, PixelBuffer};
