//! # Color Substitution
//!
//! Exact-match color replacement over a full pixel grid.
//!
//! ## Usage
//!
//! ```rust
//! use recolor::raster::{Color, PixelBuffer};
//! use recolor::substitution::substitute;
//!
//! let source = PixelBuffer::filled(4, 4, Color::rgb(14, 14, 18));
//! let output = substitute(&source, Color::rgb(14, 14, 18), Color::rgb(244, 245, 245));
//! assert!(output.pixels().all(|p| p == Color::rgb(244, 245, 245)));
//! ```

pub mod engine;

pub use engine::{substitute, ColorSubstitutionEngine, SubstitutionOutput, SubstitutionRequest};
