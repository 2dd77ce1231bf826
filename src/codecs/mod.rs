//! # Codec System
//!
//! Pluggable image decoders and encoders, selected by file extension through
//! the [`FormatRegistry`]. The substitution engine never sees format details:
//! every decoder yields a plain RGBA8 [`PixelBuffer`](crate::raster::PixelBuffer).
//!
//! ## Built-in Codecs
//!
//! - **PNG** (`.png`): lossless reference format
//! - **JPEG** (`.jpg`, `.jpeg`): lossy, enabled by the `jpeg` cargo feature
//!
//! ## Usage
//!
//! ```rust,no_run
//! use recolor::codecs::FormatRegistry;
//!
//! let registry = FormatRegistry::new();
//! let entry = registry.resolve(".png").unwrap();
//! println!("decoding with {}", entry.decoder.format_name());
//! ```

pub mod registry;
pub mod traits;

// Codec implementations
pub mod png;
#[cfg(feature = "jpeg")]
pub mod jpeg;

// Re-exports for convenience
pub use registry::{CodecEntry, FormatRegistry, FormatTag};
pub use traits::{DecodedImage, ImageDecoder, ImageEncoder};

// Re-export all built-in codecs
pub use self::png::{PngCodec, PngCompression};
#[cfg(feature = "jpeg")]
pub use self::jpeg::JpegCodec;
