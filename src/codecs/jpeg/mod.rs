//! # JPEG Codec
//!
//! Lossy format backed by the `image` crate. JPEG has no alpha channel, so
//! encoding drops alpha and decoding always yields opaque pixels.

mod codec;

pub use codec::JpegCodec;

/// Format name reported by the JPEG decoder and encoder
pub const FORMAT_NAME: &str = "jpeg";

/// Quality used when none is configured
pub const DEFAULT_QUALITY: u8 = 90;
