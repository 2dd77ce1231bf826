//! # PNG Codec
//!
//! Lossless reference format. Decoding expands palette, grayscale and
//! 16-bit images to RGBA8; encoding always writes 8-bit RGBA.

mod codec;

pub use codec::PngCodec;

use serde::{Deserialize, Serialize};

/// Format name reported by the PNG decoder and encoder
pub const FORMAT_NAME: &str = "png";

/// Compression effort used when writing PNG files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    #[default]
    Default,
    Fast,
    Best,
}

impl From<PngCompression> for png::Compression {
    fn from(value: PngCompression) -> Self {
        match value {
            PngCompression::Default => png::Compression::Default,
            PngCompression::Fast => png::Compression::Fast,
            PngCompression::Best => png::Compression::Best,
        }
    }
}
