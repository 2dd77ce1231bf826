use std::io::{Read, Write};

use crate::{error::CodecError, raster::PixelBuffer};

/// Result of decoding a byte stream
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Decoded pixels, normalized to RGBA8
    pub buffer: PixelBuffer,

    /// Name of the format the bytes were decoded as (e.g. `"png"`)
    pub format_hint: String,
}

/// Capability to turn a byte stream into a [`PixelBuffer`]
///
/// Implementations must normalize whatever color model the format stores
/// into straight (non-premultiplied) RGBA with 8 bits per channel.
pub trait ImageDecoder: Send + Sync {
    /// Short lowercase name of the format this decoder reads
    fn format_name(&self) -> &str;

    /// Decode a complete image from `reader`
    ///
    /// On failure nothing visible to the caller has been produced; the
    /// partially read stream is simply dropped.
    fn decode(&self, reader: &mut dyn Read) -> Result<DecodedImage, CodecError>;
}

/// Capability to serialize a [`PixelBuffer`] into a byte sink
pub trait ImageEncoder: Send + Sync {
    /// Short lowercase name of the format this encoder writes
    fn format_name(&self) -> &str;

    /// Encode `buffer` into `writer`
    ///
    /// The sink may hold a partial stream when this returns an error; callers
    /// are responsible for discarding it.
    fn encode(&self, writer: &mut dyn Write, buffer: &PixelBuffer) -> Result<(), CodecError>;
}
