use std::io::{Read, Write};

use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::{ColorType, DynamicImage, Rgb, RgbImage};

use crate::{
    codecs::{DecodedImage, ImageDecoder, ImageEncoder},
    error::CodecError,
    raster::PixelBuffer,
};

use super::{DEFAULT_QUALITY, FORMAT_NAME};

/// JPEG decoder and encoder built on the `image` crate
#[derive(Debug, Clone, Copy)]
pub struct JpegCodec {
    quality: u8,
}

impl JpegCodec {
    /// Create a codec encoding at `quality`, clamped to 1..=100
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self::with_quality(DEFAULT_QUALITY)
    }
}

impl ImageDecoder for JpegCodec {
    fn format_name(&self) -> &str {
        FORMAT_NAME
    }

    fn decode(&self, reader: &mut dyn Read) -> Result<DecodedImage, CodecError> {
        let decoder = JpegDecoder::new(reader)?;
        let image = DynamicImage::from_decoder(decoder)?;

        Ok(DecodedImage {
            buffer: PixelBuffer::from_image(image.to_rgba8()),
            format_hint: FORMAT_NAME.to_string(),
        })
    }
}

impl ImageEncoder for JpegCodec {
    fn format_name(&self) -> &str {
        FORMAT_NAME
    }

    fn encode(&self, mut writer: &mut dyn Write, buffer: &PixelBuffer) -> Result<(), CodecError> {
        let source = buffer.as_image();
        let rgb = RgbImage::from_fn(buffer.width(), buffer.height(), |x, y| {
            let [r, g, b, _] = source.get_pixel(x, y).0;
            Rgb([r, g, b])
        });

        let mut encoder = JpegEncoder::new_with_quality(&mut writer, self.quality);
        encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Color;

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(JpegCodec::with_quality(0).quality(), 1);
        assert_eq!(JpegCodec::with_quality(250).quality(), 100);
        assert_eq!(JpegCodec::default().quality(), DEFAULT_QUALITY);
    }

    #[test]
    fn test_encode_then_decode_keeps_dimensions_and_drops_alpha() {
        let codec = JpegCodec::with_quality(100);
        let buffer = PixelBuffer::filled(16, 8, Color::rgba(200, 40, 40, 10));

        let mut bytes = Vec::new();
        codec.encode(&mut bytes, &buffer).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = codec.decode(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded.format_hint, "jpeg");
        assert_eq!(decoded.buffer.dimensions(), (16, 8));
        assert!(decoded.buffer.pixels().all(|p| p.a == 255));

        let center = decoded.buffer.get_pixel(8, 4);
        assert!(center.r > 150 && center.g < 90 && center.b < 90, "got {}", center);
    }

    #[test]
    fn test_garbage_input_fails() {
        let err = JpegCodec::default()
            .decode(&mut &b"GIF89a not a jpeg"[..])
            .unwrap_err();
        assert!(matches!(err, CodecError::Image(_)));
    }
}
