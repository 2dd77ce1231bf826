use std::io::{Read, Write};

use png::{BitDepth, ColorType, Transformations};

use crate::{
    codecs::{DecodedImage, ImageDecoder, ImageEncoder},
    error::CodecError,
    raster::PixelBuffer,
};

use super::{PngCompression, FORMAT_NAME};

/// PNG decoder and encoder built on the `png` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec {
    compression: PngCompression,
}

impl PngCodec {
    pub fn new(compression: PngCompression) -> Self {
        Self { compression }
    }

    pub fn compression(&self) -> PngCompression {
        self.compression
    }
}

/// Expand 8-bit samples of any non-indexed color type to RGBA
fn expand_to_rgba(color_type: ColorType, samples: &[u8]) -> Result<Vec<u8>, CodecError> {
    let rgba = match color_type {
        ColorType::Rgba => samples.to_vec(),
        ColorType::Rgb => samples
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        ColorType::GrayscaleAlpha => samples
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        ColorType::Grayscale => samples.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        ColorType::Indexed => {
            return Err(CodecError::UnsupportedLayout {
                details: "indexed PNG was not expanded to RGB".to_string(),
            })
        }
    };
    Ok(rgba)
}

impl ImageDecoder for PngCodec {
    fn format_name(&self) -> &str {
        FORMAT_NAME
    }

    fn decode(&self, reader: &mut dyn Read) -> Result<DecodedImage, CodecError> {
        let mut decoder = png::Decoder::new(reader);
        // Palette, tRNS and sub-byte depths become plain 8-bit samples
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

        let mut png_reader = decoder.read_info()?;
        let mut samples = vec![0; png_reader.output_buffer_size()];
        let frame = png_reader.next_frame(&mut samples)?;
        samples.truncate(frame.buffer_size());

        if frame.bit_depth != BitDepth::Eight {
            return Err(CodecError::UnsupportedLayout {
                details: format!("unexpected {:?} bit depth after expansion", frame.bit_depth),
            });
        }

        let rgba = expand_to_rgba(frame.color_type, &samples)?;
        let buffer = PixelBuffer::from_raw(frame.width, frame.height, rgba).ok_or_else(|| {
            CodecError::UnsupportedLayout {
                details: format!(
                    "{:?} frame data does not fill {}x{}",
                    frame.color_type, frame.width, frame.height
                ),
            }
        })?;

        Ok(DecodedImage {
            buffer,
            format_hint: FORMAT_NAME.to_string(),
        })
    }
}

impl ImageEncoder for PngCodec {
    fn format_name(&self) -> &str {
        FORMAT_NAME
    }

    fn encode(&self, writer: &mut dyn Write, buffer: &PixelBuffer) -> Result<(), CodecError> {
        if buffer.is_empty() {
            return Err(CodecError::UnsupportedLayout {
                details: format!(
                    "PNG cannot store a {}x{} image",
                    buffer.width(),
                    buffer.height()
                ),
            });
        }

        let mut encoder = png::Encoder::new(writer, buffer.width(), buffer.height());
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(self.compression.into());

        let mut png_writer = encoder.write_header()?;
        png_writer.write_image_data(buffer.as_raw())?;
        png_writer.finish()?;
        Ok(())
    }
}
