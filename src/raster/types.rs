use std::fmt;
use std::str::FromStr;

use image::{ImageBuffer, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An RGBA color with 8 bits per channel
///
/// Equality is exact and component-wise: two colors with the same RGB
/// values but different alpha are different colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fully transparent black
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Create a color from all four channels
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Channels in `[r, g, b, a]` order
    pub const fn channels(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::rgba(r, g, b, a)
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        color.channels()
    }
}

impl From<Rgba<u8>> for Color {
    fn from(pixel: Rgba<u8>) -> Self {
        Self::from(pixel.0)
    }
}

impl From<Color> for Rgba<u8> {
    fn from(color: Color) -> Self {
        Rgba(color.channels())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Error returned when a color string cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{input}': expected R,G,B[,A] or #RRGGBB[AA]")]
pub struct ParseColorError {
    pub input: String,
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse `R,G,B`, `R,G,B,A`, `#RRGGBB` or `#RRGGBBAA`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseColorError { input: s.to_string() };
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
                return Err(invalid());
            }
            let mut channels = [255u8; 4];
            for (i, channel) in channels.iter_mut().enumerate().take(hex.len() / 2) {
                *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
            }
            return Ok(Color::from(channels));
        }

        let parts = trimmed
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        match parts.as_slice() {
            [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
            [r, g, b, a] => Ok(Color::rgba(*r, *g, *b, *a)),
            _ => Err(invalid()),
        }
    }
}

/// A rectangular grid of RGBA8 pixels
///
/// Thin wrapper around an [`RgbaImage`]. The dimensions are fixed when the
/// buffer is constructed; pixels can be written but the grid never resizes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Create a fully transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: ImageBuffer::new(width, height),
        }
    }

    /// Create a buffer with every pixel set to `color`
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            image: ImageBuffer::from_pixel(width, height, color.into()),
        }
    }

    /// Create a buffer by evaluating `f` once per coordinate
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Color,
    {
        Self {
            image: ImageBuffer::from_fn(width, height, |x, y| f(x, y).into()),
        }
    }

    /// Create a buffer from raw row-major RGBA bytes
    ///
    /// Returns `None` unless `data.len() == width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if data.len() != expected {
            return None;
        }
        ImageBuffer::from_raw(width, height, data).map(|image| Self { image })
    }

    /// Wrap an existing image buffer
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// True when the buffer holds no pixels (zero width or zero height)
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Number of pixels in the grid
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Get the pixel at `(x, y)`, or `None` when out of range
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width() && y < self.height() {
            Some(self.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Get the pixel at `(x, y)`
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the buffer.
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        Color::from(*self.image.get_pixel(x, y))
    }

    /// Set the pixel at `(x, y)`
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the buffer.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.image.put_pixel(x, y, color.into());
    }

    /// Iterate over all pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.image.pixels().map(|p| Color::from(*p))
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Raw row-major RGBA bytes
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_colors() {
        assert_eq!("14,14,18,255".parse::<Color>().unwrap(), Color::rgba(14, 14, 18, 255));
        assert_eq!(" 1, 2 , 3 ".parse::<Color>().unwrap(), Color::rgb(1, 2, 3));
        assert_eq!("0,0,0,0".parse::<Color>().unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!("#0e0e12".parse::<Color>().unwrap(), Color::rgb(14, 14, 18));
        assert_eq!("#F4F5F580".parse::<Color>().unwrap(), Color::rgba(244, 245, 245, 128));
    }

    #[test]
    fn test_parse_rejects_malformed_colors() {
        for input in ["", "1,2", "1,2,3,4,5", "256,0,0", "#12345", "#gggggg", "red"] {
            let err = input.parse::<Color>().unwrap_err();
            assert_eq!(err.input, input);
        }
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::rgba(244, 245, 245, 255).to_string(), "rgba(244, 245, 245, 255)");
    }

    #[test]
    fn test_alpha_participates_in_equality() {
        assert_ne!(Color::rgba(14, 14, 18, 255), Color::rgba(14, 14, 18, 254));
    }

    #[test]
    fn test_buffer_dimensions_and_access() {
        let mut buffer = PixelBuffer::filled(3, 2, Color::rgb(9, 9, 9));
        assert_eq!(buffer.dimensions(), (3, 2));
        assert_eq!(buffer.pixel_count(), 6);
        assert!(!buffer.is_empty());

        buffer.put_pixel(2, 1, Color::TRANSPARENT);
        assert_eq!(buffer.get_pixel(2, 1), Color::TRANSPARENT);
        assert_eq!(buffer.pixel(0, 0), Some(Color::rgb(9, 9, 9)));
        assert_eq!(buffer.pixel(3, 0), None);
        assert_eq!(buffer.pixel(0, 2), None);
    }

    #[test]
    fn test_from_raw_requires_exact_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_some());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 15]).is_none());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 20]).is_none());
        assert!(PixelBuffer::from_raw(0, 0, Vec::new()).is_some());
    }

    #[test]
    fn test_pixels_are_row_major() {
        let buffer = PixelBuffer::from_fn(2, 2, |x, y| Color::rgb(x as u8, y as u8, 0));
        let pixels: Vec<Color> = buffer.pixels().collect();
        assert_eq!(
            pixels,
            vec![
                Color::rgb(0, 0, 0),
                Color::rgb(1, 0, 0),
                Color::rgb(0, 1, 0),
                Color::rgb(1, 1, 0),
            ]
        );
    }

    #[test]
    fn test_empty_buffers() {
        assert!(PixelBuffer::new(0, 0).is_empty());
        assert!(PixelBuffer::new(0, 7).is_empty());
        assert_eq!(PixelBuffer::new(5, 0).pixels().count(), 0);
    }
}
