//! # Recolor
//!
//! Replace every pixel of one exact color in a raster image and save the result.
//!
//! This library decodes an image through a codec chosen by its file extension,
//! rewrites every pixel that matches a target color on all four RGBA channels,
//! and encodes the result to a destination path, creating missing directories.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use recolor::{Color, FormatRegistry, PipelineOrchestrator};
//!
//! # fn main() -> recolor::Result<()> {
//! let registry = Arc::new(FormatRegistry::new());
//! let pipeline = PipelineOrchestrator::new(registry);
//!
//! let outcome = pipeline.run(
//!     "docs/img/4.2.png",
//!     "output/img/4.2.png",
//!     Color::rgba(14, 14, 18, 255),
//!     Color::rgba(244, 245, 245, 255),
//! )?;
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`raster`] - Colors and pixel buffers
//! - [`codecs`] - Decoder/encoder traits, built-in codecs and the format registry
//! - [`substitution`] - The exact-match color substitution engine
//! - [`pipeline`] - The orchestrator and its filesystem helpers
//! - [`config`] - Configuration management
//!
//! ## Adding a Format
//!
//! Implement [`ImageDecoder`](codecs::ImageDecoder) and
//! [`ImageEncoder`](codecs::ImageEncoder), then register them:
//!
//! ```rust,no_run
//! use std::io::{Read, Write};
//! use std::sync::Arc;
//! use recolor::codecs::{DecodedImage, FormatRegistry, ImageDecoder, ImageEncoder};
//! use recolor::error::CodecError;
//! use recolor::raster::PixelBuffer;
//!
//! struct RawCodec;
//!
//! impl ImageDecoder for RawCodec {
//!     fn format_name(&self) -> &str {
//!         "raw"
//!     }
//!
//!     fn decode(&self, reader: &mut dyn Read) -> Result<DecodedImage, CodecError> {
//!         let mut bytes = Vec::new();
//!         reader.read_to_end(&mut bytes)?;
//!         let buffer = PixelBuffer::from_raw(1, 1, bytes).ok_or_else(|| {
//!             CodecError::UnsupportedLayout { details: "expected one pixel".to_string() }
//!         })?;
//!         Ok(DecodedImage { buffer, format_hint: "raw".to_string() })
//!     }
//! }
//!
//! impl ImageEncoder for RawCodec {
//!     fn format_name(&self) -> &str {
//!         "raw"
//!     }
//!
//!     fn encode(&self, writer: &mut dyn Write, buffer: &PixelBuffer) -> Result<(), CodecError> {
//!         Ok(writer.write_all(buffer.as_raw())?)
//!     }
//! }
//!
//! let mut registry = FormatRegistry::new();
//! registry.register(".raw", Arc::new(RawCodec), Arc::new(RawCodec));
//! ```

pub mod codecs;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod raster;
pub mod substitution;

// Re-export commonly used types for convenience
pub use crate::{
    codecs::{FormatRegistry, FormatTag},
    config::Config,
    error::{RecolorError, Result},
    pipeline::{PipelineOrchestrator, RecolorOutcome},
    raster::{Color, PixelBuffer},
    substitution::{substitute, ColorSubstitutionEngine, SubstitutionRequest},
};
