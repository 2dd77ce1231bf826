use tracing::debug;

use crate::raster::{Color, PixelBuffer};

/// The color pair driving one substitution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionRequest {
    /// Color to look for
    pub target: Color,

    /// Color written wherever `target` is found
    pub replacement: Color,
}

impl SubstitutionRequest {
    pub fn new(target: Color, replacement: Color) -> Self {
        Self { target, replacement }
    }

    /// True when applying the request can never change a pixel
    pub fn is_noop(&self) -> bool {
        self.target == self.replacement
    }
}

/// Result of a substitution pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionOutput {
    /// The rewritten pixels, same dimensions as the source
    pub buffer: PixelBuffer,

    /// Number of pixels that matched the target
    pub replaced: u64,
}

/// Replaces every pixel exactly equal to a target color
///
/// The engine is format-agnostic: it only sees decoded RGBA8 buffers.
/// Each output pixel depends solely on the source pixel at the same
/// coordinate, so the pass is a plain per-pixel map.
#[derive(Debug, Clone, Copy)]
pub struct ColorSubstitutionEngine {
    request: SubstitutionRequest,
}

impl ColorSubstitutionEngine {
    pub fn new(request: SubstitutionRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> SubstitutionRequest {
        self.request
    }

    /// Build a new buffer with every match replaced
    ///
    /// The source is only read. Zero-sized sources yield zero-sized outputs.
    pub fn apply(&self, source: &PixelBuffer) -> SubstitutionOutput {
        let SubstitutionRequest { target, replacement } = self.request;
        let mut replaced = 0u64;

        let buffer = PixelBuffer::from_fn(source.width(), source.height(), |x, y| {
            let pixel = source.get_pixel(x, y);
            if pixel == target {
                replaced += 1;
                replacement
            } else {
                pixel
            }
        });

        debug!(
            "Substituted {} of {} pixels ({} -> {})",
            replaced,
            source.pixel_count(),
            target,
            replacement
        );

        SubstitutionOutput { buffer, replaced }
    }
}

/// Replace every pixel equal to `target` with `replacement`
pub fn substitute(source: &PixelBuffer, target: Color, replacement: Color) -> PixelBuffer {
    ColorSubstitutionEngine::new(SubstitutionRequest::new(target, replacement))
        .apply(source)
        .buffer
}
