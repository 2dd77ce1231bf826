use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    codecs::{ImageDecoder, ImageEncoder, PngCodec},
    config::CodecConfig,
    error::{RecolorError, Result},
};

/// Normalized file-extension token used as a registry key
///
/// Always lowercase and always starts with `.`, e.g. `.png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FormatTag(String);

impl FormatTag {
    /// Create a tag, lowercasing it and adding the leading `.` if missing
    pub fn new<S: AsRef<str>>(tag: S) -> Self {
        let lower = tag.as_ref().trim().to_lowercase();
        if lower.starts_with('.') {
            Self(lower)
        } else {
            Self(format!(".{}", lower))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FormatTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FormatTag {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<FormatTag> for String {
    fn from(tag: FormatTag) -> Self {
        tag.0
    }
}

impl Borrow<str> for FormatTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoder and encoder registered for one format tag
#[derive(Clone)]
pub struct CodecEntry {
    pub decoder: Arc<dyn ImageDecoder>,
    pub encoder: Arc<dyn ImageEncoder>,
}

impl fmt::Debug for CodecEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecEntry")
            .field("decoder", &self.decoder.format_name())
            .field("encoder", &self.encoder.format_name())
            .finish()
    }
}

/// Registry mapping file extensions to codecs
///
/// The registry is the single source of truth for which formats are
/// supported. Build it once at startup, then share it read-only (for
/// example behind an [`Arc`]) with every pipeline that needs it.
pub struct FormatRegistry {
    codecs: HashMap<FormatTag, CodecEntry>,
}

impl FormatRegistry {
    /// Create a registry with all built-in codecs using default options
    pub fn new() -> Self {
        Self::with_options(&CodecConfig::default())
    }

    /// Create a registry with all built-in codecs configured from `options`
    pub fn with_options(options: &CodecConfig) -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_codecs(options);
        registry
    }

    /// Create a registry with no codecs at all
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    fn register_builtin_codecs(&mut self, options: &CodecConfig) {
        let png = Arc::new(PngCodec::new(options.png_compression));
        self.register(".png", png.clone(), png);

        #[cfg(feature = "jpeg")]
        {
            let jpeg = Arc::new(crate::codecs::JpegCodec::with_quality(options.jpeg_quality));
            self.register(".jpg", jpeg.clone(), jpeg.clone());
            self.register(".jpeg", jpeg.clone(), jpeg);
        }
    }

    /// Register a decoder/encoder pair for a tag
    ///
    /// Registering a tag that already exists replaces the previous entry.
    pub fn register<T: Into<FormatTag>>(
        &mut self,
        tag: T,
        decoder: Arc<dyn ImageDecoder>,
        encoder: Arc<dyn ImageEncoder>,
    ) {
        let tag = tag.into();
        debug!(
            "Registering codec {} (decoder: {}, encoder: {})",
            tag,
            decoder.format_name(),
            encoder.format_name()
        );
        self.codecs.insert(tag, CodecEntry { decoder, encoder });
    }

    /// Look up the codecs for a tag
    ///
    /// The lookup is an exact string match; callers that want
    /// case-insensitive matching must lowercase the tag first.
    pub fn resolve(&self, tag: &str) -> Result<&CodecEntry> {
        self.codecs
            .get(tag)
            .ok_or_else(|| RecolorError::UnsupportedFormat {
                tag: tag.to_string(),
                supported: self.list_supported(),
            })
    }

    /// All registered tags
    pub fn list_supported(&self) -> BTreeSet<FormatTag> {
        self.codecs.keys().cloned().collect()
    }

    /// Check if a tag is registered
    pub fn is_supported(&self, tag: &str) -> bool {
        self.codecs.contains_key(tag)
    }

    /// Get the number of registered tags
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("supported", &self.list_supported())
            .finish()
    }
}
