use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    codecs::{CodecEntry, FormatRegistry, FormatTag},
    config::PipelineConfig,
    error::{RecolorError, Result},
    pipeline::fs::{ensure_output_dir, extract_extension, output_dir_of, write_output},
    raster::{Color, PixelBuffer},
    substitution::{ColorSubstitutionEngine, SubstitutionOutput, SubstitutionRequest},
};

/// A decoded and recolored image that has not been written anywhere
#[derive(Debug, Clone)]
pub struct RecolorImage {
    /// The rewritten pixels
    pub buffer: PixelBuffer,

    /// Number of pixels that were replaced
    pub replaced: u64,

    /// Registry key the source was decoded with
    pub tag: FormatTag,

    /// Format reported by the decoder
    pub format_hint: String,

    /// Codecs resolved for the source; the encoder writes the output
    pub codec: CodecEntry,
}

/// Summary of a successful [`PipelineOrchestrator::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecolorOutcome {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub replaced: u64,

    /// Whether the output directory had to be created
    pub created_dirs: bool,
}

impl fmt::Display for RecolorOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image processing complete and saved to {}", self.output_path.display())
    }
}

/// Runs the recolor pipeline for one image at a time
///
/// The pipeline is strictly sequential and stops at the first failure:
/// 1. Open the source file
/// 2. Extract its extension
/// 3. Resolve the codec from the registry
/// 4. Decode
/// 5. Substitute the color
/// 6. Ensure the output directory exists
/// 7. Create the destination file
/// 8. Encode into it
///
/// The registry is shared read-only, so several orchestrators (or threads
/// sharing one) can run at the same time.
pub struct PipelineOrchestrator {
    registry: Arc<FormatRegistry>,
    options: PipelineConfig,
}

impl PipelineOrchestrator {
    /// Create an orchestrator with default pipeline options
    pub fn new(registry: Arc<FormatRegistry>) -> Self {
        Self::with_options(registry, PipelineConfig::default())
    }

    pub fn with_options(registry: Arc<FormatRegistry>, options: PipelineConfig) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn options(&self) -> PipelineConfig {
        self.options
    }

    /// Recolor `source` and save the result to `output`
    ///
    /// The output is encoded with the codec resolved from the *source*
    /// extension.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source: P,
        output: Q,
        target: Color,
        replacement: Color,
    ) -> Result<RecolorOutcome> {
        let source = source.as_ref();
        let output = output.as_ref();

        info!("Recoloring {:?} -> {:?}", source, output);

        let request = SubstitutionRequest::new(target, replacement);
        let image = self.decode_and_substitute(source, request)?;
        self.check_output_extension(output, &image.tag);

        // Step 6: output directory
        let created_dirs = ensure_output_dir(output_dir_of(output))?;

        // Steps 7-8: destination file and encoding
        write_output(output, self.options.atomic_write, |writer| {
            image.codec.encoder.encode(writer, &image.buffer)
        })?;

        let outcome = RecolorOutcome {
            output_path: output.to_path_buf(),
            width: image.buffer.width(),
            height: image.buffer.height(),
            replaced: image.replaced,
            created_dirs,
        };
        info!("{}", outcome);
        Ok(outcome)
    }

    /// Decode `source` and substitute the color without writing anything
    pub fn recolor<P: AsRef<Path>>(
        &self,
        source: P,
        target: Color,
        replacement: Color,
    ) -> Result<RecolorImage> {
        let request = SubstitutionRequest::new(target, replacement);
        self.decode_and_substitute(source.as_ref(), request)
    }

    fn decode_and_substitute(
        &self,
        source: &Path,
        request: SubstitutionRequest,
    ) -> Result<RecolorImage> {
        let path = source.display().to_string();

        // Step 1: open source
        let file = File::open(source).map_err(|e| RecolorError::SourceOpenFailed {
            path: path.clone(),
            source: e,
        })?;

        // Steps 2-3: extension and codec
        let (tag, codec) = self.resolve_codec(source)?;
        debug!(
            "Resolved {} to decoder '{}' and encoder '{}'",
            tag,
            codec.decoder.format_name(),
            codec.encoder.format_name()
        );

        // Step 4: decode
        let mut reader = BufReader::new(file);
        let decoded = codec
            .decoder
            .decode(&mut reader)
            .map_err(|e| RecolorError::DecodeFailed { path, source: e })?;
        info!(
            "Decoded {}x{} {} image",
            decoded.buffer.width(),
            decoded.buffer.height(),
            decoded.format_hint
        );

        // Step 5: substitute
        if request.is_noop() {
            warn!("Target and replacement are both {}; the image will not change", request.target);
        }
        let SubstitutionOutput { buffer, replaced } =
            ColorSubstitutionEngine::new(request).apply(&decoded.buffer);
        info!(
            "Replaced {} pixel(s) of {} with {}",
            replaced, request.target, request.replacement
        );

        Ok(RecolorImage {
            buffer,
            replaced,
            tag,
            format_hint: decoded.format_hint,
            codec,
        })
    }

    fn resolve_codec(&self, source: &Path) -> Result<(FormatTag, CodecEntry)> {
        let extension = extract_extension(source)?;
        let key = if self.options.normalize_extension {
            extension.to_lowercase()
        } else {
            extension
        };

        let codec = self.registry.resolve(&key)?.clone();
        Ok((FormatTag::new(key), codec))
    }

    /// Warn when the destination name suggests a different format
    fn check_output_extension(&self, output: &Path, source_tag: &FormatTag) {
        let Ok(extension) = extract_extension(output) else {
            return;
        };
        if FormatTag::new(&extension) != *source_tag {
            warn!(
                "Output {:?} has extension {} but will be encoded as {}",
                output, extension, source_tag
            );
        }
    }
}
