use std::collections::BTreeSet;

use thiserror::Error;

use crate::codecs::FormatTag;

/// Main error type for the recolor pipeline
///
/// Each variant names the pipeline step that failed and keeps the
/// underlying cause as its `source`, so callers can walk the whole chain.
#[derive(Error, Debug)]
pub enum RecolorError {
    #[error("file '{path}' doesn't have any extension")]
    NoExtension { path: String },

    #[error(
        "extension format '{tag}' not supported, currently supported formats are [{}]",
        join_tags(.supported)
    )]
    UnsupportedFormat {
        tag: String,
        supported: BTreeSet<FormatTag>,
    },

    #[error("failed to open source file '{path}'")]
    SourceOpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode source file '{path}'")]
    DecodeFailed {
        path: String,
        #[source]
        source: CodecError,
    },

    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error while reading output directory '{path}'")]
    OutputDirReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create output file '{path}'")]
    OutputFileCreateFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode output image '{path}'")]
    EncodeFailed {
        path: String,
        #[source]
        source: CodecError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by a decoder or encoder
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("PNG decoding failed: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("image codec failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported pixel layout: {details}")]
    UnsupportedLayout { details: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Flat classification of [`RecolorError`], convenient for matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoExtension,
    UnsupportedFormat,
    SourceOpenFailure,
    DecodeFailure,
    OutputDirCreateFailure,
    OutputDirReadFailure,
    OutputFileCreateFailure,
    EncodeFailure,
    Config,
}

/// Convenience type alias for Results using RecolorError
pub type Result<T> = std::result::Result<T, RecolorError>;

impl RecolorError {
    /// The kind of failure, without its payload
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoExtension { .. } => ErrorKind::NoExtension,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::SourceOpenFailed { .. } => ErrorKind::SourceOpenFailure,
            Self::DecodeFailed { .. } => ErrorKind::DecodeFailure,
            Self::OutputDirCreateFailed { .. } => ErrorKind::OutputDirCreateFailure,
            Self::OutputDirReadFailed { .. } => ErrorKind::OutputDirReadFailure,
            Self::OutputFileCreateFailed { .. } => ErrorKind::OutputFileCreateFailure,
            Self::EncodeFailed { .. } => ErrorKind::EncodeFailure,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Process exit code for this failure, never 0
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Config => 2,
            ErrorKind::NoExtension | ErrorKind::UnsupportedFormat => 3,
            ErrorKind::SourceOpenFailure => 4,
            ErrorKind::DecodeFailure => 5,
            ErrorKind::OutputDirCreateFailure
            | ErrorKind::OutputDirReadFailure
            | ErrorKind::OutputFileCreateFailure => 6,
            ErrorKind::EncodeFailure => 7,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::SourceOpenFailed { path, source } => format!(
                "Could not open '{}' ({}). Please check the file exists and is readable.",
                path, source
            ),
            Self::DecodeFailed { path, source } => format!(
                "Could not decode '{}': {}. The file may be corrupt or not match its extension.",
                path, source
            ),
            Self::EncodeFailed { path, source } => format!(
                "Could not write image '{}': {}. No output file was kept.",
                path, source
            ),
            _ => self.to_string(),
        }
    }
}

fn join_tags(tags: &BTreeSet<FormatTag>) -> String {
    tags.iter()
        .map(|tag| tag.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
