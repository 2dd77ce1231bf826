use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    codecs::PngCompression,
    error::{ConfigError, Result},
    raster::Color,
    substitution::SubstitutionRequest,
};

/// Main configuration for recolor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which image to process and which color to swap
    pub job: JobConfig,

    /// Codec settings
    pub codecs: CodecConfig,

    /// Pipeline behavior
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content).map_err(|e| ConfigError::InvalidValue {
            key: path.display().to_string(),
            value: e.to_string(),
        })?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.job.validate()?;
        self.codecs.validate()?;
        Ok(())
    }
}

/// The image to process and the colors to swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Source image path
    pub source: PathBuf,

    /// Destination image path; missing parent directories are created
    pub output: PathBuf,

    /// Color to look for, matched exactly on all four channels
    pub target: Color,

    /// Color written in place of every match
    pub replacement: Color,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("docs/img/4.2.png"),
            output: PathBuf::from("output/img/4.2.png"),
            target: Color::rgba(14, 14, 18, 255),
            replacement: Color::rgba(244, 245, 245, 255),
        }
    }
}

impl JobConfig {
    /// The substitution this job performs
    pub fn request(&self) -> SubstitutionRequest {
        SubstitutionRequest::new(self.target, self.replacement)
    }

    fn validate(&self) -> Result<()> {
        if self.source.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "job.source".to_string(),
                value: String::new()
            }.into());
        }

        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "job.output".to_string(),
                value: String::new()
            }.into());
        }

        Ok(())
    }
}

/// Codec configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// PNG compression effort (default, fast, best)
    pub png_compression: PngCompression,

    /// JPEG encoding quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            png_compression: PngCompression::Default,
            jpeg_quality: 90,
        }
    }
}

impl CodecConfig {
    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidValue {
                key: "codecs.jpeg_quality".to_string(),
                value: self.jpeg_quality.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Pipeline behavior configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Encode into a temporary file and rename it over the destination
    pub atomic_write: bool,

    /// Lowercase the source extension before looking up its codec
    pub normalize_extension: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            atomic_write: true,
            normalize_extension: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, RecolorError};
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_job_matches_reference_colors() {
        let job = JobConfig::default();
        assert_eq!(job.target, Color::rgba(14, 14, 18, 255));
        assert_eq!(job.replacement, Color::rgba(244, 245, 245, 255));
        assert_eq!(job.request().target, job.target);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("recolor.toml");

        let mut original_config = Config::default();
        original_config.job.target = Color::rgba(1, 2, 3, 4);
        original_config.codecs.png_compression = PngCompression::Best;
        original_config.pipeline.atomic_write = false;

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(
            &file_path,
            concat!(
                "[job]\n",
                "source = \"in/a.png\"\n",
                "target = [1, 1, 1, 255]\n",
                "\n",
                "[codecs]\n",
                "png_compression = \"fast\"\n",
            ),
        )
        .unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.job.source, PathBuf::from("in/a.png"));
        assert_eq!(config.job.target, Color::rgb(1, 1, 1));
        assert_eq!(config.job.replacement, JobConfig::default().replacement);
        assert_eq!(config.codecs.png_compression, PngCompression::Fast);
        assert!(config.pipeline.atomic_write);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = Config::from_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, RecolorError::Config(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.toml");
        std::fs::write(&file_path, "[job]\ntarget = [1, 2]\n").unwrap();

        let err = Config::from_file(&file_path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_invalid_jpeg_quality() {
        let mut config = Config::default();
        config.codecs.jpeg_quality = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_paths_are_invalid() {
        let mut config = Config::default();
        config.job.output = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
