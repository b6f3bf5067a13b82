//! Extraction configuration
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! stock behaviour: read `./video.pcapng` and write `frame_N.jpg` into the
//! current directory. Command-line flags override whatever the file sets.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{ExtractError, Result};

/// Settings for one extraction run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Capture file to read
    pub input: PathBuf,
    /// Directory the reconstructed frames are written into
    pub output_dir: PathBuf,
    /// File name prefix, followed by the frame's position
    pub file_prefix: String,
    /// File extension without the leading dot
    pub extension: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("./video.pcapng"),
            output_dir: PathBuf::from("."),
            file_prefix: "frame_".to_string(),
            extension: "jpg".to_string(),
        }
    }
}

impl ExtractConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| ExtractError::config(path.to_path_buf(), format!("cannot read file: {}", e)))?;
        Self::from_yaml_str(&yaml, path)
    }

    /// Parse configuration from YAML text; `origin` is only used in errors
    pub fn from_yaml_str(yaml: &str, origin: &Path) -> Result<Self> {
        // serde_yaml_ng rejects an empty document for a struct
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: ExtractConfig = serde_yaml_ng::from_str(yaml).map_err(|e| {
            ExtractError::config(origin.to_path_buf(), format!("YAML parsing failed: {}", e))
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        if self.extension.is_empty() {
            return Err(ExtractError::config(origin.to_path_buf(), "extension must not be empty"));
        }
        if self.extension.starts_with('.') {
            return Err(ExtractError::config(
                origin.to_path_buf(),
                "extension is given without the leading dot",
            ));
        }
        if self.file_prefix.contains(std::path::is_separator) {
            return Err(ExtractError::config(
                origin.to_path_buf(),
                "file_prefix must not contain a path separator",
            ));
        }
        Ok(())
    }
}
