//! Writing reconstructed frames to disk

use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::ExtractConfig;
use crate::types::ReconstructedImage;
use crate::{ExtractError, Result};

/// Writes images as numbered files, one per image, in sequence order
#[derive(Debug, Clone)]
pub struct FrameWriter {
    output_dir: PathBuf,
    prefix: String,
    extension: String,
}

impl FrameWriter {
    pub fn new(output_dir: impl Into<PathBuf>, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self { output_dir: output_dir.into(), prefix: prefix.into(), extension: extension.into() }
    }

    pub fn from_config(config: &ExtractConfig) -> Self {
        Self::new(&config.output_dir, &config.file_prefix, &config.extension)
    }

    /// File name for the image at `position` in the sequenced output
    pub fn file_name(&self, position: usize) -> String {
        format!("{}{}.{}", self.prefix, position, self.extension)
    }

    /// Write every image, creating the output directory if needed.
    ///
    /// Returns the written paths in the same order as `images`. Existing files
    /// with the same names are overwritten.
    pub fn write_all(&self, images: &[ReconstructedImage]) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ExtractError::output_error(self.output_dir.clone(), e))?;

        let mut written = Vec::with_capacity(images.len());
        for (position, image) in images.iter().enumerate() {
            let path = self.output_dir.join(self.file_name(position));
            std::fs::write(&path, &image.data).map_err(|e| ExtractError::output_error(path.clone(), e))?;
            debug!(
                "Wrote {} ({} bytes, stream 0x{:08x}, t={})",
                path.display(),
                image.data.len(),
                image.stream_id,
                image.timestamp
            );
            written.push(path);
        }

        info!("Wrote {} frames to {}", written.len(), self.output_dir.display());
        Ok(written)
    }
}
