//! Reconstruct JPEG frames from chunked UDP streams in packet captures.
//!
//! A sender splits each image into numbered chunks and sends every chunk as
//! one UDP datagram carrying a fixed 54-byte header. framecap reads a pcap or
//! pcapng capture of that traffic, picks out the chunk datagrams, groups them
//! by stream, stitches each stream back into an image (zero-padding chunks
//! that were lost) and orders the results by capture time.
//!
//! # Pipeline
//!
//! - **Capture** ([`capture`], [`providers`]) - link-layer frames with timestamps
//! - **Transport** ([`transport`]) - UDP payload extraction
//! - **Classification** ([`protocol`]) - datagrams to [`StreamRecord`]s
//! - **Grouping, reassembly, sequencing** ([`pipeline`]) - records to ordered [`ReconstructedImage`]s
//! - **Output** ([`output`]) - numbered image files
//!
//! ## Example
//!
//! ```rust,no_run
//! use framecap::Framecap;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> framecap::Result<()> {
//!     let images = Framecap::extract("video.pcapng").await?;
//!     for image in &images {
//!         println!("stream 0x{:08x}: {} bytes", image.stream_id, image.data.len());
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Capture decoding
pub mod capture;
pub mod protocol;
pub mod transport;

// Stream-based pipeline
pub mod driver;
pub mod pipeline;
pub mod provider;
pub mod providers;

// Configuration and output
pub mod config;
pub mod output;

// Core exports
pub use error::*;
pub use types::*;

// Main API exports
pub use config::ExtractConfig;
pub use output::FrameWriter;
pub use pipeline::Pipeline;
pub use provider::CaptureProvider;
pub use providers::PcapProvider;

use std::path::{Path, PathBuf};

/// Unified entry point for frame extraction.
///
/// # Examples
///
/// ```rust,no_run
/// use framecap::{ExtractConfig, Framecap};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> framecap::Result<()> {
/// let config = ExtractConfig { output_dir: "frames".into(), ..ExtractConfig::default() };
/// let written = Framecap::extract_to(&config).await?;
/// println!("{} frames written", written.len());
/// # Ok(())
/// # }
/// ```
pub struct Framecap;

impl Framecap {
    /// Reconstruct every image in a capture file, ordered by capture time.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist or is not readable
    /// - File is neither pcap nor pcapng
    /// - A capture block cannot be decoded
    pub async fn extract<P: AsRef<Path>>(path: P) -> Result<Vec<ReconstructedImage>> {
        let provider = PcapProvider::new(path)?;
        Pipeline::run(provider).await
    }

    /// Reconstruct the images of `config.input` and write them to disk.
    ///
    /// Returns the written paths in sequence order.
    pub async fn extract_to(config: &ExtractConfig) -> Result<Vec<PathBuf>> {
        let images = Self::extract(&config.input).await?;
        FrameWriter::from_config(config).write_all(&images)
    }
}
