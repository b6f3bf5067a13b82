//! Reconstructed image type

use super::Timestamp;

/// An image rebuilt from the chunks of one stream.
///
/// `data` may contain zero padding where chunks were lost in transit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructedImage {
    /// Stream the image was rebuilt from
    pub stream_id: u32,

    /// Concatenated chunk payloads
    pub data: Vec<u8>,

    /// Capture time of the lowest-index chunk
    pub timestamp: Timestamp,

    /// Number of chunk positions the sender announced (highest index + 1)
    pub chunk_count: usize,

    /// Number of positions that were filled with padding
    pub missing_chunks: usize,
}

impl ReconstructedImage {
    /// Whether every announced chunk after the first was received.
    pub fn is_complete(&self) -> bool {
        self.missing_chunks == 0
    }
}
