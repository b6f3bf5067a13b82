//! Frame reassembly
//!
//! Rebuilds one image from the records of one stream:
//!
//! 1. Sort records by chunk index (stable, duplicates kept)
//! 2. Require the lowest-index payload to open with the JPEG start-of-image
//!    marker and the highest-index payload to close with end-of-image
//! 3. Concatenate the payloads of positions `1..=highest index`, substituting
//!    [`CHUNK_PADDING_LEN`] zero bytes for every missing position
//!
//! The index-0 payload is checked for the start marker but is not part of the
//! output buffer. The highest chunk index is the sender's own statement of
//! where the image ends.

use tracing::{debug, info};

use crate::protocol::wire::{CHUNK_PADDING_LEN, END_OF_IMAGE, START_OF_IMAGE};
use crate::types::{ReconstructedImage, StreamRecord, hex_bytes};

/// Reassemble one stream into an image.
///
/// Returns `None` for an empty bucket or when the boundary markers are not
/// where they should be. Rejected streams are dropped silently apart from a
/// debug log.
pub fn reassemble(stream_id: u32, mut records: Vec<StreamRecord>) -> Option<ReconstructedImage> {
    records.sort_by_key(|record| record.chunk_index);

    let first = records.first()?;
    let total_chunks = records.last()?.chunk_index;
    // Duplicates of the highest index: the one that gets appended is checked.
    let last = &records[records.partition_point(|record| record.chunk_index < total_chunks)];

    if !first.payload.starts_with(&START_OF_IMAGE) || !last.payload.ends_with(&END_OF_IMAGE) {
        debug!(
            "Dropping stream 0x{:08x}: boundary markers missing ({} records, last index {})",
            stream_id,
            records.len(),
            total_chunks
        );
        return None;
    }

    info!("Stream 0x{:08x}: total chunks {}", stream_id, total_chunks);

    let mut data = Vec::with_capacity(usize::from(total_chunks) * CHUNK_PADDING_LEN);
    let mut missing_chunks = 0;

    for position in 1..=total_chunks {
        // First sorted occurrence wins when an index was received twice.
        let start = records.partition_point(|record| record.chunk_index < position);
        match records.get(start) {
            Some(record) if record.chunk_index == position => {
                data.extend_from_slice(&record.payload);
            }
            _ => {
                data.resize(data.len() + CHUNK_PADDING_LEN, 0);
                missing_chunks += 1;
            }
        }
    }

    if missing_chunks > 0 {
        debug!(
            "Stream 0x{:08x}: padded {} of {} chunk positions",
            stream_id, missing_chunks, total_chunks
        );
    }
    debug!(
        "Stream 0x{:08x}: head [{}] tail [{}]",
        stream_id,
        hex_bytes(&data[..data.len().min(4)]),
        hex_bytes(&data[data.len().saturating_sub(4)..])
    );

    Some(ReconstructedImage {
        stream_id,
        data,
        timestamp: first.timestamp,
        chunk_count: usize::from(total_chunks) + 1,
        missing_chunks,
    })
}
