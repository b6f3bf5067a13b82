//! Reassembly pipeline
//!
//! Four stages connected by queues:
//!
//! 1. **Classification** ([`crate::driver::Driver`]) - capture frames to stream records
//! 2. **Grouping** ([`group_stream`]) - records to per-stream buckets
//! 3. **Reassembly** ([`reassemble`]) - buckets to images
//! 4. **Sequencing** ([`sequence`]) - images ordered by capture time
//!
//! Stages 1 and 2 run concurrently. Reassembly starts only once grouping has
//! drained the record queue, because a bucket is not complete before the
//! capture is. Each stage ends when its input queue closes.

mod grouper;
mod reassembler;
mod sequencer;

pub use grouper::{StreamBuckets, group_stream};
pub use reassembler::reassemble;
pub use sequencer::sequence;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::info;

use crate::Result;
use crate::driver::Driver;
use crate::provider::CaptureProvider;
use crate::types::ReconstructedImage;

/// Runs the full pipeline over one capture
pub struct Pipeline;

impl Pipeline {
    /// Extract every image from the provider's capture, ordered by capture time.
    ///
    /// A capture error aborts the run; no images are returned in that case.
    pub async fn run<P>(provider: P) -> Result<Vec<ReconstructedImage>>
    where
        P: CaptureProvider,
    {
        let channels = Driver::spawn(provider);

        let buckets = group_stream(UnboundedReceiverStream::new(channels.records)).await;
        let stats = channels.classifier.await??;

        info!(
            "Grouped {} records into {} streams ({} frames scanned)",
            buckets.record_count(),
            buckets.len(),
            stats.frames
        );

        let (image_tx, image_rx) = mpsc::unbounded_channel();
        let reassembly = tokio::spawn(async move {
            let mut streams = 0usize;
            for (stream_id, records) in buckets {
                streams += 1;
                if let Some(image) = reassemble(stream_id, records) {
                    if image_tx.send(image).is_err() {
                        break;
                    }
                }
            }
            streams
        });

        let images: Vec<ReconstructedImage> = UnboundedReceiverStream::new(image_rx).collect().await;
        let streams = reassembly.await?;

        info!("Reassembled {} images from {} streams", images.len(), streams);

        Ok(sequence(images))
    }
}
