//! Driver spawns the capture classification task

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::Result;
use crate::protocol::classify;
use crate::provider::CaptureProvider;
use crate::transport;
use crate::types::StreamRecord;

/// Frames processed between voluntary yields to the runtime
const YIELD_EVERY: u64 = 1024;

/// Counters reported by the classification task
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CaptureStats {
    /// Frames read from the capture
    pub frames: u64,
    /// Frames that carried a UDP datagram
    pub udp_datagrams: u64,
    /// Datagrams accepted as stream records
    pub records: u64,
}

/// Result of spawning the driver task
pub struct DriverChannels {
    /// Classified records in capture order; closes when the capture is exhausted
    pub records: mpsc::UnboundedReceiver<StreamRecord>,
    /// Completion of the classification task
    pub classifier: JoinHandle<Result<CaptureStats>>,
}

/// Driver runs the first pipeline stage
///
/// Spawns a task that owns the provider, walks the capture, extracts UDP
/// payloads and forwards every stream record over an unbounded queue.
pub struct Driver;

impl Driver {
    /// Spawn the classification task for the given provider
    pub fn spawn<P>(provider: P) -> DriverChannels
    where
        P: CaptureProvider,
    {
        let (record_tx, record_rx) = mpsc::unbounded_channel();

        let classifier = tokio::spawn(async move { Self::classifier_task(provider, record_tx).await });

        DriverChannels { records: record_rx, classifier }
    }

    /// Classifier task - reads frames until the provider is exhausted
    ///
    /// Dropping `record_tx` on return is the queue-closed signal for the
    /// grouping stage, on success and on error alike.
    async fn classifier_task<P>(
        mut provider: P,
        record_tx: mpsc::UnboundedSender<StreamRecord>,
    ) -> Result<CaptureStats>
    where
        P: CaptureProvider,
    {
        info!("Classifier started on {}", provider.source_name());
        let mut stats = CaptureStats::default();

        while let Some(frame) = provider.next_frame().await? {
            stats.frames += 1;

            if let Some(payload) = transport::decode(&frame).udp_payload() {
                stats.udp_datagrams += 1;

                if let Some(record) = classify(payload, frame.timestamp) {
                    trace!("{}", record);
                    stats.records += 1;
                    if record_tx.send(record).is_err() {
                        debug!("Record receiver dropped, stopping classification");
                        break;
                    }
                }
            }

            if stats.frames % YIELD_EVERY == 0 {
                tokio::task::yield_now().await;
            }
        }

        info!(
            "Classifier finished: {} frames, {} UDP datagrams, {} stream records",
            stats.frames, stats.udp_datagrams, stats.records
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{LinkType, RawFrame};
    use crate::providers::MemoryProvider;
    use crate::test_utils::{ethernet_ipv4_udp, stream_frame};
    use crate::types::Timestamp;

    #[tokio::test]
    async fn classifier_forwards_only_stream_records() {
        let ts = Timestamp::new(5, 0);
        let frames = vec![
            stream_frame(1, 0, b"\xff\xd8", ts),
            RawFrame { data: ethernet_ipv4_udp(53, 53, b"dns"), link_type: LinkType::ETHERNET, timestamp: ts },
            RawFrame { data: vec![0u8; 10], link_type: LinkType::ETHERNET, timestamp: ts },
            stream_frame(2, 3, b"\x01", ts),
        ];

        let mut channels = Driver::spawn(MemoryProvider::new(frames));

        let mut ids = Vec::new();
        while let Some(record) = channels.records.recv().await {
            ids.push((record.stream_id, record.chunk_index));
        }
        let stats = channels.classifier.await.expect("task joins").expect("no capture error");

        assert_eq!(ids, vec![(1, 0), (2, 3)]);
        assert_eq!(stats, CaptureStats { frames: 4, udp_datagrams: 3, records: 2 });
    }
}
