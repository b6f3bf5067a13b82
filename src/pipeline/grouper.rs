//! Stream grouping
//!
//! Records arrive in capture order, interleaved across streams. Grouping
//! partitions them by stream id without reordering anything inside a stream;
//! the reassembler sorts each bucket itself.

use futures::{Stream, StreamExt};
use std::collections::HashMap;

use crate::types::StreamRecord;

/// Records partitioned by stream id.
///
/// Iteration yields buckets in the order their stream id was first seen, which
/// keeps the whole pipeline deterministic for a given capture.
#[derive(Debug, Default)]
pub struct StreamBuckets {
    positions: HashMap<u32, usize>,
    buckets: Vec<(u32, Vec<StreamRecord>)>,
    records: usize,
}

impl StreamBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its stream's bucket, creating the bucket on first sight.
    pub fn insert(&mut self, record: StreamRecord) {
        let stream_id = record.stream_id;
        let position = *self.positions.entry(stream_id).or_insert_with(|| {
            self.buckets.push((stream_id, Vec::new()));
            self.buckets.len() - 1
        });
        self.buckets[position].1.push(record);
        self.records += 1;
    }

    /// Records of one stream, in arrival order
    pub fn get(&self, stream_id: u32) -> Option<&[StreamRecord]> {
        let position = *self.positions.get(&stream_id)?;
        Some(&self.buckets[position].1)
    }

    /// Stream ids in first-seen order
    pub fn stream_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.buckets.iter().map(|(id, _)| *id)
    }

    /// Number of distinct streams
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of records across all buckets
    pub fn record_count(&self) -> usize {
        self.records
    }
}

impl FromIterator<StreamRecord> for StreamBuckets {
    fn from_iter<I: IntoIterator<Item = StreamRecord>>(iter: I) -> Self {
        let mut buckets = StreamBuckets::new();
        for record in iter {
            buckets.insert(record);
        }
        buckets
    }
}

impl IntoIterator for StreamBuckets {
    type Item = (u32, Vec<StreamRecord>);
    type IntoIter = std::vec::IntoIter<(u32, Vec<StreamRecord>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}

/// Drain a stream of records into buckets.
///
/// Completes only when the source stream ends, since bucket membership is not
/// final before every record has been seen.
pub async fn group_stream<S>(records: S) -> StreamBuckets
where
    S: Stream<Item = StreamRecord>,
{
    records
        .fold(StreamBuckets::new(), |mut buckets, record| async move {
            buckets.insert(record);
            buckets
        })
        .await
}
