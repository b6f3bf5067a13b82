//! Record classification over mixed UDP traffic

use tracing::trace;

use super::wire::{CHUNK_INDEX_OFFSET, FLAGS_OFFSET, HEADER_LEN, MAGIC, MIN_DATAGRAM_LEN, stream_id};
use crate::types::{StreamRecord, Timestamp};

/// Parse a UDP payload into a [`StreamRecord`].
///
/// Returns `None` for anything that is not a stream datagram: payloads too
/// short to hold the header and one payload byte, or payloads without the
/// magic prefix. This runs over every UDP datagram in a capture, so rejection
/// is the common case and is not an error.
pub fn classify(datagram: &[u8], timestamp: Timestamp) -> Option<StreamRecord> {
    if datagram.len() < MIN_DATAGRAM_LEN {
        trace!("Skipping {} byte datagram: shorter than stream header", datagram.len());
        return None;
    }

    if datagram[..MAGIC.len()] != MAGIC {
        return None;
    }

    Some(StreamRecord {
        stream_id: stream_id(datagram),
        chunk_index: datagram[CHUNK_INDEX_OFFSET],
        flags: datagram[FLAGS_OFFSET],
        payload: datagram[HEADER_LEN..].to_vec(),
        timestamp,
        datagram_len: datagram.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::stream_datagram;
    use proptest::prelude::*;

    #[test]
    fn classify_extracts_header_fields() {
        let ts = Timestamp::new(1_700_000_000, 5);
        let datagram = stream_datagram(0x1234_5678, 3, 0x80, &[0xff, 0xd8, 0x01]);

        let record = classify(&datagram, ts).expect("well-formed datagram should classify");

        assert_eq!(record.stream_id, 0x1234_5678);
        assert_eq!(record.chunk_index, 3);
        assert_eq!(record.flags, 0x80);
        assert_eq!(record.payload, vec![0xff, 0xd8, 0x01]);
        assert_eq!(record.timestamp, ts);
        assert_eq!(record.datagram_len, HEADER_LEN + 3);
    }

    #[test]
    fn classify_rejects_header_only_datagram() {
        let mut datagram = stream_datagram(1, 0, 0, &[0xaa]);
        datagram.truncate(HEADER_LEN);
        assert!(classify(&datagram, Timestamp::UNIX_EPOCH).is_none());
    }

    #[test]
    fn classify_accepts_single_payload_byte() {
        let datagram = stream_datagram(1, 0, 0, &[0xaa]);
        assert_eq!(datagram.len(), MIN_DATAGRAM_LEN);
        assert!(classify(&datagram, Timestamp::UNIX_EPOCH).is_some());
    }

    #[test]
    fn classify_rejects_wrong_magic() {
        let mut datagram = stream_datagram(1, 0, 0, &[0xaa; 16]);
        datagram[1] = 0x64;
        assert!(classify(&datagram, Timestamp::UNIX_EPOCH).is_none());
    }

    #[test]
    fn classify_ignores_bytes_between_id_halves() {
        let mut datagram = stream_datagram(0xaabb_ccdd, 0, 0, &[0x01]);
        datagram[10] = 0x99;
        datagram[11] = 0x99;
        let record = classify(&datagram, Timestamp::UNIX_EPOCH).expect("should classify");
        assert_eq!(record.stream_id, 0xaabb_ccdd);
    }

    proptest! {
        #[test]
        fn short_datagrams_never_classify(bytes in prop::collection::vec(any::<u8>(), 0..MIN_DATAGRAM_LEN)) {
            prop_assert!(classify(&bytes, Timestamp::UNIX_EPOCH).is_none());
        }

        #[test]
        fn datagrams_without_magic_never_classify(
            first in any::<u8>(),
            rest in prop::collection::vec(any::<u8>(), MIN_DATAGRAM_LEN..200),
        ) {
            prop_assume!(first != MAGIC[0]);
            let mut bytes = rest;
            bytes[0] = first;
            prop_assert!(classify(&bytes, Timestamp::UNIX_EPOCH).is_none());
        }

        #[test]
        fn well_formed_datagrams_round_trip_header_fields(
            id in any::<u32>(),
            index in any::<u8>(),
            flags in any::<u8>(),
            payload in prop::collection::vec(any::<u8>(), 1..1500),
        ) {
            let datagram = stream_datagram(id, index, flags, &payload);
            let record = classify(&datagram, Timestamp::UNIX_EPOCH).expect("should classify");
            prop_assert_eq!(record.stream_id, id);
            prop_assert_eq!(record.chunk_index, index);
            prop_assert_eq!(record.flags, flags);
            prop_assert_eq!(record.payload, payload);
        }
    }
}
