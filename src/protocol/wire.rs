//! Wire format of the chunked image transport.
//!
//! Every datagram starts with a fixed 54-byte header followed by a slice of
//! image bytes:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0      | 2    | Magic `0x63 0x63` (`"cc"`) |
//! | 8      | 2    | Stream id, high half (bits 31..16) |
//! | 12     | 2    | Stream id, low half (bits 15..0) |
//! | 48     | 1    | Chunk index |
//! | 50     | 1    | Flags |
//! | 54     | ..   | Payload |
//!
//! The two halves of the stream id are not adjacent. Bytes not listed above
//! carry nothing the reassembler uses.

/// Magic bytes opening every stream datagram
pub const MAGIC: [u8; 2] = [0x63, 0x63];

/// Size of the fixed header preceding the payload
pub const HEADER_LEN: usize = 54;

/// Smallest datagram that still carries one payload byte
pub const MIN_DATAGRAM_LEN: usize = HEADER_LEN + 1;

/// One byte of the stream identifier and where it lands in the `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdByte {
    /// Offset of the byte within the datagram
    pub offset: usize,
    /// Left shift applied before OR-ing into the identifier
    pub shift: u32,
}

/// Byte layout of the stream identifier, most significant byte first
pub const STREAM_ID_LAYOUT: [IdByte; 4] = [
    IdByte { offset: 8, shift: 24 },
    IdByte { offset: 9, shift: 16 },
    IdByte { offset: 12, shift: 8 },
    IdByte { offset: 13, shift: 0 },
];

/// Offset of the chunk index byte
pub const CHUNK_INDEX_OFFSET: usize = 48;

/// Offset of the flags byte
pub const FLAGS_OFFSET: usize = 50;

/// JPEG start-of-image marker expected at the start of the first chunk
pub const START_OF_IMAGE: [u8; 2] = [0xff, 0xd8];

/// JPEG end-of-image marker expected at the end of the last chunk
pub const END_OF_IMAGE: [u8; 2] = [0xff, 0xd9];

/// Largest payload the sender puts in one datagram; lost chunks are padded
/// with this many zero bytes
pub const CHUNK_PADDING_LEN: usize = 1400;

/// Read the stream identifier from a datagram at least `HEADER_LEN` long.
pub(crate) fn stream_id(datagram: &[u8]) -> u32 {
    STREAM_ID_LAYOUT
        .iter()
        .fold(0u32, |id, byte| id | u32::from(datagram[byte.offset]) << byte.shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_fields_fit_inside_header() {
        for byte in STREAM_ID_LAYOUT {
            assert!(byte.offset < HEADER_LEN);
        }
        assert!(CHUNK_INDEX_OFFSET < HEADER_LEN);
        assert!(FLAGS_OFFSET < HEADER_LEN);
    }

    #[test]
    fn stream_id_reads_non_contiguous_halves() {
        let mut datagram = [0u8; HEADER_LEN];
        datagram[8] = 0xde;
        datagram[9] = 0xad;
        datagram[10] = 0x11;
        datagram[11] = 0x22;
        datagram[12] = 0xbe;
        datagram[13] = 0xef;

        assert_eq!(stream_id(&datagram), 0xdead_beef);
    }
}
