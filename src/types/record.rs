//! Stream protocol records

use std::fmt;

use super::Timestamp;

/// One chunk of a streamed image, parsed from a single UDP datagram.
///
/// Records are built by [`crate::protocol::classify`] and are never mutated
/// afterwards. The payload is always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    /// Identifier shared by every chunk of one image
    pub stream_id: u32,

    /// Position of this chunk within its image
    pub chunk_index: u8,

    /// Per-chunk flag byte, carried through uninterpreted
    pub flags: u8,

    /// Image bytes following the fixed header
    pub payload: Vec<u8>,

    /// Capture time of the originating frame
    pub timestamp: Timestamp,

    /// Size of the whole datagram, header included
    pub datagram_len: usize,
}

impl fmt::Display for StreamRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = &self.payload[..self.payload.len().min(4)];
        let tail = &self.payload[self.payload.len().saturating_sub(4)..];
        write!(
            f,
            "ID: 0x{:08x} Num: {} Flags: 0x{:02x} PacketSize: {} bytes Payload [{} ... {}]",
            self.stream_id,
            self.chunk_index,
            self.flags,
            self.datagram_len,
            hex_bytes(head),
            hex_bytes(tail),
        )
    }
}

/// Format bytes as space separated `0x..` pairs.
pub(crate) fn hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("0x{b:02x}")).collect::<Vec<_>>().join(" ")
}
