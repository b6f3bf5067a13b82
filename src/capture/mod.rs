//! Capture file reading (pcap and pcapng)
//!
//! This module turns a capture file into a sequence of [`RawFrame`]s that the
//! rest of the pipeline can decode without knowing the container format.

pub mod format;
pub mod reader;

pub use format::{CaptureFormat, LinkType};
pub use reader::CaptureReader;

use crate::types::Timestamp;

/// A link-layer frame as stored in the capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Captured bytes, starting at the link-layer header
    pub data: Vec<u8>,

    /// Link-layer header type of `data`
    pub link_type: LinkType,

    /// Capture time
    pub timestamp: Timestamp,
}
