//! Capture file provider

use std::path::Path;
use tracing::{debug, info};

use crate::Result;
use crate::capture::{CaptureReader, RawFrame};
use crate::provider::CaptureProvider;

/// Provider that reads frames from a pcap or pcapng file
pub struct PcapProvider {
    /// Capture file reader
    reader: CaptureReader,
}

impl PcapProvider {
    /// Open a capture file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = CaptureReader::open(path)?;
        info!("Opened capture file: {} ({:?})", reader.file_path().display(), reader.format());
        Ok(Self { reader })
    }

    /// Wrap an already opened reader
    pub fn from_reader(reader: CaptureReader) -> Self {
        Self { reader }
    }

    /// Number of frames read so far
    pub fn frames_read(&self) -> u64 {
        self.reader.frames_read()
    }
}

#[async_trait::async_trait]
impl CaptureProvider for PcapProvider {
    async fn next_frame(&mut self) -> Result<Option<RawFrame>> {
        let frame = self.reader.read_next_frame()?;
        if frame.is_none() {
            debug!("Reached end of capture after {} frames", self.reader.frames_read());
        }
        Ok(frame)
    }

    fn source_name(&self) -> String {
        self.reader.file_path().display().to_string()
    }
}
