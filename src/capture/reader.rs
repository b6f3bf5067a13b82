//! Capture file reader
//!
//! Yields the link-layer frames of a pcap or pcapng file in capture order.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use framecap::capture::CaptureReader;
//!
//! fn count_frames() -> framecap::Result<()> {
//!     let mut reader = CaptureReader::open("video.pcapng")?;
//!
//!     while let Some(frame) = reader.read_next_frame()? {
//!         println!("{} bytes at {}", frame.data.len(), frame.timestamp);
//!     }
//!
//!     println!("Read {} frames", reader.frames_read());
//!     Ok(())
//! }
//! ```
//!
//! Blocks are decoded incrementally through a fixed-size buffer, so memory use
//! does not grow with the capture size.

use pcap_parser::pcapng::Block;
use pcap_parser::traits::{PcapNGPacketBlock, PcapReaderIterator};
use pcap_parser::{LegacyPcapReader, PcapBlockOwned, PcapError, PcapNGReader};
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use super::format::{CaptureFormat, Interface, LinkType, pcap_timestamp};
use super::RawFrame;
use crate::types::Timestamp;
use crate::{ExtractError, Result};

/// Read buffer size; must hold the largest single block in the capture,
/// including a full 262144-byte snaplen packet plus its block framing
const BUFFER_CAPACITY: usize = 1 << 19;

/// Link-layer state accumulated while walking the capture
#[derive(Debug)]
struct LinkState {
    format: CaptureFormat,
    /// Link type from the classic pcap global header
    pcap_link: LinkType,
    /// Interfaces declared in the current pcapng section, by index
    interfaces: Vec<Interface>,
}

/// Sequential reader over the frames of a capture file
pub struct CaptureReader {
    reader: Box<dyn PcapReaderIterator + Send>,
    path: PathBuf,
    state: LinkState,
    frames_read: u64,
    finished: bool,
}

impl CaptureReader {
    /// Open a capture file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| ExtractError::file_error(path.clone(), e))?;
        Self::from_source(file, path)
    }

    /// Create a reader over an in-memory capture
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_source(Cursor::new(data), PathBuf::from("<memory>"))
    }

    fn from_source<R>(mut source: R, path: PathBuf) -> Result<Self>
    where
        R: Read + Seek + Send + 'static,
    {
        let mut magic = [0u8; 4];
        source.read_exact(&mut magic).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => ExtractError::capture(
                "Capture format detection",
                format!("{} is too short to be a capture file", path.display()),
            ),
            _ => ExtractError::file_error(path.clone(), e),
        })?;
        source.rewind().map_err(|e| ExtractError::file_error(path.clone(), e))?;

        let format = CaptureFormat::detect(magic)?;
        let reader: Box<dyn PcapReaderIterator + Send> = match format {
            CaptureFormat::PcapNg => Box::new(
                PcapNGReader::new(BUFFER_CAPACITY, source)
                    .map_err(|e| ExtractError::capture("pcapng section header", format!("{e:?}")))?,
            ),
            CaptureFormat::Pcap { .. } => Box::new(
                LegacyPcapReader::new(BUFFER_CAPACITY, source)
                    .map_err(|e| ExtractError::capture("pcap global header", format!("{e:?}")))?,
            ),
        };

        debug!("Opened {:?} capture {}", format, path.display());

        Ok(Self {
            reader,
            path,
            state: LinkState { format, pcap_link: LinkType::ETHERNET, interfaces: Vec::new() },
            frames_read: 0,
            finished: false,
        })
    }

    /// Container format of the capture
    pub fn format(&self) -> CaptureFormat {
        self.state.format
    }

    /// Path the reader was opened from
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// Number of frames returned so far
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Read the next captured frame.
    ///
    /// Returns `Ok(None)` once the capture is exhausted. A capture that ends in
    /// the middle of a block is treated as ended at the last complete block.
    pub fn read_next_frame(&mut self) -> Result<Option<RawFrame>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            match self.reader.next() {
                Ok((offset, block)) => {
                    let frame = decode_block(block, &mut self.state);
                    self.reader.consume(offset);
                    if let Some(frame) = frame {
                        self.frames_read += 1;
                        return Ok(Some(frame));
                    }
                }
                Err(PcapError::Eof) => {
                    debug!("End of capture after {} frames", self.frames_read);
                    self.finished = true;
                    return Ok(None);
                }
                Err(PcapError::Incomplete(_)) => {
                    if self.reader.reader_exhausted() {
                        return Ok(self.end_truncated("incomplete block"));
                    }
                    self.reader
                        .refill()
                        .map_err(|e| ExtractError::capture("Capture buffer refill", format!("{e:?}")))?;
                }
                Err(e) => {
                    let details = format!("{e:?}");
                    if self.reader.reader_exhausted() {
                        return Ok(self.end_truncated(&details));
                    }
                    return Err(ExtractError::capture(
                        "Capture block decoding",
                        format!("{details} after {} frames", self.frames_read),
                    ));
                }
            }
        }
    }

    fn end_truncated(&mut self, details: &str) -> Option<RawFrame> {
        warn!(
            "Capture {} ends with a truncated block after {} frames ({})",
            self.path.display(),
            self.frames_read,
            details
        );
        self.finished = true;
        None
    }
}

/// Turn one capture block into a frame, updating link state on the way.
fn decode_block(block: PcapBlockOwned<'_>, state: &mut LinkState) -> Option<RawFrame> {
    match block {
        PcapBlockOwned::LegacyHeader(header) => {
            state.pcap_link = LinkType::from(header.network);
            debug!("pcap link type {:?}", state.pcap_link);
            None
        }
        PcapBlockOwned::Legacy(packet) => {
            let nanosecond = matches!(state.format, CaptureFormat::Pcap { nanosecond: true });
            Some(RawFrame {
                data: packet.data.to_vec(),
                link_type: state.pcap_link,
                timestamp: pcap_timestamp(packet.ts_sec, packet.ts_usec, nanosecond),
            })
        }
        PcapBlockOwned::NG(Block::SectionHeader(_)) => {
            state.interfaces.clear();
            None
        }
        PcapBlockOwned::NG(Block::InterfaceDescription(idb)) => {
            let interface = Interface::new(
                LinkType::from(idb.linktype),
                idb.if_tsresol,
                idb.if_tsoffset as i64,
            );
            debug!("pcapng interface {}: {:?}", state.interfaces.len(), interface);
            state.interfaces.push(interface);
            None
        }
        PcapBlockOwned::NG(Block::EnhancedPacket(epb)) => {
            let Some(interface) = state.interfaces.get(epb.if_id as usize) else {
                warn!("Skipping packet for undeclared interface {}", epb.if_id);
                return None;
            };
            Some(RawFrame {
                data: epb.packet_data().to_vec(),
                link_type: interface.link_type,
                timestamp: interface.timestamp(epb.ts_high, epb.ts_low),
            })
        }
        PcapBlockOwned::NG(Block::SimplePacket(spb)) => {
            // Simple packets belong to interface 0 and carry no timestamp.
            let interface = state.interfaces.first()?;
            let len = (spb.origlen as usize).min(spb.data.len());
            Some(RawFrame {
                data: spb.data[..len].to_vec(),
                link_type: interface.link_type,
                timestamp: Timestamp::UNIX_EPOCH,
            })
        }
        PcapBlockOwned::NG(_) => {
            trace!("Skipping non-packet pcapng block");
            None
        }
    }
}
