//! Capture container formats and timestamp conventions
//!
//! Two containers are supported:
//!
//! 1. **pcap** - a 24-byte global header followed by packet records. The magic
//!    number encodes both byte order and timestamp resolution (micro- or
//!    nanoseconds).
//! 2. **pcapng** - a sequence of blocks. Each Interface Description Block
//!    carries its own link type and timestamp resolution, and packets refer to
//!    their interface by index.

use crate::types::Timestamp;
use crate::{ExtractError, Result};

/// Section header block type, also the first four bytes of any pcapng file
pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

const PCAP_MICROS_LE: [u8; 4] = [0xd4, 0xc3, 0xb2, 0xa1];
const PCAP_MICROS_BE: [u8; 4] = [0xa1, 0xb2, 0xc3, 0xd4];
const PCAP_NANOS_LE: [u8; 4] = [0x4d, 0x3c, 0xb2, 0xa1];
const PCAP_NANOS_BE: [u8; 4] = [0xa1, 0xb2, 0x3c, 0x4d];

/// Link-layer header type of a captured frame (tcpdump LINKTYPE_ values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkType(pub i32);

impl LinkType {
    pub const NULL: LinkType = LinkType(0);
    pub const ETHERNET: LinkType = LinkType(1);
    pub const RAW: LinkType = LinkType(101);
    pub const LOOP: LinkType = LinkType(108);
    pub const LINUX_SLL: LinkType = LinkType(113);
    pub const IPV4: LinkType = LinkType(228);
    pub const IPV6: LinkType = LinkType(229);
    pub const LINUX_SLL2: LinkType = LinkType(276);
}

impl From<pcap_parser::Linktype> for LinkType {
    fn from(value: pcap_parser::Linktype) -> Self {
        LinkType(value.0)
    }
}

/// Container format of a capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    /// Classic pcap; `nanosecond` selects the timestamp resolution
    Pcap { nanosecond: bool },
    /// pcapng
    PcapNg,
}

impl CaptureFormat {
    /// Identify the container from the first four bytes of a file.
    pub fn detect(magic: [u8; 4]) -> Result<Self> {
        match magic {
            PCAPNG_MAGIC => Ok(CaptureFormat::PcapNg),
            PCAP_MICROS_LE | PCAP_MICROS_BE => Ok(CaptureFormat::Pcap { nanosecond: false }),
            PCAP_NANOS_LE | PCAP_NANOS_BE => Ok(CaptureFormat::Pcap { nanosecond: true }),
            other => Err(ExtractError::capture(
                "Capture format detection",
                format!(
                    "Unrecognised magic {:02x} {:02x} {:02x} {:02x}; expected pcap or pcapng",
                    other[0], other[1], other[2], other[3]
                ),
            )),
        }
    }
}

/// Timestamp of a classic pcap record.
pub fn pcap_timestamp(ts_sec: u32, ts_fraction: u32, nanosecond: bool) -> Timestamp {
    let nanos = if nanosecond { ts_fraction } else { ts_fraction.saturating_mul(1_000) };
    Timestamp::new(i64::from(ts_sec), nanos)
}

/// Per-interface state announced by a pcapng Interface Description Block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interface {
    pub link_type: LinkType,
    /// `if_tsresol` option: bit 7 selects base 2, the rest is the exponent
    pub ts_resolution: u8,
    /// `if_tsoffset` option, in seconds
    pub ts_offset: i64,
}

impl Interface {
    pub fn new(link_type: LinkType, ts_resolution: u8, ts_offset: i64) -> Self {
        Self { link_type, ts_resolution, ts_offset }
    }

    /// Units per second implied by `ts_resolution`.
    fn units_per_second(&self) -> Option<i128> {
        let exponent = u32::from(self.ts_resolution & 0x7f);
        if self.ts_resolution & 0x80 != 0 {
            2i128.checked_pow(exponent)
        } else {
            10i128.checked_pow(exponent)
        }
    }

    /// Convert the split 64-bit timestamp of an enhanced packet block.
    pub fn timestamp(&self, ts_high: u32, ts_low: u32) -> Timestamp {
        let ticks = i128::from((u64::from(ts_high) << 32) | u64::from(ts_low));
        let offset_nanos = i128::from(self.ts_offset) * 1_000_000_000;
        let nanos = match self.units_per_second() {
            Some(units) if units > 0 => ticks * 1_000_000_000 / units,
            _ => ticks,
        };
        Timestamp::from_unix_nanos(nanos + offset_nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_all_pcap_magics() {
        assert_eq!(CaptureFormat::detect(PCAPNG_MAGIC).unwrap(), CaptureFormat::PcapNg);
        assert_eq!(
            CaptureFormat::detect(PCAP_MICROS_LE).unwrap(),
            CaptureFormat::Pcap { nanosecond: false }
        );
        assert_eq!(
            CaptureFormat::detect(PCAP_MICROS_BE).unwrap(),
            CaptureFormat::Pcap { nanosecond: false }
        );
        assert_eq!(
            CaptureFormat::detect(PCAP_NANOS_LE).unwrap(),
            CaptureFormat::Pcap { nanosecond: true }
        );
        assert_eq!(
            CaptureFormat::detect(PCAP_NANOS_BE).unwrap(),
            CaptureFormat::Pcap { nanosecond: true }
        );
    }

    #[test]
    fn rejects_unknown_magic() {
        let err = CaptureFormat::detect(*b"GIF8").unwrap_err();
        assert!(matches!(err, ExtractError::Capture { .. }));
    }

    #[test]
    fn pcap_timestamps_scale_fraction() {
        let micros = pcap_timestamp(100, 250_000, false);
        assert_eq!((micros.unix_seconds(), micros.subsec_nanos()), (100, 250_000_000));

        let nanos = pcap_timestamp(100, 250_000, true);
        assert_eq!((nanos.unix_seconds(), nanos.subsec_nanos()), (100, 250_000));
    }

    #[test]
    fn pcapng_timestamps_honour_resolution_and_offset() {
        let micros = Interface::new(LinkType::ETHERNET, 6, 0);
        let ticks: u64 = 1_700_000_000 * 1_000_000 + 42;
        let ts = micros.timestamp((ticks >> 32) as u32, ticks as u32);
        assert_eq!((ts.unix_seconds(), ts.subsec_nanos()), (1_700_000_000, 42_000));

        let nanos = Interface::new(LinkType::ETHERNET, 9, 10);
        let ts = nanos.timestamp(0, 1_500_000_000);
        assert_eq!((ts.unix_seconds(), ts.subsec_nanos()), (11, 500_000_000));

        let binary = Interface::new(LinkType::ETHERNET, 0x80 | 10, 0);
        let ts = binary.timestamp(0, 1024 * 3 + 512);
        assert_eq!((ts.unix_seconds(), ts.subsec_nanos()), (3, 500_000_000));
    }

    #[test]
    fn resolution_zero_counts_whole_seconds() {
        let interface = Interface::new(LinkType::ETHERNET, 0, 0);
        let ts = interface.timestamp(0, 90);
        assert_eq!((ts.unix_seconds(), ts.subsec_nanos()), (90, 0));
    }
}
