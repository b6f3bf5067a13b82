//! Capture builders shared by the integration tests
//!
//! `framecap::test_utils` is only compiled for unit tests and the `benchmark`
//! feature, so it is not visible to a plain `cargo test` integration build.
//! These builders write the files independently of the library's own writers,
//! which also keeps the end-to-end tests from sharing a byte-layout mistake
//! with the code under test.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const HEADER_LEN: usize = 54;

/// One chunk datagram on the wire, with its capture time in whole seconds
pub struct Chunk {
    pub stream_id: u32,
    pub index: u8,
    pub payload: Vec<u8>,
    pub secs: u32,
}

impl Chunk {
    pub fn new(stream_id: u32, index: u8, payload: &[u8], secs: u32) -> Self {
        Self { stream_id, index, payload: payload.to_vec(), secs }
    }

    /// Chunk datagram: magic, scattered stream id bytes, index and flags
    pub fn datagram(&self) -> Vec<u8> {
        let id = self.stream_id.to_be_bytes();
        let mut datagram = vec![0u8; HEADER_LEN];
        datagram[0] = 0x63;
        datagram[1] = 0x63;
        datagram[8] = id[0];
        datagram[9] = id[1];
        datagram[12] = id[2];
        datagram[13] = id[3];
        datagram[48] = self.index;
        datagram.extend_from_slice(&self.payload);
        datagram
    }

    /// Ethernet/IPv4/UDP frame carrying the datagram
    pub fn frame(&self) -> Vec<u8> {
        udp_frame(&self.datagram())
    }
}

pub fn soi(body: &[u8]) -> Vec<u8> {
    [&[0xff, 0xd8][..], body].concat()
}

pub fn eoi(body: &[u8]) -> Vec<u8> {
    [body, &[0xff, 0xd9][..]].concat()
}

/// Ethernet/IPv4/UDP frame with the given UDP payload
pub fn udp_frame(payload: &[u8]) -> Vec<u8> {
    let udp_len = 8 + payload.len();
    let ip_len = 20 + udp_len;

    let mut frame = vec![0x02, 0, 0, 0, 0, 0x02, 0x02, 0, 0, 0, 0, 0x01, 0x08, 0x00];
    frame.extend_from_slice(&[0x45, 0x00]);
    frame.extend_from_slice(&(ip_len as u16).to_be_bytes());
    frame.extend_from_slice(&[0, 0, 0x40, 0x00, 64, 17, 0, 0]);
    frame.extend_from_slice(&[10, 0, 0, 1, 10, 0, 0, 2]);
    frame.extend_from_slice(&40000u16.to_be_bytes());
    frame.extend_from_slice(&50000u16.to_be_bytes());
    frame.extend_from_slice(&(udp_len as u16).to_be_bytes());
    frame.extend_from_slice(&[0, 0]);
    frame.extend_from_slice(payload);
    frame
}

/// Classic little-endian microsecond pcap with Ethernet link type
pub fn pcap_file(frames: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 8]);
    bytes.extend_from_slice(&65535u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    for (secs, frame) in frames {
        bytes.extend_from_slice(&secs.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(frame);
    }
    bytes
}

/// Little-endian pcapng with one Ethernet interface at microsecond resolution
pub fn pcapng_file(frames: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for word in [0x0a0d_0d0au32, 28, 0x1a2b_3c4d] {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&(-1i64).to_le_bytes());
    bytes.extend_from_slice(&28u32.to_le_bytes());

    for word in [1u32, 20] {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&65535u32.to_le_bytes());
    bytes.extend_from_slice(&20u32.to_le_bytes());

    for (secs, frame) in frames {
        let padded = frame.len().div_ceil(4) * 4;
        let block_len = (32 + padded) as u32;
        let ticks = u64::from(*secs) * 1_000_000;
        for word in [6u32, block_len, 0, (ticks >> 32) as u32, ticks as u32] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(frame);
        bytes.resize(bytes.len() + padded - frame.len(), 0);
        bytes.extend_from_slice(&block_len.to_le_bytes());
    }
    bytes
}

/// Frames for the given chunks in the order given
pub fn frames(chunks: &[Chunk]) -> Vec<(u32, Vec<u8>)> {
    chunks.iter().map(|c| (c.secs, c.frame())).collect()
}

pub fn write_capture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write capture");
    path
}
