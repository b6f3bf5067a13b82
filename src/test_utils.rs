//! Test utilities for building captures and stream datagrams
//!
//! These builders produce byte-exact pcap/pcapng files, link-layer frames and
//! stream protocol datagrams so tests and benchmarks can run without capture
//! fixtures on disk.

#![cfg(any(test, feature = "benchmark"))]

use crate::capture::{LinkType, RawFrame};
use crate::protocol::wire::{CHUNK_INDEX_OFFSET, FLAGS_OFFSET, HEADER_LEN, MAGIC, STREAM_ID_LAYOUT};
use crate::types::{StreamRecord, Timestamp};

const SRC_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
const DST_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];
const SRC_IPV4: [u8; 4] = [192, 168, 1, 10];
const DST_IPV4: [u8; 4] = [192, 168, 1, 20];

/// Build a stream protocol datagram with the given header fields.
pub fn stream_datagram(stream_id: u32, chunk_index: u8, flags: u8, payload: &[u8]) -> Vec<u8> {
    let mut datagram = vec![0u8; HEADER_LEN];
    datagram[..MAGIC.len()].copy_from_slice(&MAGIC);
    for byte in STREAM_ID_LAYOUT {
        datagram[byte.offset] = (stream_id >> byte.shift) as u8;
    }
    datagram[CHUNK_INDEX_OFFSET] = chunk_index;
    datagram[FLAGS_OFFSET] = flags;
    datagram.extend_from_slice(payload);
    datagram
}

/// Build a record directly, bypassing classification.
pub fn record(stream_id: u32, chunk_index: u8, payload: &[u8], timestamp: Timestamp) -> StreamRecord {
    StreamRecord {
        stream_id,
        chunk_index,
        flags: 0,
        payload: payload.to_vec(),
        timestamp,
        datagram_len: HEADER_LEN + payload.len(),
    }
}

/// Build an IPv4 packet carrying one UDP datagram.
pub fn ipv4_udp_packet(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let udp = udp_segment(src_port, dst_port, payload);
    let total_len = (20 + udp.len()) as u16;

    let mut packet = vec![0x45, 0x00];
    packet.extend_from_slice(&total_len.to_be_bytes());
    packet.extend_from_slice(&[0x00, 0x00, 0x40, 0x00, 64, 17, 0x00, 0x00]);
    packet.extend_from_slice(&SRC_IPV4);
    packet.extend_from_slice(&DST_IPV4);
    packet.extend_from_slice(&udp);
    packet
}

/// Build an Ethernet frame carrying an IPv4 UDP datagram.
pub fn ethernet_ipv4_udp(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = ethernet_header(0x0800);
    frame.extend_from_slice(&ipv4_udp_packet(src_port, dst_port, payload));
    frame
}

/// Build an Ethernet frame carrying an IPv6 UDP datagram.
pub fn ethernet_ipv6_udp(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let udp = udp_segment(src_port, dst_port, payload);

    let mut frame = ethernet_header(0x86dd);
    frame.extend_from_slice(&[0x60, 0x00, 0x00, 0x00]);
    frame.extend_from_slice(&(udp.len() as u16).to_be_bytes());
    frame.extend_from_slice(&[17, 64]);
    frame.extend_from_slice(&[0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    frame.extend_from_slice(&[0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]);
    frame.extend_from_slice(&udp);
    frame
}

/// Wrap a stream datagram into an Ethernet/IPv4/UDP frame.
pub fn stream_frame(
    stream_id: u32,
    chunk_index: u8,
    payload: &[u8],
    timestamp: Timestamp,
) -> RawFrame {
    RawFrame {
        data: ethernet_ipv4_udp(40000, 50000, &stream_datagram(stream_id, chunk_index, 0, payload)),
        link_type: LinkType::ETHERNET,
        timestamp,
    }
}

/// Payload of a first chunk: starts with the start-of-image marker.
pub fn first_chunk(body: &[u8]) -> Vec<u8> {
    let mut payload = vec![0xff, 0xd8];
    payload.extend_from_slice(body);
    payload
}

/// Payload of a last chunk: ends with the end-of-image marker.
pub fn last_chunk(body: &[u8]) -> Vec<u8> {
    let mut payload = body.to_vec();
    payload.extend_from_slice(&[0xff, 0xd9]);
    payload
}

fn ethernet_header(ethertype: u16) -> Vec<u8> {
    let mut header = DST_MAC.to_vec();
    header.extend_from_slice(&SRC_MAC);
    header.extend_from_slice(&ethertype.to_be_bytes());
    header
}

fn udp_segment(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut segment = Vec::with_capacity(8 + payload.len());
    segment.extend_from_slice(&src_port.to_be_bytes());
    segment.extend_from_slice(&dst_port.to_be_bytes());
    segment.extend_from_slice(&((8 + payload.len()) as u16).to_be_bytes());
    segment.extend_from_slice(&[0x00, 0x00]);
    segment.extend_from_slice(payload);
    segment
}

/// Writer for little-endian, microsecond resolution pcap files.
pub struct PcapWriter {
    bytes: Vec<u8>,
}

impl PcapWriter {
    pub fn new(link_type: LinkType) -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&4u16.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&65535u32.to_le_bytes());
        bytes.extend_from_slice(&(link_type.0 as u32).to_le_bytes());
        Self { bytes }
    }

    pub fn push(&mut self, timestamp: Timestamp, frame: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(&(timestamp.unix_seconds() as u32).to_le_bytes());
        self.bytes.extend_from_slice(&(timestamp.subsec_nanos() / 1_000).to_le_bytes());
        self.bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(frame);
        self
    }

    pub fn push_frame(&mut self, frame: &RawFrame) -> &mut Self {
        self.push(frame.timestamp, &frame.data)
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Writer for little-endian pcapng files with a single microsecond interface.
pub struct PcapNgWriter {
    bytes: Vec<u8>,
}

impl PcapNgWriter {
    pub fn new(link_type: LinkType) -> Self {
        let mut bytes = Vec::new();

        // Section header block
        bytes.extend_from_slice(&0x0a0d_0d0au32.to_le_bytes());
        bytes.extend_from_slice(&28u32.to_le_bytes());
        bytes.extend_from_slice(&0x1a2b_3c4du32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&(-1i64).to_le_bytes());
        bytes.extend_from_slice(&28u32.to_le_bytes());

        // Interface description block, default resolution
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&20u32.to_le_bytes());
        bytes.extend_from_slice(&(link_type.0 as u16).to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&65535u32.to_le_bytes());
        bytes.extend_from_slice(&20u32.to_le_bytes());

        Self { bytes }
    }

    pub fn push(&mut self, timestamp: Timestamp, frame: &[u8]) -> &mut Self {
        let padded_len = frame.len().div_ceil(4) * 4;
        let block_len = (32 + padded_len) as u32;
        let ticks = timestamp.unix_seconds() as u64 * 1_000_000
            + u64::from(timestamp.subsec_nanos() / 1_000);

        self.bytes.extend_from_slice(&6u32.to_le_bytes());
        self.bytes.extend_from_slice(&block_len.to_le_bytes());
        self.bytes.extend_from_slice(&0u32.to_le_bytes());
        self.bytes.extend_from_slice(&((ticks >> 32) as u32).to_le_bytes());
        self.bytes.extend_from_slice(&(ticks as u32).to_le_bytes());
        self.bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(frame);
        self.bytes.resize(self.bytes.len() + padded_len - frame.len(), 0);
        self.bytes.extend_from_slice(&block_len.to_le_bytes());
        self
    }

    pub fn push_frame(&mut self, frame: &RawFrame) -> &mut Self {
        self.push(frame.timestamp, &frame.data)
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
