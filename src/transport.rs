//! Link, network and transport layer decoding
//!
//! Captures hold whole link-layer frames; the reassembler only cares about
//! UDP payloads. [`decode`] peels the link and IP headers off a
//! [`RawFrame`] and reports whether a UDP datagram sits underneath.
//!
//! Supported link types: Ethernet (with 802.1Q/802.1ad tags), Linux cooked
//! capture v1 and v2, raw IP and BSD loopback. IPv4 and IPv6 (with the common
//! extension headers) are understood. Fragmented datagrams, first fragment
//! included, are reported as [`Transport::NotUdp`]: a fragment never holds a
//! whole datagram, and no reassembly is attempted.

use crate::capture::{LinkType, RawFrame};

const ETHERTYPE_IPV4: u16 = 0x0800;
const ETHERTYPE_IPV6: u16 = 0x86dd;
const ETHERTYPE_VLAN: [u16; 3] = [0x8100, 0x88a8, 0x9100];

const ETHERNET_HEADER_LEN: usize = 14;
const VLAN_TAG_LEN: usize = 4;
const SLL_HEADER_LEN: usize = 16;
const SLL2_HEADER_LEN: usize = 20;
const LOOPBACK_HEADER_LEN: usize = 4;

const IPV4_MIN_HEADER_LEN: usize = 20;
const IPV6_HEADER_LEN: usize = 40;
const UDP_HEADER_LEN: usize = 8;

const IPV4_MORE_FRAGMENTS: u16 = 0x2000;
const IPV4_FRAGMENT_OFFSET: u16 = 0x1fff;
const IPV6_MORE_FRAGMENTS: u16 = 0x0001;

const IPPROTO_HOPOPTS: u8 = 0;
const IPPROTO_UDP: u8 = 17;
const IPPROTO_ROUTING: u8 = 43;
const IPPROTO_FRAGMENT: u8 = 44;
const IPPROTO_DSTOPTS: u8 = 60;

/// Transport layer found inside a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport<'a> {
    /// A UDP datagram
    Udp { src_port: u16, dst_port: u16, payload: &'a [u8] },
    /// Anything else: other protocols, unsupported links, truncated headers
    NotUdp,
}

impl<'a> Transport<'a> {
    /// The UDP payload, if this is a UDP datagram.
    pub fn udp_payload(self) -> Option<&'a [u8]> {
        match self {
            Transport::Udp { payload, .. } => Some(payload),
            Transport::NotUdp => None,
        }
    }
}

/// Decode the transport layer of a captured frame.
pub fn decode(frame: &RawFrame) -> Transport<'_> {
    decode_link(frame.link_type, &frame.data)
}

/// Decode the transport layer of raw link-layer bytes.
pub fn decode_link(link_type: LinkType, data: &[u8]) -> Transport<'_> {
    let Some(ip) = network_layer(link_type, data) else {
        return Transport::NotUdp;
    };

    let segment = match ip {
        IpPacket::V4(packet) => ipv4_udp(packet),
        IpPacket::V6(packet) => ipv6_udp(packet),
    };
    segment.map_or(Transport::NotUdp, udp)
}

enum IpPacket<'a> {
    V4(&'a [u8]),
    V6(&'a [u8]),
}

fn network_layer(link_type: LinkType, data: &[u8]) -> Option<IpPacket<'_>> {
    match link_type {
        LinkType::ETHERNET => {
            let mut offset = ETHERNET_HEADER_LEN;
            let mut ethertype = read_u16(data, offset - 2)?;
            while ETHERTYPE_VLAN.contains(&ethertype) {
                offset += VLAN_TAG_LEN;
                ethertype = read_u16(data, offset - 2)?;
            }
            by_ethertype(ethertype, data.get(offset..)?)
        }
        LinkType::LINUX_SLL => by_ethertype(read_u16(data, 14)?, data.get(SLL_HEADER_LEN..)?),
        LinkType::LINUX_SLL2 => by_ethertype(read_u16(data, 0)?, data.get(SLL2_HEADER_LEN..)?),
        LinkType::RAW | LinkType::IPV4 | LinkType::IPV6 => by_version(data),
        LinkType::NULL | LinkType::LOOP => {
            let family = data.get(..LOOPBACK_HEADER_LEN)?;
            let family = [family[0], family[1], family[2], family[3]];
            let inner = &data[LOOPBACK_HEADER_LEN..];
            // The family word is host order for NULL and big endian for LOOP;
            // accept either.
            match (u32::from_le_bytes(family), u32::from_be_bytes(family)) {
                (2, _) | (_, 2) => Some(IpPacket::V4(inner)),
                (24 | 28 | 30, _) | (_, 24 | 28 | 30) => Some(IpPacket::V6(inner)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn by_ethertype(ethertype: u16, payload: &[u8]) -> Option<IpPacket<'_>> {
    match ethertype {
        ETHERTYPE_IPV4 => Some(IpPacket::V4(payload)),
        ETHERTYPE_IPV6 => Some(IpPacket::V6(payload)),
        _ => None,
    }
}

fn by_version(data: &[u8]) -> Option<IpPacket<'_>> {
    match data.first()? >> 4 {
        4 => Some(IpPacket::V4(data)),
        6 => Some(IpPacket::V6(data)),
        _ => None,
    }
}

fn ipv4_udp(packet: &[u8]) -> Option<&[u8]> {
    if packet.len() < IPV4_MIN_HEADER_LEN || packet[0] >> 4 != 4 {
        return None;
    }

    let header_len = usize::from(packet[0] & 0x0f) * 4;
    if header_len < IPV4_MIN_HEADER_LEN || packet[9] != IPPROTO_UDP {
        return None;
    }

    // Any fragment, first one included, lacks the complete datagram.
    let flags_and_offset = read_u16(packet, 6)?;
    if flags_and_offset & (IPV4_MORE_FRAGMENTS | IPV4_FRAGMENT_OFFSET) != 0 {
        return None;
    }

    // Ethernet pads short frames; trust the IP total length when it fits.
    let total_len = usize::from(read_u16(packet, 2)?);
    let end = if (header_len..=packet.len()).contains(&total_len) { total_len } else { packet.len() };
    packet.get(header_len..end)
}

fn ipv6_udp(packet: &[u8]) -> Option<&[u8]> {
    if packet.len() < IPV6_HEADER_LEN || packet[0] >> 4 != 6 {
        return None;
    }

    let payload_len = usize::from(read_u16(packet, 4)?);
    let end = (IPV6_HEADER_LEN + payload_len).min(packet.len());
    let mut next_header = packet[6];
    let mut rest = packet.get(IPV6_HEADER_LEN..end)?;

    loop {
        match next_header {
            IPPROTO_UDP => return Some(rest),
            IPPROTO_HOPOPTS | IPPROTO_ROUTING | IPPROTO_DSTOPTS => {
                let ext_len = (usize::from(*rest.get(1)?) + 1) * 8;
                next_header = rest[0];
                rest = rest.get(ext_len..)?;
            }
            IPPROTO_FRAGMENT => {
                let offset_and_flags = read_u16(rest, 2)?;
                if offset_and_flags >> 3 != 0 || offset_and_flags & IPV6_MORE_FRAGMENTS != 0 {
                    return None;
                }
                next_header = rest[0];
                rest = rest.get(8..)?;
            }
            _ => return None,
        }
    }
}

fn udp(segment: &[u8]) -> Transport<'_> {
    if segment.len() < UDP_HEADER_LEN {
        return Transport::NotUdp;
    }

    let src_port = u16::from_be_bytes([segment[0], segment[1]]);
    let dst_port = u16::from_be_bytes([segment[2], segment[3]]);
    let length = usize::from(u16::from_be_bytes([segment[4], segment[5]]));
    let end = if (UDP_HEADER_LEN..=segment.len()).contains(&length) { length } else { segment.len() };

    Transport::Udp { src_port, dst_port, payload: &segment[UDP_HEADER_LEN..end] }
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}
