//! Link-layer header decoding
//!
//! Each supported link type strips its framing header and reports what the
//! payload carries. Unsupported link types pass the frame through untouched
//! with [PacketType::Unknown]; decoding never fails.
use std::fmt::{self, Display};

use crate::{byte_order::Endianness, link_type::LinkType};

mod ethernet;
mod null;
pub use ethernet::ETHERNET_HEADER_LENGTH;
pub use null::NULL_HEADER_LENGTH;

/// Network-layer classification of a captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PacketType {
    Ipv4,
    Ipv6,
    Ipx,
    /// ISO/OSI protocols, including 802.3 frames carrying LLC
    Osi,
    #[default]
    Unknown,
}
impl Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PacketType::Ipv4 => "IPv4",
            PacketType::Ipv6 => "IPv6",
            PacketType::Ipx => "IPX",
            PacketType::Osi => "OSI",
            PacketType::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// A 48-bit hardware address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);
impl MacAddress {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}
impl Display for MacAddress {
    /// Lowercase, colon separated: `00:01:2e:78:08:b1`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Header fields recovered from the link-layer framing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMetadata {
    /// The link type has no header, or the header could not be read
    #[default]
    None,
    Ethernet {
        destination: MacAddress,
        source: MacAddress,
        /// EtherType, or the 802.3 payload length when below 0x0600
        ether_type: u16,
    },
    /// BSD loopback address family
    Null { family: u32 },
}
impl LinkMetadata {
    pub fn dst_mac(&self) -> Option<MacAddress> {
        match self {
            LinkMetadata::Ethernet { destination, .. } => Some(*destination),
            _ => None,
        }
    }
    pub fn src_mac(&self) -> Option<MacAddress> {
        match self {
            LinkMetadata::Ethernet { source, .. } => Some(*source),
            _ => None,
        }
    }
}

/// The result of decoding one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodedFrame {
    /// Number of header bytes preceding the payload
    pub header_length: usize,
    pub packet_type: PacketType,
    pub metadata: LinkMetadata,
}
impl DecodedFrame {
    pub(crate) fn passthrough() -> Self {
        Self::default()
    }
    pub(crate) fn headerless(packet_type: PacketType) -> Self {
        Self {
            packet_type,
            ..Self::default()
        }
    }
    /// The bytes after the link-layer header
    pub fn payload<'a>(&self, frame: &'a [u8]) -> &'a [u8] {
        frame.get(self.header_length..).unwrap_or_default()
    }
}

/// Picks the header layout to strip from captured frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLayerDecoder {
    Ethernet,
    /// Address family in the byte order of the capture
    Null,
    /// Address family always in network byte order
    Loop,
    /// Raw IP, version read from the first nibble
    Raw,
    Ipv4,
    Ipv6,
    Passthrough,
}
impl LinkLayerDecoder {
    pub fn for_link_type(link_type: LinkType) -> Self {
        match link_type {
            LinkType::Ethernet => Self::Ethernet,
            LinkType::Null => Self::Null,
            LinkType::Loop => Self::Loop,
            LinkType::Raw => Self::Raw,
            LinkType::Ipv4 => Self::Ipv4,
            LinkType::Ipv6 => Self::Ipv6,
            _ => Self::Passthrough,
        }
    }
    pub fn decode(self, frame: &[u8], byte_order: Endianness) -> DecodedFrame {
        match self {
            Self::Ethernet => ethernet::decode(frame),
            Self::Null => null::decode(frame, byte_order),
            Self::Loop => null::decode(frame, Endianness::BigEndian),
            Self::Raw => DecodedFrame::headerless(ip_version(frame)),
            Self::Ipv4 => DecodedFrame::headerless(PacketType::Ipv4),
            Self::Ipv6 => DecodedFrame::headerless(PacketType::Ipv6),
            Self::Passthrough => DecodedFrame::passthrough(),
        }
    }
}

fn ip_version(frame: &[u8]) -> PacketType {
    match frame.first().map(|byte| byte >> 4) {
        Some(4) => PacketType::Ipv4,
        Some(6) => PacketType::Ipv6,
        _ => PacketType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_formatting() {
        let mac = MacAddress([0x00, 0x01, 0x2e, 0x78, 0x08, 0xb1]);
        assert_eq!(mac.to_string(), "00:01:2e:78:08:b1");
        assert_eq!(
            MacAddress([0xFF, 0xAB, 0, 0, 0x0A, 1]).to_string(),
            "ff:ab:00:00:0a:01"
        );
    }

    #[test]
    fn raw_uses_first_nibble() {
        let decoder = LinkLayerDecoder::for_link_type(LinkType::Raw);
        let v4 = decoder.decode(&[0x45, 0, 0, 20], Endianness::BigEndian);
        assert_eq!(v4.packet_type, PacketType::Ipv4);
        assert_eq!(v4.header_length, 0);
        let v6 = decoder.decode(&[0x60, 0, 0, 0], Endianness::BigEndian);
        assert_eq!(v6.packet_type, PacketType::Ipv6);
        let other = decoder.decode(&[0x10], Endianness::BigEndian);
        assert_eq!(other.packet_type, PacketType::Unknown);
        let empty = decoder.decode(&[], Endianness::BigEndian);
        assert_eq!(empty.packet_type, PacketType::Unknown);
    }

    #[test]
    fn ip_only_link_types() {
        let frame = [0u8; 8];
        let v4 = LinkLayerDecoder::for_link_type(LinkType::Ipv4).decode(&frame, Endianness::LittleEndian);
        assert_eq!(v4.packet_type, PacketType::Ipv4);
        assert_eq!(v4.payload(&frame), &frame);
        let v6 = LinkLayerDecoder::for_link_type(LinkType::Ipv6).decode(&frame, Endianness::LittleEndian);
        assert_eq!(v6.packet_type, PacketType::Ipv6);
    }

    #[test]
    fn unsupported_link_type_passes_through() {
        let frame = [1u8, 2, 3];
        for link_type in [LinkType::LinuxSll, LinkType::Unknown(9999)] {
            let decoder = LinkLayerDecoder::for_link_type(link_type);
            assert_eq!(decoder, LinkLayerDecoder::Passthrough);
            let decoded = decoder.decode(&frame, Endianness::BigEndian);
            assert_eq!(decoded.packet_type, PacketType::Unknown);
            assert_eq!(decoded.metadata, LinkMetadata::None);
            assert_eq!(decoded.payload(&frame), &frame);
        }
    }
}
