use crate::link_layer::{DecodedFrame, LinkMetadata, MacAddress, PacketType};

/// Destination MAC, source MAC and EtherType
pub const ETHERNET_HEADER_LENGTH: usize = 14;

const ETHER_TYPE_IPV4: u16 = 0x0800;
const ETHER_TYPE_IPV6: u16 = 0x86DD;
const ETHER_TYPE_IPX: u16 = 0x8137;
/// Values below this are 802.3 payload lengths rather than EtherTypes
const ETHER_TYPE_MINIMUM: u16 = 0x0600;

fn classify(ether_type: u16) -> PacketType {
    match ether_type {
        ETHER_TYPE_IPV4 => PacketType::Ipv4,
        ETHER_TYPE_IPV6 => PacketType::Ipv6,
        ETHER_TYPE_IPX => PacketType::Ipx,
        length if length < ETHER_TYPE_MINIMUM => PacketType::Osi,
        _ => PacketType::Unknown,
    }
}

pub(super) fn decode(frame: &[u8]) -> DecodedFrame {
    let Some(header) = frame.get(..ETHERNET_HEADER_LENGTH) else {
        return DecodedFrame::passthrough();
    };
    let mut destination = [0u8; 6];
    destination.copy_from_slice(&header[0..6]);
    let mut source = [0u8; 6];
    source.copy_from_slice(&header[6..12]);
    // EtherType is always network byte order, whatever the capture file uses
    let ether_type = u16::from_be_bytes([header[12], header[13]]);
    DecodedFrame {
        header_length: ETHERNET_HEADER_LENGTH,
        packet_type: classify(ether_type),
        metadata: LinkMetadata::Ethernet {
            destination: MacAddress(destination),
            source: MacAddress(source),
            ether_type,
        },
    }
}
