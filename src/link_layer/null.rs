use crate::{
    byte_order::{ByteOrder, Endianness},
    link_layer::{DecodedFrame, LinkMetadata, PacketType},
};

/// The 4 byte address family word
pub const NULL_HEADER_LENGTH: usize = 4;

const AF_INET: u32 = 2;
const AF_ISO: u32 = 7;
const AF_INET6_LINUX: u32 = 10;
const AF_IPX: u32 = 23;
const AF_INET6_BSD: u32 = 24;
const AF_INET6_FREEBSD: u32 = 28;
const AF_INET6_DARWIN: u32 = 30;

fn classify(family: u32) -> PacketType {
    match family {
        AF_INET => PacketType::Ipv4,
        AF_INET6_LINUX | AF_INET6_BSD | AF_INET6_FREEBSD | AF_INET6_DARWIN => PacketType::Ipv6,
        AF_IPX => PacketType::Ipx,
        AF_ISO => PacketType::Osi,
        _ => PacketType::Unknown,
    }
}

pub(super) fn decode(frame: &[u8], byte_order: Endianness) -> DecodedFrame {
    let Some(&[a, b, c, d]) = frame.first_chunk::<NULL_HEADER_LENGTH>() else {
        return DecodedFrame::passthrough();
    };
    let family = byte_order.u32_from_bytes([a, b, c, d]);
    DecodedFrame {
        header_length: NULL_HEADER_LENGTH,
        packet_type: classify(family),
        metadata: LinkMetadata::Null { family },
    }
}
