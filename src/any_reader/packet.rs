use std::sync::Arc;

use crate::{
    PcapFileType, Version,
    byte_order::Endianness,
    link_layer::{DecodedFrame, LinkMetadata, MacAddress, PacketType},
    link_type::LinkType,
    pcap_ng::{
        Interface, Section,
        blocks::EnhancedPacketOptionCodes,
        options::BlockOptions,
    },
    timestamp::Timestamp,
};

/// The capture as a whole, as known when the reader was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFile {
    pub file_type: PcapFileType,
    /// For pcap-ng, the version of the current section
    pub version: Version,
    /// For pcap-ng, the byte order of the current section
    pub byte_order: Endianness,
    /// pcap only, pcap-ng declares it per interface
    pub snap_length: Option<u32>,
    /// pcap only, pcap-ng declares it per interface
    pub link_type: Option<LinkType>,
}

/// Section and interface details attached to packets read from pcap-ng
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcapNgMetadata {
    pub section: Arc<Section>,
    pub interface: Arc<Interface>,
    /// Options of the packet block itself
    pub options: BlockOptions,
}
impl PcapNgMetadata {
    /// Comments attached to the packet
    pub fn comments(&self) -> Vec<String> {
        self.options.comments()
    }
    pub fn section_comments(&self) -> &[String] {
        &self.section.comments
    }
    pub fn hardware(&self) -> Option<&str> {
        self.section.hardware.as_deref()
    }
    pub fn os(&self) -> Option<&str> {
        self.section.os.as_deref()
    }
    pub fn user_application(&self) -> Option<&str> {
        self.section.user_application.as_deref()
    }
    pub fn interface_name(&self) -> Option<&str> {
        self.interface.name.as_deref()
    }
    /// The `epb_flags` word of an enhanced packet
    pub fn flags(&self) -> Option<u32> {
        self.options
            .u32_value(EnhancedPacketOptionCodes::Flags as u16, self.section.byte_order)
    }
}

/// One decoded packet
///
/// Owns its data; nothing refers back into the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub capture_type: PcapFileType,
    pub version: Version,
    pub byte_order: Endianness,
    /// Zero means no limit
    pub snap_length: u32,
    pub link_type: LinkType,
    /// `None` only for pcap-ng simple packet blocks
    pub timestamp: Option<Timestamp>,
    pub original_length: u32,
    /// Captured bytes, including the link-layer header
    pub data: Vec<u8>,
    pub packet_type: PacketType,
    pub link: LinkMetadata,
    /// Present for pcap-ng captures
    pub pcapng: Option<PcapNgMetadata>,
    header_length: usize,
}
impl Packet {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        capture_type: PcapFileType,
        version: Version,
        byte_order: Endianness,
        snap_length: u32,
        link_type: LinkType,
        timestamp: Option<Timestamp>,
        original_length: u32,
        data: Vec<u8>,
        decoded: DecodedFrame,
        pcapng: Option<PcapNgMetadata>,
    ) -> Self {
        Self {
            capture_type,
            version,
            byte_order,
            snap_length,
            link_type,
            timestamp,
            original_length,
            data,
            packet_type: decoded.packet_type,
            link: decoded.metadata,
            pcapng,
            header_length: decoded.header_length,
        }
    }
    /// The bytes after the link-layer header
    pub fn payload(&self) -> &[u8] {
        self.data.get(self.header_length..).unwrap_or_default()
    }
    pub fn captured_length(&self) -> usize {
        self.data.len()
    }
    pub fn src_mac(&self) -> Option<MacAddress> {
        self.link.src_mac()
    }
    pub fn dst_mac(&self) -> Option<MacAddress> {
        self.link.dst_mac()
    }
}
