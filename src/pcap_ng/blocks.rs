//! Block Types for pcap-ng files
//!
//! Every block is framed the same way: a 4 byte type, a 4 byte total length,
//! the body, and the total length again. [read_block] handles the framing and
//! leaves the body in a caller owned buffer; [PcapNgBlock::parse] turns the body
//! into one of the typed blocks below.
use std::io::Read;

use tracing::trace;

use crate::{
    byte_order::{ByteOrder, Endianness},
    pcap_ng::{BLOCK_FRAMING_LENGTH, PCAP_NG_MAGIC, PcapNgParseError},
    utils::read_up_to,
};

mod enhanced_packet;
mod generic;
mod header;
mod interface;
mod interface_statistics;
mod name_resolution;
mod packet;
mod simple_packet;
pub use enhanced_packet::{EnhancedPacket, EnhancedPacketOptionCodes};
pub use generic::GenericBlock;
pub use header::{SHBOptionCodes, SectionHeaderBlock};
pub use interface::{InterfaceDescriptionBlock, InterfaceOptionCodes};
pub use interface_statistics::{InterfaceStatisticsBlock, InterfaceStatisticsOptionCodes};
pub use name_resolution::{NameRecord, NameResolutionBlock, NameResolutionOptionCodes};
pub use packet::PacketBlock;
pub use simple_packet::SimplePacket;

pub trait Block<'b>: Sized {
    /// Returns the block ID for this block type
    fn block_id() -> u32;
    /// Minimum size of the block, including the header
    ///
    /// Should be at least 12 bytes for the header and footer.
    fn minimum_size() -> usize {
        BLOCK_FRAMING_LENGTH
    }
    /// Parses the body, everything between the leading and trailing length
    fn parse_body(body: &'b [u8], byte_order: Endianness) -> Result<Self, PcapNgParseError>;
}
/// Fails when a block of `total_length` bytes is smaller than `minimum`
pub(crate) fn ensure_block_size(
    block_type: u32,
    minimum: usize,
    total_length: usize,
) -> Result<(), PcapNgParseError> {
    if total_length < minimum {
        return Err(PcapNgParseError::BlockTooShort {
            block_type,
            minimum,
            got: total_length,
        });
    }
    Ok(())
}
/// Reads a u32 at `offset`, the caller has checked the length
#[inline(always)]
pub(crate) fn u32_at(bytes: &[u8], offset: usize, byte_order: Endianness) -> u32 {
    byte_order.u32_from_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
#[inline(always)]
pub(crate) fn u16_at(bytes: &[u8], offset: usize, byte_order: Endianness) -> u16 {
    byte_order.u16_from_bytes([bytes[offset], bytes[offset + 1]])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub block_id: [u8; 4],
    pub block_length: [u8; 4],
}
impl BlockHeader {
    pub fn new(block_id: [u8; 4], block_length: [u8; 4]) -> Self {
        Self {
            block_id,
            block_length,
        }
    }
    /// Returns the block ID as a u32
    pub fn block_id_as_u32(&self, endianness: impl ByteOrder) -> u32 {
        endianness.u32_from_bytes(self.block_id)
    }
    /// Returns the block length as a u32
    pub fn block_length_as_u32(&self, endianness: impl ByteOrder) -> u32 {
        endianness.u32_from_bytes(self.block_length)
    }
    /// The section header type reads the same in both byte orders
    pub fn is_section_header(&self) -> bool {
        self.block_id == PCAP_NG_MAGIC
    }
    /// Reads the 8 byte header
    ///
    /// `Ok(None)` means the stream ended cleanly before the block.
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<Self>, PcapNgParseError> {
        let mut bytes = [0u8; 8];
        let got = read_up_to(reader, &mut bytes)?;
        match got {
            0 => Ok(None),
            8 => Ok(Some(Self::new(
                [bytes[0], bytes[1], bytes[2], bytes[3]],
                [bytes[4], bytes[5], bytes[6], bytes[7]],
            ))),
            got => Err(PcapNgParseError::TruncatedBlockHeader { got }),
        }
    }
}

/// What [read_block] learned from the framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFrame {
    pub block_type: u32,
    /// Total length including the framing
    pub block_length: u32,
    /// Byte order of this block, a section header carries its own
    pub byte_order: Endianness,
}
impl BlockFrame {
    /// Enhanced, simple and obsolete packet blocks
    pub fn is_packet(&self) -> bool {
        self.block_type == EnhancedPacket::block_id()
            || self.block_type == SimplePacket::block_id()
            || self.block_type == PacketBlock::block_id()
    }
}

/// Reads the rest of the block after `header` into `body`
///
/// `byte_order` is the order of the current section. A section header
/// determines its own order from its byte-order magic. On success `body` holds
/// exactly the bytes between the two length fields.
pub fn read_block<R: Read>(
    reader: &mut R,
    header: &BlockHeader,
    byte_order: Endianness,
    body: &mut Vec<u8>,
) -> Result<BlockFrame, PcapNgParseError> {
    body.clear();
    let byte_order = if header.is_section_header() {
        let mut magic = [0u8; 4];
        let got = read_up_to(reader, &mut magic)?;
        if got < magic.len() {
            return Err(PcapNgParseError::TruncatedBlock {
                block_type: SectionHeaderBlock::block_id(),
                expected: magic.len(),
                got,
            });
        }
        body.extend_from_slice(&magic);
        Endianness::from_pcap_ng_bytes(magic)?
    } else {
        byte_order
    };
    let block_type = header.block_id_as_u32(byte_order);
    let block_length = header.block_length_as_u32(byte_order);
    if (block_length as usize) < BLOCK_FRAMING_LENGTH || block_length % 4 != 0 {
        return Err(PcapNgParseError::InvalidBlockLength {
            block_type,
            length: block_length,
        });
    }
    if header.is_section_header() {
        ensure_block_size(
            block_type,
            SectionHeaderBlock::minimum_size(),
            block_length as usize,
        )?;
    }
    // Remaining body plus the trailing length
    let expected = block_length as usize - BLOCK_FRAMING_LENGTH - body.len() + 4;
    let got = reader
        .by_ref()
        .take(expected as u64)
        .read_to_end(body)?;
    if got < expected {
        return Err(PcapNgParseError::TruncatedBlock {
            block_type,
            expected,
            got,
        });
    }
    let trailer_start = body.len() - 4;
    let trailing = u32_at(body, trailer_start, byte_order);
    body.truncate(trailer_start);
    if trailing != block_length {
        return Err(PcapNgParseError::BlockLengthMismatch {
            block_type,
            leading: block_length,
            trailing,
        });
    }
    Ok(BlockFrame {
        block_type,
        block_length,
        byte_order,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PcapNgBlock<'b> {
    SectionHeader(SectionHeaderBlock),
    InterfaceDescription(InterfaceDescriptionBlock),
    SimplePacket(SimplePacket<'b>),
    EnhancedPacket(EnhancedPacket<'b>),
    Packet(PacketBlock<'b>),
    NameResolution(NameResolutionBlock),
    InterfaceStatistics(InterfaceStatisticsBlock),
    Generic(GenericBlock<'b>),
}
impl<'b> PcapNgBlock<'b> {
    /// Parses the body of a block read by [read_block]
    pub fn parse(frame: &BlockFrame, body: &'b [u8]) -> Result<Self, PcapNgParseError> {
        let byte_order = frame.byte_order;
        let block = match frame.block_type {
            0x0A0D_0D0A => Self::SectionHeader(SectionHeaderBlock::parse_body(body, byte_order)?),
            1 => Self::InterfaceDescription(InterfaceDescriptionBlock::parse_body(
                body, byte_order,
            )?),
            2 => Self::Packet(PacketBlock::parse_body(body, byte_order)?),
            3 => Self::SimplePacket(SimplePacket::parse_body(body, byte_order)?),
            4 => Self::NameResolution(NameResolutionBlock::parse_body(body, byte_order)?),
            5 => Self::InterfaceStatistics(InterfaceStatisticsBlock::parse_body(
                body, byte_order,
            )?),
            6 => Self::EnhancedPacket(EnhancedPacket::parse_body(body, byte_order)?),
            block_type => {
                trace!(block_type, length = frame.block_length, "Opaque block");
                Self::Generic(GenericBlock::new(block_type, body))
            }
        };
        Ok(block)
    }
    /// The block type as stored in the file
    pub fn block_type(&self) -> u32 {
        match self {
            Self::SectionHeader(_) => SectionHeaderBlock::block_id(),
            Self::InterfaceDescription(_) => InterfaceDescriptionBlock::block_id(),
            Self::SimplePacket(_) => SimplePacket::block_id(),
            Self::EnhancedPacket(_) => EnhancedPacket::block_id(),
            Self::Packet(_) => PacketBlock::block_id(),
            Self::NameResolution(_) => NameResolutionBlock::block_id(),
            Self::InterfaceStatistics(_) => InterfaceStatisticsBlock::block_id(),
            Self::Generic(block) => block.block_type,
        }
    }
    /// Enhanced, simple and obsolete packet blocks
    pub fn is_packet(&self) -> bool {
        matches!(
            self,
            Self::SimplePacket(_) | Self::EnhancedPacket(_) | Self::Packet(_)
        )
    }
}
