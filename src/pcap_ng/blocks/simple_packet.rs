use crate::{
    byte_order::Endianness,
    pcap_ng::{
        PcapNgParseError,
        blocks::{BLOCK_FRAMING_LENGTH, Block, ensure_block_size, u32_at},
    },
};

/// A packet without interface id, timestamp or options
///
/// Always belongs to the first interface of the section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplePacket<'b> {
    pub original_length: u32,
    /// At most `original_length` bytes; padding is never included
    pub content: &'b [u8],
}
impl<'b> SimplePacket<'b> {
    /// Data kept after applying the interface snap length, zero means unlimited
    pub fn captured(&self, snap_length: u32) -> &'b [u8] {
        match snap_length {
            0 => self.content,
            snap_length => &self.content[..self.content.len().min(snap_length as usize)],
        }
    }
}
impl<'b> Block<'b> for SimplePacket<'b> {
    fn block_id() -> u32 {
        3
    }

    fn minimum_size() -> usize {
        BLOCK_FRAMING_LENGTH + 4
    }
    fn parse_body(body: &'b [u8], byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        ensure_block_size(
            Self::block_id(),
            Self::minimum_size(),
            body.len() + BLOCK_FRAMING_LENGTH,
        )?;
        let original_length = u32_at(body, 0, byte_order);
        let region = &body[4..];
        let captured = region.len().min(original_length as usize);
        Ok(Self {
            original_length,
            content: &region[..captured],
        })
    }
}
