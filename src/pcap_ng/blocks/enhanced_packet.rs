use crate::{
    byte_order::Endianness,
    pcap_ng::{
        PcapNgParseError,
        blocks::{BLOCK_FRAMING_LENGTH, Block, ensure_block_size, u32_at},
        options::{BlockOptions, define_options_enum},
        padded_length,
    },
};
define_options_enum! {
    /// Options for the Enhanced Packet Block
    enum EnhancedPacketOptionCodes {
        /// 32-bit link-layer flags: direction, reception type, FCS length and errors
        Flags = 2,
        Hash = 3,
        DropCount = 4,
        PacketId = 5,
        Queue = 6,
        Verdict = 7,
    }
}

/// Interface id, both timestamp words and both lengths
const FIXED_LENGTH: usize = 20;

/// Splits `region` into the captured data and whatever follows its padding
///
/// Shared by every block that stores `captured_length` bytes of packet data
/// followed by options.
pub(super) fn split_packet_data(
    block_type: u32,
    region: &[u8],
    captured_length: u32,
) -> Result<(&[u8], &[u8]), PcapNgParseError> {
    let length = captured_length as usize;
    if length > region.len() {
        return Err(PcapNgParseError::CapturedLengthExceedsBlock {
            block_type,
            captured_length,
            available: region.len(),
        });
    }
    // The last packet of a block sometimes omits its padding
    let options_start = padded_length(length).min(region.len());
    Ok((&region[..length], &region[options_start..]))
}
/// Joins the two 32-bit halves of a pcap-ng timestamp
#[inline(always)]
pub(super) fn join_timestamp(high: u32, low: u32) -> u64 {
    ((high as u64) << 32) | low as u64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancedPacket<'b> {
    // 8..12
    pub interface_id: u32,
    // 12..16
    pub timestamp_high: u32,
    // 16..20
    pub timestamp_low: u32,
    // 20..24
    pub captured_length: u32,
    // 24..28
    pub original_length: u32,

    pub content: &'b [u8],

    pub options: BlockOptions,
}
impl EnhancedPacket<'_> {
    /// Raw timestamp in units of the interface resolution
    pub fn timestamp(&self) -> u64 {
        join_timestamp(self.timestamp_high, self.timestamp_low)
    }
    /// The `epb_flags` word, if present
    pub fn flags(&self, byte_order: Endianness) -> Option<u32> {
        self.options
            .u32_value(EnhancedPacketOptionCodes::Flags as u16, byte_order)
    }
}
impl<'b> Block<'b> for EnhancedPacket<'b> {
    fn block_id() -> u32 {
        6
    }

    fn minimum_size() -> usize {
        BLOCK_FRAMING_LENGTH + FIXED_LENGTH
    }
    fn parse_body(body: &'b [u8], byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        ensure_block_size(
            Self::block_id(),
            Self::minimum_size(),
            body.len() + BLOCK_FRAMING_LENGTH,
        )?;
        let captured_length = u32_at(body, 12, byte_order);
        let (content, options) =
            split_packet_data(Self::block_id(), &body[FIXED_LENGTH..], captured_length)?;
        Ok(Self {
            interface_id: u32_at(body, 0, byte_order),
            timestamp_high: u32_at(body, 4, byte_order),
            timestamp_low: u32_at(body, 8, byte_order),
            captured_length,
            original_length: u32_at(body, 16, byte_order),
            content,
            options: BlockOptions::parse(options, byte_order)?,
        })
    }
}
