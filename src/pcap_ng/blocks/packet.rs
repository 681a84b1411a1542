use crate::{
    byte_order::Endianness,
    pcap_ng::{
        PcapNgParseError,
        blocks::{
            BLOCK_FRAMING_LENGTH, Block,
            enhanced_packet::{join_timestamp, split_packet_data},
            ensure_block_size, u16_at, u32_at,
        },
        options::BlockOptions,
    },
};

/// Interface id, drops count, both timestamp words and both lengths
const FIXED_LENGTH: usize = 20;

/// The obsolete Packet Block, superseded by the Enhanced Packet Block
///
/// Still written by old capture tools, so it is read like an enhanced packet
/// with a 16 bit interface id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketBlock<'b> {
    pub interface_id: u16,
    pub drops_count: u16,
    pub timestamp_high: u32,
    pub timestamp_low: u32,
    pub captured_length: u32,
    pub original_length: u32,
    pub content: &'b [u8],
    pub options: BlockOptions,
}
impl PacketBlock<'_> {
    pub fn timestamp(&self) -> u64 {
        join_timestamp(self.timestamp_high, self.timestamp_low)
    }
}
impl<'b> Block<'b> for PacketBlock<'b> {
    fn block_id() -> u32 {
        2
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
            interface_id: u16_at(body, 0, byte_order),
            drops_count: u16_at(body, 2, byte_order),
            timestamp_high: u32_at(body, 4, byte_order),
            timestamp_low: u32_at(body, 8, byte_order),
            captured_length,
            original_length: u32_at(body, 16, byte_order),
            content,
            options: BlockOptions::parse(options, byte_order)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::*;

    use super::*;

    #[test]
    fn parse_packet_block() -> anyhow::Result<()> {
        let e = Endianness::BigEndian;
        let mut body = Vec::new();
        body.extend(u16_bytes(e, 1));
        body.extend(u16_bytes(e, 9));
        body.extend(u32_bytes(e, 0));
        body.extend(u32_bytes(e, 1_000_001));
        body.extend(u32_bytes(e, 3));
        body.extend(u32_bytes(e, 60));
        body.extend([1, 2, 3, 0]);
        body.extend(option(e, 1, b"old"));
        let packet = PacketBlock::parse_body(&body, e)?;
        assert_eq!(packet.interface_id, 1);
        assert_eq!(packet.drops_count, 9);
        assert_eq!(packet.timestamp(), 1_000_001);
        assert_eq!(packet.original_length, 60);
        assert_eq!(packet.content, &[1, 2, 3]);
        assert_eq!(packet.options.comments(), vec!["old"]);
        Ok(())
    }
}
