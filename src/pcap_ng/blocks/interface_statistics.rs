use crate::{
    byte_order::Endianness,
    pcap_ng::{
        PcapNgParseError,
        blocks::{
            BLOCK_FRAMING_LENGTH, Block, enhanced_packet::join_timestamp, ensure_block_size,
            u32_at,
        },
        options::{BlockOptions, define_options_enum},
        section::Interface,
    },
    timestamp::Timestamp,
};
define_options_enum! {
    /// Options for the Interface Statistics Block
    enum InterfaceStatisticsOptionCodes {
        StartTime = 2,
        EndTime = 3,
        /// Packets received by the interface
        IfRecv = 4,
        /// Packets dropped by the interface
        IfDrop = 5,
        FilterAccept = 6,
        OsDrop = 7,
        UsrDeliv = 8,
    }
}

const FIXED_LENGTH: usize = 12;

/// Counters for one interface at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceStatisticsBlock {
    pub interface_id: u32,
    pub timestamp_high: u32,
    pub timestamp_low: u32,
    pub options: BlockOptions,
}
impl InterfaceStatisticsBlock {
    /// Raw timestamp in units of the interface resolution
    pub fn raw_timestamp(&self) -> u64 {
        join_timestamp(self.timestamp_high, self.timestamp_low)
    }
    /// Resolves the timestamp with the interface this block refers to
    pub fn timestamp(&self, interface: &Interface) -> Result<Timestamp, PcapNgParseError> {
        interface.timestamp(self.raw_timestamp())
    }
    pub fn received(&self, byte_order: Endianness) -> Option<u64> {
        self.options
            .u64_value(InterfaceStatisticsOptionCodes::IfRecv as u16, byte_order)
    }
    pub fn dropped(&self, byte_order: Endianness) -> Option<u64> {
        self.options
            .u64_value(InterfaceStatisticsOptionCodes::IfDrop as u16, byte_order)
    }
}
impl Block<'_> for InterfaceStatisticsBlock {
    fn block_id() -> u32 {
        5
    }
    fn minimum_size() -> usize {
        BLOCK_FRAMING_LENGTH + FIXED_LENGTH
    }
    fn parse_body(body: &[u8], byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        ensure_block_size(
            Self::block_id(),
            Self::minimum_size(),
            body.len() + BLOCK_FRAMING_LENGTH,
        )?;
        Ok(Self {
            interface_id: u32_at(body, 0, byte_order),
            timestamp_high: u32_at(body, 4, byte_order),
            timestamp_low: u32_at(body, 8, byte_order),
            options: BlockOptions::parse(&body[FIXED_LENGTH..], byte_order)?,
        })
    }
}
