use crate::{
    byte_order::Endianness,
    link_type::LinkType,
    pcap_ng::{
        PcapNgParseError,
        blocks::{BLOCK_FRAMING_LENGTH, Block, ensure_block_size, u16_at, u32_at},
        options::{BlockOptions, define_options_enum},
    },
};
define_options_enum! {
    /// Options for the Interface Description Block
    enum InterfaceOptionCodes {
        /// The if_name option is a UTF-8 string containing the name of the device used to capture data. The string is not zero-terminated.
        IfName = 2,
        /// The if_description option is a UTF-8 string containing the description of the device used to capture data. The string is not zero-terminated.
        IfDescription = 3,
        IfIPv4Address = 4,
        IfIPv6Address = 5,
        IfMACAddress = 6,
        IfEuiAddr = 7,
        /// The if_speed option is a 64-bit unsigned value indicating the interface speed, in bits per second.
        IfSpeed = 8,
        /// One byte; bit 7 selects a power of two, the rest is the negative exponent
        IfTimestampResolution = 9,
        IfTZone = 10,
        IfFilter = 11,
        IfOS = 12,
        IfFcsLength = 13,
        /// Signed 64-bit seconds added to every timestamp of the interface
        IfTsOffset = 14,
        IfHardware = 15,
        IfTxSpeed = 16,
        IfRxSpeed = 17,
    }
}

/// Link type, reserved and snap length
const FIXED_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptionBlock {
    pub link_type: LinkType,
    pub reserved: [u8; 2],
    /// Zero means no limit
    pub snap_length: u32,
    pub options: BlockOptions,
}
impl Block<'_> for InterfaceDescriptionBlock {
    fn block_id() -> u32 {
        1
    }
    fn minimum_size() -> usize {
        // 12 base + 2 for link_type + 2 for reserved + 4 for snap_length
        BLOCK_FRAMING_LENGTH + FIXED_LENGTH
    }

    fn parse_body(body: &[u8], byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        ensure_block_size(
            Self::block_id(),
            Self::minimum_size(),
            body.len() + BLOCK_FRAMING_LENGTH,
        )?;
        Ok(Self {
            link_type: LinkType::from(u16_at(body, 0, byte_order)),
            reserved: [body[2], body[3]],
            snap_length: u32_at(body, 4, byte_order),
            options: BlockOptions::parse(&body[FIXED_LENGTH..], byte_order)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        byte_order::Endianness,
        pcap_ng::blocks::{Block, InterfaceOptionCodes, interface::InterfaceDescriptionBlock},
    };
    #[test]
    fn parse_bytes() -> anyhow::Result<()> {
        // Body of a little-endian IDB: Ethernet, no snap limit, if_name
        let content = [
            1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 24, 0, 115, 105, 108, 108, 121, 32, 101, 116, 104, 101,
            114, 110, 101, 116, 32, 105, 110, 116, 101, 114, 102, 97, 99, 101, 0, 0, 0, 0,
        ];
        let interface = InterfaceDescriptionBlock::parse_body(&content, Endianness::LittleEndian)?;

        assert_eq!(interface.link_type, crate::link_type::LinkType::Ethernet);
        assert_eq!(interface.reserved, [0, 0]);
        assert_eq!(interface.snap_length, 0);
        let options = &interface.options;
        assert_eq!(options.len(), 1);
        assert_eq!(options.0[0].code, 2);
        assert_eq!(
            InterfaceOptionCodes::try_from(options.0[0].code),
            Ok(InterfaceOptionCodes::IfName)
        );
        assert_eq!(options.0[0].value, b"silly ethernet interface");
        Ok(())
    }

    #[test]
    fn too_short_for_fixed_fields() {
        let result = InterfaceDescriptionBlock::parse_body(&[1, 0, 0, 0], Endianness::LittleEndian);
        assert!(matches!(
            result,
            Err(crate::pcap_ng::PcapNgParseError::BlockTooShort {
                block_type: 1,
                minimum: 20,
                got: 16
            })
        ));
    }
}
