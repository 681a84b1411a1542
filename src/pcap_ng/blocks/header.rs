use crate::{
    Version,
    byte_order::{ByteOrder, Endianness},
    pcap_ng::{
        PcapNgParseError,
        blocks::{BLOCK_FRAMING_LENGTH, Block, ensure_block_size},
        options::{BlockOptions, define_options_enum},
    },
};
define_options_enum! {
    enum SHBOptionCodes {
        Hardware = 2,
        OS = 3,
        UserApplication = 4,
    }
}

/// Byte-order magic, version and section length
const FIXED_LENGTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeaderBlock {
    pub byte_order: Endianness,
    pub version: Version,
    /// `None` when the producer wrote -1, meaning the length is not known
    pub section_length: Option<u64>,
    pub options: BlockOptions,
}
impl SectionHeaderBlock {
    pub fn hardware(&self) -> Option<String> {
        self.options.string(SHBOptionCodes::Hardware as u16)
    }
    pub fn os(&self) -> Option<String> {
        self.options.string(SHBOptionCodes::OS as u16)
    }
    pub fn user_application(&self) -> Option<String> {
        self.options.string(SHBOptionCodes::UserApplication as u16)
    }
}
impl Block<'_> for SectionHeaderBlock {
    fn block_id() -> u32 {
        0x0A0D_0D0A
    }
    fn minimum_size() -> usize {
        BLOCK_FRAMING_LENGTH + FIXED_LENGTH
    }

    /// The section declares its own byte order, so `_byte_order` is ignored
    fn parse_body(body: &[u8], _byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        ensure_block_size(
            Self::block_id(),
            Self::minimum_size(),
            body.len() + BLOCK_FRAMING_LENGTH,
        )?;
        let byte_order = Endianness::from_pcap_ng_bytes([body[0], body[1], body[2], body[3]])?;
        let version = Version::parse([body[4], body[5], body[6], body[7]], byte_order);
        let section_length: [u8; 8] = [
            body[8], body[9], body[10], body[11], body[12], body[13], body[14], body[15],
        ];
        let section_length = if section_length == [0xFF; 8] {
            None
        } else {
            Some(byte_order.u64_from_bytes(section_length))
        };
        let options = BlockOptions::parse(&body[FIXED_LENGTH..], byte_order)?;
        Ok(Self {
            byte_order,
            version,
            section_length,
            options,
        })
    }
}
