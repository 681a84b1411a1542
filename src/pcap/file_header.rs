use std::io::Read;

use crate::{
    Version,
    byte_order::{ByteOrder, Endianness},
    link_type::LinkType,
    pcap::PcapParseError,
    timestamp::TimestampResolution,
    utils::read_up_to,
};

/// Size of the global header at the start of every pcap file
pub const PCAP_FILE_HEADER_LENGTH: usize = 24;
/// Bit 28 of the link type field marks the FCS length bits as valid
const FCS_PRESENT_FLAG: u32 = 0x1000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicNumber {
    Microsecond,
    Nanosecond,
}
impl MagicNumber {
    /// The unit of the per-record sub-second field
    pub fn resolution(self) -> TimestampResolution {
        match self {
            MagicNumber::Microsecond => TimestampResolution::MICROSECONDS,
            MagicNumber::Nanosecond => TimestampResolution::NANOSECONDS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicNumberAndEndianness {
    pub magic_number: MagicNumber,
    pub endianness: Endianness,
}

impl TryFrom<[u8; 4]> for MagicNumberAndEndianness {
    type Error = PcapParseError;

    fn try_from(value: [u8; 4]) -> Result<Self, Self::Error> {
        match value {
            [0xa1, 0xb2, 0xc3, 0xd4] => Ok(Self {
                magic_number: MagicNumber::Microsecond,
                endianness: Endianness::BigEndian,
            }),
            [0xd4, 0xc3, 0xb2, 0xa1] => Ok(Self {
                magic_number: MagicNumber::Microsecond,
                endianness: Endianness::LittleEndian,
            }),
            [0xa1, 0xb2, 0x3c, 0x4d] => Ok(Self {
                magic_number: MagicNumber::Nanosecond,
                endianness: Endianness::BigEndian,
            }),
            [0x4d, 0x3c, 0xb2, 0xa1] => Ok(Self {
                magic_number: MagicNumber::Nanosecond,
                endianness: Endianness::LittleEndian,
            }),
            _ => Err(PcapParseError::InvalidMagicNumber(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcapFileHeader {
    /// First 4 bytes are the magic number and endianness
    pub magic_number_and_endianness: MagicNumberAndEndianness,
    /// 4..8
    pub version: Version,
    /// 8..12, always zero in practice
    pub timezone: i32,
    /// 12..16, always zero in practice
    pub sig_figs: u32,
    /// 16..20
    pub snap_length: u32,
    /// 20..24, the low 16 bits
    pub link_type: LinkType,
    /// 20..24, the raw field including the FCS bits
    pub link_type_field: u32,
}

impl PcapFileHeader {
    /// Reads the file header from the reader
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, PcapParseError> {
        let mut header = [0u8; PCAP_FILE_HEADER_LENGTH];
        let got = read_up_to(reader, &mut header)?;
        if got < PCAP_FILE_HEADER_LENGTH {
            return Err(PcapParseError::TruncatedHeader { got });
        }
        Self::try_from(&header)
    }
    pub fn endianness(&self) -> Endianness {
        self.magic_number_and_endianness.endianness
    }
    /// Resolution of the sub-second field of every record
    pub fn resolution(&self) -> TimestampResolution {
        self.magic_number_and_endianness.magic_number.resolution()
    }
    /// Number of FCS bytes appended to each packet, when the file declares it
    pub fn fcs_length(&self) -> Option<u8> {
        if self.link_type_field & FCS_PRESENT_FLAG == 0 {
            return None;
        }
        Some(((self.link_type_field >> 29) as u8) * 2)
    }
}
impl TryFrom<&[u8; 24]> for PcapFileHeader {
    type Error = PcapParseError;

    fn try_from(bytes: &[u8; 24]) -> Result<Self, Self::Error> {
        let magic_number_and_endianness =
            MagicNumberAndEndianness::try_from([bytes[0], bytes[1], bytes[2], bytes[3]])?;
        let endianness = magic_number_and_endianness.endianness;
        let word = |offset: usize| {
            endianness.u32_from_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };

        let version = Version::parse([bytes[4], bytes[5], bytes[6], bytes[7]], endianness);
        let link_type_field = word(20);
        Ok(Self {
            magic_number_and_endianness,
            version,
            timezone: word(8) as i32,
            sig_figs: word(12),
            snap_length: word(16),
            link_type: LinkType::from(link_type_field),
            link_type_field,
        })
    }
}
