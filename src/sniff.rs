//! Capture format detection from the first four bytes of a stream
use std::fmt::{self, Display};

use crate::pcap::file_header::MagicNumberAndEndianness;
use crate::pcap_ng::PCAP_NG_MAGIC;

/// Number of bytes inspected to detect the format
pub const MAGIC_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PcapFileType {
    Pcap,
    PcapNg,
}
impl PcapFileType {
    /// Returns the file type for the magic number, or `None` if it is not a capture
    pub fn from_magic(magic: [u8; 4]) -> Option<Self> {
        SniffedFormat::from_magic(magic).map(|format| format.file_type())
    }
}
impl Display for PcapFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PcapFileType::Pcap => f.write_str("pcap"),
            PcapFileType::PcapNg => f.write_str("pcapng"),
        }
    }
}

/// What the leading magic bytes say about a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffedFormat {
    /// Classic pcap; the magic fixes both byte order and timestamp resolution
    Pcap(MagicNumberAndEndianness),
    /// pcap-ng; byte order is only known once the section header body is read
    PcapNg,
}
impl SniffedFormat {
    pub fn from_magic(magic: [u8; 4]) -> Option<Self> {
        if magic == PCAP_NG_MAGIC {
            return Some(SniffedFormat::PcapNg);
        }
        MagicNumberAndEndianness::try_from(magic)
            .ok()
            .map(SniffedFormat::Pcap)
    }
    pub fn file_type(&self) -> PcapFileType {
        match self {
            SniffedFormat::Pcap(_) => PcapFileType::Pcap,
            SniffedFormat::PcapNg => PcapFileType::PcapNg,
        }
    }
}
