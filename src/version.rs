use std::fmt::{self, Display};

use crate::byte_order::ByteOrder;

/// The major/minor version declared by a pcap file header or a pcap-ng section header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}
impl Version {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
    /// Parses the version from the bytes
    #[inline(always)]
    pub(crate) fn parse(bytes: [u8; 4], byte_order: impl ByteOrder) -> Self {
        let major = byte_order.u16_from_bytes([bytes[0], bytes[1]]);
        let minor = byte_order.u16_from_bytes([bytes[2], bytes[3]]);
        Self { major, minor }
    }
}
impl Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
