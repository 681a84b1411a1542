use crate::{
    byte_order::{ByteOrder, Endianness},
    pcap::file_header::MagicNumber,
    timestamp::Timestamp,
};

/// Size of the header preceding each packet record
pub const PACKET_HEADER_LENGTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub ts_sec: u32,
    /// Microseconds or nanoseconds, depending on the file's magic number
    pub ts_usec: u32,
    /// The length of the packet data included in the file
    pub include_len: u32,
    /// The original length of the packet data
    pub orig_len: u32,
}

impl PacketHeader {
    pub fn new(ts_sec: u32, ts_usec: u32, incl_len: u32, orig_len: u32) -> Self {
        Self {
            ts_sec,
            ts_usec,
            include_len: incl_len,
            orig_len,
        }
    }
    /// The endianness is used to determine how to read the bytes
    #[inline(always)]
    pub fn parse_bytes(bytes: &[u8; PACKET_HEADER_LENGTH], endianness: Endianness) -> Self {
        let word = |offset: usize| {
            endianness.u32_from_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };
        Self {
            ts_sec: word(0),
            ts_usec: word(4),
            include_len: word(8),
            orig_len: word(12),
        }
    }
    /// The exact capture time, using the resolution the magic number selects
    pub fn timestamp(&self, magic_number: MagicNumber) -> Timestamp {
        Timestamp::from_parts(self.ts_sec, self.ts_usec, magic_number.resolution())
    }
}
