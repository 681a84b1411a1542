//! Byte Order handling for pcap and pcap-ng files

/// Represents a trait for byte order operations
pub trait ByteOrder: Clone + Copy {
    /// Converts a byte array to a u16
    fn u16_from_bytes(self, bytes: [u8; 2]) -> u16;
    /// Converts a byte array to a u32
    fn u32_from_bytes(self, bytes: [u8; 4]) -> u32;
    fn u64_from_bytes(self, bytes: [u8; 8]) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BigEndian;
impl ByteOrder for BigEndian {
    fn u16_from_bytes(self, bytes: [u8; 2]) -> u16 {
        u16::from_be_bytes(bytes)
    }
    fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
        u32::from_be_bytes(bytes)
    }
    fn u64_from_bytes(self, bytes: [u8; 8]) -> u64 {
        u64::from_be_bytes(bytes)
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LittleEndian;
impl ByteOrder for LittleEndian {
    fn u16_from_bytes(self, bytes: [u8; 2]) -> u16 {
        u16::from_le_bytes(bytes)
    }
    fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
        u32::from_le_bytes(bytes)
    }
    fn u64_from_bytes(self, bytes: [u8; 8]) -> u64 {
        u64::from_le_bytes(bytes)
    }
}

/// The byte order a capture (or a single pcap-ng section) was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    /// Little-endian byte order
    #[default]
    LittleEndian,
    /// Big-endian byte order
    BigEndian,
}
impl ByteOrder for Endianness {
    fn u16_from_bytes(self, bytes: [u8; 2]) -> u16 {
        match self {
            Endianness::BigEndian => BigEndian.u16_from_bytes(bytes),
            Endianness::LittleEndian => LittleEndian.u16_from_bytes(bytes),
        }
    }
    fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
        match self {
            Endianness::BigEndian => BigEndian.u32_from_bytes(bytes),
            Endianness::LittleEndian => LittleEndian.u32_from_bytes(bytes),
        }
    }
    fn u64_from_bytes(self, bytes: [u8; 8]) -> u64 {
        match self {
            Endianness::BigEndian => BigEndian.u64_from_bytes(bytes),
            Endianness::LittleEndian => LittleEndian.u64_from_bytes(bytes),
        }
    }
}
impl std::fmt::Display for Endianness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endianness::LittleEndian => f.write_str("little-endian"),
            Endianness::BigEndian => f.write_str("big-endian"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_big_endian() {
        let bytes: [u8; 2] = [0x12, 0x34];
        assert_eq!(BigEndian.u16_from_bytes(bytes), 0x1234);
        let bytes: [u8; 4] = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(BigEndian.u32_from_bytes(bytes), 0x12345678);
    }
    #[test]
    fn test_little_endian() {
        let bytes: [u8; 2] = [0x34, 0x12];
        assert_eq!(LittleEndian.u16_from_bytes(bytes), 0x1234);
        let bytes: [u8; 4] = [0x78, 0x56, 0x34, 0x12];
        assert_eq!(LittleEndian.u32_from_bytes(bytes), 0x12345678);
    }
}
