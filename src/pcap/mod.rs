//! Parsing for PCAP Files based on the libpcap format
//!
//! Sources
//! - [Wireshark Wiki - File Format](https://wiki.wireshark.org/Development/LibpcapFileFormat)
pub mod file_header;
pub mod packet_header;
mod sync;
pub use sync::*;
use thiserror::Error;

/// Errors that can occur when parsing pcap files
#[derive(Debug, Error)]
pub enum PcapParseError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("Invalid pcap magic number got {0:02x?}")]
    InvalidMagicNumber([u8; 4]),
    #[error("Truncated pcap file header: expected 24 bytes, got {got}")]
    TruncatedHeader { got: usize },
    #[error("Truncated pcap record header: expected 16 bytes, got {got}")]
    TruncatedRecordHeader { got: usize },
    #[error("Truncated pcap record data: expected {expected} bytes, got {got}")]
    TruncatedRecordData { expected: u32, got: usize },
    #[error(
        "Invalid packet length: included length {incl_len} is greater than snap length {snap_length}"
    )]
    CapturedLengthExceedsSnaplen { snap_length: u32, incl_len: u32 },
}
