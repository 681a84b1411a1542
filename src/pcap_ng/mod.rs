//! This module provides pcap-ng parsing functionality
//!
//! [Source](https://www.ietf.org/archive/id/draft-tuexen-opsawg-pcapng-03.html)
//!
//! Currently, only supports reading files from beginning to end and does not support reverse reading.
use thiserror::Error;

use crate::{
    byte_order::Endianness,
    timestamp::{InvalidTimestampResolution, TimestampOutOfRange},
};
pub mod blocks;
pub mod options;
pub mod section;
mod sync;
pub use section::{Interface, Section};
pub use sync::{PcapNgPacket, SyncPcapNgReader};
/// Magic number for pcap-ng files
///
/// All pcap-ng files should start with this magic number
pub const PCAP_NG_MAGIC: [u8; 4] = [0x0A, 0x0D, 0x0D, 0x0A];
/// Block type and leading length, plus the trailing length
pub const BLOCK_FRAMING_LENGTH: usize = 12;

#[derive(Debug, Error)]
pub enum PcapNgParseError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("Stream does not start with a section header block, got block type {got:02x?}")]
    MissingSectionHeader { got: [u8; 4] },
    #[error(
        "Invalid block length {length} for block type {block_type:#010x}: must be a multiple of 4 and at least 12"
    )]
    InvalidBlockLength { block_type: u32, length: u32 },
    #[error(
        "Block length mismatch for block type {block_type:#010x}: leading length {leading}, trailing length {trailing}"
    )]
    BlockLengthMismatch {
        block_type: u32,
        leading: u32,
        trailing: u32,
    },
    #[error("Block type {block_type:#010x} needs at least {minimum} bytes, but is {got} bytes")]
    BlockTooShort {
        block_type: u32,
        minimum: usize,
        got: usize,
    },
    #[error("Truncated block header: expected 8 bytes, got {got}")]
    TruncatedBlockHeader { got: usize },
    #[error("Truncated block {block_type:#010x}: expected {expected} more bytes, got {got}")]
    TruncatedBlock {
        block_type: u32,
        expected: usize,
        got: usize,
    },
    #[error("Invalid section header byte-order magic: got {got:02x?}")]
    BadSectionMagic { got: [u8; 4] },
    #[error("Block references interface {interface_id} but the section declares {available}")]
    UnresolvedInterface { interface_id: u32, available: usize },
    #[error(
        "Captured length {captured_length} exceeds snap length {snap_length} of interface {interface_id}"
    )]
    CapturedLengthExceedsSnaplen {
        interface_id: u32,
        captured_length: u32,
        snap_length: u32,
    },
    #[error(
        "Captured length {captured_length} exceeds the {available} data bytes of block type {block_type:#010x}"
    )]
    CapturedLengthExceedsBlock {
        block_type: u32,
        captured_length: u32,
        available: usize,
    },
    #[error(transparent)]
    InvalidTimestampResolution(#[from] InvalidTimestampResolution),
    #[error(transparent)]
    TimestampOutOfRange(#[from] TimestampOutOfRange),
    #[error("Error parsing options: {0}")]
    OptionParseError(#[from] options::OptionParseError),
}

impl Endianness {
    /// Reads the section header byte-order magic, `0x1A2B3C4D` as written by the producer
    pub fn from_pcap_ng_bytes(bytes: [u8; 4]) -> Result<Self, PcapNgParseError> {
        match bytes {
            [0x1A, 0x2B, 0x3C, 0x4D] => Ok(Self::BigEndian),
            [0x4D, 0x3C, 0x2B, 0x1A] => Ok(Self::LittleEndian),
            _ => Err(PcapNgParseError::BadSectionMagic { got: bytes }),
        }
    }
}

/// Rounds the length up to the next multiple of 4 bytes
pub(crate) fn padded_length(length: usize) -> usize {
    length.next_multiple_of(4)
}
