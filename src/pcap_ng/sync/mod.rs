//! Synchronous PCAP-NG reader
use std::{io::Read, sync::Arc};

use tracing::{debug, trace};

use crate::{
    byte_order::Endianness,
    pcap_ng::{
        PcapNgParseError,
        blocks::{
            Block, BlockFrame, BlockHeader, PcapNgBlock, SectionHeaderBlock, read_block,
        },
        options::BlockOptions,
        section::{Interface, Section},
    },
    timestamp::Timestamp,
};

/// A packet read from an enhanced, simple or obsolete packet block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcapNgPacket<'a> {
    pub section: Arc<Section>,
    pub interface: Arc<Interface>,
    /// `None` for simple packet blocks, which carry no timestamp
    pub timestamp: Option<Timestamp>,
    pub original_length: u32,
    pub data: &'a [u8],
    pub options: BlockOptions,
}

/// Section and interface tables, updated as blocks go by
#[derive(Debug)]
struct ReaderState {
    section: Arc<Section>,
    /// Will reset each time a new section header block is read
    interfaces: Vec<Arc<Interface>>,
}
impl ReaderState {
    fn new(section: Section) -> Self {
        debug!(
            byte_order = %section.byte_order,
            version = %section.version,
            "Section started"
        );
        Self {
            section: Arc::new(section),
            interfaces: Vec::with_capacity(1),
        }
    }
    fn interface(&self, interface_id: u32) -> Result<&Arc<Interface>, PcapNgParseError> {
        self.interfaces
            .get(interface_id as usize)
            .ok_or(PcapNgParseError::UnresolvedInterface {
                interface_id,
                available: self.interfaces.len(),
            })
    }
    /// Zero snap length means no limit
    fn check_captured_length(
        &self,
        interface_id: u32,
        captured_length: u32,
    ) -> Result<(), PcapNgParseError> {
        let interface = self.interface(interface_id)?;
        if interface.snap_length != 0 && captured_length > interface.snap_length {
            return Err(PcapNgParseError::CapturedLengthExceedsSnaplen {
                interface_id,
                captured_length,
                snap_length: interface.snap_length,
            });
        }
        Ok(())
    }
    /// Applies a block to the tables and checks packet blocks against them
    fn observe(&mut self, block: &PcapNgBlock<'_>) -> Result<(), PcapNgParseError> {
        match block {
            PcapNgBlock::SectionHeader(section_header) => {
                *self = Self::new(Section::from(section_header.clone()));
            }
            PcapNgBlock::InterfaceDescription(interface_block) => {
                let id = self.interfaces.len() as u32;
                let interface =
                    Interface::from_block(id, interface_block.clone(), self.section.byte_order)?;
                self.interfaces.push(Arc::new(interface));
            }
            PcapNgBlock::EnhancedPacket(packet) => {
                self.check_captured_length(packet.interface_id, packet.captured_length)?;
            }
            PcapNgBlock::Packet(packet) => {
                self.check_captured_length(packet.interface_id as u32, packet.captured_length)?;
            }
            PcapNgBlock::SimplePacket(_) => {
                self.interface(0)?;
            }
            PcapNgBlock::InterfaceStatistics(statistics) => {
                self.interface(statistics.interface_id)?;
            }
            PcapNgBlock::NameResolution(_) | PcapNgBlock::Generic(_) => {}
        }
        Ok(())
    }
    /// Resolves a packet block against the tables
    ///
    /// Returns `Ok(None)` for any block that does not carry a packet.
    fn packet<'a>(
        &self,
        block: PcapNgBlock<'a>,
    ) -> Result<Option<PcapNgPacket<'a>>, PcapNgParseError> {
        let (interface, timestamp, original_length, data, options) = match block {
            PcapNgBlock::EnhancedPacket(packet) => {
                let interface = self.interface(packet.interface_id)?;
                let timestamp = interface.timestamp(packet.timestamp())?;
                (
                    interface,
                    Some(timestamp),
                    packet.original_length,
                    packet.content,
                    packet.options,
                )
            }
            PcapNgBlock::Packet(packet) => {
                let interface = self.interface(packet.interface_id as u32)?;
                let timestamp = interface.timestamp(packet.timestamp())?;
                (
                    interface,
                    Some(timestamp),
                    packet.original_length,
                    packet.content,
                    packet.options,
                )
            }
            PcapNgBlock::SimplePacket(packet) => {
                let interface = self.interface(0)?;
                (
                    interface,
                    None,
                    packet.original_length,
                    packet.captured(interface.snap_length),
                    BlockOptions::default(),
                )
            }
            _ => return Ok(None),
        };
        trace!(
            interface = interface.id,
            captured_length = data.len(),
            original_length,
            "Packet read"
        );
        Ok(Some(PcapNgPacket {
            section: Arc::clone(&self.section),
            interface: Arc::clone(interface),
            timestamp,
            original_length,
            data,
            options,
        }))
    }
}

/// A synchronous reader for PCAP-NG files
///
/// Blocks are read one at a time; the body of the most recent block lives in
/// an internal buffer that only grows as large as the largest block seen.
#[derive(Debug)]
pub struct SyncPcapNgReader<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    state: ReaderState,
}
impl<R: Read> SyncPcapNgReader<R> {
    /// Creates a new `SyncPcapNgReader` from a reader
    ///
    /// The stream must start with a section header block.
    pub fn new(mut reader: R) -> Result<Self, PcapNgParseError> {
        let header = BlockHeader::read(&mut reader)?
            .ok_or(PcapNgParseError::TruncatedBlockHeader { got: 0 })?;
        if !header.is_section_header() {
            return Err(PcapNgParseError::MissingSectionHeader {
                got: header.block_id,
            });
        }
        let mut buffer = Vec::new();
        let frame = read_block(&mut reader, &header, Endianness::default(), &mut buffer)?;
        let section_header = SectionHeaderBlock::parse_body(&buffer, frame.byte_order)?;
        Ok(Self {
            reader,
            buffer,
            state: ReaderState::new(Section::from(section_header)),
        })
    }
    /// Returns the section the next block belongs to
    pub fn current_section(&self) -> &Arc<Section> {
        &self.state.section
    }
    /// Returns the interfaces described in the current section
    pub fn interfaces(&self) -> &[Arc<Interface>] {
        &self.state.interfaces
    }
    fn read_frame(&mut self) -> Result<Option<BlockFrame>, PcapNgParseError> {
        let Some(header) = BlockHeader::read(&mut self.reader)? else {
            return Ok(None);
        };
        let frame = read_block(
            &mut self.reader,
            &header,
            self.state.section.byte_order,
            &mut self.buffer,
        )?;
        trace!(
            block_type = frame.block_type,
            block_length = frame.block_length,
            "Block read"
        );
        Ok(Some(frame))
    }
    /// Reads the next block from the pcapng file
    ///
    /// Section headers and interface descriptions update the reader state
    /// before they are returned. Packet blocks are checked against the
    /// interfaces of the current section.
    ///
    /// When Ok(None) is returned, it indicates the end of the file has been reached
    pub fn next_block(&mut self) -> Result<Option<PcapNgBlock<'_>>, PcapNgParseError> {
        let Some(frame) = self.read_frame()? else {
            return Ok(None);
        };
        let block = PcapNgBlock::parse(&frame, &self.buffer)?;
        self.state.observe(&block)?;
        Ok(Some(block))
    }
    /// Reads the next packet from the pcapng file
    ///
    /// If any other block types are encountered, they update the reader state
    /// and are skipped until a packet block is found
    ///
    /// When Ok(None) is returned, it indicates the end of the file has been reached
    pub fn next_packet(&mut self) -> Result<Option<PcapNgPacket<'_>>, PcapNgParseError> {
        let frame = loop {
            let Some(frame) = self.read_frame()? else {
                return Ok(None);
            };
            if frame.is_packet() {
                break frame;
            }
            let block = PcapNgBlock::parse(&frame, &self.buffer)?;
            self.state.observe(&block)?;
        };
        let block = PcapNgBlock::parse(&frame, &self.buffer)?;
        self.state.observe(&block)?;
        self.state.packet(block)
    }
}
