//! Reader state carried between blocks
//!
//! A section header starts a new [Section] and forgets every interface of the
//! previous one. Interface description blocks append an [Interface]; its id is
//! its position within the section.
use tracing::debug;

use crate::{
    Version,
    byte_order::Endianness,
    link_type::LinkType,
    pcap_ng::{
        PcapNgParseError,
        blocks::{InterfaceDescriptionBlock, InterfaceOptionCodes, SectionHeaderBlock},
        options::BlockOptions,
    },
    timestamp::{Timestamp, TimestampResolution},
};

/// The section a block belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub byte_order: Endianness,
    pub version: Version,
    pub section_length: Option<u64>,
    pub comments: Vec<String>,
    pub hardware: Option<String>,
    pub os: Option<String>,
    pub user_application: Option<String>,
    /// Every option of the section header, including the ones above
    pub options: BlockOptions,
}
impl From<SectionHeaderBlock> for Section {
    fn from(block: SectionHeaderBlock) -> Self {
        Self {
            byte_order: block.byte_order,
            version: block.version,
            section_length: block.section_length,
            comments: block.options.comments(),
            hardware: block.hardware(),
            os: block.os(),
            user_application: block.user_application(),
            options: block.options,
        }
    }
}

/// A capture interface, resolved from its description block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// Zero based position within the section
    pub id: u32,
    pub link_type: LinkType,
    /// Zero means no limit
    pub snap_length: u32,
    /// `if_tsresol`, microseconds when absent
    pub resolution: TimestampResolution,
    /// `if_tsoffset` in seconds, zero when absent
    pub offset: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub comments: Vec<String>,
    pub os: Option<String>,
    pub hardware: Option<String>,
    pub filter: Option<Vec<u8>>,
    pub options: BlockOptions,
}
impl Interface {
    pub fn from_block(
        id: u32,
        block: InterfaceDescriptionBlock,
        byte_order: Endianness,
    ) -> Result<Self, PcapNgParseError> {
        let options = block.options;
        let resolution = match options
            .get(InterfaceOptionCodes::IfTimestampResolution as u16)
            .and_then(|option| option.value.first())
        {
            Some(descriptor) => TimestampResolution::from_descriptor(*descriptor)?,
            None => TimestampResolution::default(),
        };
        let offset = options
            .i64_value(InterfaceOptionCodes::IfTsOffset as u16, byte_order)
            .unwrap_or_default();
        let interface = Self {
            id,
            link_type: block.link_type,
            snap_length: block.snap_length,
            resolution,
            offset,
            name: options.string(InterfaceOptionCodes::IfName as u16),
            description: options.string(InterfaceOptionCodes::IfDescription as u16),
            comments: options.comments(),
            os: options.string(InterfaceOptionCodes::IfOS as u16),
            hardware: options.string(InterfaceOptionCodes::IfHardware as u16),
            filter: options
                .get(InterfaceOptionCodes::IfFilter as u16)
                .map(|option| option.value.clone()),
            options,
        };
        debug!(
            id,
            link_type = %interface.link_type,
            snap_length = interface.snap_length,
            resolution = %interface.resolution,
            "Interface added"
        );
        Ok(interface)
    }
    /// Converts a raw block timestamp using this interface's resolution and offset
    pub fn timestamp(&self, raw: u64) -> Result<Timestamp, PcapNgParseError> {
        Ok(Timestamp::from_raw(raw, self.resolution, self.offset)?)
    }
}
