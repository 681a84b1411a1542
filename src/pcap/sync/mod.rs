//! Synchronous PCAP reader
use std::io::Read;

use tracing::debug;

use crate::{
    Version,
    pcap::{
        PcapParseError,
        file_header::PcapFileHeader,
        packet_header::{PACKET_HEADER_LENGTH, PacketHeader},
    },
    utils::{read_into_vec, read_up_to},
};
/// A synchronous reader for PCAP files
#[derive(Debug)]
pub struct SyncPcapReader<R: Read> {
    reader: R,
    /// Buffer for packet data
    ///
    /// Grows to the largest record seen, never beyond the snap length
    buffer: Vec<u8>,
    header_buffer: [u8; PACKET_HEADER_LENGTH],
    file_header: PcapFileHeader,
}
impl<R: Read> SyncPcapReader<R> {
    /// Creates a new `SyncPcapReader` from a reader
    /// Returns `Ok(Self)` on success, or `Err` if there was an error
    /// reading the file header
    pub fn new(mut reader: R) -> Result<Self, PcapParseError> {
        let file_header = PcapFileHeader::read(&mut reader)?;
        Ok(Self::new_with_header(reader, file_header))
    }
    pub(crate) fn new_with_header(reader: R, file_header: PcapFileHeader) -> Self {
        debug!(
            version = %file_header.version,
            byte_order = %file_header.endianness(),
            snap_length = file_header.snap_length,
            link_type = %file_header.link_type,
            "Opened pcap capture"
        );
        Self {
            reader,
            buffer: Vec::new(),
            file_header,
            header_buffer: [0; PACKET_HEADER_LENGTH],
        }
    }
    /// Returns the file header of the pcap file
    pub fn file_header(&self) -> &PcapFileHeader {
        &self.file_header
    }
    /// Returns the version of the pcap file
    pub fn version(&self) -> &Version {
        &self.file_header.version
    }
    /// Reads the next record
    ///
    /// `Ok(None)` means the stream ended cleanly between records. A stream that
    /// ends inside a record is an error.
    pub fn next_packet(&mut self) -> Result<Option<(PacketHeader, &[u8])>, PcapParseError> {
        let got = read_up_to(&mut self.reader, &mut self.header_buffer)?;
        if got == 0 {
            return Ok(None);
        }
        if got < PACKET_HEADER_LENGTH {
            return Err(PcapParseError::TruncatedRecordHeader { got });
        }
        let packet_header =
            PacketHeader::parse_bytes(&self.header_buffer, self.file_header.endianness());
        if packet_header.include_len > self.file_header.snap_length {
            return Err(PcapParseError::CapturedLengthExceedsSnaplen {
                snap_length: self.file_header.snap_length,
                incl_len: packet_header.include_len,
            });
        }
        let expected = packet_header.include_len;
        let got = read_into_vec(&mut self.reader, &mut self.buffer, expected as usize)?;
        if got < expected as usize {
            return Err(PcapParseError::TruncatedRecordData { expected, got });
        }
        Ok(Some((packet_header, &self.buffer)))
    }
}
#[cfg(test)]
mod tests {
    use etherparse::{NetSlice, SlicedPacket};

    use crate::{byte_order::Endianness, pcap::file_header::MagicNumber, test_utils::*};

    use super::*;

    #[test]
    fn read_packets_in_order() -> anyhow::Result<()> {
        let frame = udp_frame(b"hello");
        let bytes = PcapBuilder::new(Endianness::BigEndian, MagicNumber::Microsecond)
            .record(1, 10, &frame)
            .record(2, 20, &[0xAA; 3])
            .record(3, 30, &[])
            .build();
        let mut reader = SyncPcapReader::new(bytes.as_slice())?;
        assert_eq!(reader.version(), &Version::new(2, 4));

        let (header, data) = reader.next_packet()?.ok_or_else(|| anyhow::anyhow!("eof"))?;
        assert_eq!(header.ts_sec, 1);
        assert_eq!(header.include_len as usize, frame.len());
        {
            let parse = SlicedPacket::from_ethernet(data)?;
            assert!(matches!(parse.net, Some(NetSlice::Ipv4(_))));
        }

        let (header, data) = reader.next_packet()?.ok_or_else(|| anyhow::anyhow!("eof"))?;
        assert_eq!(header.ts_usec, 20);
        assert_eq!(data, &[0xAA; 3]);

        let (header, data) = reader.next_packet()?.ok_or_else(|| anyhow::anyhow!("eof"))?;
        assert_eq!(header.ts_sec, 3);
        assert!(data.is_empty());

        assert!(reader.next_packet()?.is_none());
        Ok(())
    }

    #[test]
    fn rejects_record_larger_than_snaplen() -> anyhow::Result<()> {
        let bytes = PcapBuilder::new(Endianness::LittleEndian, MagicNumber::Microsecond)
            .snap_length(4)
            .record(0, 0, &[1, 2, 3, 4, 5])
            .build();
        let mut reader = SyncPcapReader::new(bytes.as_slice())?;
        assert!(matches!(
            reader.next_packet(),
            Err(PcapParseError::CapturedLengthExceedsSnaplen {
                snap_length: 4,
                incl_len: 5
            })
        ));
        Ok(())
    }

    #[test]
    fn truncated_record_header() -> anyhow::Result<()> {
        let bytes = PcapBuilder::new(Endianness::LittleEndian, MagicNumber::Microsecond)
            .record(0, 0, &[1, 2, 3])
            .build();
        let cut = &bytes[..24 + 7];
        let mut reader = SyncPcapReader::new(cut)?;
        assert!(matches!(
            reader.next_packet(),
            Err(PcapParseError::TruncatedRecordHeader { got: 7 })
        ));
        Ok(())
    }

    #[test]
    fn truncated_record_data() -> anyhow::Result<()> {
        let bytes = PcapBuilder::new(Endianness::LittleEndian, MagicNumber::Microsecond)
            .record_with_lengths(0, 0, 100, 100, &[0; 40])
            .build();
        let mut reader = SyncPcapReader::new(bytes.as_slice())?;
        assert!(matches!(
            reader.next_packet(),
            Err(PcapParseError::TruncatedRecordData {
                expected: 100,
                got: 40
            })
        ));
        Ok(())
    }
}
