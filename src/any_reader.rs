use std::{io::Read, iter::FusedIterator};

use thiserror::Error;
use tracing::debug;

use crate::{
    PcapFileType,
    link_layer::LinkLayerDecoder,
    pcap::{PcapParseError, SyncPcapReader},
    pcap_ng::{PcapNgParseError, SyncPcapNgReader},
    sniff::{MAGIC_LENGTH, SniffedFormat},
    utils::PeekableReader,
};
mod packet;
pub use packet::*;

#[derive(Debug, Error)]
pub enum AnyPcapReaderError {
    #[error("Not a pcap or pcapng capture, magic number {magic:02x?}")]
    UnknownFormat { magic: [u8; 4] },
    #[error("Stream ended after {got} bytes, before the 4 byte magic number")]
    TruncatedMagic { got: usize },
    #[error(transparent)]
    Pcap(#[from] PcapParseError),
    #[error(transparent)]
    PcapNg(#[from] PcapNgParseError),
    #[error(transparent)]
    IO(#[from] std::io::Error),
}
#[derive(Debug)]
enum SyncAnyPcapReaderInner<R: Read> {
    Pcap(SyncPcapReader<PeekableReader<R>>),
    PcapNg(SyncPcapNgReader<PeekableReader<R>>),
}
impl<R: Read> SyncAnyPcapReaderInner<R> {
    fn new(reader: R) -> Result<Self, AnyPcapReaderError> {
        let peekable = PeekableReader::new(reader, MAGIC_LENGTH)?;
        let Some(magic) = peekable.peek().first_chunk::<MAGIC_LENGTH>().copied() else {
            return Err(AnyPcapReaderError::TruncatedMagic {
                got: peekable.peek().len(),
            });
        };
        let Some(format) = SniffedFormat::from_magic(magic) else {
            return Err(AnyPcapReaderError::UnknownFormat { magic });
        };
        debug!(format = %format.file_type(), "Detected capture format");
        // The peeked magic is replayed, so both readers see the stream from the start
        match format {
            SniffedFormat::Pcap(_) => Ok(Self::Pcap(SyncPcapReader::new(peekable)?)),
            SniffedFormat::PcapNg => Ok(Self::PcapNg(SyncPcapNgReader::new(peekable)?)),
        }
    }
}
/// A reader that can read both pcap and pcapng files
///
/// # When Should I use this?
///
/// When the only requirement is to read packets from either pcap or pcapng files,
/// and you do not need to access file-specific metadata or features.
/// Every [Packet] has its link-layer header decoded and carries its own copy
/// of the captured bytes.
///
/// # How is is the the file type determined?
///
/// The file type is determined by reading the first four bytes (magic number)
/// of the file. If the magic number matches the pcap format, a pcap reader
/// is created. If it matches the pcapng format, a pcapng reader is created.
/// See [PcapFileType::from_magic] for more information.
///
/// # Iteration
///
/// The reader is an [Iterator] of `Result<Packet, _>`. After the first error
/// it yields nothing more.
#[derive(Debug)]
pub struct SyncAnyPcapReader<R: Read> {
    inner: SyncAnyPcapReaderInner<R>,
    finished: bool,
}
impl<R: Read> SyncAnyPcapReader<R> {
    /// Creates a new `SyncAnyPcapReader` from a reader
    ///
    /// Reads the magic number and the file header or first section header.
    pub fn new(reader: R) -> Result<Self, AnyPcapReaderError> {
        let inner = SyncAnyPcapReaderInner::new(reader)?;
        Ok(Self {
            inner,
            finished: false,
        })
    }
    /// Reads and decodes the next packet from the pcap or pcapng file
    ///
    /// When Ok(None) is returned, it indicates the end of the file has been reached
    pub fn next_packet(&mut self) -> Result<Option<Packet>, AnyPcapReaderError> {
        match &mut self.inner {
            SyncAnyPcapReaderInner::Pcap(reader) => {
                let file_header = *reader.file_header();
                let Some((header, data)) = reader.next_packet()? else {
                    return Ok(None);
                };
                let decoded = LinkLayerDecoder::for_link_type(file_header.link_type)
                    .decode(data, file_header.endianness());
                Ok(Some(Packet::new(
                    PcapFileType::Pcap,
                    file_header.version,
                    file_header.endianness(),
                    file_header.snap_length,
                    file_header.link_type,
                    Some(header.timestamp(file_header.magic_number_and_endianness.magic_number)),
                    header.orig_len,
                    data.to_vec(),
                    decoded,
                    None,
                )))
            }
            SyncAnyPcapReaderInner::PcapNg(reader) => {
                let Some(packet) = reader.next_packet()? else {
                    return Ok(None);
                };
                let section = packet.section;
                let interface = packet.interface;
                let decoded = LinkLayerDecoder::for_link_type(interface.link_type)
                    .decode(packet.data, section.byte_order);
                Ok(Some(Packet::new(
                    PcapFileType::PcapNg,
                    section.version,
                    section.byte_order,
                    interface.snap_length,
                    interface.link_type,
                    packet.timestamp,
                    packet.original_length,
                    packet.data.to_vec(),
                    decoded,
                    Some(PcapNgMetadata {
                        section,
                        interface,
                        options: packet.options,
                    }),
                )))
            }
        }
    }
    /// Returns the type of the pcap file
    pub fn file_type(&self) -> PcapFileType {
        match &self.inner {
            SyncAnyPcapReaderInner::Pcap(_) => PcapFileType::Pcap,
            SyncAnyPcapReaderInner::PcapNg(_) => PcapFileType::PcapNg,
        }
    }
    /// Describes the capture; for pcap-ng this is the current section
    pub fn capture_file(&self) -> CaptureFile {
        match &self.inner {
            SyncAnyPcapReaderInner::Pcap(reader) => {
                let header = reader.file_header();
                CaptureFile {
                    file_type: PcapFileType::Pcap,
                    version: header.version,
                    byte_order: header.endianness(),
                    snap_length: Some(header.snap_length),
                    link_type: Some(header.link_type),
                }
            }
            SyncAnyPcapReaderInner::PcapNg(reader) => {
                let section = reader.current_section();
                CaptureFile {
                    file_type: PcapFileType::PcapNg,
                    version: section.version,
                    byte_order: section.byte_order,
                    snap_length: None,
                    link_type: None,
                }
            }
        }
    }
}
impl<R: Read> Iterator for SyncAnyPcapReader<R> {
    type Item = Result<Packet, AnyPcapReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_packet() {
            Ok(Some(packet)) => Some(Ok(packet)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
impl<R: Read> FusedIterator for SyncAnyPcapReader<R> {}

#[cfg(test)]
mod tests {

    use etherparse::{NetSlice, SlicedPacket};

    use crate::{
        Version,
        byte_order::Endianness,
        link_layer::{LinkMetadata, PacketType},
        link_type::LinkType,
        pcap::file_header::MagicNumber,
        pcap_ng::blocks::{InterfaceOptionCodes, SHBOptionCodes},
        test_utils::*,
    };

    use super::*;

    #[test]
    fn read_any_pcap() -> anyhow::Result<()> {
        let frame = udp_frame(b"payload");
        let bytes = PcapBuilder::new(Endianness::LittleEndian, MagicNumber::Microsecond)
            .record(1_340_954_905, 298_858, &frame)
            .record(1_340_954_906, 1, &frame)
            .build();
        let mut reader = SyncAnyPcapReader::new(bytes.as_slice())?;
        assert_eq!(reader.file_type(), PcapFileType::Pcap);
        assert_eq!(
            reader.capture_file(),
            CaptureFile {
                file_type: PcapFileType::Pcap,
                version: Version::new(2, 4),
                byte_order: Endianness::LittleEndian,
                snap_length: Some(65535),
                link_type: Some(LinkType::Ethernet),
            }
        );

        let packet = reader.next_packet()?.ok_or_else(|| anyhow::anyhow!("eof"))?;
        assert_eq!(packet.capture_type, PcapFileType::Pcap);
        assert_eq!(packet.version.to_string(), "2.4");
        assert_eq!(packet.snap_length, 65535);
        assert_eq!(packet.link_type, LinkType::Ethernet);
        assert_eq!(
            packet.timestamp.map(|ts| ts.to_string()).as_deref(),
            Some("1340954905.298858")
        );
        assert_eq!(packet.original_length as usize, frame.len());
        assert_eq!(packet.captured_length(), frame.len());
        assert_eq!(packet.packet_type, PacketType::Ipv4);
        assert_eq!(
            packet.dst_mac().map(|mac| mac.to_string()).as_deref(),
            Some("00:01:2e:78:08:b1")
        );
        assert_eq!(
            packet.src_mac().map(|mac| mac.to_string()).as_deref(),
            Some("00:26:b9:5d:33:6a")
        );
        assert_eq!(packet.payload().len(), frame.len() - 14);
        let parse = SlicedPacket::from_ip(packet.payload())?;
        assert!(matches!(parse.net, Some(NetSlice::Ipv4(_))));
        assert!(packet.pcapng.is_none());

        assert!(reader.next_packet()?.is_some());
        assert!(reader.next_packet()?.is_none());
        Ok(())
    }

    #[test]
    fn read_any_pcapng() -> anyhow::Result<()> {
        let e = Endianness::BigEndian;
        let mut section_options = option(e, SHBOptionCodes::Hardware as u16, b"x86_64");
        section_options.extend(option(e, SHBOptionCodes::OS as u16, b"Linux"));
        section_options.extend(option(e, SHBOptionCodes::UserApplication as u16, b"dumpcap"));
        section_options.extend(option(e, 1, b"section comment"));
        section_options.extend(end_of_options());
        let mut interface_options = option(e, InterfaceOptionCodes::IfName as u16, b"eth0");
        interface_options.extend(option(
            e,
            InterfaceOptionCodes::IfTimestampResolution as u16,
            &[9],
        ));
        interface_options.extend(end_of_options());
        let mut packet_options = option(e, 1, b"retransmission");
        packet_options.extend(option(e, 2, &u32_bytes(e, 1)));
        packet_options.extend(end_of_options());

        let frame = udp_frame(b"hello");
        let mut bytes = section_header(e, &section_options);
        bytes.extend(interface_description(e, 1, 262144, &interface_options));
        bytes.extend(enhanced_packet(e, 0, 1_340_954_905_298_858_123, &frame, &packet_options));

        let mut reader = SyncAnyPcapReader::new(bytes.as_slice())?;
        assert_eq!(reader.file_type(), PcapFileType::PcapNg);
        let capture = reader.capture_file();
        assert_eq!(capture.byte_order, Endianness::BigEndian);
        assert_eq!(capture.version, Version::new(1, 0));
        assert_eq!(capture.snap_length, None);

        let packet = reader.next_packet()?.ok_or_else(|| anyhow::anyhow!("eof"))?;
        assert_eq!(packet.capture_type, PcapFileType::PcapNg);
        assert_eq!(packet.snap_length, 262144);
        assert_eq!(
            packet.timestamp.map(|ts| ts.to_string()).as_deref(),
            Some("1340954905.298858123")
        );
        assert_eq!(packet.packet_type, PacketType::Ipv4);
        let metadata = packet
            .pcapng
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("missing pcapng metadata"))?;
        assert_eq!(metadata.comments(), vec!["retransmission"]);
        assert_eq!(metadata.flags(), Some(1));
        assert_eq!(metadata.section_comments(), ["section comment"]);
        assert_eq!(metadata.hardware(), Some("x86_64"));
        assert_eq!(metadata.os(), Some("Linux"));
        assert_eq!(metadata.user_application(), Some("dumpcap"));
        assert_eq!(metadata.interface_name(), Some("eth0"));
        assert!(reader.next_packet()?.is_none());
        Ok(())
    }

    #[test]
    fn iterator_yields_every_packet_in_order() -> anyhow::Result<()> {
        let mut builder = PcapBuilder::new(Endianness::BigEndian, MagicNumber::Nanosecond);
        for i in 0..20u32 {
            builder = builder.record(i, i * 1000, &vec![i as u8; i as usize]);
        }
        let bytes = builder.build();
        let packets = SyncAnyPcapReader::new(bytes.as_slice())?.collect::<Result<Vec<_>, _>>()?;
        assert_eq!(packets.len(), 20);
        for (i, packet) in packets.iter().enumerate() {
            let seconds = packet.timestamp.map(|ts| ts.seconds());
            assert_eq!(seconds, Some(i as i64));
            assert_eq!(packet.captured_length(), i);
        }
        let total: usize = packets.iter().map(Packet::captured_length).sum();
        assert_eq!(total, (0..20).sum::<usize>());
        Ok(())
    }

    #[test]
    fn iterator_stops_after_an_error() -> anyhow::Result<()> {
        let bytes = PcapBuilder::new(Endianness::LittleEndian, MagicNumber::Microsecond)
            .record(0, 0, &[1, 2, 3, 4])
            .record(1, 0, &[5, 6, 7, 8])
            .build();
        let mut reader = SyncAnyPcapReader::new(&bytes[..bytes.len() - 2])?;
        assert!(matches!(reader.next(), Some(Ok(_))));
        assert!(matches!(
            reader.next(),
            Some(Err(AnyPcapReaderError::Pcap(
                PcapParseError::TruncatedRecordData {
                    expected: 4,
                    got: 2
                }
            )))
        ));
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
        Ok(())
    }

    #[test]
    fn unknown_and_truncated_magic() {
        assert!(matches!(
            SyncAnyPcapReader::new(&b"GIF89a"[..]),
            Err(AnyPcapReaderError::UnknownFormat { magic }) if &magic == b"GIF8"
        ));
        assert!(matches!(
            SyncAnyPcapReader::new(&[0xd4, 0xc3][..]),
            Err(AnyPcapReaderError::TruncatedMagic { got: 2 })
        ));
        assert!(matches!(
            SyncAnyPcapReader::new(&[][..]),
            Err(AnyPcapReaderError::TruncatedMagic { got: 0 })
        ));
    }

    #[test]
    fn null_link_type_follows_capture_byte_order() -> anyhow::Result<()> {
        for e in [Endianness::LittleEndian, Endianness::BigEndian] {
            let mut frame = u32_bytes(e, 2).to_vec();
            frame.extend([0x45, 0, 0, 20]);
            let bytes = PcapBuilder::new(e, MagicNumber::Microsecond)
                .link_type(0)
                .record(0, 0, &frame)
                .build();
            let packet = SyncAnyPcapReader::new(bytes.as_slice())?
                .next()
                .ok_or_else(|| anyhow::anyhow!("eof"))??;
            assert_eq!(packet.packet_type, PacketType::Ipv4);
            assert_eq!(packet.link, LinkMetadata::Null { family: 2 });
            assert_eq!(packet.payload(), &[0x45, 0, 0, 20]);
        }
        Ok(())
    }

    #[test]
    fn unsupported_link_type_passes_through() -> anyhow::Result<()> {
        let bytes = PcapBuilder::new(Endianness::LittleEndian, MagicNumber::Microsecond)
            .link_type(147)
            .record(0, 0, &[0xde, 0xad])
            .build();
        let packet = SyncAnyPcapReader::new(bytes.as_slice())?
            .next()
            .ok_or_else(|| anyhow::anyhow!("eof"))??;
        assert_eq!(packet.packet_type, PacketType::Unknown);
        assert_eq!(packet.link, LinkMetadata::None);
        assert_eq!(packet.payload(), &[0xde, 0xad]);
        Ok(())
    }

    #[test]
    fn simple_packets_have_no_timestamp() -> anyhow::Result<()> {
        let e = Endianness::LittleEndian;
        let mut bytes = section_header(e, &[]);
        bytes.extend(interface_description(e, 101, 0, &[]));
        bytes.extend(simple_packet(e, 4, &[0x60, 0, 0, 0]));
        let packet = SyncAnyPcapReader::new(bytes.as_slice())?
            .next()
            .ok_or_else(|| anyhow::anyhow!("eof"))??;
        assert_eq!(packet.timestamp, None);
        assert_eq!(packet.link_type, LinkType::Raw);
        assert_eq!(packet.packet_type, PacketType::Ipv6);
        Ok(())
    }
}
