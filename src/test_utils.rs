//! Builders for in-memory captures shared by the unit tests
use crate::{byte_order::Endianness, pcap::file_header::MagicNumber};

pub(crate) fn u16_bytes(endianness: Endianness, value: u16) -> [u8; 2] {
    match endianness {
        Endianness::BigEndian => value.to_be_bytes(),
        Endianness::LittleEndian => value.to_le_bytes(),
    }
}
pub(crate) fn u32_bytes(endianness: Endianness, value: u32) -> [u8; 4] {
    match endianness {
        Endianness::BigEndian => value.to_be_bytes(),
        Endianness::LittleEndian => value.to_le_bytes(),
    }
}
pub(crate) fn u64_bytes(endianness: Endianness, value: u64) -> [u8; 8] {
    match endianness {
        Endianness::BigEndian => value.to_be_bytes(),
        Endianness::LittleEndian => value.to_le_bytes(),
    }
}
fn pad(buffer: &mut Vec<u8>) {
    while buffer.len() % 4 != 0 {
        buffer.push(0);
    }
}

/// An Ethernet + IPv4 + UDP frame built by etherparse
pub(crate) fn udp_frame(payload: &[u8]) -> Vec<u8> {
    let builder = etherparse::PacketBuilder::ethernet2(
        [0x00, 0x26, 0xb9, 0x5d, 0x33, 0x6a],
        [0x00, 0x01, 0x2e, 0x78, 0x08, 0xb1],
    )
    .ipv4([192, 168, 1, 1], [192, 168, 1, 2], 64)
    .udp(5353, 53);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder
        .write(&mut frame, payload)
        .expect("building a test frame");
    frame
}

struct Record {
    ts_sec: u32,
    ts_fraction: u32,
    include_len: u32,
    orig_len: u32,
    data: Vec<u8>,
}
/// Writes a classic pcap file
pub(crate) struct PcapBuilder {
    endianness: Endianness,
    magic_number: MagicNumber,
    snap_length: u32,
    link_type: u32,
    records: Vec<Record>,
}
impl PcapBuilder {
    pub(crate) fn new(endianness: Endianness, magic_number: MagicNumber) -> Self {
        Self {
            endianness,
            magic_number,
            snap_length: 65535,
            link_type: 1,
            records: Vec::new(),
        }
    }
    pub(crate) fn snap_length(mut self, snap_length: u32) -> Self {
        self.snap_length = snap_length;
        self
    }
    pub(crate) fn link_type(mut self, link_type: u32) -> Self {
        self.link_type = link_type;
        self
    }
    pub(crate) fn record(self, ts_sec: u32, ts_fraction: u32, data: &[u8]) -> Self {
        let len = data.len() as u32;
        self.record_with_lengths(ts_sec, ts_fraction, len, len, data)
    }
    /// Declared lengths are written as given, independent of `data`
    pub(crate) fn record_with_lengths(
        mut self,
        ts_sec: u32,
        ts_fraction: u32,
        include_len: u32,
        orig_len: u32,
        data: &[u8],
    ) -> Self {
        self.records.push(Record {
            ts_sec,
            ts_fraction,
            include_len,
            orig_len,
            data: data.to_vec(),
        });
        self
    }
    pub(crate) fn build(self) -> Vec<u8> {
        let e = self.endianness;
        let magic = match self.magic_number {
            MagicNumber::Microsecond => 0xa1b2c3d4,
            MagicNumber::Nanosecond => 0xa1b23c4d,
        };
        let mut out = Vec::new();
        out.extend_from_slice(&u32_bytes(e, magic));
        out.extend_from_slice(&u16_bytes(e, 2));
        out.extend_from_slice(&u16_bytes(e, 4));
        out.extend_from_slice(&u32_bytes(e, 0));
        out.extend_from_slice(&u32_bytes(e, 0));
        out.extend_from_slice(&u32_bytes(e, self.snap_length));
        out.extend_from_slice(&u32_bytes(e, self.link_type));
        for record in self.records {
            out.extend_from_slice(&u32_bytes(e, record.ts_sec));
            out.extend_from_slice(&u32_bytes(e, record.ts_fraction));
            out.extend_from_slice(&u32_bytes(e, record.include_len));
            out.extend_from_slice(&u32_bytes(e, record.orig_len));
            out.extend_from_slice(&record.data);
        }
        out
    }
}

/// One TLV option, padded to 4 bytes
pub(crate) fn option(e: Endianness, code: u16, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&u16_bytes(e, code));
    out.extend_from_slice(&u16_bytes(e, value.len() as u16));
    out.extend_from_slice(value);
    pad(&mut out);
    out
}
pub(crate) fn end_of_options() -> Vec<u8> {
    vec![0; 4]
}
/// Frames `body` with block type and both length copies
pub(crate) fn block(e: Endianness, block_type: u32, body: &[u8]) -> Vec<u8> {
    let total = (body.len() + 12) as u32;
    let mut out = Vec::new();
    out.extend_from_slice(&u32_bytes(e, block_type));
    out.extend_from_slice(&u32_bytes(e, total));
    out.extend_from_slice(body);
    out.extend_from_slice(&u32_bytes(e, total));
    out
}
pub(crate) fn section_header(e: Endianness, options: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&u32_bytes(e, 0x1A2B3C4D));
    body.extend_from_slice(&u16_bytes(e, 1));
    body.extend_from_slice(&u16_bytes(e, 0));
    body.extend_from_slice(&[0xFF; 8]);
    body.extend_from_slice(options);
    block(e, 0x0A0D0D0A, &body)
}
pub(crate) fn interface_description(
    e: Endianness,
    link_type: u16,
    snap_length: u32,
    options: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&u16_bytes(e, link_type));
    body.extend_from_slice(&[0, 0]);
    body.extend_from_slice(&u32_bytes(e, snap_length));
    body.extend_from_slice(options);
    block(e, 1, &body)
}
pub(crate) fn enhanced_packet(
    e: Endianness,
    interface_id: u32,
    timestamp: u64,
    data: &[u8],
    options: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&u32_bytes(e, interface_id));
    body.extend_from_slice(&u32_bytes(e, (timestamp >> 32) as u32));
    body.extend_from_slice(&u32_bytes(e, timestamp as u32));
    body.extend_from_slice(&u32_bytes(e, data.len() as u32));
    body.extend_from_slice(&u32_bytes(e, data.len() as u32));
    body.extend_from_slice(data);
    pad(&mut body);
    body.extend_from_slice(options);
    block(e, 6, &body)
}
pub(crate) fn simple_packet(e: Endianness, original_length: u32, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&u32_bytes(e, original_length));
    body.extend_from_slice(data);
    pad(&mut body);
    block(e, 3, &body)
}
