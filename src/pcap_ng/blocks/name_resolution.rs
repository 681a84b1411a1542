use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::{
    byte_order::Endianness,
    pcap_ng::{
        PcapNgParseError,
        blocks::{BLOCK_FRAMING_LENGTH, Block},
        options::{BlockOptions, Tlv, define_options_enum, parse_tlv},
    },
};
define_options_enum! {
    /// Options for the Name Resolution Block
    enum NameResolutionOptionCodes {
        DnsName = 2,
        DnsIPv4Address = 3,
        DnsIPv6Address = 4,
    }
}

const RECORD_IPV4: u16 = 1;
const RECORD_IPV6: u16 = 2;

/// One record of a name resolution block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRecord {
    /// An address and the names it resolves to
    Address { address: IpAddr, names: Vec<String> },
    /// Any other record type, kept as written
    Other { record_type: u16, value: Vec<u8> },
}
impl NameRecord {
    fn from_tlv(Tlv { code, value }: Tlv<'_>) -> Self {
        let address = match code {
            RECORD_IPV4 => value
                .first_chunk::<4>()
                .map(|octets| (IpAddr::V4(Ipv4Addr::from(*octets)), 4)),
            RECORD_IPV6 => value
                .first_chunk::<16>()
                .map(|octets| (IpAddr::V6(Ipv6Addr::from(*octets)), 16)),
            _ => None,
        };
        match address {
            Some((address, length)) => {
                let names = value[length..]
                    .split(|byte| *byte == 0)
                    .filter(|name| !name.is_empty())
                    .map(|name| String::from_utf8_lossy(name).into_owned())
                    .collect();
                Self::Address { address, names }
            }
            None => Self::Other {
                record_type: code,
                value: value.to_vec(),
            },
        }
    }
}

/// Address to name mappings recorded by the capture tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResolutionBlock {
    pub records: Vec<NameRecord>,
    pub options: BlockOptions,
}
impl NameResolutionBlock {
    /// Names recorded for the address, across all records
    pub fn names_for(&self, address: IpAddr) -> impl Iterator<Item = &str> {
        self.records.iter().flat_map(move |record| match record {
            NameRecord::Address {
                address: recorded,
                names,
            } if *recorded == address => names.as_slice(),
            _ => &[][..],
        })
        .map(String::as_str)
    }
}
impl Block<'_> for NameResolutionBlock {
    fn block_id() -> u32 {
        4
    }

    fn minimum_size() -> usize {
        BLOCK_FRAMING_LENGTH
    }
    fn parse_body(body: &[u8], byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        // Records share the option encoding, nrb_record_end is code zero
        let (records, consumed) = parse_tlv(body, byte_order)?;
        let records = records.into_iter().map(NameRecord::from_tlv).collect();
        Ok(Self {
            records,
            options: BlockOptions::parse(&body[consumed..], byte_order)?,
        })
    }
}
