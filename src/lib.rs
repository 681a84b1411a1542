//! Decoder for classic pcap and pcap-ng captures
//!
//! [SyncAnyPcapReader] detects the format from the first four bytes and yields
//! [Packet]s with exact timestamps and decoded link-layer headers. The
//! format-specific readers in [pcap] and [pcap_ng] expose the raw records and
//! blocks.
//!
//! ```no_run
//! use pcap_decoder::SyncAnyPcapReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = std::io::BufReader::new(std::fs::File::open("capture.pcapng")?);
//! for packet in SyncAnyPcapReader::new(file)? {
//!     let packet = packet?;
//!     println!("{:?} {} {}", packet.timestamp, packet.packet_type, packet.captured_length());
//! }
//! # Ok(())
//! # }
//! ```
pub mod any_reader;
pub mod byte_order;
pub mod link_layer;
pub mod link_type;
pub mod pcap;
pub mod pcap_ng;
pub mod sniff;
pub mod timestamp;
mod utils;
mod version;
#[cfg(test)]
mod test_utils;

pub use any_reader::{AnyPcapReaderError, CaptureFile, Packet, PcapNgMetadata, SyncAnyPcapReader};
pub use sniff::PcapFileType;
pub use version::Version;
