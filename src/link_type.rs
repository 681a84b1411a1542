//! Link-layer header type identifiers
//!
//! [Source](https://www.tcpdump.org/linktypes.html)
use std::fmt::{self, Display};

macro_rules! link_type {
    (
        $(
            $(#[$variant_docs:meta])*
            $name:ident = $value:literal
        ),* $(,)?
    ) => {
        /// The link-layer header type of captured data
        ///
        /// Values without a named variant are kept as [LinkType::Unknown]
        /// so that captures from newer producers can still be read.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum LinkType {
            $(
                $(#[$variant_docs])*
                $name,
            )*
            Unknown(u16),
        }

        impl From<u16> for LinkType {
            fn from(value: u16) -> Self {
                match value {
                    $(
                        $value => LinkType::$name,
                    )*
                    other => LinkType::Unknown(other),
                }
            }
        }
        impl From<LinkType> for u16 {
            fn from(value: LinkType) -> Self {
                match value {
                    $(
                        LinkType::$name => $value,
                    )*
                    LinkType::Unknown(other) => other,
                }
            }
        }
    };
}
link_type! {
    /// BSD loopback, 4 byte address family in the capturing host's byte order
    Null = 0,
    Ethernet = 1,
    Ax25 = 3,
    Ieee802_5 = 6,
    Slip = 8,
    Ppp = 9,
    Fddi = 10,
    PppHdlc = 50,
    PppEther = 51,
    AtmRfc1483 = 100,
    /// Raw IP, version taken from the first nibble
    Raw = 101,
    CHdlc = 104,
    Ieee802_11 = 105,
    Frelay = 107,
    /// OpenBSD loopback, 4 byte address family in network byte order
    Loop = 108,
    LinuxSll = 113,
    Ltalk = 114,
    Pflog = 117,
    Ieee802_11Prism = 119,
    Ieee802_11Radiotap = 127,
    Mtp2 = 140,
    Mtp3 = 141,
    Ieee802_11Avs = 163,
    BluetoothHciH4 = 187,
    UsbLinux = 189,
    Ppi = 192,
    Ieee802_15_4Withfcs = 195,
    Erf = 197,
    UsbLinuxMmapped = 220,
    Ipnet = 226,
    CanSocketcan = 227,
    /// Raw IPv4, no link-layer header
    Ipv4 = 228,
    /// Raw IPv6, no link-layer header
    Ipv6 = 229,
    Nflog = 239,
    Netanalyzer = 240,
    UsbPcap = 249,
    BluetoothLeLl = 251,
    Netlink = 253,
    BluetoothLinuxMonitor = 254,
    Pktap = 258,
    Vsock = 271,
    LinuxSll2 = 276,
}
impl LinkType {
    /// The numeric value as written in the capture
    pub fn value(self) -> u16 {
        self.into()
    }
    pub fn is_known(self) -> bool {
        !matches!(self, LinkType::Unknown(_))
    }
}
impl From<u32> for LinkType {
    /// Only the low 16 bits carry the link type; classic pcap headers reuse the upper bits
    fn from(value: u32) -> Self {
        LinkType::from((value & 0xFFFF) as u16)
    }
}
impl Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkType::Unknown(value) => write!(f, "Unknown({value})"),
            known => write!(f, "{known:?}({})", known.value()),
        }
    }
}
