//! Type-length-value options shared by most pcap-ng blocks
//!
//! Every option is a 2 byte code, a 2 byte length and `length` bytes of value
//! padded to a 4 byte boundary. A code of zero ends the list; so does the end
//! of the bytes set aside for options.
use crate::{
    byte_order::{ByteOrder, Endianness},
    pcap_ng::padded_length,
};
use thiserror::Error;

macro_rules! define_options_enum {
    (
        $(#[$docs:meta])*
        enum $name:ident {
            $(
                $(#[$variant_docs:meta])*
                $variant:ident = $value:literal,
            )*
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $(#[$docs])*
        pub enum $name {
            $(
                $(#[$variant_docs])*
                $variant = $value,
            )*
        }

        impl TryFrom<u16> for $name {
            type Error = ();

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $(
                        $value => Ok(Self::$variant),
                    )*
                    _ => Err(()),
                }
            }
        }

    };
}
pub(crate) use define_options_enum;
define_options_enum! {
    /// Option codes valid in every block that carries options
    enum StandardOptions {
        EndOfOptions = 0,
        Comment = 1,
        CustomUTF8Copied = 2988,
        CustomBinaryCopied = 2989,
        CustomUTF8NotCopied = 19372,
        CustomBinaryNotCopied = 19373,
    }
}
impl StandardOptions {
    pub fn is_custom(&self) -> bool {
        matches!(
            self,
            Self::CustomBinaryCopied
                | Self::CustomBinaryNotCopied
                | Self::CustomUTF8Copied
                | Self::CustomUTF8NotCopied
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OptionParseError {
    #[error("Truncated option header: {remaining} bytes left in the block, 4 needed")]
    TruncatedOptionHeader { remaining: usize },
    #[error("Option {code} declares {length} value bytes but only {remaining} remain in the block")]
    OptionOverflow {
        code: u16,
        length: u16,
        remaining: usize,
    },
}

/// One raw type-length-value entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tlv<'a> {
    pub code: u16,
    pub value: &'a [u8],
}
/// Reads entries until a zero code or the end of `bytes`
///
/// Returns the entries and the number of bytes consumed, including the
/// terminating entry and padding.
pub(crate) fn parse_tlv(
    bytes: &[u8],
    byte_order: Endianness,
) -> Result<(Vec<Tlv<'_>>, usize), OptionParseError> {
    let mut entries = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let remaining = bytes.len() - offset;
        let Some(&[c0, c1, l0, l1]) = bytes[offset..].first_chunk::<4>() else {
            return Err(OptionParseError::TruncatedOptionHeader { remaining });
        };
        let code = byte_order.u16_from_bytes([c0, c1]);
        let length = byte_order.u16_from_bytes([l0, l1]);
        offset += 4;
        if code == StandardOptions::EndOfOptions as u16 {
            // opt_endofopt may still declare a (zero) value; skip it if present
            offset = bytes.len().min(offset + padded_length(length as usize));
            break;
        }
        let remaining = bytes.len() - offset;
        if length as usize > remaining {
            return Err(OptionParseError::OptionOverflow {
                code,
                length,
                remaining,
            });
        }
        entries.push(Tlv {
            code,
            value: &bytes[offset..offset + length as usize],
        });
        // Producers sometimes drop the padding of the final entry
        offset = bytes.len().min(offset + padded_length(length as usize));
    }
    Ok((entries, offset))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOption {
    pub code: u16,
    /// Private Enterprise Number (PEN)
    ///
    /// Only present if the option is a custom option
    pub pen: Option<u32>,
    /// The value without padding, and without the PEN for custom options
    pub value: Vec<u8>,
}
impl BlockOption {
    /// The value as UTF-8 text, replacing invalid sequences
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

/// The options of one block, in file order
///
/// A code may appear more than once; every occurrence is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockOptions(pub Vec<BlockOption>);
impl BlockOptions {
    pub fn parse(bytes: &[u8], byte_order: Endianness) -> Result<Self, OptionParseError> {
        let (entries, _) = parse_tlv(bytes, byte_order)?;
        let options = entries
            .into_iter()
            .map(|Tlv { code, value }| {
                let is_custom = StandardOptions::try_from(code).is_ok_and(|code| code.is_custom());
                match value.split_first_chunk::<4>() {
                    Some((pen, rest)) if is_custom => BlockOption {
                        code,
                        pen: Some(byte_order.u32_from_bytes(*pen)),
                        value: rest.to_vec(),
                    },
                    _ => BlockOption {
                        code,
                        pen: None,
                        value: value.to_vec(),
                    },
                }
            })
            .collect();
        Ok(Self(options))
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, BlockOption> {
        self.0.iter()
    }
    /// The first option with the code
    pub fn get(&self, code: u16) -> Option<&BlockOption> {
        self.0.iter().find(|option| option.code == code)
    }
    /// Every option with the code, in file order
    pub fn get_all(&self, code: u16) -> impl Iterator<Item = &BlockOption> {
        self.0.iter().filter(move |option| option.code == code)
    }
    pub fn string(&self, code: u16) -> Option<String> {
        self.get(code).map(BlockOption::as_string)
    }
    pub fn strings(&self, code: u16) -> Vec<String> {
        self.get_all(code).map(BlockOption::as_string).collect()
    }
    /// All `opt_comment` values
    pub fn comments(&self) -> Vec<String> {
        self.strings(StandardOptions::Comment as u16)
    }
    pub fn u32_value(&self, code: u16, byte_order: Endianness) -> Option<u32> {
        let value = self.get(code)?.value.first_chunk::<4>()?;
        Some(byte_order.u32_from_bytes(*value))
    }
    pub fn u64_value(&self, code: u16, byte_order: Endianness) -> Option<u64> {
        let value = self.get(code)?.value.first_chunk::<8>()?;
        Some(byte_order.u64_from_bytes(*value))
    }
    pub fn i64_value(&self, code: u16, byte_order: Endianness) -> Option<i64> {
        self.u64_value(code, byte_order).map(|value| value as i64)
    }
}
impl<'a> IntoIterator for &'a BlockOptions {
    type Item = &'a BlockOption;
    type IntoIter = std::slice::Iter<'a, BlockOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
