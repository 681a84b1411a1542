//! Exact capture timestamps
//!
//! Captures store time as an integer count of sub-second units. The unit is
//! either a negative power of ten or a negative power of two. [Timestamp]
//! keeps the integer seconds and the remaining units separately so no
//! precision is lost, and renders the exact decimal value on demand.
use std::{
    cmp::Ordering,
    fmt::{self, Display, Write as _},
};

use thiserror::Error;

/// The largest power of ten that fits in a u64
const MAX_DECIMAL_EXPONENT: u8 = 19;
/// The largest power of two that fits in a u64
const MAX_BINARY_EXPONENT: u8 = 63;
/// Bit 7 of the descriptor selects a power of two
const BINARY_FLAG: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid timestamp resolution descriptor {0:#04x}: units per second do not fit in 64 bits")]
pub struct InvalidTimestampResolution(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Timestamp {raw} at {resolution} with offset {offset}s overflows a signed 64-bit second count")]
pub struct TimestampOutOfRange {
    pub raw: u64,
    pub resolution: TimestampResolution,
    pub offset: i64,
}

/// How many units make up one second
///
/// Mirrors the pcap-ng `if_tsresol` descriptor byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampResolution {
    /// Units are 10^-n seconds
    Decimal(u8),
    /// Units are 2^-n seconds
    Binary(u8),
}
impl TimestampResolution {
    pub const MICROSECONDS: Self = Self::Decimal(6);
    pub const NANOSECONDS: Self = Self::Decimal(9);

    pub fn from_descriptor(descriptor: u8) -> Result<Self, InvalidTimestampResolution> {
        let exponent = descriptor & !BINARY_FLAG;
        if descriptor & BINARY_FLAG == 0 {
            if exponent > MAX_DECIMAL_EXPONENT {
                return Err(InvalidTimestampResolution(descriptor));
            }
            Ok(Self::Decimal(exponent))
        } else {
            if exponent > MAX_BINARY_EXPONENT {
                return Err(InvalidTimestampResolution(descriptor));
            }
            Ok(Self::Binary(exponent))
        }
    }
    /// The descriptor byte as stored in an interface description
    pub fn descriptor(self) -> u8 {
        match self {
            Self::Decimal(exponent) => exponent,
            Self::Binary(exponent) => exponent | BINARY_FLAG,
        }
    }
    /// Number of fractional decimal digits needed to print one unit exactly
    pub fn digits(self) -> usize {
        match self {
            Self::Decimal(exponent) | Self::Binary(exponent) => exponent as usize,
        }
    }
    pub fn units_per_second(self) -> u64 {
        match self {
            Self::Decimal(exponent) => 10u64.pow(exponent as u32),
            Self::Binary(exponent) => 1u64 << exponent,
        }
    }
}
impl Default for TimestampResolution {
    fn default() -> Self {
        Self::MICROSECONDS
    }
}
impl Display for TimestampResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal(exponent) => write!(f, "10^-{exponent}s"),
            Self::Binary(exponent) => write!(f, "2^-{exponent}s"),
        }
    }
}

/// A point in time, in seconds since the Unix epoch, held exactly
///
/// Equality and ordering compare the represented value, so `1.5` at
/// microsecond resolution equals `1.5` at nanosecond resolution.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    seconds: i64,
    /// Always less than `resolution.units_per_second()`
    fraction: u64,
    resolution: TimestampResolution,
}
impl Timestamp {
    /// Splits a raw unit count into whole seconds and remaining units
    ///
    /// `offset` is added to the whole seconds (pcap-ng `if_tsoffset`).
    pub fn from_raw(
        raw: u64,
        resolution: TimestampResolution,
        offset: i64,
    ) -> Result<Self, TimestampOutOfRange> {
        let units = resolution.units_per_second();
        let seconds = i64::try_from(raw / units)
            .ok()
            .and_then(|seconds| seconds.checked_add(offset))
            .ok_or(TimestampOutOfRange {
                raw,
                resolution,
                offset,
            })?;
        Ok(Self {
            seconds,
            fraction: raw % units,
            resolution,
        })
    }
    /// Builds a timestamp from a seconds field and a sub-second field
    ///
    /// A sub-second field of a second or more is carried into the seconds.
    pub fn from_parts(seconds: u32, fraction: u32, resolution: TimestampResolution) -> Self {
        let units = resolution.units_per_second();
        let fraction = fraction as u64;
        Self {
            seconds: seconds as i64 + (fraction / units) as i64,
            fraction: fraction % units,
            resolution,
        }
    }
    /// Whole seconds since the epoch, rounded towards negative infinity
    pub fn seconds(&self) -> i64 {
        self.seconds
    }
    /// Sub-second part, in units of [Self::resolution]
    pub fn fraction(&self) -> u64 {
        self.fraction
    }
    pub fn resolution(&self) -> TimestampResolution {
        self.resolution
    }
    /// Sub-second part truncated to nanoseconds
    pub fn subsec_nanos(&self) -> u32 {
        let nanos = self.fraction as u128 * 1_000_000_000 / self.resolution.units_per_second() as u128;
        nanos as u32
    }
    /// Converts to a chrono date time, truncating below nanoseconds
    #[cfg(feature = "chrono")]
    pub fn to_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.seconds, self.subsec_nanos())
    }
    /// Writes the exact decimal digits of `fraction / units`, one per resolution digit
    fn write_fraction(fraction: u64, resolution: TimestampResolution, out: &mut String) {
        match resolution {
            TimestampResolution::Decimal(exponent) => {
                let _ = write!(out, "{:0width$}", fraction, width = exponent as usize);
            }
            TimestampResolution::Binary(exponent) => {
                // Long division; 2^-n terminates after exactly n decimal digits
                let divisor = 1u128 << exponent;
                let mut remainder = fraction as u128;
                for _ in 0..exponent {
                    remainder *= 10;
                    out.push(char::from(b'0' + (remainder / divisor) as u8));
                    remainder %= divisor;
                }
            }
        }
    }
}
impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Timestamp {}
impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seconds.cmp(&other.seconds).then_with(|| {
            // Both fractions are below 2^64 so the cross products fit in u128
            let left = self.fraction as u128 * other.resolution.units_per_second() as u128;
            let right = other.fraction as u128 * self.resolution.units_per_second() as u128;
            left.cmp(&right)
        })
    }
}
impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        if self.seconds < 0 && self.fraction > 0 {
            // -2 + 0.25 is printed as -1.75
            let whole = (self.seconds + 1).unsigned_abs();
            let fraction = self.resolution.units_per_second() - self.fraction;
            let _ = write!(out, "-{whole}");
            if self.resolution.digits() > 0 {
                out.push('.');
                Self::write_fraction(fraction, self.resolution, &mut out);
            }
        } else {
            let _ = write!(out, "{}", self.seconds);
            if self.resolution.digits() > 0 {
                out.push('.');
                Self::write_fraction(self.fraction, self.resolution, &mut out);
            }
        }
        f.pad(&out)
    }
}
