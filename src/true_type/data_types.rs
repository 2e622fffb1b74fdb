use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fixed::types::{I2F14, U16F16};

/// 16.16-bit fixed-point number, integer part read as an unsigned 16-bit word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed(pub U16F16);

impl Fixed {
    pub const fn from_bits(bits: u32) -> Self {
        Self(U16F16::from_bits(bits))
    }

    pub fn to_f32(self) -> f32 {
        self.0.to_num()
    }
}

/// 16-bit signed fixed number with the low 14 bits representing fraction
pub type F2Dot14 = I2F14;

/// 16-bit signed integer that describes a quantity in FUnits, the smallest
/// measurable distance in em space
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct FWord(pub i16);

impl From<FWord> for i32 {
    fn from(word: FWord) -> Self {
        i32::from(word.0)
    }
}

/// Seconds between 1904-01-01T00:00:00Z and the Unix epoch
const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;

/// The long internal format of a date in seconds since 12:00 midnight, January
/// 1, 1904. It is represented as a signed 64-bit integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongDateTime(pub i64);

impl LongDateTime {
    pub fn to_unix_seconds(self) -> i64 {
        self.0 - MAC_EPOCH_OFFSET
    }

    pub fn to_system_time(self) -> SystemTime {
        let unix = self.to_unix_seconds();

        if unix >= 0 {
            UNIX_EPOCH + Duration::from_secs(unix as u64)
        } else {
            UNIX_EPOCH - Duration::from_secs(unix.unsigned_abs())
        }
    }
}
