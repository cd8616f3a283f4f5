//! The built-in timestamp extension (type `-1`).

use alloc::vec::Vec;

use crate::de::DecodeError;

/// Extension type reserved for timestamps.
pub const EXT_TIMESTAMP: i8 = -1;

/// Seconds elapsed since the UNIX epoch plus a nanosecond part.
///
/// `nsec` is always non-negative, also for pre-epoch instants:
/// 500ms before the epoch is `sec: -1, nsec: 500_000_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub sec: i64,
    pub nsec: u32,
}

impl Timestamp {
    pub fn new(sec: i64, nsec: u32) -> Self {
        Timestamp { sec, nsec }
    }

    /// Build a timestamp from milliseconds since the epoch, flooring the
    /// second count and keeping the remainder as nanoseconds.
    pub fn from_millis(ms: i64) -> Self {
        Timestamp {
            sec: ms.div_euclid(1000),
            nsec: ms.rem_euclid(1000) as u32 * 1_000_000,
        }
    }

    /// Milliseconds since the epoch, truncating sub-millisecond precision.
    /// Saturates at the `i64` range for second counts beyond it.
    pub fn to_millis(&self) -> i64 {
        self.sec
            .saturating_mul(1000)
            .saturating_add(i64::from(self.nsec / 1_000_000))
    }

    /// Encode to the wire payload carried inside the `-1` extension.
    ///
    /// Non-negative timestamps whose seconds fit in 34 bits pack into
    /// 8 bytes: nanoseconds in the high 30 bits, seconds in the low 34.
    /// Everything else takes 12 bytes: a 32-bit nanosecond word followed
    /// by the full signed 64-bit second count.
    pub fn encode_payload(&self) -> Vec<u8> {
        if self.sec >= 0 && self.sec >> 34 == 0 {
            let word = (u64::from(self.nsec) << 34) | self.sec as u64;
            word.to_be_bytes().into()
        }
        else {
            let mut payload = Vec::with_capacity(12);
            payload.extend_from_slice(&self.nsec.to_be_bytes());
            payload.extend_from_slice(&self.sec.to_be_bytes());
            payload
        }
    }

    /// Decode from a `-1` extension payload.
    ///
    /// The payload length selects the layout: 4 bytes carry whole seconds
    /// only, 8 and 12 bytes mirror [`Timestamp::encode_payload`]. Any
    /// other length is malformed.
    pub fn decode_payload(data: &[u8]) -> Result<Self, DecodeError> {
        match data.len() {
            4 => {
                let sec = u32::from_be_bytes(data.try_into().expect("length checked"));
                Ok(Timestamp { sec: sec.into(), nsec: 0 })
            }
            8 => {
                let word = u64::from_be_bytes(data.try_into().expect("length checked"));
                Ok(Timestamp {
                    sec: (word & 0x3_ffff_ffff) as i64,
                    nsec: (word >> 34) as u32,
                })
            }
            12 => {
                let nsec = u32::from_be_bytes(data[..4].try_into().expect("length checked"));
                let sec = i64::from_be_bytes(data[4..].try_into().expect("length checked"));
                Ok(Timestamp { sec, nsec })
            }
            len => Err(DecodeError::MalformedTimestamp(len)),
        }
    }
}
