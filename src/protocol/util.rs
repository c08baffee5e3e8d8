//! Low-level primitive readers/writers shared by every packet encoder/decoder.
//!
//! Mirrors the wire types from the data model: fixed-width little-endian
//! integers, booleans, NUL-terminated UTF-8 strings and the game-date epoch.

use bytes::{Buf, BufMut};
use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;

use crate::error::{AdminError, AdminResult};

/// Reads a bool, failing with `PacketExhausted` if the buffer is empty.
pub fn read_bool(buf: &mut impl Buf, field: &'static str) -> AdminResult<bool> {
    Ok(read_u8(buf, field)? != 0)
}

pub fn write_bool(buf: &mut impl BufMut, v: bool) {
    buf.put_u8(v as u8);
}

macro_rules! read_fn {
    ($name:ident, $ty:ty, $get:ident, $needed:expr) => {
        pub fn $name(buf: &mut impl Buf, field: &'static str) -> AdminResult<$ty> {
            if buf.remaining() < $needed {
                return Err(AdminError::PacketExhausted(field));
            }
            Ok(buf.$get())
        }
    };
}

read_fn!(read_u8, u8, get_u8, 1);
read_fn!(read_u16, u16, get_u16_le, 2);
read_fn!(read_u32, u32, get_u32_le, 4);
read_fn!(read_u64, u64, get_u64_le, 8);
read_fn!(read_i16, i16, get_i16_le, 2);
read_fn!(read_i32, i32, get_i32_le, 4);
read_fn!(read_i64, i64, get_i64_le, 8);

macro_rules! write_fn {
    ($name:ident, $ty:ty, $put:ident) => {
        pub fn $name(buf: &mut impl BufMut, v: $ty) {
            buf.$put(v);
        }
    };
}

write_fn!(write_u8, u8, put_u8);
write_fn!(write_u16, u16, put_u16_le);
write_fn!(write_u32, u32, put_u32_le);
write_fn!(write_u64, u64, put_u64_le);
write_fn!(write_i16, i16, put_i16_le);
write_fn!(write_i32, i32, put_i32_le);
write_fn!(write_i64, i64, put_i64_le);

/// Reads a NUL-terminated UTF-8 string, advancing past the terminator.
/// Missing NUL before the buffer runs dry is `PacketExhausted`.
pub fn read_str(buf: &mut impl Buf, field: &'static str) -> AdminResult<String> {
    let remaining = buf.chunk();
    match remaining.iter().position(|&b| b == 0) {
        Some(nul_at) => {
            let bytes = remaining[..nul_at].to_vec();
            buf.advance(nul_at + 1);
            String::from_utf8(bytes).map_err(|_| AdminError::PacketExhausted(field))
        }
        None => {
            // The NUL terminator may lie further than the first contiguous chunk;
            // fall back to scanning byte by byte for non-contiguous buffers.
            let mut bytes = Vec::new();
            loop {
                if !buf.has_remaining() {
                    return Err(AdminError::PacketExhausted(field));
                }
                let b = buf.get_u8();
                if b == 0 {
                    break;
                }
                bytes.push(b);
            }
            String::from_utf8(bytes).map_err(|_| AdminError::PacketExhausted(field))
        }
    }
}

/// Writes `bytes(s) || 0x00`, validating the declared maximum length (NUL included).
pub fn write_str(
    buf: &mut impl BufMut,
    field: &'static str,
    s: &str,
    max_len: usize,
) -> AdminResult<()> {
    let len = s.len() + 1;
    if len > max_len {
        return Err(AdminError::StringTooLong {
            field,
            len,
            max: max_len,
        });
    }
    buf.put_slice(s.as_bytes());
    buf.put_u8(0);
    Ok(())
}

/// The epoch of the game-date wire type: day 1 of year 0. Year 0 is itself a
/// 366-day leap year in the proleptic Gregorian calendar, which is exactly the
/// "366-day bias" called out in the data model: any raw day count below 366
/// still falls inside year 0 and is treated as "not set".
static GAME_EPOCH: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(0, 1, 1).expect("year 0 day 1 is a valid proleptic date"));

/// Converts the wire's `u32` day count into a calendar date. Returns `None`
/// for the distinguished "not set" sentinel (`0` or any value `< 366`).
pub fn gamedate_to_date(days: u32) -> Option<NaiveDate> {
    if days < 366 {
        return None;
    }
    GAME_EPOCH.checked_add_signed(Duration::days(days as i64))
}

/// Inverse of [`gamedate_to_date`].
pub fn date_to_gamedate(date: NaiveDate) -> u32 {
    (date - *GAME_EPOCH).num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn str_round_trip() {
        let mut buf = BytesMut::new();
        write_str(&mut buf, "test", "Unnamed Server", 80).unwrap();
        let mut reader = buf.freeze();
        assert_eq!(read_str(&mut reader, "test").unwrap(), "Unnamed Server");
        assert!(!reader.has_remaining());
    }

    #[test]
    fn str_too_long_writes_nothing() {
        let mut buf = BytesMut::new();
        let err = write_str(&mut buf, "password", "012345678901234567890123456789012", 33);
        assert!(err.is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn gamedate_round_trip() {
        for raw in [366u32, 1000, 714_271, 800_000] {
            let date = gamedate_to_date(raw).unwrap();
            assert_eq!(date_to_gamedate(date), raw);
        }
    }

    #[test]
    fn gamedate_below_bias_is_unset() {
        assert!(gamedate_to_date(0).is_none());
        assert!(gamedate_to_date(365).is_none());
    }
}
