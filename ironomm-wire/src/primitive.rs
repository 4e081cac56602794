/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Scalar value codec.
//!
//! Primitives are encoded as the *payload* of a length-delimited envelope
//! (the enclosing entry writes the length), so every function here produces
//! or consumes bare payload bytes. A zero-length payload is the blank form
//! of any primitive type.
//!
//! Integers are trimmed to minimal width big-endian; `Real` carries a hint
//! byte (0x20 = blank) before its mantissa; `Date` is fixed four bytes;
//! `Time` truncates trailing blank groups; `DateTime` is a date followed by
//! a time.

use bytes::{BufMut, Bytes, BytesMut};
use ironomm_core::datetime::{BLANK_HMS, BLANK_MICRO_NANO, BLANK_MILLI};
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::real::BLANK_REAL_HINT;
use ironomm_core::{DataType, MagnitudeType, OmmDate, OmmDateTime, OmmReal, OmmTime};

/// Encodes an unsigned integer at minimal width.
#[must_use]
pub fn encode_uint(v: u64) -> Bytes {
    let be = v.to_be_bytes();
    let skip = (v.leading_zeros() / 8).min(7) as usize;
    Bytes::copy_from_slice(&be[skip..])
}

/// Decodes a trimmed unsigned integer.
///
/// # Errors
/// Returns `DecodeError::InvalidWidth` for payloads wider than eight bytes
/// or empty (blank is handled by the caller).
pub fn decode_uint(data: &[u8]) -> Result<u64, DecodeError> {
    if data.is_empty() || data.len() > 8 {
        return Err(DecodeError::InvalidWidth {
            data_type: DataType::UInt,
            width: data.len(),
        });
    }
    let mut v = 0u64;
    for &b in data {
        v = (v << 8) | u64::from(b);
    }
    Ok(v)
}

/// Encodes a signed integer at minimal width, preserving the sign bit.
#[must_use]
pub fn encode_int(v: i64) -> Bytes {
    let be = v.to_be_bytes();
    // trim redundant sign-extension bytes, keeping the sign bit intact
    let mut skip = 0;
    while skip < 7 {
        let b = be[skip];
        let next = be[skip + 1];
        let redundant = (b == 0x00 && next & 0x80 == 0) || (b == 0xFF && next & 0x80 != 0);
        if !redundant {
            break;
        }
        skip += 1;
    }
    Bytes::copy_from_slice(&be[skip..])
}

/// Decodes a trimmed signed integer, sign-extending from the top bit.
///
/// # Errors
/// Returns `DecodeError::InvalidWidth` for payloads wider than eight bytes
/// or empty.
pub fn decode_int(data: &[u8]) -> Result<i64, DecodeError> {
    if data.is_empty() || data.len() > 8 {
        return Err(DecodeError::InvalidWidth {
            data_type: DataType::Int,
            width: data.len(),
        });
    }
    let mut v: i64 = if data[0] & 0x80 != 0 { -1 } else { 0 };
    for &b in data {
        v = (v << 8) | i64::from(b);
    }
    Ok(v)
}

/// Encodes a 32-bit float.
#[must_use]
pub fn encode_float(v: f32) -> Bytes {
    Bytes::copy_from_slice(&v.to_be_bytes())
}

/// Decodes a 32-bit float.
///
/// # Errors
/// Returns `DecodeError::InvalidWidth` unless the payload is four bytes.
pub fn decode_float(data: &[u8]) -> Result<f32, DecodeError> {
    let arr: [u8; 4] = data.try_into().map_err(|_| DecodeError::InvalidWidth {
        data_type: DataType::Float,
        width: data.len(),
    })?;
    Ok(f32::from_be_bytes(arr))
}

/// Encodes a 64-bit float.
#[must_use]
pub fn encode_double(v: f64) -> Bytes {
    Bytes::copy_from_slice(&v.to_be_bytes())
}

/// Decodes a 64-bit float.
///
/// # Errors
/// Returns `DecodeError::InvalidWidth` unless the payload is eight bytes.
pub fn decode_double(data: &[u8]) -> Result<f64, DecodeError> {
    let arr: [u8; 8] = data.try_into().map_err(|_| DecodeError::InvalidWidth {
        data_type: DataType::Double,
        width: data.len(),
    })?;
    Ok(f64::from_be_bytes(arr))
}

/// Encodes an enumerated value at minimal width.
#[must_use]
pub fn encode_enum(v: u16) -> Bytes {
    encode_uint(u64::from(v))
}

/// Decodes an enumerated value.
///
/// # Errors
/// Returns `DecodeError::InvalidWidth` for payloads wider than two bytes or
/// empty.
pub fn decode_enum(data: &[u8]) -> Result<u16, DecodeError> {
    if data.is_empty() || data.len() > 2 {
        return Err(DecodeError::InvalidWidth {
            data_type: DataType::Enum,
            width: data.len(),
        });
    }
    let mut v = 0u16;
    for &b in data {
        v = (v << 8) | u16::from(b);
    }
    Ok(v)
}

/// Encodes a real: hint byte plus trimmed mantissa.
#[must_use]
pub fn encode_real(v: OmmReal) -> Bytes {
    let mut buf = BytesMut::with_capacity(9);
    buf.put_u8(v.magnitude.code());
    buf.extend_from_slice(&encode_int(v.mantissa));
    buf.freeze()
}

/// Encodes the blank real form.
#[must_use]
pub fn encode_real_blank() -> Bytes {
    Bytes::from_static(&[BLANK_REAL_HINT])
}

/// Decodes a real. `Ok(None)` is the blank form.
///
/// # Errors
/// Returns `DecodeError::OutOfRange` for an unknown hint byte and
/// `DecodeError::InvalidWidth` for a bad mantissa width.
pub fn decode_real(data: &[u8]) -> Result<Option<OmmReal>, DecodeError> {
    let (&hint, mantissa) = data.split_first().ok_or(DecodeError::InvalidWidth {
        data_type: DataType::Real,
        width: 0,
    })?;
    if hint == BLANK_REAL_HINT {
        return Ok(None);
    }
    let magnitude =
        MagnitudeType::from_code(hint).ok_or_else(|| DecodeError::OutOfRange {
            data_type: DataType::Real,
            reason: format!("unknown magnitude hint {hint}"),
        })?;
    let mantissa = if mantissa.is_empty() {
        0
    } else {
        decode_int(mantissa)?
    };
    Ok(Some(OmmReal::new(mantissa, magnitude)))
}

/// Encodes a date as four fixed bytes; the blank date encodes empty.
#[must_use]
pub fn encode_date(v: OmmDate) -> Bytes {
    if v.is_blank() {
        return Bytes::new();
    }
    let mut buf = BytesMut::with_capacity(4);
    buf.put_u8(v.day);
    buf.put_u8(v.month);
    buf.put_u16(v.year);
    buf.freeze()
}

/// Decodes a date. Empty or all-zero payloads are the blank date.
///
/// # Errors
/// Returns `DecodeError::InvalidWidth` unless the payload is zero or four
/// bytes.
pub fn decode_date(data: &[u8]) -> Result<OmmDate, DecodeError> {
    match data.len() {
        0 => Ok(OmmDate::blank()),
        4 => Ok(OmmDate::new(
            data[0],
            data[1],
            u16::from_be_bytes([data[2], data[3]]),
        )),
        width => Err(DecodeError::InvalidWidth {
            data_type: DataType::Date,
            width,
        }),
    }
}

/// Encodes a time, truncating trailing blank groups. Widths: 2 (h,m),
/// 3 (+s), 5 (+ms), 7 (+us), 9 (+ns); the blank time encodes empty.
///
/// # Errors
/// Returns `EncodeError::ValueNotEncodable` for times whose absent
/// components are not a trailing suffix.
pub fn encode_time(v: OmmTime) -> Result<Bytes, EncodeError> {
    if v.is_blank() {
        return Ok(Bytes::new());
    }
    if !v.is_valid() {
        return Err(EncodeError::ValueNotEncodable {
            data_type: DataType::Time,
            reason: "absent components must be a trailing suffix".to_string(),
        });
    }
    // minimum wire width is hour plus minute
    if v.minute == BLANK_HMS {
        return Err(EncodeError::ValueNotEncodable {
            data_type: DataType::Time,
            reason: "hour-only time has no wire form".to_string(),
        });
    }
    let mut buf = BytesMut::with_capacity(9);
    buf.put_u8(v.hour);
    buf.put_u8(v.minute);
    if v.second == BLANK_HMS {
        return Ok(buf.freeze());
    }
    buf.put_u8(v.second);
    if v.millisecond == BLANK_MILLI {
        return Ok(buf.freeze());
    }
    buf.put_u16(v.millisecond);
    if v.microsecond == BLANK_MICRO_NANO {
        return Ok(buf.freeze());
    }
    buf.put_u16(v.microsecond);
    if v.nanosecond == BLANK_MICRO_NANO {
        return Ok(buf.freeze());
    }
    buf.put_u16(v.nanosecond);
    Ok(buf.freeze())
}

/// Decodes a time from its truncated widths. Empty is the blank time.
///
/// # Errors
/// Returns `DecodeError::InvalidWidth` for widths other than 0/2/3/5/7/9.
pub fn decode_time(data: &[u8]) -> Result<OmmTime, DecodeError> {
    let mut t = OmmTime::blank();
    match data.len() {
        0 => return Ok(t),
        2 | 3 | 5 | 7 | 9 => {}
        width => {
            return Err(DecodeError::InvalidWidth {
                data_type: DataType::Time,
                width,
            });
        }
    }
    t.hour = data[0];
    t.minute = data[1];
    if data.len() >= 3 {
        t.second = data[2];
    }
    if data.len() >= 5 {
        t.millisecond = u16::from_be_bytes([data[3], data[4]]);
    }
    if data.len() >= 7 {
        t.microsecond = u16::from_be_bytes([data[5], data[6]]);
    }
    if data.len() >= 9 {
        t.nanosecond = u16::from_be_bytes([data[7], data[8]]);
    }
    Ok(t)
}

/// Encodes a date-time: fixed date bytes followed by the truncated time.
///
/// # Errors
/// Returns `EncodeError::ValueNotEncodable` if the time portion is invalid.
pub fn encode_datetime(v: OmmDateTime) -> Result<Bytes, EncodeError> {
    if v.is_blank() {
        return Ok(Bytes::new());
    }
    let mut buf = BytesMut::with_capacity(13);
    buf.put_u8(v.date.day);
    buf.put_u8(v.date.month);
    buf.put_u16(v.date.year);
    buf.extend_from_slice(&encode_time(v.time)?);
    Ok(buf.freeze())
}

/// Decodes a date-time. Empty is the blank date-time; four bytes is a date
/// with a blank time.
///
/// # Errors
/// Returns `DecodeError::InvalidWidth` on widths the time portion cannot
/// take.
pub fn decode_datetime(data: &[u8]) -> Result<OmmDateTime, DecodeError> {
    if data.is_empty() {
        return Ok(OmmDateTime::blank());
    }
    if data.len() < 4 {
        return Err(DecodeError::InvalidWidth {
            data_type: DataType::DateTime,
            width: data.len(),
        });
    }
    let date = decode_date(&data[..4])?;
    let time = decode_time(&data[4..]).map_err(|_| DecodeError::InvalidWidth {
        data_type: DataType::DateTime,
        width: data.len(),
    })?;
    Ok(OmmDateTime::new(date, time))
}

/// Encodes an ASCII string.
///
/// # Errors
/// Returns `EncodeError::ValueNotEncodable` on non-ASCII input.
pub fn encode_ascii(v: &str) -> Result<Bytes, EncodeError> {
    if !v.is_ascii() {
        return Err(EncodeError::ValueNotEncodable {
            data_type: DataType::AsciiString,
            reason: "string contains non-ascii bytes".to_string(),
        });
    }
    Ok(Bytes::copy_from_slice(v.as_bytes()))
}

/// Decodes an ASCII string payload.
///
/// # Errors
/// Returns `DecodeError::InvalidUtf8` on non-ASCII bytes.
pub fn decode_ascii(data: &Bytes) -> Result<String, DecodeError> {
    if !data.is_ascii() {
        return Err(DecodeError::InvalidUtf8);
    }
    // ascii is always valid utf-8
    Ok(String::from_utf8_lossy(data).into_owned())
}

/// Decodes a UTF-8 string payload.
///
/// # Errors
/// Returns `DecodeError::InvalidUtf8` on malformed input.
pub fn decode_utf8(data: &Bytes) -> Result<String, DecodeError> {
    std::str::from_utf8(data)
        .map(ToOwned::to_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}
