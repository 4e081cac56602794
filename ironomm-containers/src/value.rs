/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The closed payload union.
//!
//! Every entry payload, summary, and message body is one of a fixed set of
//! shapes: a primitive value, a blank primitive, no data, or an encoded
//! container/message kept as bytes. The set mirrors [`DataType`] exactly,
//! so matching on [`OmmData`] is exhaustive.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::{DataType, OmmDate, OmmDateTime, OmmReal, OmmTime};
use ironomm_wire::primitive;

/// A decoded payload value.
///
/// Containers and messages stay in their encoded form; callers hand the
/// bytes to the matching container's `decode` to descend a level.
#[derive(Debug, Clone, PartialEq)]
pub enum OmmData {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Decimal mantissa/magnitude value.
    Real(OmmReal),
    /// Calendar date.
    Date(OmmDate),
    /// Time of day.
    Time(OmmTime),
    /// Combined date and time.
    DateTime(OmmDateTime),
    /// Enumerated value.
    Enum(u16),
    /// Opaque byte sequence.
    Buffer(Bytes),
    /// ASCII string.
    Ascii(String),
    /// UTF-8 string.
    Utf8(String),
    /// RMTES-encoded bytes, resolved by the `ironomm-rmtes` crate.
    Rmtes(Bytes),
    /// A blank primitive of the given type.
    Blank(DataType),
    /// Absent payload.
    NoData,
    /// An encoded container or message, tagged with its type.
    Container(DataType, Bytes),
}

impl OmmData {
    /// Returns the wire type of this value.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::UInt(_) => DataType::UInt,
            Self::Float(_) => DataType::Float,
            Self::Double(_) => DataType::Double,
            Self::Real(_) => DataType::Real,
            Self::Date(_) => DataType::Date,
            Self::Time(_) => DataType::Time,
            Self::DateTime(_) => DataType::DateTime,
            Self::Enum(_) => DataType::Enum,
            Self::Buffer(_) => DataType::Buffer,
            Self::Ascii(_) => DataType::AsciiString,
            Self::Utf8(_) => DataType::Utf8String,
            Self::Rmtes(_) => DataType::RmtesString,
            Self::Blank(dt) => *dt,
            Self::NoData => DataType::NoData,
            Self::Container(dt, _) => *dt,
        }
    }

    /// Returns true for the blank form of any primitive.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }

    /// Encodes this value to its payload bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` for values their wire type
    /// cannot carry (non-ASCII in an ASCII string, non-suffix-blank times).
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        match self {
            Self::Int(v) => Ok(primitive::encode_int(*v)),
            Self::UInt(v) => Ok(primitive::encode_uint(*v)),
            Self::Float(v) => Ok(primitive::encode_float(*v)),
            Self::Double(v) => Ok(primitive::encode_double(*v)),
            Self::Real(v) => Ok(primitive::encode_real(*v)),
            Self::Date(v) => Ok(primitive::encode_date(*v)),
            Self::Time(v) => primitive::encode_time(*v),
            Self::DateTime(v) => primitive::encode_datetime(*v),
            Self::Enum(v) => Ok(primitive::encode_enum(*v)),
            Self::Buffer(b) | Self::Rmtes(b) | Self::Container(_, b) => Ok(b.clone()),
            Self::Ascii(s) => primitive::encode_ascii(s),
            Self::Utf8(s) => Ok(Bytes::copy_from_slice(s.as_bytes())),
            Self::Blank(DataType::Real) => Ok(primitive::encode_real_blank()),
            Self::Blank(_) | Self::NoData => Ok(Bytes::new()),
        }
    }

    /// Decodes payload bytes tagged with `data_type`.
    ///
    /// An empty payload decodes to [`OmmData::Blank`] for primitive types
    /// (the blank real form is the hint byte alone) and to an empty value
    /// for byte-shaped types. Container and message payloads are kept as
    /// encoded bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` when the payload width or content does not
    /// fit the tagged type.
    pub fn decode(data_type: DataType, data: Bytes) -> Result<Self, DecodeError> {
        if data.is_empty() && data_type.is_primitive() {
            return Ok(match data_type {
                DataType::Buffer => Self::Buffer(data),
                DataType::RmtesString => Self::Rmtes(data),
                DataType::AsciiString => Self::Ascii(String::new()),
                DataType::Utf8String => Self::Utf8(String::new()),
                other => Self::Blank(other),
            });
        }
        Ok(match data_type {
            DataType::Int => Self::Int(primitive::decode_int(&data)?),
            DataType::UInt => Self::UInt(primitive::decode_uint(&data)?),
            DataType::Float => Self::Float(primitive::decode_float(&data)?),
            DataType::Double => Self::Double(primitive::decode_double(&data)?),
            DataType::Real => match primitive::decode_real(&data)? {
                Some(real) => Self::Real(real),
                None => Self::Blank(DataType::Real),
            },
            DataType::Date => {
                let date = primitive::decode_date(&data)?;
                if date.is_blank() {
                    Self::Blank(DataType::Date)
                } else {
                    Self::Date(date)
                }
            }
            DataType::Time => Self::Time(primitive::decode_time(&data)?),
            DataType::DateTime => Self::DateTime(primitive::decode_datetime(&data)?),
            DataType::Enum => Self::Enum(primitive::decode_enum(&data)?),
            DataType::Buffer => Self::Buffer(data),
            DataType::AsciiString => Self::Ascii(primitive::decode_ascii(&data)?),
            DataType::Utf8String => Self::Utf8(primitive::decode_utf8(&data)?),
            DataType::RmtesString => Self::Rmtes(data),
            DataType::NoData => Self::NoData,
            container => Self::Container(container, data),
        })
    }
}
