/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the IronOMM codec.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across all IronOMM operations.

use crate::types::DataType;
use thiserror::Error;

/// Result type alias using [`OmmError`] as the error type.
pub type Result<T> = std::result::Result<T, OmmError>;

/// Top-level error type for all IronOMM operations.
#[derive(Debug, Error)]
pub enum OmmError {
    /// Error during decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error during encoding.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error in date/time string formatting.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
}

/// Errors that occur while decoding RWF-encoded data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Ran off the end of the buffer.
    #[error("unexpected end of input at offset {offset}, need {needed} more bytes")]
    UnexpectedEof {
        /// Offset at which more data was required.
        offset: usize,
        /// Number of additional bytes required.
        needed: usize,
    },

    /// A data type code on the wire is not a known [`DataType`].
    #[error("unknown data type code: {0}")]
    UnknownDataType(u8),

    /// An action nibble is not valid for the container being decoded.
    #[error("invalid {container} entry action: {action}")]
    InvalidAction {
        /// Container kind being decoded.
        container: &'static str,
        /// The offending action value.
        action: u8,
    },

    /// A length prefix points past the end of the enclosing buffer.
    #[error("entry length {length} overruns enclosing buffer of {available} bytes")]
    LengthOverrun {
        /// Declared length.
        length: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// A primitive payload has a width its type cannot carry.
    #[error("invalid width {width} for {data_type:?} value")]
    InvalidWidth {
        /// The primitive type being decoded.
        data_type: DataType,
        /// The offending encoded width.
        width: usize,
    },

    /// A decoded value is outside its type's legal range.
    #[error("value out of range for {data_type:?}: {reason}")]
    OutOfRange {
        /// The primitive type being decoded.
        data_type: DataType,
        /// Description of the violation.
        reason: String,
    },

    /// Payload bytes are not valid UTF-8 where a string was expected.
    #[error("invalid utf-8 in string payload")]
    InvalidUtf8,

    /// The payload of an entry does not match the type the access requested.
    #[error("attempt to read {requested:?} from entry of type {actual:?}")]
    TypeMismatch {
        /// Type requested by the accessor.
        requested: DataType,
        /// Actual type of the entry.
        actual: DataType,
    },

    /// A message class code on the wire is not recognized.
    #[error("unknown message class: {0}")]
    UnknownMsgClass(u8),
}

/// Errors that occur while building or encoding containers and messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Entry payload type conflicts with the container's established load type.
    ///
    /// The display form reproduces the exact template consumers match on.
    #[error(
        "Attempt to add entry of {attempted:?} while {container} entry load type is set to {established:?} with summaryData() method"
    )]
    PayloadTypeConflict {
        /// Container kind the add was attempted on.
        container: &'static str,
        /// Payload type of the rejected entry.
        attempted: DataType,
        /// Load type previously established on the container.
        established: DataType,
    },

    /// A value cannot be represented in its wire encoding.
    #[error("value not encodable as {data_type:?}: {reason}")]
    ValueNotEncodable {
        /// Target wire type.
        data_type: DataType,
        /// Description of the violation.
        reason: String,
    },

    /// A length exceeds what its length-prefix encoding can carry.
    #[error("length {length} exceeds maximum {max} for {encoding} encoding")]
    LengthTooLarge {
        /// The offending length.
        length: usize,
        /// Maximum the encoding supports.
        max: usize,
        /// Name of the length encoding.
        encoding: &'static str,
    },

    /// The map key's type does not match the key type declared on the map.
    #[error("map key type {attempted:?} does not match declared key type {declared:?}")]
    KeyTypeMismatch {
        /// Type of the key on the rejected entry.
        attempted: DataType,
        /// Key type declared on the map.
        declared: DataType,
    },
}

/// Errors raised by the date/time string formatter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The numeric format code does not name a supported format.
    #[error("invalid date time string format value: {0}")]
    InvalidFormatValue(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_type_conflict_display() {
        let err = EncodeError::PayloadTypeConflict {
            container: "Vector",
            attempted: DataType::ElementList,
            established: DataType::FieldList,
        };
        assert_eq!(
            err.to_string(),
            "Attempt to add entry of ElementList while Vector entry load type is set to FieldList with summaryData() method"
        );
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::UnexpectedEof {
            offset: 10,
            needed: 4,
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of input at offset 10, need 4 more bytes"
        );
    }

    #[test]
    fn test_omm_error_from_decode() {
        let err: OmmError = DecodeError::InvalidUtf8.into();
        assert!(matches!(err, OmmError::Decode(DecodeError::InvalidUtf8)));
    }

    #[test]
    fn test_format_error_display() {
        let err = FormatError::InvalidFormatValue(9);
        assert_eq!(
            err.to_string(),
            "invalid date time string format value: 9"
        );
    }
}
