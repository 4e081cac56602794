/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Data type codes and entry actions for the Open Message Model.
//!
//! This module provides:
//! - [`DataType`]: the closed set of wire type codes spanning primitives,
//!   containers, and messages
//! - [`FilterAction`], [`VectorAction`], [`MapAction`]: per-container entry
//!   action enumerations

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Container type codes occupy the range `128..=142`; on the wire they are
/// stored rebased against this constant.
pub const CONTAINER_TYPE_MIN: u8 = 128;

/// Wire data type code.
///
/// Every entry payload, message attrib, and message payload carries one of
/// these tags. The set is closed: primitives below 128, containers and
/// messages at 128 and above.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromPrimitive,
    ToPrimitive,
)]
#[repr(u8)]
pub enum DataType {
    /// Signed integer, trimmed to minimal width on the wire.
    Int = 3,
    /// Unsigned integer, trimmed to minimal width on the wire.
    UInt = 4,
    /// 32-bit IEEE float.
    Float = 5,
    /// 64-bit IEEE float.
    Double = 6,
    /// Decimal value as mantissa plus magnitude hint.
    Real = 8,
    /// Calendar date with optional components.
    Date = 9,
    /// Time of day with optional sub-second components.
    Time = 10,
    /// Combined date and time.
    DateTime = 11,
    /// Enumerated value (dictionary-resolved display).
    Enum = 14,
    /// Opaque byte sequence.
    Buffer = 16,
    /// ASCII string.
    AsciiString = 17,
    /// UTF-8 string.
    Utf8String = 18,
    /// RMTES-encoded string (see the `ironomm-rmtes` crate).
    RmtesString = 19,
    /// Absent payload.
    NoData = 128,
    /// Opaque container passed through undecoded.
    Opaque = 130,
    /// Field-id keyed container, types resolved via dictionary.
    FieldList = 132,
    /// Name keyed container with self-describing entry types.
    ElementList = 133,
    /// Filter-id keyed container with entry actions.
    FilterList = 135,
    /// Position-indexed container with entry actions.
    Vector = 136,
    /// Key-value container with entry actions.
    Map = 137,
    /// Implicitly indexed uniform container.
    Series = 138,
    /// Nested message envelope.
    Msg = 141,
}

impl DataType {
    /// Decodes a raw wire code into a `DataType`.
    #[inline]
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }

    /// Returns the raw wire code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns true for container types, messages included.
    #[inline]
    #[must_use]
    pub const fn is_container(self) -> bool {
        self.code() >= CONTAINER_TYPE_MIN
    }

    /// Returns true for scalar primitive types.
    #[inline]
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        !self.is_container()
    }

    /// Returns the rebased code used where the wire only carries container
    /// types (entry payloads, message payloads).
    #[inline]
    #[must_use]
    pub const fn scaled_code(self) -> u8 {
        self.code() - CONTAINER_TYPE_MIN
    }

    /// Reverses [`Self::scaled_code`].
    #[inline]
    #[must_use]
    pub fn from_scaled_code(code: u8) -> Option<Self> {
        Self::from_u8(code.wrapping_add(CONTAINER_TYPE_MIN))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Action carried by a FilterList entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromPrimitive,
    ToPrimitive,
)]
#[repr(u8)]
pub enum FilterAction {
    /// Apply the payload over the current value.
    Update = 1,
    /// Replace the current value with the payload.
    Set = 2,
    /// Remove the current value; entry carries no payload.
    Clear = 3,
}

/// Action carried by a Vector entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromPrimitive,
    ToPrimitive,
)]
#[repr(u8)]
pub enum VectorAction {
    /// Apply the payload over the value at the index.
    Update = 1,
    /// Replace the value at the index with the payload.
    Set = 2,
    /// Empty the value at the index; entry carries no payload.
    Clear = 3,
    /// Insert at the index, shifting subsequent positions.
    Insert = 4,
    /// Delete the index, shifting subsequent positions; no payload.
    Delete = 5,
}

/// Action carried by a Map entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromPrimitive,
    ToPrimitive,
)]
#[repr(u8)]
pub enum MapAction {
    /// Apply the payload over the keyed value.
    Update = 1,
    /// Add the keyed value.
    Add = 2,
    /// Remove the keyed value; entry carries no payload.
    Delete = 3,
}

impl VectorAction {
    /// Decodes a raw action nibble.
    #[inline]
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }

    /// Returns the raw action nibble.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns true if entries with this action carry no payload.
    #[inline]
    #[must_use]
    pub const fn is_payloadless(self) -> bool {
        matches!(self, Self::Clear | Self::Delete)
    }
}

impl FilterAction {
    /// Decodes a raw action nibble.
    #[inline]
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }

    /// Returns the raw action nibble.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns true if entries with this action carry no payload.
    #[inline]
    #[must_use]
    pub const fn is_payloadless(self) -> bool {
        matches!(self, Self::Clear)
    }
}

impl MapAction {
    /// Decodes a raw action nibble.
    #[inline]
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }

    /// Returns the raw action nibble.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns true if entries with this action carry no payload.
    #[inline]
    #[must_use]
    pub const fn is_payloadless(self) -> bool {
        matches!(self, Self::Delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_codes_round_trip() {
        for dt in [
            DataType::Int,
            DataType::UInt,
            DataType::Real,
            DataType::Date,
            DataType::Time,
            DataType::DateTime,
            DataType::Enum,
            DataType::Buffer,
            DataType::AsciiString,
            DataType::RmtesString,
            DataType::NoData,
            DataType::FieldList,
            DataType::ElementList,
            DataType::FilterList,
            DataType::Vector,
            DataType::Map,
            DataType::Series,
            DataType::Msg,
        ] {
            assert_eq!(DataType::from_code(dt.code()), Some(dt));
        }
    }

    #[test]
    fn test_data_type_unknown_code() {
        assert_eq!(DataType::from_code(0), None);
        assert_eq!(DataType::from_code(255), None);
    }

    #[test]
    fn test_container_classification() {
        assert!(DataType::Map.is_container());
        assert!(DataType::Msg.is_container());
        assert!(DataType::NoData.is_container());
        assert!(DataType::UInt.is_primitive());
        assert!(!DataType::UInt.is_container());
    }

    #[test]
    fn test_scaled_codes() {
        assert_eq!(DataType::NoData.scaled_code(), 0);
        assert_eq!(DataType::FieldList.scaled_code(), 4);
        assert_eq!(
            DataType::from_scaled_code(DataType::Vector.scaled_code()),
            Some(DataType::Vector)
        );
    }

    #[test]
    fn test_payloadless_actions() {
        assert!(VectorAction::Clear.is_payloadless());
        assert!(VectorAction::Delete.is_payloadless());
        assert!(!VectorAction::Set.is_payloadless());
        assert!(FilterAction::Clear.is_payloadless());
        assert!(!FilterAction::Update.is_payloadless());
        assert!(MapAction::Delete.is_payloadless());
        assert!(!MapAction::Add.is_payloadless());
    }
}
