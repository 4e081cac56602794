/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Name keyed container with self-describing entry types.
//!
//! Unlike FieldList, each entry carries its own wire type, so no
//! dictionary is involved.
//!
//! Wire layout: `u16` entry count, then per entry a `b15` name, a raw type
//! code byte, and a `b16` payload.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::DataType;
use ironomm_wire::{WireReader, WireWriter};
use smallvec::SmallVec;
use tracing::trace;

use crate::value::OmmData;

/// A single ElementList entry: name, wire type, and payload slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementEntry {
    /// Element name.
    pub name: String,
    /// Wire type of the payload.
    pub data_type: DataType,
    /// Encoded payload bytes.
    pub data: Bytes,
}

impl ElementEntry {
    /// Creates an entry, encoding `value` as its payload.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` if `value` cannot be
    /// encoded.
    pub fn new(name: impl Into<String>, value: &OmmData) -> Result<Self, EncodeError> {
        Ok(Self {
            name: name.into(),
            data_type: value.data_type(),
            data: value.encode()?,
        })
    }

    /// Decodes the payload into an [`OmmData`] value.
    ///
    /// # Errors
    /// Returns a `DecodeError` if the payload does not fit its type.
    pub fn value(&self) -> Result<OmmData, DecodeError> {
        OmmData::decode(self.data_type, self.data.clone())
    }
}

/// Name keyed container. Builder and decoded view in one type.
#[derive(Debug, Clone, Default)]
pub struct ElementList {
    entries: SmallVec<[ElementEntry; 8]>,
}

impl ElementList {
    /// Creates an empty ElementList.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element, encoding `value` as its payload.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` if `value` cannot be
    /// encoded.
    pub fn add(&mut self, name: impl Into<String>, value: &OmmData) -> Result<(), EncodeError> {
        self.entries.push(ElementEntry::new(name, value)?);
        Ok(())
    }

    /// Appends a pre-encoded entry.
    pub fn add_entry(&mut self, entry: ElementEntry) {
        self.entries.push(entry);
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the ElementList holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a fresh iterator over the entries, always from the first.
    pub fn iter(&self) -> std::slice::Iter<'_, ElementEntry> {
        self.entries.iter()
    }

    /// Resets to the freshly-constructed state.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Encodes the ElementList to bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` if a name, payload, or the
    /// entry count exceeds its length encoding.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        let mut w = WireWriter::new();
        self.encode_to(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Encodes the ElementList into an existing writer.
    ///
    /// # Errors
    /// Same conditions as [`Self::encode`].
    pub fn encode_to(&self, w: &mut WireWriter) -> Result<(), EncodeError> {
        let count =
            u16::try_from(self.entries.len()).map_err(|_| EncodeError::LengthTooLarge {
                length: self.entries.len(),
                max: usize::from(u16::MAX),
                encoding: "u16 entry count",
            })?;
        w.put_u16(count);
        for entry in &self.entries {
            w.put_b15(entry.name.as_bytes())?;
            w.put_u8(entry.data_type.code());
            w.put_b16(&entry.data)?;
        }
        Ok(())
    }

    /// Decodes an ElementList from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input, a non-UTF-8 name, or an
    /// unknown type code.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let count = r.read_u16()?;
        trace!(count, "decoding element list");
        let mut entries = SmallVec::with_capacity(count as usize);
        for _ in 0..count {
            let name_bytes = r.read_b15()?;
            let name = std::str::from_utf8(&name_bytes)
                .map_err(|_| DecodeError::InvalidUtf8)?
                .to_owned();
            let code = r.read_u8()?;
            let data_type =
                DataType::from_code(code).ok_or(DecodeError::UnknownDataType(code))?;
            let data = r.read_b16()?;
            entries.push(ElementEntry {
                name,
                data_type,
                data,
            });
        }
        Ok(Self { entries })
    }
}

impl<'a> IntoIterator for &'a ElementList {
    type Item = &'a ElementEntry;
    type IntoIter = std::slice::Iter<'a, ElementEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironomm_core::{OmmDate, OmmTime};

    #[test]
    fn test_round_trip_mixed_types() {
        let mut el = ElementList::new();
        el.add("Name", &OmmData::Ascii("IBM.N".to_string())).unwrap();
        el.add("Qty", &OmmData::Int(-500)).unwrap();
        el.add("TradeDate", &OmmData::Date(OmmDate::new(30, 10, 2010)))
            .unwrap();
        el.add("TradeTime", &OmmData::Time(OmmTime::hms(11, 20, 30)))
            .unwrap();

        let decoded = ElementList::decode(el.encode().unwrap()).unwrap();
        assert_eq!(decoded.len(), 4);
        let entries: Vec<_> = decoded.iter().collect();
        assert_eq!(entries[0].name, "Name");
        assert_eq!(
            entries[0].value().unwrap(),
            OmmData::Ascii("IBM.N".to_string())
        );
        assert_eq!(entries[1].value().unwrap(), OmmData::Int(-500));
        assert_eq!(
            entries[2].value().unwrap(),
            OmmData::Date(OmmDate::new(30, 10, 2010))
        );
        assert_eq!(
            entries[3].value().unwrap(),
            OmmData::Time(OmmTime::hms(11, 20, 30))
        );
    }

    #[test]
    fn test_nested_container_payload() {
        let mut inner = ElementList::new();
        inner.add("Leaf", &OmmData::UInt(1)).unwrap();
        let inner_bytes = inner.encode().unwrap();

        let mut outer = ElementList::new();
        outer
            .add(
                "Nested",
                &OmmData::Container(DataType::ElementList, inner_bytes.clone()),
            )
            .unwrap();
        let decoded = ElementList::decode(outer.encode().unwrap()).unwrap();
        let entry = decoded.iter().next().unwrap();
        assert_eq!(entry.data_type, DataType::ElementList);
        assert_eq!(entry.data, inner_bytes);
        // descend one level
        let nested = ElementList::decode(entry.data.clone()).unwrap();
        assert_eq!(nested.iter().next().unwrap().name, "Leaf");
    }

    #[test]
    fn test_entry_portability() {
        let mut first = ElementList::new();
        first.add("A", &OmmData::Enum(3)).unwrap();
        let decoded = ElementList::decode(first.encode().unwrap()).unwrap();
        let entry = decoded.iter().next().unwrap().clone();

        let mut second = ElementList::new();
        second.add_entry(entry.clone());
        let redecoded = ElementList::decode(second.encode().unwrap()).unwrap();
        assert_eq!(redecoded.iter().next().unwrap(), &entry);
    }

    #[test]
    fn test_unknown_type_code_rejected() {
        let mut w = WireWriter::new();
        w.put_u16(1);
        w.put_b15(b"X").unwrap();
        w.put_u8(200); // no such type
        w.put_b16(&[]).unwrap();
        let err = ElementList::decode(w.into_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownDataType(200)));
    }
}
