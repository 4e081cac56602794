/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Field-id keyed container.
//!
//! Entries carry only an `i16` field id and payload bytes; the wire type
//! comes from a [`FieldDictionary`] at access time. Entries whose id is
//! absent from the dictionary still expose their raw bytes.
//!
//! Wire layout: `u16` entry count, then per entry an `i16` field id and a
//! `b16` payload.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_dictionary::FieldDictionary;
use ironomm_wire::{WireReader, WireWriter};
use smallvec::SmallVec;
use tracing::trace;

use crate::value::OmmData;

/// A single FieldList entry: field id plus payload slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Field id; the dictionary resolves it to a name and type.
    pub field_id: i16,
    /// Encoded payload bytes.
    pub data: Bytes,
}

impl FieldEntry {
    /// Creates an entry, encoding `value` as its payload.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` if `value` cannot be
    /// encoded.
    pub fn new(field_id: i16, value: &OmmData) -> Result<Self, EncodeError> {
        Ok(Self {
            field_id,
            data: value.encode()?,
        })
    }

    /// Decodes the payload using the dictionary's type for this field id.
    ///
    /// Ids absent from the dictionary decode to [`OmmData::Buffer`], the
    /// raw bytes passed through.
    ///
    /// # Errors
    /// Returns a `DecodeError` if the payload does not fit the dictionary
    /// type.
    pub fn value(&self, dictionary: &FieldDictionary) -> Result<OmmData, DecodeError> {
        match dictionary.lookup(self.field_id) {
            Some(def) => OmmData::decode(def.field_type, self.data.clone()),
            None => Ok(OmmData::Buffer(self.data.clone())),
        }
    }
}

/// Field-id keyed container. Builder and decoded view in one type.
#[derive(Debug, Clone, Default)]
pub struct FieldList {
    entries: SmallVec<[FieldEntry; 8]>,
}

impl FieldList {
    /// Creates an empty FieldList.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, encoding `value` as its payload.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` if `value` cannot be
    /// encoded.
    pub fn add(&mut self, field_id: i16, value: &OmmData) -> Result<(), EncodeError> {
        self.entries.push(FieldEntry::new(field_id, value)?);
        Ok(())
    }

    /// Appends a pre-encoded entry, typically taken from a decoded
    /// FieldList.
    pub fn add_entry(&mut self, entry: FieldEntry) {
        self.entries.push(entry);
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the FieldList holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a fresh iterator over the entries, always from the first.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldEntry> {
        self.entries.iter()
    }

    /// Resets to the freshly-constructed state.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Encodes the FieldList to bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` if a payload or the entry
    /// count exceeds its length encoding.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        let mut w = WireWriter::new();
        self.encode_to(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Encodes the FieldList into an existing writer.
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
            w.put_i16(entry.field_id);
            w.put_b16(&entry.data)?;
        }
        Ok(())
    }

    /// Decodes a FieldList from bytes.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` on truncated input.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let count = r.read_u16()?;
        trace!(count, "decoding field list");
        let mut entries = SmallVec::with_capacity(count as usize);
        for _ in 0..count {
            let field_id = r.read_i16()?;
            let data = r.read_b16()?;
            entries.push(FieldEntry { field_id, data });
        }
        Ok(Self { entries })
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironomm_core::{DataType, MagnitudeType, OmmReal};
    use ironomm_dictionary::FieldDef;

    fn dictionary() -> FieldDictionary {
        let mut dict = FieldDictionary::new();
        dict.add_field(FieldDef::new(22, "BID", DataType::Real));
        dict.add_field(FieldDef::new(3, "DSPLY_NAME", DataType::AsciiString));
        dict.add_field(FieldDef::new(1025, "QUOTIM", DataType::UInt));
        dict
    }

    #[test]
    fn test_round_trip_with_dictionary() {
        let dict = dictionary();
        let bid = OmmData::Real(OmmReal::new(1250, MagnitudeType::ExponentNeg2));
        let mut fl = FieldList::new();
        fl.add(22, &bid).unwrap();
        fl.add(3, &OmmData::Ascii("TRI.N".to_string())).unwrap();
        fl.add(1025, &OmmData::UInt(36_000_000)).unwrap();

        let decoded = FieldList::decode(fl.encode().unwrap()).unwrap();
        assert_eq!(decoded.len(), 3);
        let entries: Vec<_> = decoded.iter().collect();
        assert_eq!(entries[0].value(&dict).unwrap(), bid);
        assert_eq!(
            entries[1].value(&dict).unwrap(),
            OmmData::Ascii("TRI.N".to_string())
        );
        assert_eq!(entries[2].value(&dict).unwrap(), OmmData::UInt(36_000_000));
    }

    #[test]
    fn test_unknown_field_passthrough() {
        let dict = dictionary();
        let mut fl = FieldList::new();
        fl.add(9999, &OmmData::UInt(77)).unwrap();
        let decoded = FieldList::decode(fl.encode().unwrap()).unwrap();
        let entry = decoded.iter().next().unwrap();
        // no definition: raw bytes come back untyped
        assert_eq!(
            entry.value(&dict).unwrap(),
            OmmData::Buffer(Bytes::from_static(&[77]))
        );
    }

    #[test]
    fn test_blank_field() {
        let dict = dictionary();
        let mut fl = FieldList::new();
        fl.add(22, &OmmData::Blank(DataType::Real)).unwrap();
        let decoded = FieldList::decode(fl.encode().unwrap()).unwrap();
        assert_eq!(
            decoded.iter().next().unwrap().value(&dict).unwrap(),
            OmmData::Blank(DataType::Real)
        );
    }

    #[test]
    fn test_entry_portability() {
        let mut first = FieldList::new();
        first.add(22, &OmmData::UInt(12)).unwrap();
        let decoded = FieldList::decode(first.encode().unwrap()).unwrap();
        let entry = decoded.iter().next().unwrap().clone();

        let mut second = FieldList::new();
        second.add_entry(entry.clone());
        let redecoded = FieldList::decode(second.encode().unwrap()).unwrap();
        assert_eq!(redecoded.iter().next().unwrap(), &entry);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut fl = FieldList::new();
        fl.add(22, &OmmData::UInt(1)).unwrap();
        fl.clear();
        assert!(fl.is_empty());
        fl.add(25, &OmmData::UInt(2)).unwrap();
        let decoded = FieldList::decode(fl.encode().unwrap()).unwrap();
        assert_eq!(decoded.iter().next().unwrap().field_id, 25);
    }
}
