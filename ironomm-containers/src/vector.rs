/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Position-indexed container with per-entry actions.
//!
//! Wire layout: flags byte, scaled payload type byte, optional `b15`
//! summary, optional `u30rb` total-count hint, `u16` entry count, then the
//! entries. Each entry carries an action/flags byte (action in the low
//! nibble), a `u30rb` index, optional `b15` permission data, and a `b16`
//! payload unless the action is payloadless.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::{DataType, VectorAction};
use ironomm_wire::{WireReader, WireWriter};
use smallvec::SmallVec;
use tracing::trace;

use crate::load_type::{require_container, LoadType};
use crate::value::OmmData;

const HAS_SUMMARY: u8 = 0x01;
const HAS_TOTAL_COUNT_HINT: u8 = 0x02;
const ENTRY_HAS_PERM_DATA: u8 = 0x10;

/// A single Vector entry: explicit index, action, optional permission
/// data, and a payload slice.
///
/// Immutable once constructed; safe to add into any Vector builder.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorEntry {
    /// Position the action applies to.
    pub index: u32,
    /// What to do at the position.
    pub action: VectorAction,
    /// Permission data gating the entry, if any.
    pub perm_data: Option<Bytes>,
    /// Payload type; `NoData` for payloadless actions.
    pub data_type: DataType,
    /// Encoded payload bytes.
    pub data: Bytes,
}

impl VectorEntry {
    /// Creates an entry, encoding `value` as its payload.
    ///
    /// Payloadless actions (`Clear`, `Delete`) ignore `value` and carry no
    /// data.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` if `value` cannot be
    /// encoded.
    pub fn new(index: u32, action: VectorAction, value: &OmmData) -> Result<Self, EncodeError> {
        let (data_type, data) = if action.is_payloadless() {
            (DataType::NoData, Bytes::new())
        } else {
            (value.data_type(), value.encode()?)
        };
        Ok(Self {
            index,
            action,
            perm_data: None,
            data_type,
            data,
        })
    }

    /// Attaches permission data.
    #[must_use]
    pub fn with_perm_data(mut self, perm_data: Bytes) -> Self {
        self.perm_data = Some(perm_data);
        self
    }

    /// Decodes the payload into an [`OmmData`] value.
    ///
    /// # Errors
    /// Returns a `DecodeError` if the payload does not fit its type.
    pub fn load(&self) -> Result<OmmData, DecodeError> {
        OmmData::decode(self.data_type, self.data.clone())
    }
}

/// Position-indexed container. Builder and decoded view in one type.
#[derive(Debug, Clone, Default)]
pub struct Vector {
    entries: SmallVec<[VectorEntry; 8]>,
    summary: Option<Bytes>,
    total_count_hint: Option<u32>,
    load: LoadType,
}

impl Vector {
    /// Creates an empty Vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the summary payload, establishing the Vector's load type.
    ///
    /// # Errors
    /// Returns `EncodeError::PayloadTypeConflict` if entries of a different
    /// type were already added; the Vector is unchanged on error.
    pub fn set_summary_data(
        &mut self,
        data_type: DataType,
        data: Bytes,
    ) -> Result<(), EncodeError> {
        require_container("Vector", data_type)?;
        self.load.check("Vector", data_type)?;
        self.summary = Some(data);
        Ok(())
    }

    /// Sets the advisory total-count hint. Not validated against the
    /// actual entry count.
    pub fn set_total_count_hint(&mut self, hint: u32) {
        self.total_count_hint = Some(hint);
    }

    /// Appends an entry.
    ///
    /// # Errors
    /// Returns `EncodeError::PayloadTypeConflict` if the entry's payload
    /// type conflicts with the established load type; the Vector is
    /// unchanged on error.
    pub fn add(&mut self, entry: VectorEntry) -> Result<(), EncodeError> {
        require_container("Vector", entry.data_type)?;
        self.load.check("Vector", entry.data_type)?;
        self.entries.push(entry);
        Ok(())
    }

    /// Returns the established payload type, `NoData` when none.
    #[must_use]
    pub fn payload_type(&self) -> DataType {
        self.load.get()
    }

    /// Returns the summary payload, if set.
    #[must_use]
    pub fn summary_data(&self) -> Option<(DataType, &Bytes)> {
        self.summary.as_ref().map(|b| (self.load.get(), b))
    }

    /// Returns the advisory total-count hint, if set.
    #[must_use]
    pub const fn total_count_hint(&self) -> Option<u32> {
        self.total_count_hint
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the Vector holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a fresh iterator over the entries, always from the first.
    pub fn iter(&self) -> std::slice::Iter<'_, VectorEntry> {
        self.entries.iter()
    }

    /// Resets to the freshly-constructed state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.summary = None;
        self.total_count_hint = None;
        self.load.clear();
    }

    /// Encodes the Vector to bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` if a payload or the entry
    /// count exceeds its length encoding.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        let mut w = WireWriter::new();
        self.encode_to(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Encodes the Vector into an existing writer.
    ///
    /// # Errors
    /// Same conditions as [`Self::encode`].
    pub fn encode_to(&self, w: &mut WireWriter) -> Result<(), EncodeError> {
        let mut flags = 0u8;
        if self.summary.is_some() {
            flags |= HAS_SUMMARY;
        }
        if self.total_count_hint.is_some() {
            flags |= HAS_TOTAL_COUNT_HINT;
        }
        w.put_u8(flags);
        w.put_u8(self.load.get().scaled_code());
        if let Some(summary) = &self.summary {
            w.put_b15(summary)?;
        }
        if let Some(hint) = self.total_count_hint {
            w.put_u30rb(hint)?;
        }
        let count =
            u16::try_from(self.entries.len()).map_err(|_| EncodeError::LengthTooLarge {
                length: self.entries.len(),
                max: usize::from(u16::MAX),
                encoding: "u16 entry count",
            })?;
        w.put_u16(count);
        for entry in &self.entries {
            let mut action_flags = entry.action.code();
            if entry.perm_data.is_some() {
                action_flags |= ENTRY_HAS_PERM_DATA;
            }
            w.put_u8(action_flags);
            w.put_u30rb(entry.index)?;
            if let Some(perm) = &entry.perm_data {
                w.put_b15(perm)?;
            }
            if !entry.action.is_payloadless() {
                w.put_b16(&entry.data)?;
            }
        }
        Ok(())
    }

    /// Decodes a Vector from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input, an unknown payload
    /// type, or an invalid entry action.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let flags = r.read_u8()?;
        let scaled = r.read_u8()?;
        let payload_type = DataType::from_scaled_code(scaled)
            .ok_or(DecodeError::UnknownDataType(scaled))?;
        let summary = if flags & HAS_SUMMARY != 0 {
            Some(r.read_b15()?)
        } else {
            None
        };
        let total_count_hint = if flags & HAS_TOTAL_COUNT_HINT != 0 {
            Some(r.read_u30rb()?)
        } else {
            None
        };
        let count = r.read_u16()?;
        trace!(count, ?payload_type, "decoding vector");
        let mut entries = SmallVec::with_capacity(count as usize);
        for _ in 0..count {
            let action_flags = r.read_u8()?;
            let action = VectorAction::from_code(action_flags & 0x0F).ok_or(
                DecodeError::InvalidAction {
                    container: "Vector",
                    action: action_flags & 0x0F,
                },
            )?;
            let index = r.read_u30rb()?;
            let perm_data = if action_flags & ENTRY_HAS_PERM_DATA != 0 {
                Some(r.read_b15()?)
            } else {
                None
            };
            let (data_type, data) = if action.is_payloadless() {
                (DataType::NoData, Bytes::new())
            } else {
                (payload_type, r.read_b16()?)
            };
            entries.push(VectorEntry {
                index,
                action,
                perm_data,
                data_type,
                data,
            });
        }
        let mut load = LoadType::default();
        if payload_type != DataType::NoData {
            // decode never conflicts: established straight from the header
            let _ = load.check("Vector", payload_type);
        }
        Ok(Self {
            entries,
            summary,
            total_count_hint,
            load,
        })
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a VectorEntry;
    type IntoIter = std::slice::Iter<'a, VectorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_list::FieldList;
    use crate::value::OmmData;

    fn field_list_bytes() -> Bytes {
        let mut fl = FieldList::new();
        fl.add(22, &OmmData::UInt(4100)).unwrap();
        fl.encode().unwrap()
    }

    #[test]
    fn test_round_trip() {
        let mut vector = Vector::new();
        vector.set_total_count_hint(5);
        let payload = OmmData::Container(DataType::FieldList, field_list_bytes());
        vector
            .add(VectorEntry::new(1, VectorAction::Set, &payload).unwrap())
            .unwrap();
        vector
            .add(VectorEntry::new(2, VectorAction::Clear, &OmmData::NoData).unwrap())
            .unwrap();

        let decoded = Vector::decode(vector.encode().unwrap()).unwrap();
        assert_eq!(decoded.total_count_hint(), Some(5));
        assert_eq!(decoded.len(), 2);
        let entries: Vec<_> = decoded.iter().collect();
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[0].action, VectorAction::Set);
        assert_eq!(entries[0].data_type, DataType::FieldList);
        assert_eq!(entries[0].data, field_list_bytes());
        assert_eq!(entries[1].action, VectorAction::Clear);
        assert_eq!(entries[1].data_type, DataType::NoData);
    }

    #[test]
    fn test_summary_type_conflict_leaves_vector_unchanged() {
        let mut vector = Vector::new();
        vector
            .set_summary_data(DataType::FieldList, field_list_bytes())
            .unwrap();
        let entry = VectorEntry::new(
            0,
            VectorAction::Set,
            &OmmData::Container(DataType::ElementList, Bytes::from_static(&[0, 0, 0])),
        )
        .unwrap();
        let err = vector.add(entry).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Attempt to add entry of ElementList while Vector entry load type is set to FieldList with summaryData() method"
        );
        assert!(vector.is_empty());
        assert_eq!(vector.payload_type(), DataType::FieldList);
    }

    #[test]
    fn test_entry_portability() {
        let mut first = Vector::new();
        let payload = OmmData::Container(DataType::FieldList, field_list_bytes());
        first
            .add(
                VectorEntry::new(7, VectorAction::Insert, &payload)
                    .unwrap()
                    .with_perm_data(Bytes::from_static(b"perm")),
            )
            .unwrap();
        let decoded = Vector::decode(first.encode().unwrap()).unwrap();
        let entry = decoded.iter().next().unwrap().clone();

        let mut second = Vector::new();
        second.add(entry.clone()).unwrap();
        let redecoded = Vector::decode(second.encode().unwrap()).unwrap();
        assert_eq!(redecoded.iter().next().unwrap(), &entry);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut vector = Vector::new();
        vector
            .set_summary_data(DataType::FieldList, field_list_bytes())
            .unwrap();
        vector.set_total_count_hint(9);
        vector.clear();
        assert!(vector.is_empty());
        assert_eq!(vector.total_count_hint(), None);
        assert_eq!(vector.payload_type(), DataType::NoData);
        // a conflicting type is now acceptable again
        vector
            .set_summary_data(DataType::ElementList, Bytes::from_static(&[0, 0]))
            .unwrap();
    }

    #[test]
    fn test_iterator_restart() {
        let mut vector = Vector::new();
        let payload = OmmData::Container(DataType::FieldList, field_list_bytes());
        for i in 0..3u32 {
            vector
                .add(VectorEntry::new(i, VectorAction::Set, &payload).unwrap())
                .unwrap();
        }
        let decoded = Vector::decode(vector.encode().unwrap()).unwrap();
        let mut first = decoded.iter();
        assert_eq!(first.next().unwrap().index, 0);
        // a second iterator starts from the beginning regardless
        let mut second = decoded.iter();
        assert_eq!(second.next().unwrap().index, 0);
        assert_eq!(decoded.iter().count(), 3);
    }

    #[test]
    fn test_decode_truncated() {
        let mut vector = Vector::new();
        let payload = OmmData::Container(DataType::FieldList, field_list_bytes());
        vector
            .add(VectorEntry::new(0, VectorAction::Set, &payload).unwrap())
            .unwrap();
        let bytes = vector.encode().unwrap();
        let truncated = bytes.slice(..bytes.len() - 1);
        assert!(Vector::decode(truncated).is_err());
    }
}
