/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Filter-id keyed container with per-entry actions.
//!
//! Unlike Vector and Series, FilterList entries may carry heterogeneous
//! payload types: the header declares a default type and entries deviating
//! from it carry their own type byte.
//!
//! Wire layout: flags byte, scaled default type byte, optional `u8`
//! total-count hint, `u8` entry count, then the entries. Each entry
//! carries an action/flags byte (action in the low nibble), a `u8` filter
//! id, an optional scaled type byte, optional `b15` permission data, and a
//! `b16` payload unless the action is `Clear`.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::{DataType, FilterAction};
use ironomm_wire::{WireReader, WireWriter};
use smallvec::SmallVec;
use tracing::trace;

use crate::load_type::require_container;
use crate::value::OmmData;

const HAS_TOTAL_COUNT_HINT: u8 = 0x01;
const ENTRY_HAS_CONTAINER_TYPE: u8 = 0x10;
const ENTRY_HAS_PERM_DATA: u8 = 0x20;

/// A single FilterList entry: filter id, action, optional permission data,
/// and a payload slice.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    /// Filter id the action applies to.
    pub filter_id: u8,
    /// What to do with the filtered portion.
    pub action: FilterAction,
    /// Permission data gating the entry, if any.
    pub perm_data: Option<Bytes>,
    /// Payload type; `NoData` for `Clear` entries.
    pub data_type: DataType,
    /// Encoded payload bytes.
    pub data: Bytes,
}

impl FilterEntry {
    /// Creates an entry, encoding `value` as its payload.
    ///
    /// `Clear` entries ignore `value` and carry no data.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` if `value` cannot be
    /// encoded or is not a container type.
    pub fn new(
        filter_id: u8,
        action: FilterAction,
        value: &OmmData,
    ) -> Result<Self, EncodeError> {
        let (data_type, data) = if action.is_payloadless() {
            (DataType::NoData, Bytes::new())
        } else {
            require_container("FilterList", value.data_type())?;
            (value.data_type(), value.encode()?)
        };
        Ok(Self {
            filter_id,
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

/// Filter-id keyed container. Builder and decoded view in one type.
#[derive(Debug, Clone, Default)]
pub struct FilterList {
    entries: SmallVec<[FilterEntry; 8]>,
    total_count_hint: Option<u8>,
}

impl FilterList {
    /// Creates an empty FilterList.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the advisory total-count hint.
    pub fn set_total_count_hint(&mut self, hint: u8) {
        self.total_count_hint = Some(hint);
    }

    /// Appends an entry. FilterList payload types may vary per entry, so
    /// no type discipline applies.
    pub fn add(&mut self, entry: FilterEntry) {
        self.entries.push(entry);
    }

    /// Returns the advisory total-count hint, if set.
    #[must_use]
    pub const fn total_count_hint(&self) -> Option<u8> {
        self.total_count_hint
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the FilterList holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a fresh iterator over the entries, always from the first.
    pub fn iter(&self) -> std::slice::Iter<'_, FilterEntry> {
        self.entries.iter()
    }

    /// Resets to the freshly-constructed state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_count_hint = None;
    }

    /// The header's default payload type: the first payload-carrying
    /// entry's type, `NoData` when every entry is payloadless.
    fn default_type(&self) -> DataType {
        self.entries
            .iter()
            .map(|e| e.data_type)
            .find(|dt| *dt != DataType::NoData)
            .unwrap_or(DataType::NoData)
    }

    /// Encodes the FilterList to bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` if a payload or the entry
    /// count exceeds its length encoding.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        let mut w = WireWriter::new();
        self.encode_to(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Encodes the FilterList into an existing writer.
    ///
    /// # Errors
    /// Same conditions as [`Self::encode`].
    pub fn encode_to(&self, w: &mut WireWriter) -> Result<(), EncodeError> {
        let mut flags = 0u8;
        if self.total_count_hint.is_some() {
            flags |= HAS_TOTAL_COUNT_HINT;
        }
        w.put_u8(flags);
        let default_type = self.default_type();
        w.put_u8(default_type.scaled_code());
        if let Some(hint) = self.total_count_hint {
            w.put_u8(hint);
        }
        let count =
            u8::try_from(self.entries.len()).map_err(|_| EncodeError::LengthTooLarge {
                length: self.entries.len(),
                max: usize::from(u8::MAX),
                encoding: "u8 entry count",
            })?;
        w.put_u8(count);
        for entry in &self.entries {
            let explicit_type =
                entry.data_type != DataType::NoData && entry.data_type != default_type;
            let mut action_flags = entry.action.code();
            if explicit_type {
                action_flags |= ENTRY_HAS_CONTAINER_TYPE;
            }
            if entry.perm_data.is_some() {
                action_flags |= ENTRY_HAS_PERM_DATA;
            }
            w.put_u8(action_flags);
            w.put_u8(entry.filter_id);
            if explicit_type {
                w.put_u8(entry.data_type.scaled_code());
            }
            if let Some(perm) = &entry.perm_data {
                w.put_b15(perm)?;
            }
            if !entry.action.is_payloadless() {
                w.put_b16(&entry.data)?;
            }
        }
        Ok(())
    }

    /// Decodes a FilterList from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input, an unknown type code,
    /// or an invalid entry action.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let flags = r.read_u8()?;
        let scaled = r.read_u8()?;
        let default_type = DataType::from_scaled_code(scaled)
            .ok_or(DecodeError::UnknownDataType(scaled))?;
        let total_count_hint = if flags & HAS_TOTAL_COUNT_HINT != 0 {
            Some(r.read_u8()?)
        } else {
            None
        };
        let count = r.read_u8()?;
        trace!(count, ?default_type, "decoding filter list");
        let mut entries = SmallVec::with_capacity(count as usize);
        for _ in 0..count {
            let action_flags = r.read_u8()?;
            let action = FilterAction::from_code(action_flags & 0x0F).ok_or(
                DecodeError::InvalidAction {
                    container: "FilterList",
                    action: action_flags & 0x0F,
                },
            )?;
            let filter_id = r.read_u8()?;
            let explicit_type = if action_flags & ENTRY_HAS_CONTAINER_TYPE != 0 {
                let code = r.read_u8()?;
                Some(
                    DataType::from_scaled_code(code)
                        .ok_or(DecodeError::UnknownDataType(code))?,
                )
            } else {
                None
            };
            let perm_data = if action_flags & ENTRY_HAS_PERM_DATA != 0 {
                Some(r.read_b15()?)
            } else {
                None
            };
            let (data_type, data) = if action.is_payloadless() {
                (DataType::NoData, Bytes::new())
            } else {
                (explicit_type.unwrap_or(default_type), r.read_b16()?)
            };
            entries.push(FilterEntry {
                filter_id,
                action,
                perm_data,
                data_type,
                data,
            });
        }
        Ok(Self {
            entries,
            total_count_hint,
        })
    }
}

impl<'a> IntoIterator for &'a FilterList {
    type Item = &'a FilterEntry;
    type IntoIter = std::slice::Iter<'a, FilterEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_list::ElementList;
    use crate::field_list::FieldList;

    fn field_list_bytes() -> Bytes {
        let mut fl = FieldList::new();
        fl.add(22, &OmmData::UInt(4100)).unwrap();
        fl.encode().unwrap()
    }

    fn element_list_bytes() -> Bytes {
        let mut el = ElementList::new();
        el.add("E", &OmmData::Int(-1)).unwrap();
        el.encode().unwrap()
    }

    #[test]
    fn test_round_trip_heterogeneous_types() {
        let mut filter = FilterList::new();
        filter.set_total_count_hint(3);
        filter.add(
            FilterEntry::new(
                1,
                FilterAction::Set,
                &OmmData::Container(DataType::FieldList, field_list_bytes()),
            )
            .unwrap(),
        );
        filter.add(
            FilterEntry::new(
                2,
                FilterAction::Update,
                &OmmData::Container(DataType::ElementList, element_list_bytes()),
            )
            .unwrap(),
        );
        filter.add(FilterEntry::new(3, FilterAction::Clear, &OmmData::NoData).unwrap());

        let decoded = FilterList::decode(filter.encode().unwrap()).unwrap();
        assert_eq!(decoded.total_count_hint(), Some(3));
        assert_eq!(decoded.len(), 3);
        let entries: Vec<_> = decoded.iter().collect();
        assert_eq!(entries[0].filter_id, 1);
        assert_eq!(entries[0].data_type, DataType::FieldList);
        assert_eq!(entries[0].data, field_list_bytes());
        assert_eq!(entries[1].data_type, DataType::ElementList);
        assert_eq!(entries[1].data, element_list_bytes());
        assert_eq!(entries[2].action, FilterAction::Clear);
        assert_eq!(entries[2].data_type, DataType::NoData);
        assert!(entries[2].data.is_empty());
    }

    #[test]
    fn test_entry_portability_with_perm_data() {
        let mut first = FilterList::new();
        first.add(
            FilterEntry::new(
                5,
                FilterAction::Set,
                &OmmData::Container(DataType::FieldList, field_list_bytes()),
            )
            .unwrap()
            .with_perm_data(Bytes::from_static(&[0x03, 0x01, 0x4C])),
        );
        let decoded = FilterList::decode(first.encode().unwrap()).unwrap();
        let entry = decoded.iter().next().unwrap().clone();
        assert_eq!(entry.perm_data.as_deref(), Some(&[0x03, 0x01, 0x4C][..]));

        let mut second = FilterList::new();
        second.add(entry.clone());
        let redecoded = FilterList::decode(second.encode().unwrap()).unwrap();
        assert_eq!(redecoded.iter().next().unwrap(), &entry);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut filter = FilterList::new();
        filter.set_total_count_hint(1);
        filter.add(FilterEntry::new(1, FilterAction::Clear, &OmmData::NoData).unwrap());
        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(filter.total_count_hint(), None);

        filter.add(
            FilterEntry::new(
                2,
                FilterAction::Set,
                &OmmData::Container(DataType::ElementList, element_list_bytes()),
            )
            .unwrap(),
        );
        let decoded = FilterList::decode(filter.encode().unwrap()).unwrap();
        assert_eq!(decoded.iter().next().unwrap().filter_id, 2);
    }

    #[test]
    fn test_iterator_restart_mid_consumption() {
        let mut filter = FilterList::new();
        for id in 1..=3u8 {
            filter.add(
                FilterEntry::new(
                    id,
                    FilterAction::Set,
                    &OmmData::Container(DataType::FieldList, field_list_bytes()),
                )
                .unwrap(),
            );
        }
        let decoded = FilterList::decode(filter.encode().unwrap()).unwrap();
        let mut iter = decoded.iter();
        assert_eq!(iter.next().unwrap().filter_id, 1);
        assert_eq!(iter.next().unwrap().filter_id, 2);
        // restart before exhausting
        assert_eq!(decoded.iter().next().unwrap().filter_id, 1);
    }

    #[test]
    fn test_primitive_payload_rejected() {
        let err = FilterEntry::new(1, FilterAction::Set, &OmmData::UInt(1)).unwrap_err();
        assert!(matches!(err, EncodeError::ValueNotEncodable { .. }));
    }
}
