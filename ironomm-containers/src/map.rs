/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Key-value container with per-entry actions.
//!
//! Keys are primitive values of a single declared type; payloads are
//! containers of a single established type. Duplicate keys are not
//! deduplicated at add time; merging is a consumer concern.
//!
//! Wire layout: flags byte, scaled payload type byte, raw key type byte,
//! optional `i16` key field id, optional `b15` summary, optional `u30rb`
//! total-count hint, `u16` entry count, then the entries. Each entry
//! carries an action/flags byte, a `b15` key, optional `b15` permission
//! data, and a `b16` payload unless the action is `Delete`.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::{DataType, MapAction};
use ironomm_wire::{WireReader, WireWriter};
use smallvec::SmallVec;
use tracing::trace;

use crate::load_type::{require_container, LoadType};
use crate::value::OmmData;

const HAS_SUMMARY: u8 = 0x01;
const HAS_TOTAL_COUNT_HINT: u8 = 0x02;
const HAS_KEY_FIELD_ID: u8 = 0x04;
const ENTRY_HAS_PERM_DATA: u8 = 0x10;

/// A single Map entry: primitive key, action, optional permission data,
/// and a payload slice.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    /// Primitive key value.
    pub key: OmmData,
    /// What to do with the keyed value.
    pub action: MapAction,
    /// Permission data gating the entry, if any.
    pub perm_data: Option<Bytes>,
    /// Payload type; `NoData` for `Delete` entries.
    pub data_type: DataType,
    /// Encoded payload bytes.
    pub data: Bytes,
}

impl MapEntry {
    /// Creates an entry, encoding `value` as its payload.
    ///
    /// `Delete` entries ignore `value` and carry no data.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` if the key is not a
    /// primitive or `value` cannot be encoded.
    pub fn new(key: OmmData, action: MapAction, value: &OmmData) -> Result<Self, EncodeError> {
        if !key.data_type().is_primitive() {
            return Err(EncodeError::ValueNotEncodable {
                data_type: key.data_type(),
                reason: "map keys must be primitive values".to_string(),
            });
        }
        let (data_type, data) = if action.is_payloadless() {
            (DataType::NoData, Bytes::new())
        } else {
            require_container("Map", value.data_type())?;
            (value.data_type(), value.encode()?)
        };
        Ok(Self {
            key,
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

/// Key-value container. Builder and decoded view in one type.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: SmallVec<[MapEntry; 8]>,
    key_type: Option<DataType>,
    key_field_id: Option<i16>,
    summary: Option<Bytes>,
    total_count_hint: Option<u32>,
    load: LoadType,
}

impl Map {
    /// Creates an empty Map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the key type. When not declared, the first entry's key
    /// establishes it.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` for container key types.
    pub fn set_key_type(&mut self, key_type: DataType) -> Result<(), EncodeError> {
        if !key_type.is_primitive() {
            return Err(EncodeError::ValueNotEncodable {
                data_type: key_type,
                reason: "map keys must be primitive values".to_string(),
            });
        }
        self.key_type = Some(key_type);
        Ok(())
    }

    /// Declares the field id the keys correspond to.
    pub fn set_key_field_id(&mut self, field_id: i16) {
        self.key_field_id = Some(field_id);
    }

    /// Sets the summary payload, establishing the Map's load type.
    ///
    /// # Errors
    /// Returns `EncodeError::PayloadTypeConflict` if entries of a different
    /// type were already added; the Map is unchanged on error.
    pub fn set_summary_data(
        &mut self,
        data_type: DataType,
        data: Bytes,
    ) -> Result<(), EncodeError> {
        require_container("Map", data_type)?;
        self.load.check("Map", data_type)?;
        self.summary = Some(data);
        Ok(())
    }

    /// Sets the advisory total-count hint.
    pub fn set_total_count_hint(&mut self, hint: u32) {
        self.total_count_hint = Some(hint);
    }

    /// Appends an entry.
    ///
    /// # Errors
    /// Returns `EncodeError::KeyTypeMismatch` if the entry's key type does
    /// not match the declared key type, or
    /// `EncodeError::PayloadTypeConflict` on a conflicting payload type.
    /// The Map is unchanged on error.
    pub fn add(&mut self, entry: MapEntry) -> Result<(), EncodeError> {
        let key_type = entry.key.data_type();
        if let Some(declared) = self.key_type {
            if key_type != declared {
                return Err(EncodeError::KeyTypeMismatch {
                    attempted: key_type,
                    declared,
                });
            }
        }
        self.load.check("Map", entry.data_type)?;
        if self.key_type.is_none() {
            self.key_type = Some(key_type);
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Returns the declared or inferred key type, `Buffer` when neither.
    #[must_use]
    pub fn key_type(&self) -> DataType {
        self.key_type.unwrap_or(DataType::Buffer)
    }

    /// Returns the key field id, if declared.
    #[must_use]
    pub const fn key_field_id(&self) -> Option<i16> {
        self.key_field_id
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

    /// Returns true if the Map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a fresh iterator over the entries, always from the first.
    pub fn iter(&self) -> std::slice::Iter<'_, MapEntry> {
        self.entries.iter()
    }

    /// Resets to the freshly-constructed state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.key_type = None;
        self.key_field_id = None;
        self.summary = None;
        self.total_count_hint = None;
        self.load.clear();
    }

    /// Encodes the Map to bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` if a key, payload, or the
    /// entry count exceeds its length encoding, or
    /// `EncodeError::ValueNotEncodable` if a key cannot be encoded.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        let mut w = WireWriter::new();
        self.encode_to(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Encodes the Map into an existing writer.
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
        if self.key_field_id.is_some() {
            flags |= HAS_KEY_FIELD_ID;
        }
        w.put_u8(flags);
        w.put_u8(self.load.get().scaled_code());
        w.put_u8(self.key_type().code());
        if let Some(field_id) = self.key_field_id {
            w.put_i16(field_id);
        }
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
            w.put_b15(&entry.key.encode()?)?;
            if let Some(perm) = &entry.perm_data {
                w.put_b15(perm)?;
            }
            if !entry.action.is_payloadless() {
                w.put_b16(&entry.data)?;
            }
        }
        Ok(())
    }

    /// Decodes a Map from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input, an unknown type code,
    /// an invalid entry action, or a key that does not fit the declared
    /// key type.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let flags = r.read_u8()?;
        let scaled = r.read_u8()?;
        let payload_type = DataType::from_scaled_code(scaled)
            .ok_or(DecodeError::UnknownDataType(scaled))?;
        let key_code = r.read_u8()?;
        let key_type =
            DataType::from_code(key_code).ok_or(DecodeError::UnknownDataType(key_code))?;
        let key_field_id = if flags & HAS_KEY_FIELD_ID != 0 {
            Some(r.read_i16()?)
        } else {
            None
        };
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
        trace!(count, ?payload_type, ?key_type, "decoding map");
        let mut entries = SmallVec::with_capacity(count as usize);
        for _ in 0..count {
            let action_flags = r.read_u8()?;
            let action = MapAction::from_code(action_flags & 0x0F).ok_or(
                DecodeError::InvalidAction {
                    container: "Map",
                    action: action_flags & 0x0F,
                },
            )?;
            let key = OmmData::decode(key_type, r.read_b15()?)?;
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
            entries.push(MapEntry {
                key,
                action,
                perm_data,
                data_type,
                data,
            });
        }
        let mut load = LoadType::default();
        if payload_type != DataType::NoData {
            let _ = load.check("Map", payload_type);
        }
        Ok(Self {
            entries,
            key_type: Some(key_type),
            key_field_id,
            summary,
            total_count_hint,
            load,
        })
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = &'a MapEntry;
    type IntoIter = std::slice::Iter<'a, MapEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
