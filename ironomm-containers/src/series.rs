/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Implicitly indexed uniform container.
//!
//! Series entries have no identifier and no action; position is implied by
//! order and every entry carries the payload type declared in the header.
//!
//! Wire layout: flags byte, scaled payload type byte, optional `b15`
//! summary, optional `u30rb` total-count hint, `u16` entry count, then one
//! `b16` payload per entry.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::DataType;
use ironomm_wire::{WireReader, WireWriter};
use smallvec::SmallVec;
use tracing::trace;

use crate::load_type::{require_container, LoadType};
use crate::value::OmmData;

const HAS_SUMMARY: u8 = 0x01;
const HAS_TOTAL_COUNT_HINT: u8 = 0x02;

/// A single Series entry: payload type and slice, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesEntry {
    /// Payload type, uniform across the Series.
    pub data_type: DataType,
    /// Encoded payload bytes.
    pub data: Bytes,
}

impl SeriesEntry {
    /// Creates an entry, encoding `value` as its payload.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` if `value` cannot be
    /// encoded.
    pub fn new(value: &OmmData) -> Result<Self, EncodeError> {
        Ok(Self {
            data_type: value.data_type(),
            data: value.encode()?,
        })
    }

    /// Decodes the payload into an [`OmmData`] value.
    ///
    /// # Errors
    /// Returns a `DecodeError` if the payload does not fit its type.
    pub fn load(&self) -> Result<OmmData, DecodeError> {
        OmmData::decode(self.data_type, self.data.clone())
    }
}

/// Implicitly indexed container. Builder and decoded view in one type.
#[derive(Debug, Clone, Default)]
pub struct Series {
    entries: SmallVec<[SeriesEntry; 8]>,
    summary: Option<Bytes>,
    total_count_hint: Option<u32>,
    load: LoadType,
}

impl Series {
    /// Creates an empty Series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the summary payload, establishing the Series' load type.
    ///
    /// # Errors
    /// Returns `EncodeError::PayloadTypeConflict` if entries of a different
    /// type were already added; the Series is unchanged on error.
    pub fn set_summary_data(
        &mut self,
        data_type: DataType,
        data: Bytes,
    ) -> Result<(), EncodeError> {
        require_container("Series", data_type)?;
        self.load.check("Series", data_type)?;
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
    /// Returns `EncodeError::PayloadTypeConflict` on a conflicting payload
    /// type; the Series is unchanged on error.
    pub fn add(&mut self, entry: SeriesEntry) -> Result<(), EncodeError> {
        require_container("Series", entry.data_type)?;
        self.load.check("Series", entry.data_type)?;
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

    /// Returns true if the Series holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a fresh iterator over the entries, always from the first.
    pub fn iter(&self) -> std::slice::Iter<'_, SeriesEntry> {
        self.entries.iter()
    }

    /// Resets to the freshly-constructed state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.summary = None;
        self.total_count_hint = None;
        self.load.clear();
    }

    /// Encodes the Series to bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` if a payload or the entry
    /// count exceeds its length encoding.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        let mut w = WireWriter::new();
        self.encode_to(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Encodes the Series into an existing writer.
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
            w.put_b16(&entry.data)?;
        }
        Ok(())
    }

    /// Decodes a Series from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input or an unknown payload
    /// type.
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
        trace!(count, ?payload_type, "decoding series");
        let mut entries = SmallVec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push(SeriesEntry {
                data_type: payload_type,
                data: r.read_b16()?,
            });
        }
        let mut load = LoadType::default();
        if payload_type != DataType::NoData {
            let _ = load.check("Series", payload_type);
        }
        Ok(Self {
            entries,
            summary,
            total_count_hint,
            load,
        })
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a SeriesEntry;
    type IntoIter = std::slice::Iter<'a, SeriesEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_list::ElementList;

    fn element_list_bytes(tag: u64) -> Bytes {
        let mut el = ElementList::new();
        el.add("Row", &OmmData::UInt(tag)).unwrap();
        el.encode().unwrap()
    }

    #[test]
    fn test_round_trip_with_summary() {
        let mut series = Series::new();
        series
            .set_summary_data(DataType::ElementList, element_list_bytes(0))
            .unwrap();
        series.set_total_count_hint(2);
        for tag in 1..=2 {
            series
                .add(
                    SeriesEntry::new(&OmmData::Container(
                        DataType::ElementList,
                        element_list_bytes(tag),
                    ))
                    .unwrap(),
                )
                .unwrap();
        }

        let decoded = Series::decode(series.encode().unwrap()).unwrap();
        assert_eq!(decoded.payload_type(), DataType::ElementList);
        assert_eq!(decoded.total_count_hint(), Some(2));
        let (summary_type, summary) = decoded.summary_data().unwrap();
        assert_eq!(summary_type, DataType::ElementList);
        assert_eq!(summary, &element_list_bytes(0));
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.iter().next().unwrap().data, element_list_bytes(1));
    }

    #[test]
    fn test_type_conflict() {
        let mut series = Series::new();
        series
            .set_summary_data(DataType::ElementList, element_list_bytes(0))
            .unwrap();
        let entry = SeriesEntry::new(&OmmData::Container(
            DataType::FieldList,
            Bytes::from_static(&[0, 0]),
        ))
        .unwrap();
        let err = series.add(entry).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Attempt to add entry of FieldList while Series entry load type is set to ElementList with summaryData() method"
        );
        assert!(series.is_empty());
    }

    #[test]
    fn test_entry_portability() {
        let mut first = Series::new();
        first
            .add(
                SeriesEntry::new(&OmmData::Container(
                    DataType::ElementList,
                    element_list_bytes(9),
                ))
                .unwrap(),
            )
            .unwrap();
        let decoded = Series::decode(first.encode().unwrap()).unwrap();
        let entry = decoded.iter().next().unwrap().clone();

        let mut second = Series::new();
        second.add(entry.clone()).unwrap();
        let redecoded = Series::decode(second.encode().unwrap()).unwrap();
        assert_eq!(redecoded.iter().next().unwrap(), &entry);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut series = Series::new();
        series
            .set_summary_data(DataType::ElementList, element_list_bytes(0))
            .unwrap();
        series.clear();
        assert_eq!(series.payload_type(), DataType::NoData);
        assert!(series.summary_data().is_none());
        series
            .set_summary_data(DataType::Map, Bytes::new())
            .unwrap();
    }
}
