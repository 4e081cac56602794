/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message key: the fields identifying what a message is about.
//!
//! Encoded as a `b15`-wrapped blob inside the message envelope: a `u15rb`
//! flags word, then the present fields in flag order. The attrib is a
//! nested payload (scaled type byte plus `b15` data).

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::DataType;
use ironomm_wire::{WireReader, WireWriter};

const HAS_SERVICE_ID: u16 = 0x01;
const HAS_NAME: u16 = 0x02;
const HAS_NAME_TYPE: u16 = 0x04;
const HAS_FILTER: u16 = 0x08;
const HAS_IDENTIFIER: u16 = 0x10;
const HAS_ATTRIB: u16 = 0x20;

/// Message key. Every field is optional; an empty key is legal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MsgKey {
    service_id: Option<u16>,
    name: Option<String>,
    name_type: Option<u8>,
    filter: Option<u32>,
    identifier: Option<i32>,
    attrib: Option<(DataType, Bytes)>,
}

impl MsgKey {
    /// Creates an empty key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a service id is set.
    #[must_use]
    pub const fn has_service_id(&self) -> bool {
        self.service_id.is_some()
    }

    /// Returns the service id, 0 when absent.
    #[must_use]
    pub fn service_id(&self) -> u16 {
        self.service_id.unwrap_or_default()
    }

    /// Sets the service id.
    pub fn set_service_id(&mut self, service_id: u16) {
        self.service_id = Some(service_id);
    }

    /// Returns true if a name is set.
    #[must_use]
    pub const fn has_name(&self) -> bool {
        self.name.is_some()
    }

    /// Returns the name, empty when absent.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Sets the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Returns true if a name type is set.
    #[must_use]
    pub const fn has_name_type(&self) -> bool {
        self.name_type.is_some()
    }

    /// Returns the name type, 0 when absent.
    #[must_use]
    pub fn name_type(&self) -> u8 {
        self.name_type.unwrap_or_default()
    }

    /// Sets the name type.
    pub fn set_name_type(&mut self, name_type: u8) {
        self.name_type = Some(name_type);
    }

    /// Returns true if a filter is set.
    #[must_use]
    pub const fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Returns the filter, 0 when absent.
    #[must_use]
    pub fn filter(&self) -> u32 {
        self.filter.unwrap_or_default()
    }

    /// Sets the filter.
    pub fn set_filter(&mut self, filter: u32) {
        self.filter = Some(filter);
    }

    /// Returns true if an identifier is set.
    #[must_use]
    pub const fn has_identifier(&self) -> bool {
        self.identifier.is_some()
    }

    /// Returns the identifier, 0 when absent.
    #[must_use]
    pub fn identifier(&self) -> i32 {
        self.identifier.unwrap_or_default()
    }

    /// Sets the identifier.
    pub fn set_identifier(&mut self, identifier: i32) {
        self.identifier = Some(identifier);
    }

    /// Returns true if an attrib payload is set.
    #[must_use]
    pub const fn has_attrib(&self) -> bool {
        self.attrib.is_some()
    }

    /// Returns the attrib payload, `(NoData, empty)` when absent.
    #[must_use]
    pub fn attrib(&self) -> (DataType, Bytes) {
        self.attrib
            .clone()
            .unwrap_or((DataType::NoData, Bytes::new()))
    }

    /// Sets the attrib payload, preserving its type tag.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` for primitive attrib types;
    /// attribs carry containers or messages.
    pub fn set_attrib(&mut self, data_type: DataType, data: Bytes) -> Result<(), EncodeError> {
        if !data_type.is_container() {
            return Err(EncodeError::ValueNotEncodable {
                data_type,
                reason: "message attrib must be a container type".to_string(),
            });
        }
        self.attrib = Some((data_type, data));
        Ok(())
    }

    /// Resets to the freshly-constructed state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Encodes the key into a writer.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` if the name or attrib exceeds
    /// its length prefix.
    pub fn encode_to(&self, w: &mut WireWriter) -> Result<(), EncodeError> {
        let mut flags = 0u16;
        if self.service_id.is_some() {
            flags |= HAS_SERVICE_ID;
        }
        if self.name.is_some() {
            flags |= HAS_NAME;
        }
        if self.name_type.is_some() {
            flags |= HAS_NAME_TYPE;
        }
        if self.filter.is_some() {
            flags |= HAS_FILTER;
        }
        if self.identifier.is_some() {
            flags |= HAS_IDENTIFIER;
        }
        if self.attrib.is_some() {
            flags |= HAS_ATTRIB;
        }
        w.put_u15rb(usize::from(flags))?;
        if let Some(service_id) = self.service_id {
            w.put_u16ob(usize::from(service_id))?;
        }
        if let Some(name) = &self.name {
            w.put_b15(name.as_bytes())?;
        }
        if let Some(name_type) = self.name_type {
            w.put_u8(name_type);
        }
        if let Some(filter) = self.filter {
            w.put_u32(filter);
        }
        if let Some(identifier) = self.identifier {
            w.put_i32(identifier);
        }
        if let Some((data_type, data)) = &self.attrib {
            w.put_u8(data_type.scaled_code());
            w.put_b15(data)?;
        }
        Ok(())
    }

    /// Decodes a key from a reader.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input, a non-UTF-8 name, or an
    /// unknown attrib type.
    pub fn decode_from(r: &mut WireReader) -> Result<Self, DecodeError> {
        let flags = r.read_u15rb()?;
        let mut key = Self::new();
        if flags & HAS_SERVICE_ID != 0 {
            key.service_id = Some(r.read_u16ob()?);
        }
        if flags & HAS_NAME != 0 {
            let name = r.read_b15()?;
            key.name = Some(
                std::str::from_utf8(&name)
                    .map_err(|_| DecodeError::InvalidUtf8)?
                    .to_owned(),
            );
        }
        if flags & HAS_NAME_TYPE != 0 {
            key.name_type = Some(r.read_u8()?);
        }
        if flags & HAS_FILTER != 0 {
            key.filter = Some(r.read_u32()?);
        }
        if flags & HAS_IDENTIFIER != 0 {
            key.identifier = Some(r.read_i32()?);
        }
        if flags & HAS_ATTRIB != 0 {
            let scaled = r.read_u8()?;
            let data_type = DataType::from_scaled_code(scaled)
                .ok_or(DecodeError::UnknownDataType(scaled))?;
            let data = r.read_b15()?;
            key.attrib = Some((data_type, data));
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_full() {
        let mut key = MsgKey::new();
        key.set_service_id(1);
        key.set_name("TRI.N");
        key.set_name_type(1);
        key.set_filter(0x2F);
        key.set_identifier(-7);
        key.set_attrib(DataType::ElementList, Bytes::from_static(&[0, 1]))
            .unwrap();

        let mut w = WireWriter::new();
        key.encode_to(&mut w).unwrap();
        let mut r = WireReader::new(w.into_bytes());
        let decoded = MsgKey::decode_from(&mut r).unwrap();
        assert_eq!(decoded, key);
        assert!(r.is_empty());
    }

    #[test]
    fn test_absent_fields_report_defaults() {
        let key = MsgKey::new();
        assert!(!key.has_name());
        assert_eq!(key.name(), "");
        assert!(!key.has_service_id());
        assert_eq!(key.service_id(), 0);
        assert_eq!(key.attrib(), (DataType::NoData, Bytes::new()));
    }

    #[test]
    fn test_primitive_attrib_rejected() {
        let mut key = MsgKey::new();
        let err = key
            .set_attrib(DataType::UInt, Bytes::from_static(&[1]))
            .unwrap_err();
        assert!(matches!(err, EncodeError::ValueNotEncodable { .. }));
        assert!(!key.has_attrib());
    }

    #[test]
    fn test_clear() {
        let mut key = MsgKey::new();
        key.set_name("X");
        key.set_filter(3);
        key.clear();
        assert_eq!(key, MsgKey::new());
    }
}
