/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Bidirectional generic message.
//!
//! Generic messages flow both directions on an established stream and
//! carry no stream-state semantics of their own.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::DataType;
use ironomm_wire::{WireReader, WireWriter};
use tracing::trace;

use crate::common::{
    read_envelope, require_payloadable, write_envelope, Envelope, MSG_CLASS_GENERIC,
};
use crate::key::MsgKey;

const HAS_MSG_KEY: u16 = 0x0001;
const HAS_EXTENDED_HEADER: u16 = 0x0002;
const HAS_PERM_DATA: u16 = 0x0004;
const HAS_SEQ_NUM: u16 = 0x0008;
const HAS_SECONDARY_SEQ_NUM: u16 = 0x0010;
const HAS_PART_NUM: u16 = 0x0020;
const MESSAGE_COMPLETE: u16 = 0x0040;
const PROVIDER_DRIVEN: u16 = 0x0080;

/// Generic message. Builder and decoded view in one type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericMsg {
    domain_type: u8,
    stream_id: i32,
    msg_key: Option<MsgKey>,
    extended_header: Option<Bytes>,
    perm_data: Option<Bytes>,
    seq_num: Option<u32>,
    secondary_seq_num: Option<u32>,
    part_num: Option<u16>,
    message_complete: bool,
    provider_driven: bool,
    payload_type: Option<DataType>,
    payload: Bytes,
}

impl GenericMsg {
    /// Creates an empty generic message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the domain type.
    #[must_use]
    pub const fn domain_type(&self) -> u8 {
        self.domain_type
    }

    /// Sets the domain type.
    pub fn set_domain_type(&mut self, domain_type: u8) {
        self.domain_type = domain_type;
    }

    /// Returns the stream id.
    #[must_use]
    pub const fn stream_id(&self) -> i32 {
        self.stream_id
    }

    /// Sets the stream id.
    pub fn set_stream_id(&mut self, stream_id: i32) {
        self.stream_id = stream_id;
    }

    /// Returns true if a message key is set.
    #[must_use]
    pub const fn has_msg_key(&self) -> bool {
        self.msg_key.is_some()
    }

    /// Returns the message key, an empty key when absent.
    #[must_use]
    pub fn msg_key(&self) -> MsgKey {
        self.msg_key.clone().unwrap_or_default()
    }

    /// Sets the message key.
    pub fn set_msg_key(&mut self, msg_key: MsgKey) {
        self.msg_key = Some(msg_key);
    }

    /// Returns true if an extended header is set.
    #[must_use]
    pub const fn has_extended_header(&self) -> bool {
        self.extended_header.is_some()
    }

    /// Returns the extended header, empty when absent.
    #[must_use]
    pub fn extended_header(&self) -> Bytes {
        self.extended_header.clone().unwrap_or_default()
    }

    /// Sets the extended header.
    pub fn set_extended_header(&mut self, extended_header: Bytes) {
        self.extended_header = Some(extended_header);
    }

    /// Returns true if permission data is set.
    #[must_use]
    pub const fn has_perm_data(&self) -> bool {
        self.perm_data.is_some()
    }

    /// Returns the permission data, empty when absent.
    #[must_use]
    pub fn perm_data(&self) -> Bytes {
        self.perm_data.clone().unwrap_or_default()
    }

    /// Sets the permission data.
    pub fn set_perm_data(&mut self, perm_data: Bytes) {
        self.perm_data = Some(perm_data);
    }

    /// Returns true if a sequence number is set.
    #[must_use]
    pub const fn has_seq_num(&self) -> bool {
        self.seq_num.is_some()
    }

    /// Returns the sequence number, 0 when absent.
    #[must_use]
    pub fn seq_num(&self) -> u32 {
        self.seq_num.unwrap_or_default()
    }

    /// Sets the sequence number.
    pub fn set_seq_num(&mut self, seq_num: u32) {
        self.seq_num = Some(seq_num);
    }

    /// Returns true if a secondary sequence number is set.
    #[must_use]
    pub const fn has_secondary_seq_num(&self) -> bool {
        self.secondary_seq_num.is_some()
    }

    /// Returns the secondary sequence number, 0 when absent.
    #[must_use]
    pub fn secondary_seq_num(&self) -> u32 {
        self.secondary_seq_num.unwrap_or_default()
    }

    /// Sets the secondary sequence number.
    pub fn set_secondary_seq_num(&mut self, secondary_seq_num: u32) {
        self.secondary_seq_num = Some(secondary_seq_num);
    }

    /// Returns true if a part number is set.
    #[must_use]
    pub const fn has_part_num(&self) -> bool {
        self.part_num.is_some()
    }

    /// Returns the part number, 0 when absent.
    #[must_use]
    pub fn part_num(&self) -> u16 {
        self.part_num.unwrap_or_default()
    }

    /// Sets the part number.
    pub fn set_part_num(&mut self, part_num: u16) {
        self.part_num = Some(part_num);
    }

    /// Returns true if this part completes the message.
    #[must_use]
    pub const fn message_complete(&self) -> bool {
        self.message_complete
    }

    /// Marks the message complete or incomplete.
    pub fn set_message_complete(&mut self, complete: bool) {
        self.message_complete = complete;
    }

    /// Returns true if the message is provider-driven.
    #[must_use]
    pub const fn provider_driven(&self) -> bool {
        self.provider_driven
    }

    /// Marks the message as provider-driven.
    pub fn set_provider_driven(&mut self, provider_driven: bool) {
        self.provider_driven = provider_driven;
    }

    /// Returns true if a payload is set.
    #[must_use]
    pub const fn has_payload(&self) -> bool {
        self.payload_type.is_some()
    }

    /// Returns the payload, `(NoData, empty)` when absent.
    #[must_use]
    pub fn payload(&self) -> (DataType, Bytes) {
        (
            self.payload_type.unwrap_or(DataType::NoData),
            self.payload.clone(),
        )
    }

    /// Sets the payload, preserving its type tag.
    ///
    /// # Errors
    /// Returns `EncodeError::ValueNotEncodable` for primitive payload
    /// types.
    pub fn set_payload(&mut self, data_type: DataType, data: Bytes) -> Result<(), EncodeError> {
        require_payloadable(data_type)?;
        self.payload_type = Some(data_type);
        self.payload = data;
        Ok(())
    }

    /// Resets to the freshly-constructed state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Encodes the message to bytes.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` if a field exceeds its length
    /// encoding.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        let mut w = WireWriter::new();
        self.encode_to(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Encodes the message into an existing writer.
    ///
    /// # Errors
    /// Same conditions as [`Self::encode`].
    pub fn encode_to(&self, w: &mut WireWriter) -> Result<(), EncodeError> {
        let mut flags = 0u16;
        if self.msg_key.is_some() {
            flags |= HAS_MSG_KEY;
        }
        if self.extended_header.is_some() {
            flags |= HAS_EXTENDED_HEADER;
        }
        if self.perm_data.is_some() {
            flags |= HAS_PERM_DATA;
        }
        if self.seq_num.is_some() {
            flags |= HAS_SEQ_NUM;
        }
        if self.secondary_seq_num.is_some() {
            flags |= HAS_SECONDARY_SEQ_NUM;
        }
        if self.part_num.is_some() {
            flags |= HAS_PART_NUM;
        }
        if self.message_complete {
            flags |= MESSAGE_COMPLETE;
        }
        if self.provider_driven {
            flags |= PROVIDER_DRIVEN;
        }
        write_envelope(
            w,
            MSG_CLASS_GENERIC,
            Envelope {
                domain_type: self.domain_type,
                stream_id: self.stream_id,
                flags,
                payload_type: self.payload_type.unwrap_or(DataType::NoData),
            },
        )?;
        if let Some(seq_num) = self.seq_num {
            w.put_u32(seq_num);
        }
        if let Some(secondary) = self.secondary_seq_num {
            w.put_u32(secondary);
        }
        if let Some(part_num) = self.part_num {
            w.put_u16(part_num);
        }
        if let Some(perm) = &self.perm_data {
            w.put_b15(perm)?;
        }
        if let Some(key) = &self.msg_key {
            let mut kw = WireWriter::new();
            key.encode_to(&mut kw)?;
            w.put_b15(&kw.into_bytes())?;
        }
        if let Some(ext) = &self.extended_header {
            w.put_b15(ext)?;
        }
        w.put_b16(&self.payload)
    }

    /// Decodes a generic message from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input or a wrong class byte.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let env = read_envelope(&mut r, MSG_CLASS_GENERIC)?;
        trace!(stream_id = env.stream_id, "decoding generic message");
        let mut msg = Self::new();
        msg.domain_type = env.domain_type;
        msg.stream_id = env.stream_id;
        if env.flags & HAS_SEQ_NUM != 0 {
            msg.seq_num = Some(r.read_u32()?);
        }
        if env.flags & HAS_SECONDARY_SEQ_NUM != 0 {
            msg.secondary_seq_num = Some(r.read_u32()?);
        }
        if env.flags & HAS_PART_NUM != 0 {
            msg.part_num = Some(r.read_u16()?);
        }
        if env.flags & HAS_PERM_DATA != 0 {
            msg.perm_data = Some(r.read_b15()?);
        }
        if env.flags & HAS_MSG_KEY != 0 {
            let key_bytes = r.read_b15()?;
            let mut kr = WireReader::new(key_bytes);
            msg.msg_key = Some(MsgKey::decode_from(&mut kr)?);
        }
        if env.flags & HAS_EXTENDED_HEADER != 0 {
            msg.extended_header = Some(r.read_b15()?);
        }
        msg.message_complete = env.flags & MESSAGE_COMPLETE != 0;
        msg.provider_driven = env.flags & PROVIDER_DRIVEN != 0;
        msg.payload = r.read_b16()?;
        if env.payload_type != DataType::NoData {
            msg.payload_type = Some(env.payload_type);
        }
        Ok(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironomm_containers::{ElementList, OmmData};

    fn element_list_bytes() -> Bytes {
        let mut el = ElementList::new();
        el.add("Part", &OmmData::UInt(1)).unwrap();
        el.encode().unwrap()
    }

    #[test]
    fn test_round_trip_full() {
        let mut msg = GenericMsg::new();
        msg.set_domain_type(200);
        msg.set_stream_id(15);
        msg.set_seq_num(3);
        msg.set_secondary_seq_num(4);
        msg.set_part_num(2);
        msg.set_perm_data(Bytes::from_static(&[0x03, 0x01]));
        msg.set_message_complete(true);
        msg.set_provider_driven(true);
        let mut key = MsgKey::new();
        key.set_name("TRI.N");
        key.set_service_id(1);
        msg.set_msg_key(key);
        msg.set_payload(DataType::ElementList, element_list_bytes())
            .unwrap();

        let decoded = GenericMsg::decode(msg.encode().unwrap()).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.payload(), (DataType::ElementList, element_list_bytes()));
    }

    #[test]
    fn test_absent_optionals_report_defaults() {
        let msg = GenericMsg::new();
        assert!(!msg.has_seq_num());
        assert_eq!(msg.seq_num(), 0);
        assert!(!msg.has_msg_key());
        assert!(!msg.has_payload());
        assert_eq!(msg.payload().0, DataType::NoData);
        assert!(!msg.message_complete());
    }

    #[test]
    fn test_clear_equals_fresh() {
        let mut msg = GenericMsg::new();
        msg.set_stream_id(9);
        msg.set_seq_num(1);
        msg.set_payload(DataType::ElementList, element_list_bytes())
            .unwrap();
        msg.clear();
        assert_eq!(msg, GenericMsg::new());
    }

    #[test]
    fn test_primitive_payload_rejected() {
        let mut msg = GenericMsg::new();
        let err = msg
            .set_payload(DataType::UInt, Bytes::from_static(&[1]))
            .unwrap_err();
        assert!(matches!(err, EncodeError::ValueNotEncodable { .. }));
        assert!(!msg.has_payload());
    }

    #[test]
    fn test_wrong_class_rejected() {
        let mut msg = GenericMsg::new();
        msg.set_stream_id(1);
        let bytes = msg.encode().unwrap();
        let mut wrong = bytes.to_vec();
        wrong[0] = 2; // refresh class
        let err = GenericMsg::decode(Bytes::from(wrong)).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownMsgClass(2)));
    }
}
