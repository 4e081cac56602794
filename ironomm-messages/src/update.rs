/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Update message: an incremental change to an item stream.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::DataType;
use ironomm_wire::{WireReader, WireWriter};
use tracing::trace;

use crate::common::{
    read_envelope, require_payloadable, write_envelope, Envelope, MSG_CLASS_UPDATE,
};
use crate::key::MsgKey;

const HAS_MSG_KEY: u16 = 0x0001;
const HAS_EXTENDED_HEADER: u16 = 0x0002;
const HAS_PERM_DATA: u16 = 0x0004;
const HAS_SEQ_NUM: u16 = 0x0008;
const HAS_CONF_INFO: u16 = 0x0010;
const DO_NOT_CACHE: u16 = 0x0020;
const DO_NOT_CONFLATE: u16 = 0x0040;
const DO_NOT_RIPPLE: u16 = 0x0080;

/// Conflation info: how many updates were folded together and over what
/// interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConflationInfo {
    /// Number of updates conflated into this one.
    pub count: u16,
    /// Conflation interval in milliseconds.
    pub time: u16,
}

/// Update message. Builder and decoded view in one type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateMsg {
    domain_type: u8,
    stream_id: i32,
    update_type_num: u8,
    msg_key: Option<MsgKey>,
    extended_header: Option<Bytes>,
    perm_data: Option<Bytes>,
    seq_num: Option<u32>,
    conf_info: Option<ConflationInfo>,
    do_not_cache: bool,
    do_not_conflate: bool,
    do_not_ripple: bool,
    payload_type: Option<DataType>,
    payload: Bytes,
}

impl UpdateMsg {
    /// Creates an empty update message.
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

    /// Returns the update type number (quote, trade...), domain-defined.
    #[must_use]
    pub const fn update_type_num(&self) -> u8 {
        self.update_type_num
    }

    /// Sets the update type number.
    pub fn set_update_type_num(&mut self, update_type_num: u8) {
        self.update_type_num = update_type_num;
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

    /// Returns true if conflation info is set.
    #[must_use]
    pub const fn has_conf_info(&self) -> bool {
        self.conf_info.is_some()
    }

    /// Returns the conflation info, zeroed when absent.
    #[must_use]
    pub fn conf_info(&self) -> ConflationInfo {
        self.conf_info.unwrap_or_default()
    }

    /// Sets the conflation info.
    pub fn set_conf_info(&mut self, conf_info: ConflationInfo) {
        self.conf_info = Some(conf_info);
    }

    /// Returns true if the update should not be cached.
    #[must_use]
    pub const fn do_not_cache(&self) -> bool {
        self.do_not_cache
    }

    /// Sets the do-not-cache indication.
    pub fn set_do_not_cache(&mut self, do_not_cache: bool) {
        self.do_not_cache = do_not_cache;
    }

    /// Returns true if the update must not be conflated.
    #[must_use]
    pub const fn do_not_conflate(&self) -> bool {
        self.do_not_conflate
    }

    /// Sets the do-not-conflate indication.
    pub fn set_do_not_conflate(&mut self, do_not_conflate: bool) {
        self.do_not_conflate = do_not_conflate;
    }

    /// Returns true if ripple fields must not ripple.
    #[must_use]
    pub const fn do_not_ripple(&self) -> bool {
        self.do_not_ripple
    }

    /// Sets the do-not-ripple indication.
    pub fn set_do_not_ripple(&mut self, do_not_ripple: bool) {
        self.do_not_ripple = do_not_ripple;
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
        if self.conf_info.is_some() {
            flags |= HAS_CONF_INFO;
        }
        if self.do_not_cache {
            flags |= DO_NOT_CACHE;
        }
        if self.do_not_conflate {
            flags |= DO_NOT_CONFLATE;
        }
        if self.do_not_ripple {
            flags |= DO_NOT_RIPPLE;
        }
        write_envelope(
            w,
            MSG_CLASS_UPDATE,
            Envelope {
                domain_type: self.domain_type,
                stream_id: self.stream_id,
                flags,
                payload_type: self.payload_type.unwrap_or(DataType::NoData),
            },
        )?;
        w.put_u8(self.update_type_num);
        if let Some(seq_num) = self.seq_num {
            w.put_u32(seq_num);
        }
        if let Some(conf) = self.conf_info {
            w.put_u16(conf.count);
            w.put_u16(conf.time);
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

    /// Decodes an update message from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input or a wrong class byte.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let env = read_envelope(&mut r, MSG_CLASS_UPDATE)?;
        trace!(stream_id = env.stream_id, "decoding update message");
        let mut msg = Self::new();
        msg.domain_type = env.domain_type;
        msg.stream_id = env.stream_id;
        msg.update_type_num = r.read_u8()?;
        if env.flags & HAS_SEQ_NUM != 0 {
            msg.seq_num = Some(r.read_u32()?);
        }
        if env.flags & HAS_CONF_INFO != 0 {
            msg.conf_info = Some(ConflationInfo {
                count: r.read_u16()?,
                time: r.read_u16()?,
            });
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
        msg.do_not_cache = env.flags & DO_NOT_CACHE != 0;
        msg.do_not_conflate = env.flags & DO_NOT_CONFLATE != 0;
        msg.do_not_ripple = env.flags & DO_NOT_RIPPLE != 0;
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
    use ironomm_containers::{FieldList, OmmData};

    fn field_list_bytes() -> Bytes {
        let mut fl = FieldList::new();
        fl.add(25, &OmmData::UInt(41)).unwrap();
        fl.encode().unwrap()
    }

    #[test]
    fn test_round_trip_full() {
        let mut msg = UpdateMsg::new();
        msg.set_domain_type(6);
        msg.set_stream_id(5);
        msg.set_update_type_num(1);
        msg.set_seq_num(7);
        msg.set_conf_info(ConflationInfo { count: 3, time: 100 });
        msg.set_do_not_conflate(true);
        msg.set_do_not_ripple(true);
        msg.set_payload(DataType::FieldList, field_list_bytes())
            .unwrap();

        let decoded = UpdateMsg::decode(msg.encode().unwrap()).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.update_type_num(), 1);
        assert_eq!(decoded.conf_info(), ConflationInfo { count: 3, time: 100 });
    }

    #[test]
    fn test_defaults() {
        let msg = UpdateMsg::new();
        assert_eq!(msg.update_type_num(), 0);
        assert!(!msg.has_conf_info());
        assert_eq!(msg.conf_info(), ConflationInfo::default());
        assert!(!msg.do_not_cache());
    }

    #[test]
    fn test_clear_equals_fresh() {
        let mut msg = UpdateMsg::new();
        msg.set_update_type_num(3);
        msg.set_do_not_cache(true);
        msg.set_payload(DataType::FieldList, field_list_bytes())
            .unwrap();
        msg.clear();
        assert_eq!(msg, UpdateMsg::new());
    }
}
