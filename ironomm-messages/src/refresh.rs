/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Refresh message: the full image of an item stream.
//!
//! A refresh always carries a [`State`]; everything else is optional.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::DataType;
use ironomm_wire::{WireReader, WireWriter};
use tracing::trace;

use crate::common::{
    read_envelope, require_payloadable, write_envelope, Envelope, MSG_CLASS_REFRESH,
};
use crate::key::MsgKey;
use crate::state::State;

const HAS_MSG_KEY: u16 = 0x0001;
const HAS_EXTENDED_HEADER: u16 = 0x0002;
const HAS_PERM_DATA: u16 = 0x0004;
const HAS_SEQ_NUM: u16 = 0x0008;
const HAS_PART_NUM: u16 = 0x0010;
const HAS_GROUP_ID: u16 = 0x0020;
const HAS_QOS: u16 = 0x0040;
const SOLICITED: u16 = 0x0080;
const REFRESH_COMPLETE: u16 = 0x0100;
const CLEAR_CACHE: u16 = 0x0200;
const DO_NOT_CACHE: u16 = 0x0400;
const PRIVATE_STREAM: u16 = 0x0800;

/// Quality of service: timeliness and rate codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Qos {
    /// Timeliness code (realtime, delayed...).
    pub timeliness: u8,
    /// Rate code (tick-by-tick, conflated...).
    pub rate: u8,
}

/// Refresh message. Builder and decoded view in one type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshMsg {
    domain_type: u8,
    stream_id: i32,
    state: State,
    msg_key: Option<MsgKey>,
    extended_header: Option<Bytes>,
    perm_data: Option<Bytes>,
    seq_num: Option<u32>,
    part_num: Option<u16>,
    group_id: Option<Bytes>,
    qos: Option<Qos>,
    solicited: bool,
    refresh_complete: bool,
    clear_cache: bool,
    do_not_cache: bool,
    private_stream: bool,
    payload_type: Option<DataType>,
    payload: Bytes,
}

impl RefreshMsg {
    /// Creates an empty refresh with the default `Open / Ok` state.
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

    /// Returns the message state.
    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Sets the message state.
    pub fn set_state(&mut self, state: State) {
        self.state = state;
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

    /// Returns true if a group id is set.
    #[must_use]
    pub const fn has_group_id(&self) -> bool {
        self.group_id.is_some()
    }

    /// Returns the group id, empty when absent.
    #[must_use]
    pub fn group_id(&self) -> Bytes {
        self.group_id.clone().unwrap_or_default()
    }

    /// Sets the group id.
    pub fn set_group_id(&mut self, group_id: Bytes) {
        self.group_id = Some(group_id);
    }

    /// Returns true if a quality of service is set.
    #[must_use]
    pub const fn has_qos(&self) -> bool {
        self.qos.is_some()
    }

    /// Returns the quality of service, zeroed when absent.
    #[must_use]
    pub fn qos(&self) -> Qos {
        self.qos.unwrap_or_default()
    }

    /// Sets the quality of service.
    pub fn set_qos(&mut self, qos: Qos) {
        self.qos = Some(qos);
    }

    /// Returns true if this refresh answers a request.
    #[must_use]
    pub const fn solicited(&self) -> bool {
        self.solicited
    }

    /// Marks the refresh solicited or unsolicited.
    pub fn set_solicited(&mut self, solicited: bool) {
        self.solicited = solicited;
    }

    /// Returns true if this part completes the refresh.
    #[must_use]
    pub const fn refresh_complete(&self) -> bool {
        self.refresh_complete
    }

    /// Marks the refresh complete or incomplete.
    pub fn set_refresh_complete(&mut self, complete: bool) {
        self.refresh_complete = complete;
    }

    /// Returns true if consumers should drop cached data first.
    #[must_use]
    pub const fn clear_cache(&self) -> bool {
        self.clear_cache
    }

    /// Sets the clear-cache indication.
    pub fn set_clear_cache(&mut self, clear_cache: bool) {
        self.clear_cache = clear_cache;
    }

    /// Returns true if the payload should not be cached.
    #[must_use]
    pub const fn do_not_cache(&self) -> bool {
        self.do_not_cache
    }

    /// Sets the do-not-cache indication.
    pub fn set_do_not_cache(&mut self, do_not_cache: bool) {
        self.do_not_cache = do_not_cache;
    }

    /// Returns true if the stream is private.
    #[must_use]
    pub const fn private_stream(&self) -> bool {
        self.private_stream
    }

    /// Sets the private-stream indication.
    pub fn set_private_stream(&mut self, private_stream: bool) {
        self.private_stream = private_stream;
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
        if self.part_num.is_some() {
            flags |= HAS_PART_NUM;
        }
        if self.group_id.is_some() {
            flags |= HAS_GROUP_ID;
        }
        if self.qos.is_some() {
            flags |= HAS_QOS;
        }
        if self.solicited {
            flags |= SOLICITED;
        }
        if self.refresh_complete {
            flags |= REFRESH_COMPLETE;
        }
        if self.clear_cache {
            flags |= CLEAR_CACHE;
        }
        if self.do_not_cache {
            flags |= DO_NOT_CACHE;
        }
        if self.private_stream {
            flags |= PRIVATE_STREAM;
        }
        write_envelope(
            w,
            MSG_CLASS_REFRESH,
            Envelope {
                domain_type: self.domain_type,
                stream_id: self.stream_id,
                flags,
                payload_type: self.payload_type.unwrap_or(DataType::NoData),
            },
        )?;
        self.state.encode_to(w)?;
        if let Some(seq_num) = self.seq_num {
            w.put_u32(seq_num);
        }
        if let Some(part_num) = self.part_num {
            w.put_u16(part_num);
        }
        if let Some(perm) = &self.perm_data {
            w.put_b15(perm)?;
        }
        if let Some(group) = &self.group_id {
            w.put_b15(group)?;
        }
        if let Some(qos) = self.qos {
            w.put_u8(qos.timeliness);
            w.put_u8(qos.rate);
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

    /// Decodes a refresh message from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input or a wrong class byte.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let env = read_envelope(&mut r, MSG_CLASS_REFRESH)?;
        trace!(stream_id = env.stream_id, "decoding refresh message");
        let mut msg = Self::new();
        msg.domain_type = env.domain_type;
        msg.stream_id = env.stream_id;
        msg.state = State::decode_from(&mut r)?;
        if env.flags & HAS_SEQ_NUM != 0 {
            msg.seq_num = Some(r.read_u32()?);
        }
        if env.flags & HAS_PART_NUM != 0 {
            msg.part_num = Some(r.read_u16()?);
        }
        if env.flags & HAS_PERM_DATA != 0 {
            msg.perm_data = Some(r.read_b15()?);
        }
        if env.flags & HAS_GROUP_ID != 0 {
            msg.group_id = Some(r.read_b15()?);
        }
        if env.flags & HAS_QOS != 0 {
            msg.qos = Some(Qos {
                timeliness: r.read_u8()?,
                rate: r.read_u8()?,
            });
        }
        if env.flags & HAS_MSG_KEY != 0 {
            let key_bytes = r.read_b15()?;
            let mut kr = WireReader::new(key_bytes);
            msg.msg_key = Some(MsgKey::decode_from(&mut kr)?);
        }
        if env.flags & HAS_EXTENDED_HEADER != 0 {
            msg.extended_header = Some(r.read_b15()?);
        }
        msg.solicited = env.flags & SOLICITED != 0;
        msg.refresh_complete = env.flags & REFRESH_COMPLETE != 0;
        msg.clear_cache = env.flags & CLEAR_CACHE != 0;
        msg.do_not_cache = env.flags & DO_NOT_CACHE != 0;
        msg.private_stream = env.flags & PRIVATE_STREAM != 0;
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
    use crate::state::{DataState, StreamState};
    use ironomm_containers::{FieldList, OmmData};

    fn field_list_bytes() -> Bytes {
        let mut fl = FieldList::new();
        fl.add(22, &OmmData::UInt(12)).unwrap();
        fl.encode().unwrap()
    }

    #[test]
    fn test_round_trip_full() {
        let mut msg = RefreshMsg::new();
        msg.set_domain_type(6);
        msg.set_stream_id(5);
        msg.set_state(
            State::new(StreamState::Open, DataState::Ok).with_text("Refresh Completed"),
        );
        msg.set_seq_num(1);
        msg.set_part_num(0);
        msg.set_group_id(Bytes::from_static(&[0, 3]));
        msg.set_qos(Qos {
            timeliness: 1,
            rate: 1,
        });
        msg.set_solicited(true);
        msg.set_refresh_complete(true);
        msg.set_clear_cache(true);
        let mut key = MsgKey::new();
        key.set_name("TRI.N");
        key.set_service_id(1);
        msg.set_msg_key(key);
        msg.set_payload(DataType::FieldList, field_list_bytes())
            .unwrap();

        let decoded = RefreshMsg::decode(msg.encode().unwrap()).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.state().status_text, "Refresh Completed");
        assert_eq!(decoded.payload(), (DataType::FieldList, field_list_bytes()));
    }

    #[test]
    fn test_defaults() {
        let msg = RefreshMsg::new();
        assert_eq!(msg.state().stream_state, StreamState::Open);
        assert!(!msg.has_seq_num());
        assert!(!msg.solicited());
        assert_eq!(msg.qos(), Qos::default());
    }

    #[test]
    fn test_clear_equals_fresh() {
        let mut msg = RefreshMsg::new();
        msg.set_stream_id(2);
        msg.set_private_stream(true);
        msg.set_state(State::new(StreamState::Closed, DataState::Suspect));
        msg.clear();
        assert_eq!(msg, RefreshMsg::new());
    }

    #[test]
    fn test_attrib_type_preserved_through_round_trip() {
        let mut key = MsgKey::new();
        key.set_attrib(DataType::ElementList, Bytes::from_static(&[0, 1]))
            .unwrap();
        let mut msg = RefreshMsg::new();
        msg.set_msg_key(key);
        let decoded = RefreshMsg::decode(msg.encode().unwrap()).unwrap();
        let (attrib_type, attrib) = decoded.msg_key().attrib();
        assert_eq!(attrib_type, DataType::ElementList);
        assert_eq!(attrib, Bytes::from_static(&[0, 1]));
    }
}
