/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Status message: a stream or data state change without an image.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::DataType;
use ironomm_wire::{WireReader, WireWriter};
use tracing::trace;

use crate::common::{
    read_envelope, require_payloadable, write_envelope, Envelope, MSG_CLASS_STATUS,
};
use crate::key::MsgKey;
use crate::state::State;

const HAS_MSG_KEY: u16 = 0x0001;
const HAS_EXTENDED_HEADER: u16 = 0x0002;
const HAS_PERM_DATA: u16 = 0x0004;
const HAS_STATE: u16 = 0x0008;
const HAS_GROUP_ID: u16 = 0x0010;
const CLEAR_CACHE: u16 = 0x0020;
const PRIVATE_STREAM: u16 = 0x0040;

/// Status message. Unlike refresh, the state itself is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusMsg {
    domain_type: u8,
    stream_id: i32,
    state: Option<State>,
    msg_key: Option<MsgKey>,
    extended_header: Option<Bytes>,
    perm_data: Option<Bytes>,
    group_id: Option<Bytes>,
    clear_cache: bool,
    private_stream: bool,
    payload_type: Option<DataType>,
    payload: Bytes,
}

impl StatusMsg {
    /// Creates an empty status message.
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

    /// Returns true if a state is set.
    #[must_use]
    pub const fn has_state(&self) -> bool {
        self.state.is_some()
    }

    /// Returns the state, the default state when absent.
    #[must_use]
    pub fn state(&self) -> State {
        self.state.clone().unwrap_or_default()
    }

    /// Sets the state.
    pub fn set_state(&mut self, state: State) {
        self.state = Some(state);
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

    /// Returns true if consumers should clear cached data.
    #[must_use]
    pub const fn clear_cache(&self) -> bool {
        self.clear_cache
    }

    /// Sets the clear-cache indication.
    pub fn set_clear_cache(&mut self, clear_cache: bool) {
        self.clear_cache = clear_cache;
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
        if self.state.is_some() {
            flags |= HAS_STATE;
        }
        if self.group_id.is_some() {
            flags |= HAS_GROUP_ID;
        }
        if self.clear_cache {
            flags |= CLEAR_CACHE;
        }
        if self.private_stream {
            flags |= PRIVATE_STREAM;
        }
        write_envelope(
            w,
            MSG_CLASS_STATUS,
            Envelope {
                domain_type: self.domain_type,
                stream_id: self.stream_id,
                flags,
                payload_type: self.payload_type.unwrap_or(DataType::NoData),
            },
        )?;
        if let Some(state) = &self.state {
            state.encode_to(w)?;
        }
        if let Some(perm) = &self.perm_data {
            w.put_b15(perm)?;
        }
        if let Some(group) = &self.group_id {
            w.put_b15(group)?;
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

    /// Decodes a status message from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input or a wrong class byte.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let env = read_envelope(&mut r, MSG_CLASS_STATUS)?;
        trace!(stream_id = env.stream_id, "decoding status message");
        let mut msg = Self::new();
        msg.domain_type = env.domain_type;
        msg.stream_id = env.stream_id;
        if env.flags & HAS_STATE != 0 {
            msg.state = Some(State::decode_from(&mut r)?);
        }
        if env.flags & HAS_PERM_DATA != 0 {
            msg.perm_data = Some(r.read_b15()?);
        }
        if env.flags & HAS_GROUP_ID != 0 {
            msg.group_id = Some(r.read_b15()?);
        }
        if env.flags & HAS_MSG_KEY != 0 {
            let key_bytes = r.read_b15()?;
            let mut kr = WireReader::new(key_bytes);
            msg.msg_key = Some(MsgKey::decode_from(&mut kr)?);
        }
        if env.flags & HAS_EXTENDED_HEADER != 0 {
            msg.extended_header = Some(r.read_b15()?);
        }
        msg.clear_cache = env.flags & CLEAR_CACHE != 0;
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

    #[test]
    fn test_round_trip_full() {
        let mut msg = StatusMsg::new();
        msg.set_domain_type(6);
        msg.set_stream_id(15);
        msg.set_state(State::new(StreamState::ClosedRecover, DataState::Suspect).with_text("A23: Service not available."));
        msg.set_group_id(Bytes::from_static(&[0, 3]));
        msg.set_clear_cache(true);
        msg.set_private_stream(true);
        let mut key = MsgKey::new();
        key.set_name("IBM.N");
        key.set_service_id(10);
        msg.set_msg_key(key);

        let decoded = StatusMsg::decode(msg.encode().unwrap()).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.state().stream_state, StreamState::ClosedRecover);
        assert_eq!(decoded.state().status_text, "A23: Service not available.");
        assert!(!decoded.has_payload());
    }

    #[test]
    fn test_state_optional() {
        let mut msg = StatusMsg::new();
        msg.set_stream_id(2);
        let decoded = StatusMsg::decode(msg.encode().unwrap()).unwrap();
        assert!(!decoded.has_state());
        assert_eq!(decoded.state(), State::default());
    }

    #[test]
    fn test_clear_equals_fresh() {
        let mut msg = StatusMsg::new();
        msg.set_state(State::new(StreamState::Closed, DataState::Suspect));
        msg.set_clear_cache(true);
        msg.clear();
        assert_eq!(msg, StatusMsg::new());
    }
}
