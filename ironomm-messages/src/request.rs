/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Request message: opens or reissues an item stream.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::DataType;
use ironomm_wire::{WireReader, WireWriter};
use tracing::trace;

use crate::common::{
    read_envelope, require_payloadable, write_envelope, Envelope, MSG_CLASS_REQUEST,
};
use crate::key::MsgKey;
use crate::refresh::Qos;

const HAS_MSG_KEY: u16 = 0x0001;
const HAS_EXTENDED_HEADER: u16 = 0x0002;
const HAS_PRIORITY: u16 = 0x0004;
const HAS_QOS: u16 = 0x0008;
const STREAMING: u16 = 0x0010;
const NO_REFRESH: u16 = 0x0020;
const MSG_KEY_IN_UPDATES: u16 = 0x0040;
const CONF_INFO_IN_UPDATES: u16 = 0x0080;
const PAUSE: u16 = 0x0100;

/// Stream priority: class wins over count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    /// Priority class, higher is more important.
    pub class: u8,
    /// Number of interested parties within the class.
    pub count: u16,
}

impl Default for Priority {
    fn default() -> Self {
        Self { class: 1, count: 1 }
    }
}

/// Request message. Builder and decoded view in one type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestMsg {
    domain_type: u8,
    stream_id: i32,
    msg_key: Option<MsgKey>,
    extended_header: Option<Bytes>,
    priority: Option<Priority>,
    qos: Option<Qos>,
    streaming: bool,
    no_refresh: bool,
    msg_key_in_updates: bool,
    conf_info_in_updates: bool,
    pause: bool,
    payload_type: Option<DataType>,
    payload: Bytes,
}

impl RequestMsg {
    /// Creates an empty request message.
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

    /// Returns true if a priority is set.
    #[must_use]
    pub const fn has_priority(&self) -> bool {
        self.priority.is_some()
    }

    /// Returns the priority, `class 1 count 1` when absent.
    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority.unwrap_or_default()
    }

    /// Sets the priority.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = Some(priority);
    }

    /// Returns true if a QoS is set.
    #[must_use]
    pub const fn has_qos(&self) -> bool {
        self.qos.is_some()
    }

    /// Returns the requested QoS, zeroed when absent.
    #[must_use]
    pub fn qos(&self) -> Qos {
        self.qos.unwrap_or_default()
    }

    /// Sets the requested QoS.
    pub fn set_qos(&mut self, qos: Qos) {
        self.qos = Some(qos);
    }

    /// Returns true if the request opens a streaming subscription.
    #[must_use]
    pub const fn streaming(&self) -> bool {
        self.streaming
    }

    /// Sets the streaming indication. False means snapshot.
    pub fn set_streaming(&mut self, streaming: bool) {
        self.streaming = streaming;
    }

    /// Returns true if the reissue should not trigger a refresh.
    #[must_use]
    pub const fn no_refresh(&self) -> bool {
        self.no_refresh
    }

    /// Sets the no-refresh indication.
    pub fn set_no_refresh(&mut self, no_refresh: bool) {
        self.no_refresh = no_refresh;
    }

    /// Returns true if updates should carry the message key.
    #[must_use]
    pub const fn msg_key_in_updates(&self) -> bool {
        self.msg_key_in_updates
    }

    /// Sets the key-in-updates indication.
    pub fn set_msg_key_in_updates(&mut self, msg_key_in_updates: bool) {
        self.msg_key_in_updates = msg_key_in_updates;
    }

    /// Returns true if updates should carry conflation info.
    #[must_use]
    pub const fn conf_info_in_updates(&self) -> bool {
        self.conf_info_in_updates
    }

    /// Sets the conflation-info-in-updates indication.
    pub fn set_conf_info_in_updates(&mut self, conf_info_in_updates: bool) {
        self.conf_info_in_updates = conf_info_in_updates;
    }

    /// Returns true if the stream should be paused.
    #[must_use]
    pub const fn pause(&self) -> bool {
        self.pause
    }

    /// Sets the pause indication.
    pub fn set_pause(&mut self, pause: bool) {
        self.pause = pause;
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
        if self.priority.is_some() {
            flags |= HAS_PRIORITY;
        }
        if self.qos.is_some() {
            flags |= HAS_QOS;
        }
        if self.streaming {
            flags |= STREAMING;
        }
        if self.no_refresh {
            flags |= NO_REFRESH;
        }
        if self.msg_key_in_updates {
            flags |= MSG_KEY_IN_UPDATES;
        }
        if self.conf_info_in_updates {
            flags |= CONF_INFO_IN_UPDATES;
        }
        if self.pause {
            flags |= PAUSE;
        }
        write_envelope(
            w,
            MSG_CLASS_REQUEST,
            Envelope {
                domain_type: self.domain_type,
                stream_id: self.stream_id,
                flags,
                payload_type: self.payload_type.unwrap_or(DataType::NoData),
            },
        )?;
        if let Some(priority) = self.priority {
            w.put_u8(priority.class);
            w.put_u16ob(usize::from(priority.count))?;
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

    /// Decodes a request message from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input or a wrong class byte.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let env = read_envelope(&mut r, MSG_CLASS_REQUEST)?;
        trace!(stream_id = env.stream_id, "decoding request message");
        let mut msg = Self::new();
        msg.domain_type = env.domain_type;
        msg.stream_id = env.stream_id;
        if env.flags & HAS_PRIORITY != 0 {
            msg.priority = Some(Priority {
                class: r.read_u8()?,
                count: r.read_u16ob()?,
            });
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
        msg.streaming = env.flags & STREAMING != 0;
        msg.no_refresh = env.flags & NO_REFRESH != 0;
        msg.msg_key_in_updates = env.flags & MSG_KEY_IN_UPDATES != 0;
        msg.conf_info_in_updates = env.flags & CONF_INFO_IN_UPDATES != 0;
        msg.pause = env.flags & PAUSE != 0;
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

    #[test]
    fn test_round_trip_full() {
        let mut msg = RequestMsg::new();
        msg.set_domain_type(6);
        msg.set_stream_id(5);
        msg.set_streaming(true);
        msg.set_msg_key_in_updates(true);
        msg.set_priority(Priority { class: 2, count: 300 });
        msg.set_qos(Qos {
            timeliness: 1,
            rate: 1,
        });
        let mut key = MsgKey::new();
        key.set_name("TRI.N");
        key.set_service_id(1);
        msg.set_msg_key(key);

        let mut view = ElementList::new();
        view.add(":ViewType", &OmmData::UInt(1)).unwrap();
        msg.set_payload(DataType::ElementList, view.encode().unwrap())
            .unwrap();

        let decoded = RequestMsg::decode(msg.encode().unwrap()).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.priority(), Priority { class: 2, count: 300 });
        assert!(decoded.streaming());
    }

    #[test]
    fn test_default_priority() {
        let msg = RequestMsg::new();
        assert!(!msg.has_priority());
        assert_eq!(msg.priority(), Priority { class: 1, count: 1 });
    }

    #[test]
    fn test_pause_reissue() {
        let mut msg = RequestMsg::new();
        msg.set_stream_id(5);
        msg.set_streaming(true);
        msg.set_pause(true);
        msg.set_no_refresh(true);
        let decoded = RequestMsg::decode(msg.encode().unwrap()).unwrap();
        assert!(decoded.pause());
        assert!(decoded.no_refresh());
        assert!(!decoded.has_payload());
    }
}
