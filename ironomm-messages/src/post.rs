/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Post message: consumer-contributed data pushed up an item stream.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::DataType;
use ironomm_wire::{WireReader, WireWriter};
use tracing::trace;

use crate::common::{read_envelope, require_payloadable, write_envelope, Envelope, MSG_CLASS_POST};
use crate::key::MsgKey;

const HAS_MSG_KEY: u16 = 0x0001;
const HAS_EXTENDED_HEADER: u16 = 0x0002;
const HAS_PERM_DATA: u16 = 0x0004;
const HAS_POST_ID: u16 = 0x0008;
const HAS_SEQ_NUM: u16 = 0x0010;
const HAS_PART_NUM: u16 = 0x0020;
const HAS_POST_USER_INFO: u16 = 0x0040;
const ACK_REQUESTED: u16 = 0x0080;
const POST_COMPLETE: u16 = 0x0100;

/// Identifies the user behind a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostUserInfo {
    /// IPv4 address of the posting application, as a host-order word.
    pub address: u32,
    /// Process or user id chosen by the posting application.
    pub id: u32,
}

/// Post message. Builder and decoded view in one type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostMsg {
    domain_type: u8,
    stream_id: i32,
    post_id: Option<u32>,
    seq_num: Option<u32>,
    part_num: Option<u16>,
    post_user_info: Option<PostUserInfo>,
    msg_key: Option<MsgKey>,
    extended_header: Option<Bytes>,
    perm_data: Option<Bytes>,
    ack_requested: bool,
    post_complete: bool,
    payload_type: Option<DataType>,
    payload: Bytes,
}

impl PostMsg {
    /// Creates an empty post message.
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

    /// Returns true if a post id is set.
    #[must_use]
    pub const fn has_post_id(&self) -> bool {
        self.post_id.is_some()
    }

    /// Returns the post id, 0 when absent.
    #[must_use]
    pub fn post_id(&self) -> u32 {
        self.post_id.unwrap_or_default()
    }

    /// Sets the post id.
    pub fn set_post_id(&mut self, post_id: u32) {
        self.post_id = Some(post_id);
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

    /// Returns true if post user info is set.
    #[must_use]
    pub const fn has_post_user_info(&self) -> bool {
        self.post_user_info.is_some()
    }

    /// Returns the post user info, zeroed when absent.
    #[must_use]
    pub fn post_user_info(&self) -> PostUserInfo {
        self.post_user_info.unwrap_or_default()
    }

    /// Sets the post user info.
    pub fn set_post_user_info(&mut self, post_user_info: PostUserInfo) {
        self.post_user_info = Some(post_user_info);
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

    /// Returns true if the poster wants an ack.
    #[must_use]
    pub const fn ack_requested(&self) -> bool {
        self.ack_requested
    }

    /// Sets the ack-requested indication.
    pub fn set_ack_requested(&mut self, ack_requested: bool) {
        self.ack_requested = ack_requested;
    }

    /// Returns true if this is the final part of a multi-part post.
    #[must_use]
    pub const fn post_complete(&self) -> bool {
        self.post_complete
    }

    /// Sets the post-complete indication.
    pub fn set_post_complete(&mut self, post_complete: bool) {
        self.post_complete = post_complete;
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
        if self.post_id.is_some() {
            flags |= HAS_POST_ID;
        }
        if self.seq_num.is_some() {
            flags |= HAS_SEQ_NUM;
        }
        if self.part_num.is_some() {
            flags |= HAS_PART_NUM;
        }
        if self.post_user_info.is_some() {
            flags |= HAS_POST_USER_INFO;
        }
        if self.ack_requested {
            flags |= ACK_REQUESTED;
        }
        if self.post_complete {
            flags |= POST_COMPLETE;
        }
        write_envelope(
            w,
            MSG_CLASS_POST,
            Envelope {
                domain_type: self.domain_type,
                stream_id: self.stream_id,
                flags,
                payload_type: self.payload_type.unwrap_or(DataType::NoData),
            },
        )?;
        if let Some(post_id) = self.post_id {
            w.put_u32(post_id);
        }
        if let Some(seq_num) = self.seq_num {
            w.put_u32(seq_num);
        }
        if let Some(part_num) = self.part_num {
            w.put_u16(part_num);
        }
        if let Some(info) = self.post_user_info {
            w.put_u32(info.address);
            w.put_u32(info.id);
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

    /// Decodes a post message from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input or a wrong class byte.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let env = read_envelope(&mut r, MSG_CLASS_POST)?;
        trace!(stream_id = env.stream_id, "decoding post message");
        let mut msg = Self::new();
        msg.domain_type = env.domain_type;
        msg.stream_id = env.stream_id;
        if env.flags & HAS_POST_ID != 0 {
            msg.post_id = Some(r.read_u32()?);
        }
        if env.flags & HAS_SEQ_NUM != 0 {
            msg.seq_num = Some(r.read_u32()?);
        }
        if env.flags & HAS_PART_NUM != 0 {
            msg.part_num = Some(r.read_u16()?);
        }
        if env.flags & HAS_POST_USER_INFO != 0 {
            msg.post_user_info = Some(PostUserInfo {
                address: r.read_u32()?,
                id: r.read_u32()?,
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
        msg.ack_requested = env.flags & ACK_REQUESTED != 0;
        msg.post_complete = env.flags & POST_COMPLETE != 0;
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

    #[test]
    fn test_round_trip_full() {
        let mut msg = PostMsg::new();
        msg.set_domain_type(6);
        msg.set_stream_id(1);
        msg.set_post_id(9);
        msg.set_seq_num(1);
        msg.set_part_num(0);
        msg.set_post_user_info(PostUserInfo {
            address: 0x0A00_0001,
            id: 5555,
        });
        msg.set_ack_requested(true);
        msg.set_post_complete(true);

        let mut fl = FieldList::new();
        fl.add(25, &OmmData::UInt(3)).unwrap();
        msg.set_payload(DataType::FieldList, fl.encode().unwrap())
            .unwrap();

        let decoded = PostMsg::decode(msg.encode().unwrap()).unwrap();
        assert_eq!(decoded, msg);
        assert!(decoded.ack_requested());
        assert_eq!(decoded.post_user_info().id, 5555);
    }

    #[test]
    fn test_defaults() {
        let msg = PostMsg::new();
        assert!(!msg.has_post_id());
        assert_eq!(msg.post_id(), 0);
        assert_eq!(msg.post_user_info(), PostUserInfo::default());
        assert!(!msg.post_complete());
    }

    #[test]
    fn test_clear_equals_fresh() {
        let mut msg = PostMsg::new();
        msg.set_post_id(1);
        msg.set_ack_requested(true);
        msg.clear();
        assert_eq!(msg, PostMsg::new());
    }
}
