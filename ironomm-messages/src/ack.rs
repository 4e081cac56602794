/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Ack message: the provider's answer to an acknowledged post.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::DataType;
use ironomm_wire::{WireReader, WireWriter};
use tracing::trace;

use crate::common::{read_envelope, require_payloadable, write_envelope, Envelope, MSG_CLASS_ACK};
use crate::key::MsgKey;

const HAS_MSG_KEY: u16 = 0x0001;
const HAS_EXTENDED_HEADER: u16 = 0x0002;
const HAS_NAK_CODE: u16 = 0x0004;
const HAS_TEXT: u16 = 0x0008;
const HAS_SEQ_NUM: u16 = 0x0010;
const PRIVATE_STREAM: u16 = 0x0020;

/// Ack message. The ack id echoes the post id it answers; a nak code
/// means the post was rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AckMsg {
    domain_type: u8,
    stream_id: i32,
    ack_id: u32,
    nak_code: Option<u8>,
    text: Option<String>,
    seq_num: Option<u32>,
    msg_key: Option<MsgKey>,
    extended_header: Option<Bytes>,
    private_stream: bool,
    payload_type: Option<DataType>,
    payload: Bytes,
}

impl AckMsg {
    /// Creates an empty ack message.
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

    /// Returns the ack id.
    #[must_use]
    pub const fn ack_id(&self) -> u32 {
        self.ack_id
    }

    /// Sets the ack id.
    pub fn set_ack_id(&mut self, ack_id: u32) {
        self.ack_id = ack_id;
    }

    /// Returns true if a nak code is set.
    #[must_use]
    pub const fn has_nak_code(&self) -> bool {
        self.nak_code.is_some()
    }

    /// Returns the nak code, 0 when absent.
    #[must_use]
    pub fn nak_code(&self) -> u8 {
        self.nak_code.unwrap_or_default()
    }

    /// Sets the nak code.
    pub fn set_nak_code(&mut self, nak_code: u8) {
        self.nak_code = Some(nak_code);
    }

    /// Returns true if text is set.
    #[must_use]
    pub const fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// Returns the text, empty when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Sets the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
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
        if self.nak_code.is_some() {
            flags |= HAS_NAK_CODE;
        }
        if self.text.is_some() {
            flags |= HAS_TEXT;
        }
        if self.seq_num.is_some() {
            flags |= HAS_SEQ_NUM;
        }
        if self.private_stream {
            flags |= PRIVATE_STREAM;
        }
        write_envelope(
            w,
            MSG_CLASS_ACK,
            Envelope {
                domain_type: self.domain_type,
                stream_id: self.stream_id,
                flags,
                payload_type: self.payload_type.unwrap_or(DataType::NoData),
            },
        )?;
        w.put_u32(self.ack_id);
        if let Some(nak_code) = self.nak_code {
            w.put_u8(nak_code);
        }
        if let Some(text) = &self.text {
            w.put_b15(text.as_bytes())?;
        }
        if let Some(seq_num) = self.seq_num {
            w.put_u32(seq_num);
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

    /// Decodes an ack message from bytes.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input or a wrong class byte.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(bytes);
        let env = read_envelope(&mut r, MSG_CLASS_ACK)?;
        trace!(stream_id = env.stream_id, "decoding ack message");
        let mut msg = Self::new();
        msg.domain_type = env.domain_type;
        msg.stream_id = env.stream_id;
        msg.ack_id = r.read_u32()?;
        if env.flags & HAS_NAK_CODE != 0 {
            msg.nak_code = Some(r.read_u8()?);
        }
        if env.flags & HAS_TEXT != 0 {
            msg.text = Some(crate::common::read_utf8_b15(&mut r)?);
        }
        if env.flags & HAS_SEQ_NUM != 0 {
            msg.seq_num = Some(r.read_u32()?);
        }
        if env.flags & HAS_MSG_KEY != 0 {
            let key_bytes = r.read_b15()?;
            let mut kr = WireReader::new(key_bytes);
            msg.msg_key = Some(MsgKey::decode_from(&mut kr)?);
        }
        if env.flags & HAS_EXTENDED_HEADER != 0 {
            msg.extended_header = Some(r.read_b15()?);
        }
        msg.private_stream = env.flags & PRIVATE_STREAM != 0;
        msg.payload = r.read_b16()?;
        if env.payload_type != DataType::NoData {
            msg.payload_type = Some(env.payload_type);
        }
        Ok(msg)
    }
}
