/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Shared envelope pieces of the message codec.
//!
//! Every message starts with the same header: class byte, domain type
//! byte, `i32` stream id, `u15rb` flags word, scaled payload type byte.
//! Class-specific fields follow, then the optionals in flag order, then
//! the payload as a `b16` blob.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_core::DataType;
use ironomm_wire::{WireReader, WireWriter};

pub(crate) const MSG_CLASS_REQUEST: u8 = 1;
pub(crate) const MSG_CLASS_REFRESH: u8 = 2;
pub(crate) const MSG_CLASS_STATUS: u8 = 3;
pub(crate) const MSG_CLASS_UPDATE: u8 = 4;
pub(crate) const MSG_CLASS_ACK: u8 = 6;
pub(crate) const MSG_CLASS_GENERIC: u8 = 7;
pub(crate) const MSG_CLASS_POST: u8 = 8;

/// Envelope header shared by every message class.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Envelope {
    pub domain_type: u8,
    pub stream_id: i32,
    pub flags: u16,
    pub payload_type: DataType,
}

pub(crate) fn write_envelope(
    w: &mut WireWriter,
    msg_class: u8,
    env: Envelope,
) -> Result<(), EncodeError> {
    w.put_u8(msg_class);
    w.put_u8(env.domain_type);
    w.put_i32(env.stream_id);
    w.put_u15rb(usize::from(env.flags))?;
    w.put_u8(env.payload_type.scaled_code());
    Ok(())
}

/// Reads the envelope, checking the class byte.
pub(crate) fn read_envelope(
    r: &mut WireReader,
    expected_class: u8,
) -> Result<Envelope, DecodeError> {
    let msg_class = r.read_u8()?;
    if msg_class != expected_class {
        return Err(DecodeError::UnknownMsgClass(msg_class));
    }
    let domain_type = r.read_u8()?;
    let stream_id = r.read_i32()?;
    let flags = r.read_u15rb()?;
    let scaled = r.read_u8()?;
    let payload_type =
        DataType::from_scaled_code(scaled).ok_or(DecodeError::UnknownDataType(scaled))?;
    Ok(Envelope {
        domain_type,
        stream_id,
        flags,
        payload_type,
    })
}

/// Message payloads carry containers or nested messages, never bare
/// primitives.
pub(crate) fn require_payloadable(data_type: DataType) -> Result<(), EncodeError> {
    if data_type.is_container() {
        Ok(())
    } else {
        Err(EncodeError::ValueNotEncodable {
            data_type,
            reason: "message payload must be a container type".to_string(),
        })
    }
}

pub(crate) fn read_utf8_b15(r: &mut WireReader) -> Result<String, DecodeError> {
    let bytes = r.read_b15()?;
    std::str::from_utf8(&bytes)
        .map(ToOwned::to_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Peeks the class byte without consuming anything.
pub(crate) fn peek_msg_class(bytes: &Bytes) -> Result<u8, DecodeError> {
    bytes.first().copied().ok_or(DecodeError::UnexpectedEof {
        offset: 0,
        needed: 1,
    })
}
