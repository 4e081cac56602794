/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message layer of the market-data codec.
//!
//! Seven message classes share one envelope: class byte, domain type,
//! stream id, flags word, payload type. Each class adds its own required
//! fields and optionals, gated by flags:
//!
//! - [`RequestMsg`]: opens or reissues an item stream
//! - [`RefreshMsg`]: full image with a mandatory [`State`]
//! - [`StatusMsg`]: state change without an image
//! - [`UpdateMsg`]: incremental change
//! - [`GenericMsg`]: bidirectional free-form exchange
//! - [`AckMsg`]: answer to an acknowledged post
//! - [`PostMsg`]: consumer-contributed data
//!
//! [`Msg`] is the class-dispatched decode entry point for payloads that
//! nest messages inside containers.

mod common;

pub mod ack;
pub mod generic;
pub mod key;
pub mod post;
pub mod refresh;
pub mod request;
pub mod state;
pub mod status;
pub mod update;

pub use ack::AckMsg;
pub use generic::GenericMsg;
pub use key::MsgKey;
pub use post::{PostMsg, PostUserInfo};
pub use refresh::{Qos, RefreshMsg};
pub use request::{Priority, RequestMsg};
pub use state::{DataState, State, StreamState};
pub use status::StatusMsg;
pub use update::{ConflationInfo, UpdateMsg};

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};

use crate::common::{
    peek_msg_class, MSG_CLASS_ACK, MSG_CLASS_GENERIC, MSG_CLASS_POST, MSG_CLASS_REFRESH,
    MSG_CLASS_REQUEST, MSG_CLASS_STATUS, MSG_CLASS_UPDATE,
};

/// A decoded message of any class.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Request message.
    Request(RequestMsg),
    /// Refresh message.
    Refresh(RefreshMsg),
    /// Status message.
    Status(StatusMsg),
    /// Update message.
    Update(UpdateMsg),
    /// Generic message.
    Generic(GenericMsg),
    /// Ack message.
    Ack(AckMsg),
    /// Post message.
    Post(PostMsg),
}

impl Msg {
    /// Decodes a message of any class, dispatching on the class byte.
    ///
    /// # Errors
    /// Returns `DecodeError::UnknownMsgClass` for an unassigned class byte
    /// and propagates the class decoder's errors otherwise.
    pub fn decode(bytes: Bytes) -> Result<Self, DecodeError> {
        match peek_msg_class(&bytes)? {
            MSG_CLASS_REQUEST => RequestMsg::decode(bytes).map(Self::Request),
            MSG_CLASS_REFRESH => RefreshMsg::decode(bytes).map(Self::Refresh),
            MSG_CLASS_STATUS => StatusMsg::decode(bytes).map(Self::Status),
            MSG_CLASS_UPDATE => UpdateMsg::decode(bytes).map(Self::Update),
            MSG_CLASS_ACK => AckMsg::decode(bytes).map(Self::Ack),
            MSG_CLASS_GENERIC => GenericMsg::decode(bytes).map(Self::Generic),
            MSG_CLASS_POST => PostMsg::decode(bytes).map(Self::Post),
            other => Err(DecodeError::UnknownMsgClass(other)),
        }
    }

    /// Encodes the message to bytes.
    ///
    /// # Errors
    /// Propagates the class encoder's errors.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        match self {
            Self::Request(msg) => msg.encode(),
            Self::Refresh(msg) => msg.encode(),
            Self::Status(msg) => msg.encode(),
            Self::Update(msg) => msg.encode(),
            Self::Generic(msg) => msg.encode(),
            Self::Ack(msg) => msg.encode(),
            Self::Post(msg) => msg.encode(),
        }
    }

    /// Returns the wire class byte of this message.
    #[must_use]
    pub const fn msg_class(&self) -> u8 {
        match self {
            Self::Request(_) => MSG_CLASS_REQUEST,
            Self::Refresh(_) => MSG_CLASS_REFRESH,
            Self::Status(_) => MSG_CLASS_STATUS,
            Self::Update(_) => MSG_CLASS_UPDATE,
            Self::Generic(_) => MSG_CLASS_GENERIC,
            Self::Ack(_) => MSG_CLASS_ACK,
            Self::Post(_) => MSG_CLASS_POST,
        }
    }

    /// Returns the stream id of the wrapped message.
    #[must_use]
    pub const fn stream_id(&self) -> i32 {
        match self {
            Self::Request(msg) => msg.stream_id(),
            Self::Refresh(msg) => msg.stream_id(),
            Self::Status(msg) => msg.stream_id(),
            Self::Update(msg) => msg.stream_id(),
            Self::Generic(msg) => msg.stream_id(),
            Self::Ack(msg) => msg.stream_id(),
            Self::Post(msg) => msg.stream_id(),
        }
    }
}
