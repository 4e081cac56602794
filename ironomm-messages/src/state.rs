/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Stream and data state carried by refresh and status messages.

use bytes::Bytes;
use ironomm_core::error::{DecodeError, EncodeError};
use ironomm_wire::{WireReader, WireWriter};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the stream itself.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromPrimitive,
    ToPrimitive,
)]
#[repr(u8)]
pub enum StreamState {
    /// Stream is open; more messages may arrive.
    Open = 1,
    /// Stream delivers a single response, then closes.
    NonStreaming = 2,
    /// Stream is closed and will not recover.
    Closed = 3,
    /// Stream is closed but a re-request may succeed.
    ClosedRecover = 4,
    /// Stream is closed; the item has moved elsewhere.
    ClosedRedirected = 5,
}

/// Health of the data on the stream.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromPrimitive,
    ToPrimitive,
)]
#[repr(u8)]
pub enum DataState {
    /// No change from the previous data state.
    NoChange = 0,
    /// Data is current and usable.
    Ok = 1,
    /// Data may be stale.
    Suspect = 2,
}

/// Message state: stream state, data state, status code, and free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Stream portion.
    pub stream_state: StreamState,
    /// Data portion.
    pub data_state: DataState,
    /// Numeric status code, provider-defined.
    pub status_code: u8,
    /// Human-readable status text.
    pub status_text: String,
}

impl State {
    /// Creates a state with an empty status text.
    #[must_use]
    pub const fn new(stream_state: StreamState, data_state: DataState) -> Self {
        Self {
            stream_state,
            data_state,
            status_code: 0,
            status_text: String::new(),
        }
    }

    /// Sets the status code.
    #[must_use]
    pub const fn with_code(mut self, status_code: u8) -> Self {
        self.status_code = status_code;
        self
    }

    /// Sets the status text.
    #[must_use]
    pub fn with_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// Encodes the state into a writer.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` if the status text exceeds
    /// its length prefix.
    pub fn encode_to(&self, w: &mut WireWriter) -> Result<(), EncodeError> {
        w.put_u8(self.stream_state as u8);
        w.put_u8(self.data_state as u8);
        w.put_u8(self.status_code);
        w.put_b15(self.status_text.as_bytes())
    }

    /// Decodes a state from a reader.
    ///
    /// # Errors
    /// Returns a `DecodeError` on truncated input or unknown state codes.
    pub fn decode_from(r: &mut WireReader) -> Result<Self, DecodeError> {
        let stream_code = r.read_u8()?;
        let stream_state = StreamState::from_u8(stream_code).ok_or(
            DecodeError::OutOfRange {
                data_type: ironomm_core::DataType::Msg,
                reason: format!("unknown stream state {stream_code}"),
            },
        )?;
        let data_code = r.read_u8()?;
        let data_state = DataState::from_u8(data_code).ok_or(DecodeError::OutOfRange {
            data_type: ironomm_core::DataType::Msg,
            reason: format!("unknown data state {data_code}"),
        })?;
        let status_code = r.read_u8()?;
        let text = r.read_b15()?;
        let status_text = text_to_string(&text)?;
        Ok(Self {
            stream_state,
            data_state,
            status_code,
            status_text,
        })
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(StreamState::Open, DataState::Ok)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} / {:?} / {}",
            self.stream_state, self.data_state, self.status_code
        )?;
        if !self.status_text.is_empty() {
            write!(f, " / '{}'", self.status_text)?;
        }
        Ok(())
    }
}

fn text_to_string(bytes: &Bytes) -> Result<String, DecodeError> {
    std::str::from_utf8(bytes)
        .map(ToOwned::to_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}
