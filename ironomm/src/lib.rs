/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronOMM
//!
//! An OMM/RWF market-data codec for Rust.
//!
//! IronOMM encodes and decodes the Open Message Model: six container
//! kinds, seven message classes, and the RWF primitive set, plus the
//! RMTES partial-update text encoding.
//!
//! ## Features
//!
//! - **Refcounted slices**: decoded entries hold `bytes::Bytes` views and
//!   move between containers without re-parsing
//! - **Closed payload union**: every payload is an [`prelude::OmmData`]
//!   variant, matched exhaustively
//! - **Builder and view in one**: each container and message type both
//!   encodes and decodes
//! - **Blank-aware primitives**: sentinel blank forms are distinct from
//!   zero throughout
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ironomm::prelude::*;
//!
//! let mut fl = FieldList::new();
//! fl.add(22, &OmmData::Real(OmmReal::new(3990, MagnitudeType::ExponentNeg2)))?;
//! let mut msg = RefreshMsg::new();
//! msg.set_payload(DataType::FieldList, fl.encode()?)?;
//! let bytes = msg.encode()?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: data types, primitive values, date/time formatting, errors
//! - [`wire`]: byte-level reader/writer and the primitive codec
//! - [`dictionary`]: field-id to type mappings for FieldList decoding
//! - [`containers`]: the six OMM container kinds
//! - [`messages`]: the seven OMM message classes
//! - [`rmtes`]: RMTES partial-update text decompressor

pub mod core {
    //! Data types, primitive values, date/time formatting, and errors.
    pub use ironomm_core::*;
}

pub mod wire {
    //! Byte-level reader/writer and the primitive codec.
    pub use ironomm_wire::*;
}

pub mod dictionary {
    //! Field-id to type mappings for FieldList decoding.
    pub use ironomm_dictionary::*;
}

pub mod containers {
    //! The six OMM container kinds.
    pub use ironomm_containers::*;
}

pub mod messages {
    //! The seven OMM message classes.
    pub use ironomm_messages::*;
}

pub mod rmtes {
    //! RMTES partial-update text decompressor.
    pub use ironomm_rmtes::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use ironomm_core::{
        DataType, DateTimeStringFormat, DecodeError, EncodeError, FilterAction, FormatError,
        FormatKind, MagnitudeType, MapAction, OmmDate, OmmDateTime, OmmError, OmmReal, OmmTime,
        Result, VectorAction,
    };

    // Wire
    pub use ironomm_wire::{WireReader, WireWriter, MAJOR_VERSION, MINOR_VERSION};

    // Dictionary
    pub use ironomm_dictionary::{FieldDef, FieldDictionary};

    // Containers
    pub use ironomm_containers::{
        ElementEntry, ElementList, FieldEntry, FieldList, FilterEntry, FilterList, Map, MapEntry,
        OmmData, Series, SeriesEntry, Vector, VectorEntry,
    };

    // Messages
    pub use ironomm_messages::{
        AckMsg, ConflationInfo, DataState, GenericMsg, Msg, MsgKey, PostMsg, PostUserInfo,
        Priority, Qos, RefreshMsg, RequestMsg, State, StatusMsg, StreamState, UpdateMsg,
    };

    // RMTES
    pub use ironomm_rmtes::{has_partial_update, RmtesBuffer, RmtesError};
}
