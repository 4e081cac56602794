/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronOMM Core
//!
//! Core types, traits, and error definitions for the IronOMM Open Message
//! Model codec.
//!
//! This crate provides:
//! - **Data type codes**: [`DataType`] tags for primitives, containers, and messages
//! - **Entry actions**: [`FilterAction`], [`VectorAction`], [`MapAction`]
//! - **Primitive values**: [`OmmReal`], [`OmmDate`], [`OmmTime`], [`OmmDateTime`]
//!   with blank-sentinel semantics
//! - **String formatting**: [`DateTimeStringFormat`] for ISO-8601 and RSSL
//!   textual renderings
//! - **Errors**: the unified [`OmmError`] hierarchy

pub mod datetime;
pub mod error;
pub mod real;
pub mod types;

pub use datetime::{DateTimeStringFormat, FormatKind, OmmDate, OmmDateTime, OmmTime};
pub use error::{DecodeError, EncodeError, FormatError, OmmError, Result};
pub use real::{MagnitudeType, OmmReal};
pub use types::{DataType, FilterAction, MapAction, VectorAction};
