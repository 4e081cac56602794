/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronOMM RMTES
//!
//! Decompressor for RMTES text, the market-data string encoding that
//! supports partial in-place updates via escape sequences.
//!
//! [`RmtesBuffer`] holds the resolved text and applies update buffers to
//! it; [`has_partial_update`] classifies a raw buffer without resolving.

pub mod buffer;
pub mod error;

pub use buffer::{has_partial_update, RmtesBuffer};
pub use error::RmtesError;
