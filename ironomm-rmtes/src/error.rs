/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! RMTES decoding errors.

use thiserror::Error;

/// Errors raised while resolving RMTES text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RmtesError {
    /// A partial update arrived before any base text was established.
    #[error("partial update applied with no base text established")]
    NoBaseText,

    /// An escape sequence ended prematurely or used an unknown terminator.
    #[error("malformed escape sequence at offset {offset}")]
    BadEscapeSequence {
        /// Byte offset of the escape introducer in the update buffer.
        offset: usize,
    },
}
