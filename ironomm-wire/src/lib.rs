/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronOMM Wire
//!
//! RWF byte-level reading and writing for the IronOMM codec.
//!
//! This crate provides:
//! - [`WireReader`]: cursor over a refcounted buffer with the RWF
//!   variable-length integer and length-prefix schemes
//! - [`WireWriter`]: growable output buffer mirroring the reader
//! - [`primitive`]: encode/decode of scalar values to/from their
//!   length-delimited payload bytes, blank forms included
//!
//! Wire versions (major/minor) are carried opaquely on both reader and
//! writer; encode and decode of the same buffer must agree on them.

pub mod primitive;
pub mod reader;
pub mod writer;

pub use reader::WireReader;
pub use writer::WireWriter;

/// Default major wire version.
pub const MAJOR_VERSION: u8 = 14;
/// Default minor wire version.
pub const MINOR_VERSION: u8 = 1;
