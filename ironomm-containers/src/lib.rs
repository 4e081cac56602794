/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronOMM Containers
//!
//! The six OMM container kinds and their entry types.
//!
//! This crate provides:
//! - [`FieldList`]: field-id keyed entries, types resolved via dictionary
//! - [`ElementList`]: name keyed entries with self-describing types
//! - [`FilterList`]: filter-id keyed entries with actions
//! - [`Series`]: implicitly indexed uniform entries
//! - [`Vector`]: position-indexed entries with actions
//! - [`Map`]: key-value entries with actions
//! - [`OmmData`]: the closed payload union spanning primitives, encoded
//!   containers, and messages
//!
//! Every container is both builder and decoded view. Decoded entries are
//! immutable value types holding refcounted slices of the backing buffer,
//! so an entry taken from one container can be added to another and
//! round-trips bit-identically.
//!
//! Containers are not thread-safe; share them behind external
//! synchronization if needed.

pub mod element_list;
pub mod field_list;
pub mod filter_list;
mod load_type;
pub mod map;
pub mod series;
pub mod value;
pub mod vector;

pub use element_list::{ElementEntry, ElementList};
pub use field_list::{FieldEntry, FieldList};
pub use filter_list::{FilterEntry, FilterList};
pub use map::{Map, MapEntry};
pub use series::{Series, SeriesEntry};
pub use value::OmmData;
pub use vector::{Vector, VectorEntry};
