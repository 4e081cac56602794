/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronOMM Dictionary
//!
//! Field-definition dictionary for the IronOMM codec.
//!
//! This crate provides:
//! - **Schema definitions**: [`FieldDef`] with id, acronym, and wire type
//! - **Runtime lookup**: [`FieldDictionary`] indexed by field id and acronym
//!
//! Dictionaries are built in memory; loading from RDM definition files is an
//! external collaborator's concern.

pub mod schema;

pub use schema::{FieldDef, FieldDictionary};
