/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema definitions for field dictionaries.
//!
//! This module defines the structures that describe a field-list payload:
//! - [`FieldDef`]: Field definitions with id, acronym, and wire type
//! - [`FieldDictionary`]: Complete dictionary indexed by id and acronym
//!
//! FieldList entries carry only a field id on the wire; the dictionary
//! supplies the wire type and display name at access time.

use ironomm_core::DataType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Definition of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field id carried on the wire. Negative ids are provider-defined.
    pub id: i16,
    /// Field acronym, e.g. `BID` or `ASK`.
    pub name: String,
    /// Wire type of the field's payload.
    pub field_type: DataType,
    /// Field id rippled to on update, 0 when the field does not ripple.
    pub ripple_to: i16,
}

impl FieldDef {
    /// Creates a new field definition.
    ///
    /// # Arguments
    /// * `id` - The field id
    /// * `name` - The field acronym
    /// * `field_type` - The wire type of the field's payload
    #[must_use]
    pub fn new(id: i16, name: impl Into<String>, field_type: DataType) -> Self {
        Self {
            id,
            name: name.into(),
            field_type,
            ripple_to: 0,
        }
    }

    /// Sets the ripple target field id.
    #[must_use]
    pub const fn with_ripple_to(mut self, ripple_to: i16) -> Self {
        self.ripple_to = ripple_to;
        self
    }
}

/// Field dictionary indexed by id and by acronym.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDictionary {
    fields: HashMap<i16, FieldDef>,
    by_name: HashMap<String, i16>,
}

impl FieldDictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field definition, replacing any previous definition with the
    /// same id.
    pub fn add_field(&mut self, field: FieldDef) {
        self.by_name.insert(field.name.clone(), field.id);
        self.fields.insert(field.id, field);
    }

    /// Looks up a field definition by id.
    #[must_use]
    pub fn lookup(&self, field_id: i16) -> Option<&FieldDef> {
        self.fields.get(&field_id)
    }

    /// Looks up a field definition by acronym.
    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.by_name.get(name).and_then(|id| self.fields.get(id))
    }

    /// Returns the number of field definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the dictionary holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over all field definitions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FieldDictionary {
        let mut dict = FieldDictionary::new();
        dict.add_field(FieldDef::new(22, "BID", DataType::Real).with_ripple_to(23));
        dict.add_field(FieldDef::new(25, "ASK", DataType::Real));
        dict.add_field(FieldDef::new(3, "DSPLY_NAME", DataType::RmtesString));
        dict.add_field(FieldDef::new(15, "CURRENCY", DataType::Enum));
        dict
    }

    #[test]
    fn test_lookup_by_id() {
        let dict = sample();
        let bid = dict.lookup(22).unwrap();
        assert_eq!(bid.name, "BID");
        assert_eq!(bid.field_type, DataType::Real);
        assert_eq!(bid.ripple_to, 23);
        assert!(dict.lookup(9999).is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        let dict = sample();
        assert_eq!(dict.lookup_by_name("ASK").unwrap().id, 25);
        assert!(dict.lookup_by_name("MISSING").is_none());
    }

    #[test]
    fn test_replace_definition() {
        let mut dict = sample();
        dict.add_field(FieldDef::new(22, "BID", DataType::Double));
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.lookup(22).unwrap().field_type, DataType::Double);
        assert_eq!(dict.lookup(22).unwrap().ripple_to, 0);
    }

    #[test]
    fn test_empty() {
        let dict = FieldDictionary::new();
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
    }
}
