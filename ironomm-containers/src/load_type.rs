/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Payload type discipline shared by the uniform containers.

use ironomm_core::error::EncodeError;
use ironomm_core::DataType;

/// Tracks the payload type established on a container.
///
/// The first summary or entry establishes the type; later additions must
/// match it. `NoData` entries (payloadless actions) neither establish nor
/// conflict.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LoadType {
    established: Option<DataType>,
}

impl LoadType {
    /// Checks `attempted` against the established type, establishing it on
    /// first use. A failed check changes nothing.
    pub(crate) fn check(
        &mut self,
        container: &'static str,
        attempted: DataType,
    ) -> Result<(), EncodeError> {
        if attempted == DataType::NoData {
            return Ok(());
        }
        match self.established {
            None => {
                self.established = Some(attempted);
                Ok(())
            }
            Some(established) if established == attempted => Ok(()),
            Some(established) => Err(EncodeError::PayloadTypeConflict {
                container,
                attempted,
                established,
            }),
        }
    }

    /// Returns the established type, `NoData` when none has been.
    pub(crate) fn get(self) -> DataType {
        self.established.unwrap_or(DataType::NoData)
    }

    pub(crate) fn clear(&mut self) {
        self.established = None;
    }
}

/// Header-typed containers can only carry container payloads; the scaled
/// type byte has no room for primitive codes.
pub(crate) fn require_container(
    container: &'static str,
    data_type: DataType,
) -> Result<(), EncodeError> {
    if data_type.is_container() {
        Ok(())
    } else {
        Err(EncodeError::ValueNotEncodable {
            data_type,
            reason: format!("{container} entry payloads must be container types"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_use_establishes() {
        let mut lt = LoadType::default();
        assert_eq!(lt.get(), DataType::NoData);
        lt.check("Vector", DataType::FieldList).unwrap();
        assert_eq!(lt.get(), DataType::FieldList);
    }

    #[test]
    fn test_conflict_preserves_state() {
        let mut lt = LoadType::default();
        lt.check("Vector", DataType::FieldList).unwrap();
        let err = lt.check("Vector", DataType::ElementList).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Attempt to add entry of ElementList while Vector entry load type is set to FieldList with summaryData() method"
        );
        assert_eq!(lt.get(), DataType::FieldList);
    }

    #[test]
    fn test_no_data_is_exempt() {
        let mut lt = LoadType::default();
        lt.check("Series", DataType::NoData).unwrap();
        assert_eq!(lt.get(), DataType::NoData);
        lt.check("Series", DataType::Map).unwrap();
        lt.check("Series", DataType::NoData).unwrap();
        assert_eq!(lt.get(), DataType::Map);
    }
}
