//! Errors from typed cell reads

use crate::model::Value;

/// A typed read on [`Row`](crate::model::Row) could not produce the wanted kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// The row carries no cell under this column key.
    #[error("row has no '{column}' cell")]
    NoCell { column: String },

    /// The cell holds another kind of value.
    #[error("cell '{column}' holds {found}, expected {wanted}")]
    WrongKind {
        column: String,
        wanted: &'static str,
        found: &'static str,
    },
}

impl FieldError {
    pub(crate) fn no_cell(column: &str) -> Self {
        Self::NoCell {
            column: column.to_string(),
        }
    }

    pub(crate) fn wrong_kind(column: &str, wanted: &'static str, found: &Value) -> Self {
        Self::WrongKind {
            column: column.to_string(),
            wanted,
            found: found.type_name(),
        }
    }
}
