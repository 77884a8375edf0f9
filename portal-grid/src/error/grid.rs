//! Errors for row-level operations on a grid

use crate::model::RowId;

/// Misuse of a row operation: the row or column is not in a state that
/// allows the requested change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// No base or staged row has this identity.
    #[error("Row '{0}' not found")]
    RowNotFound(RowId),

    /// The row is displayed read-only; toggle edit mode first.
    #[error("Row '{0}' is not in edit mode")]
    NotEditing(RowId),

    /// The column is marked read-only.
    #[error("Column '{0}' is read-only")]
    ReadOnlyColumn(String),

    /// The column key is not part of the column model.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// Staged rows are only persisted through a bulk save.
    #[error("Row '{0}' has not been saved yet; use save_all")]
    StagedRow(RowId),

    /// The host did not provide a delete callback.
    #[error("Deleting rows is not supported by this grid")]
    DeleteUnsupported,

    /// The host did not provide a fetch callback.
    #[error("Refreshing rows is not supported by this grid")]
    RefreshUnsupported,
}
