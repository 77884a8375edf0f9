//! Errors for the asynchronous grid commands (save, delete, refresh)

use super::GridError;
use super::HostError;
use crate::validation::ValidationErrors;

/// Why a save, delete or refresh did not go through.
///
/// Every variant leaves the grid interactive; the caller may retry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CommandError {
    /// Another save/delete (or refresh) is already in flight.
    #[error("Another operation is already in progress")]
    Busy,

    /// One or more rows failed validation; nothing was sent to the host.
    #[error("Validation failed for {} row(s)", .0.row_count())]
    Validation(ValidationErrors),

    /// The host callback rejected the operation.
    #[error("Host call failed: {0}")]
    Host(#[from] HostError),

    /// The grid was disposed while the host call was outstanding.
    #[error("Grid was disposed before the operation completed")]
    Disposed,

    /// The request itself was invalid for the current row state.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl CommandError {
    /// Returns the validation errors if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
