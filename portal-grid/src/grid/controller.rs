//! Command handle for actions triggered outside the grid's own controls.

use super::{Grid, SaveOutcome};
use crate::error::CommandError;
use crate::model::RowId;

/// The subset of [`Grid`] a host toolbar needs: add a row, save everything,
/// reload.
///
/// Cloneable and cheap; every clone drives the same grid.
#[derive(Debug, Clone)]
pub struct GridController {
    grid: Grid,
}

impl GridController {
    pub(super) fn new(grid: Grid) -> Self {
        Self { grid }
    }

    /// Stage a new row with the grid's defaults.
    pub fn add_row(&self) -> RowId {
        self.grid.add_row()
    }

    /// Save all staged rows and pending edits.
    pub async fn save_all(&self) -> Result<SaveOutcome, CommandError> {
        self.grid.save_all().await
    }

    /// Reload rows from the host.
    pub async fn refresh(&self) -> Result<usize, CommandError> {
        self.grid.refresh().await
    }

    /// Whether the save action should be enabled.
    pub fn can_save(&self) -> bool {
        self.grid.can_save()
    }

    /// Check if a save, delete or refresh is in flight.
    pub fn is_busy(&self) -> bool {
        self.grid.is_submitting() || self.grid.is_loading()
    }
}
