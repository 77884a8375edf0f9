//! Dependent-field cascades.
//!
//! A cascade reacts to one field change by returning more field updates for
//! the same row, e.g. clearing `team_id` whenever `branch_id` changes. The
//! grid applies the triggering change and every cascaded field inside one
//! write, so no reader ever sees the new parent next to a stale child.

use std::sync::Arc;

use crate::model::{Row, RowId, Value};

/// Context handed to a cascade after the primary change was applied.
#[derive(Debug, Clone, Copy)]
pub struct FieldChange<'a> {
    /// Row being edited.
    pub row_id: &'a RowId,
    /// Field the user changed.
    pub field: &'a str,
    /// New value of that field.
    pub value: &'a Value,
    /// Whether the row is staged.
    pub is_new: bool,
    /// Effective row, already including the new value.
    pub row: &'a Row,
}

/// Returns extra field updates for a change, or `None` for no cascade.
///
/// Runs while the grid holds its write lock: it must not call back into the grid.
pub type CascadeFn = Arc<dyn Fn(&FieldChange<'_>) -> Option<Row> + Send + Sync>;

/// Build a cascade that resets `dependents` whenever `parent` changes.
///
/// # Example
///
/// ```
/// use portal_grid::cascade::reset_on_change;
///
/// let cascade = reset_on_change("branch_id", &["team_id"]);
/// # let _ = cascade;
/// ```
pub fn reset_on_change(parent: impl Into<String>, dependents: &[&str]) -> CascadeFn {
    let parent = parent.into();
    let dependents: Vec<String> = dependents.iter().map(|d| d.to_string()).collect();
    Arc::new(move |change: &FieldChange<'_>| {
        if change.field != parent {
            return None;
        }
        Some(
            dependents
                .iter()
                .map(|d| (d.clone(), Value::from("")))
                .collect(),
        )
    })
}
