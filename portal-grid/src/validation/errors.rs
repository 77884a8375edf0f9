//! Per-row, per-field validation messages.

use std::collections::BTreeMap;

use crate::model::RowId;

/// Field key to message for a single row.
pub type FieldErrors = BTreeMap<String, String>;

/// Row identity to field errors.
///
/// Entries are written in bulk when a commit or save validates, and removed
/// one field at a time as the user edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    rows: BTreeMap<RowId, FieldErrors>,
}

impl ValidationErrors {
    /// Create an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no row has errors.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows with at least one error.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Errors for one row, if any.
    pub fn row(&self, id: &RowId) -> Option<&FieldErrors> {
        self.rows.get(id)
    }

    /// Error message for a single cell.
    pub fn get(&self, id: &RowId, field: &str) -> Option<&str> {
        self.rows
            .get(id)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }

    /// Replace the errors of one row. An empty map clears the row.
    pub fn set_row(&mut self, id: RowId, errors: FieldErrors) {
        if errors.is_empty() {
            self.rows.remove(&id);
        } else {
            self.rows.insert(id, errors);
        }
    }

    /// Remove a single cell's error. Returns `true` if one was present.
    pub fn clear_field(&mut self, id: &RowId, field: &str) -> bool {
        let Some(fields) = self.rows.get_mut(id) else {
            return false;
        };
        let removed = fields.remove(field).is_some();
        if fields.is_empty() {
            self.rows.remove(id);
        }
        removed
    }

    /// Remove every error of a row.
    pub fn clear_row(&mut self, id: &RowId) {
        self.rows.remove(id);
    }

    /// Merge another error map into this one, replacing rows present in both.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.rows.extend(other.rows);
    }

    /// Iterate over rows with errors.
    pub fn iter(&self) -> impl Iterator<Item = (&RowId, &FieldErrors)> {
        self.rows.iter()
    }

    /// Keep only rows for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&RowId) -> bool) {
        self.rows.retain(|id, _| keep(id));
    }
}
