//! Row lifecycle state behind the editable grid.
//!
//! The store keeps the host's base rows untouched and layers two kinds of
//! local change on top of them:
//! - staged rows, created by [`RowStore::add_row`] and owned here until they
//!   are saved or discarded
//! - pending edits, per existing row, recorded while that row is in edit mode
//!
//! [`RowStore::effective_rows`] merges everything into the row set that
//! rendering and filtering consume.

mod staged;

use std::collections::{HashMap, HashSet};

pub use staged::StagedRow;

use crate::column::Column;
use crate::error::GridError;
use crate::model::{Row, RowId, Value};
use crate::validation::ValidationErrors;

/// A row as displayed: base values with pending edits applied, or a staged row.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveRow {
    /// Row identity.
    pub id: RowId,
    /// Merged cell values.
    pub values: Row,
    /// `true` for staged rows.
    pub is_new: bool,
    /// `true` if the row renders editors (always for staged rows).
    pub editing: bool,
}

/// An existing row's share of a save: which fields go out and what they were.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingUpdate {
    pub id: RowId,
    /// Original id-field value, echoed back to the host.
    pub key: Value,
    /// Pending fields as sent.
    pub changes: Row,
    /// Effective row, for validation.
    pub row: Row,
}

/// Snapshot of the local changes taking part in one save.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SaveBatch {
    pub staged: Vec<StagedRow>,
    pub updated: Vec<PendingUpdate>,
}

impl SaveBatch {
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty() && self.updated.is_empty()
    }
}

/// Base rows, staged rows, pending edits, edit modes and validation errors.
#[derive(Debug, Clone)]
pub struct RowStore {
    id_field: String,
    new_row_prefix: String,
    base: Vec<Row>,
    staged: Vec<StagedRow>,
    pending: HashMap<RowId, Row>,
    editing: HashSet<RowId>,
    errors: ValidationErrors,
}

impl RowStore {
    /// Create an empty store for rows identified by `id_field`.
    pub fn new(id_field: impl Into<String>, new_row_prefix: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            new_row_prefix: new_row_prefix.into(),
            base: Vec::new(),
            staged: Vec::new(),
            pending: HashMap::new(),
            editing: HashSet::new(),
            errors: ValidationErrors::new(),
        }
    }

    /// Name of the identity field.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    // -------------------------------------------------------------------------
    // Base rows
    // -------------------------------------------------------------------------

    /// Replace the base rows with a fresh copy from the host.
    ///
    /// Pending edits, edit modes and errors survive for rows that still
    /// exist; state for vanished rows is dropped. Staged rows are kept.
    pub fn set_base(&mut self, rows: Vec<Row>) {
        self.base = rows;
        let known: HashSet<RowId> = self
            .base
            .iter()
            .map(|row| self.base_id(row))
            .chain(self.staged.iter().map(|s| s.id.clone()))
            .collect();
        self.pending.retain(|id, _| known.contains(id));
        self.editing.retain(|id| known.contains(id));
        self.errors.retain(|id| known.contains(id));
    }

    /// Host rows as last supplied.
    pub fn base_rows(&self) -> &[Row] {
        &self.base
    }

    /// Identity of a host row.
    pub fn base_id(&self, row: &Row) -> RowId {
        RowId::from_value(row.value(&self.id_field))
    }

    fn find_base(&self, id: &RowId) -> Option<&Row> {
        self.base.iter().find(|row| &self.base_id(row) == id)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Staged rows in creation order.
    pub fn staged_rows(&self) -> &[StagedRow] {
        &self.staged
    }

    /// Check if `id` is a staged row.
    pub fn is_staged(&self, id: &RowId) -> bool {
        self.staged.iter().any(|s| &s.id == id)
    }

    /// Check if `id` names a base or staged row.
    pub fn contains(&self, id: &RowId) -> bool {
        self.is_staged(id) || self.find_base(id).is_some()
    }

    /// Pending edit of an existing row.
    pub fn pending_edit(&self, id: &RowId) -> Option<&Row> {
        self.pending.get(id)
    }

    /// Number of existing rows with pending edits.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check whether a row renders editors.
    pub fn is_editing(&self, id: &RowId) -> bool {
        self.editing.contains(id) || self.is_staged(id)
    }

    /// Check if there is anything a bulk save would send.
    pub fn has_changes(&self) -> bool {
        !self.staged.is_empty() || !self.pending.is_empty()
    }

    /// Current validation errors.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub(crate) fn errors_mut(&mut self) -> &mut ValidationErrors {
        &mut self.errors
    }

    /// Base rows with pending edits applied, followed by every staged row.
    pub fn effective_rows(&self) -> Vec<EffectiveRow> {
        let base = self.base.iter().map(|row| {
            let id = self.base_id(row);
            let values = match self.pending.get(&id) {
                Some(edit) => row.merged(edit),
                None => row.clone(),
            };
            let editing = self.editing.contains(&id);
            EffectiveRow {
                id,
                values,
                is_new: false,
                editing,
            }
        });
        let staged = self.staged.iter().map(|s| EffectiveRow {
            id: s.id.clone(),
            values: s.values.clone(),
            is_new: true,
            editing: true,
        });
        base.chain(staged).collect()
    }

    /// Effective values of a single row.
    pub fn effective_row(&self, id: &RowId) -> Option<Row> {
        if let Some(staged) = self.staged.iter().find(|s| &s.id == id) {
            return Some(staged.values.clone());
        }
        let base = self.find_base(id)?;
        Some(match self.pending.get(id) {
            Some(edit) => base.merged(edit),
            None => base.clone(),
        })
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Append a staged row seeded with `defaults` over column defaults.
    ///
    /// No validation happens here; an empty required field is fine until save.
    pub fn add_row(&mut self, columns: &[Column], defaults: &Row) -> RowId {
        let mut values: Row = columns
            .iter()
            .filter(|c| c.key != self.id_field)
            .map(|c| (c.key.clone(), c.default_value.clone().unwrap_or_default()))
            .collect();
        for (key, value) in defaults.iter() {
            values.insert(key.clone(), value.clone());
        }
        values.remove(&self.id_field);

        let id = staged::generate_id(&self.new_row_prefix, |candidate| self.contains(candidate));
        log::debug!("Staged new row {id}");
        self.staged.push(StagedRow {
            id: id.clone(),
            values,
        });
        id
    }

    /// Write a field value and clear that field's validation error.
    ///
    /// Staged rows change in place; existing rows must be in edit mode and
    /// record the value as a pending edit.
    pub fn update_field(
        &mut self,
        id: &RowId,
        field: &str,
        value: Value,
    ) -> Result<(), GridError> {
        if let Some(staged) = self.staged.iter_mut().find(|s| &s.id == id) {
            staged.values.insert(field, value);
        } else if self.find_base(id).is_some() {
            if !self.editing.contains(id) {
                return Err(GridError::NotEditing(id.clone()));
            }
            self.pending
                .entry(id.clone())
                .or_default()
                .insert(field, value);
        } else {
            return Err(GridError::RowNotFound(id.clone()));
        }
        self.errors.clear_field(id, field);
        Ok(())
    }

    /// Flip edit mode of an existing row and return the new mode.
    ///
    /// Leaving edit mode discards the row's pending edit and errors.
    /// Staged rows are always editable, so toggling them is a no-op.
    pub fn toggle_edit(&mut self, id: &RowId) -> Result<bool, GridError> {
        if self.is_staged(id) {
            return Ok(true);
        }
        if self.find_base(id).is_none() {
            return Err(GridError::RowNotFound(id.clone()));
        }
        if self.editing.remove(id) {
            self.pending.remove(id);
            self.errors.clear_row(id);
            log::debug!("Row {id} left edit mode, pending edit discarded");
            Ok(false)
        } else {
            self.editing.insert(id.clone());
            log::debug!("Row {id} entered edit mode");
            Ok(true)
        }
    }

    /// Drop a staged row (cancel).
    pub fn remove_staged(&mut self, id: &RowId) -> Result<StagedRow, GridError> {
        let index = self
            .staged
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| GridError::RowNotFound(id.clone()))?;
        self.errors.clear_row(id);
        Ok(self.staged.remove(index))
    }

    /// Forget a base row after the host confirmed its deletion.
    pub fn remove_base(&mut self, id: &RowId) -> Result<Row, GridError> {
        let index = self
            .base
            .iter()
            .position(|row| &self.base_id(row) == id)
            .ok_or_else(|| GridError::RowNotFound(id.clone()))?;
        self.pending.remove(id);
        self.editing.remove(id);
        self.errors.clear_row(id);
        Ok(self.base.remove(index))
    }

    // -------------------------------------------------------------------------
    // Save support
    // -------------------------------------------------------------------------

    /// Every staged row and every row with a pending edit.
    pub(crate) fn pending_batch(&self) -> SaveBatch {
        let updated = self
            .base
            .iter()
            .filter_map(|row| {
                let id = self.base_id(row);
                let changes = self.pending.get(&id)?;
                Some(PendingUpdate {
                    key: row.value(&self.id_field).clone(),
                    changes: changes.clone(),
                    row: row.merged(changes),
                    id,
                })
            })
            .collect();
        SaveBatch {
            staged: self.staged.clone(),
            updated,
        }
    }

    /// One existing row, with whatever it has pending (possibly nothing).
    pub(crate) fn row_batch(&self, id: &RowId) -> Result<SaveBatch, GridError> {
        if self.is_staged(id) {
            return Err(GridError::StagedRow(id.clone()));
        }
        let base = self
            .find_base(id)
            .ok_or_else(|| GridError::RowNotFound(id.clone()))?;
        if !self.editing.contains(id) {
            return Err(GridError::NotEditing(id.clone()));
        }
        let changes = self.pending.get(id).cloned().unwrap_or_default();
        Ok(SaveBatch {
            staged: Vec::new(),
            updated: vec![PendingUpdate {
                id: id.clone(),
                key: base.value(&self.id_field).clone(),
                row: base.merged(&changes),
                changes,
            }],
        })
    }

    /// Reconcile after the host accepted `batch`.
    ///
    /// Only what the batch carried is cleared: a pending field edited again
    /// while the save was in flight stays pending, and so does its row's
    /// edit mode.
    pub(crate) fn commit(&mut self, batch: &SaveBatch) {
        for staged in &batch.staged {
            self.staged.retain(|s| s.id != staged.id);
            self.errors.clear_row(&staged.id);
        }
        for update in &batch.updated {
            let drained = match self.pending.get_mut(&update.id) {
                Some(pending) => {
                    for (field, sent) in update.changes.iter() {
                        if pending.get(field) == Some(sent) {
                            pending.remove(field);
                        }
                    }
                    pending.is_empty()
                }
                None => true,
            };
            if drained {
                self.pending.remove(&update.id);
                self.editing.remove(&update.id);
                self.errors.clear_row(&update.id);
            }
        }
    }
}
