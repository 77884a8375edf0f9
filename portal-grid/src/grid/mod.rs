//! The editable grid engine.
//!
//! [`Grid`] owns the row state of one grid instance and coordinates saves,
//! deletes and refreshes with the [`GridHost`]. It is a cheap handle: clones
//! share the same state, so the host can keep one for rendering and hand a
//! [`GridController`] to whatever toolbar triggers "add" or "save".

mod commands;
mod controller;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use commands::SaveOutcome;
pub use controller::GridController;

use crate::cascade::{CascadeFn, FieldChange};
use crate::column::{Column, SelectOption, find_column};
use crate::config::GridConfig;
use crate::error::GridError;
use crate::host::GridHost;
use crate::model::{Row, RowId, Value};
use crate::store::{EffectiveRow, RowStore, SaveBatch, StagedRow};
use crate::validation::{FieldErrors, ValidationErrors, ValidationSchema, Validator};

/// Internal state behind the lock.
pub(crate) struct GridInner {
    columns: Arc<[Column]>,
    schema: ValidationSchema,
    store: RowStore,
    cascade: Option<CascadeFn>,
    new_row_defaults: Row,
    banner: Option<String>,
    revision: u64,
}

impl GridInner {
    /// Validate every row of a batch, recording the outcome per row.
    ///
    /// Returns only the failing rows.
    fn validate_batch(&mut self, batch: &SaveBatch) -> ValidationErrors {
        let validator = Validator::new(&self.columns, &self.schema);
        let rows = batch
            .staged
            .iter()
            .map(|s| (&s.id, &s.values))
            .chain(batch.updated.iter().map(|u| (&u.id, &u.row)));

        let mut failed = ValidationErrors::new();
        for (id, row) in rows {
            let errors = validator.validate(row);
            self.store.errors_mut().set_row(id.clone(), errors.clone());
            failed.set_row(id.clone(), errors);
        }
        failed
    }
}

/// An inline-editable grid bound to a host.
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use portal_grid::host::GridHost;
/// use portal_grid::prelude::*;
///
/// # async fn demo(host: Arc<dyn GridHost>) -> Result<(), CommandError> {
/// let grid = Grid::builder(host)
///     .config(GridConfig::new("employee_id"))
///     .columns(vec![Column::new("name", "Name")])
///     .schema(ValidationSchema::new().field("name", FieldRule::new().required()))
///     .build();
///
/// let id = grid.add_row();
/// grid.update_field(&id, "name", "Ada")?;
/// grid.save_all().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Grid {
    inner: Arc<RwLock<GridInner>>,
    host: Arc<dyn GridHost>,
    config: Arc<GridConfig>,
    /// A save or delete is awaiting the host.
    submitting: Arc<AtomicBool>,
    /// A refresh is awaiting the host.
    loading: Arc<AtomicBool>,
    /// Cleared by `dispose`; late host responses are dropped once it is.
    alive: Arc<AtomicBool>,
    /// Dirty flag for re-render.
    dirty: Arc<AtomicBool>,
}

impl Grid {
    /// Start building a grid around a host.
    pub fn builder(host: Arc<dyn GridHost>) -> GridBuilder {
        GridBuilder::new(host)
    }

    /// Get a command handle for host-triggered actions.
    pub fn controller(&self) -> GridController {
        GridController::new(self.clone())
    }

    /// Get the configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, GridInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GridInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark one logical update: one revision, one re-render.
    fn touch(&self, inner: &mut GridInner) {
        inner.revision += 1;
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Columns, schema and data
    // -------------------------------------------------------------------------

    /// Get the current column list.
    pub fn columns(&self) -> Arc<[Column]> {
        Arc::clone(&self.read().columns)
    }

    /// Replace the column list as a whole.
    pub fn set_columns(&self, columns: Vec<Column>) {
        let mut inner = self.write();
        inner.columns = columns.into();
        self.touch(&mut inner);
    }

    /// Replace the validation schema. Existing errors stay until the next
    /// commit or save recomputes them.
    pub fn set_schema(&self, schema: ValidationSchema) {
        let mut inner = self.write();
        inner.schema = schema;
    }

    /// Install fresh rows from the host.
    pub fn set_data(&self, rows: Vec<Row>) {
        let mut inner = self.write();
        log::debug!("Grid received {} base row(s)", rows.len());
        inner.store.set_base(rows);
        self.touch(&mut inner);
    }

    // -------------------------------------------------------------------------
    // Row lifecycle
    // -------------------------------------------------------------------------

    /// Stage a new row seeded with the grid's new-row defaults.
    pub fn add_row(&self) -> RowId {
        let defaults = self.read().new_row_defaults.clone();
        self.add_row_with(defaults)
    }

    /// Stage a new row seeded with `defaults` over the column defaults.
    pub fn add_row_with(&self, defaults: Row) -> RowId {
        let mut inner = self.write();
        let columns = Arc::clone(&inner.columns);
        let id = inner.store.add_row(&columns, &defaults);
        self.touch(&mut inner);
        id
    }

    /// Change one cell and apply any cascaded updates with it.
    ///
    /// The primary field and every cascaded field land in the same revision.
    pub fn update_field(
        &self,
        id: &RowId,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<(), GridError> {
        let value = value.into();
        let mut inner = self.write();

        if !inner.columns.is_empty() {
            let column = find_column(&inner.columns, field)
                .ok_or_else(|| GridError::UnknownColumn(field.to_string()))?;
            if column.read_only {
                return Err(GridError::ReadOnlyColumn(field.to_string()));
            }
        }

        inner.store.update_field(id, field, value.clone())?;

        if let Some(cascade) = inner.cascade.clone()
            && let Some(row) = inner.store.effective_row(id)
        {
            let is_new = inner.store.is_staged(id);
            let change = FieldChange {
                row_id: id,
                field,
                value: &value,
                is_new,
                row: &row,
            };
            if let Some(updates) = cascade(&change).filter(|u| !u.is_empty()) {
                log::debug!(
                    "Field {field} on row {id} cascaded to {} field(s)",
                    updates.len()
                );
                for (key, cascaded) in updates.iter() {
                    inner.store.update_field(id, key, cascaded.clone())?;
                }
            }
        }

        self.touch(&mut inner);
        Ok(())
    }

    /// Flip edit mode of an existing row; leaving it discards pending edits.
    pub fn toggle_edit(&self, id: &RowId) -> Result<bool, GridError> {
        let mut inner = self.write();
        let editing = inner.store.toggle_edit(id)?;
        self.touch(&mut inner);
        Ok(editing)
    }

    /// Discard a staged row.
    pub fn remove_staged(&self, id: &RowId) -> Result<(), GridError> {
        let mut inner = self.write();
        inner.store.remove_staged(id)?;
        log::debug!("Discarded staged row {id}");
        self.touch(&mut inner);
        Ok(())
    }

    /// Forget a base row locally, after an external delete.
    pub fn remove_base(&self, id: &RowId) -> Result<(), GridError> {
        let mut inner = self.write();
        inner.store.remove_base(id)?;
        self.touch(&mut inner);
        Ok(())
    }

    /// Validate a single row now and record the result.
    ///
    /// This is the commit-time check; editing a field only clears errors.
    pub fn validate_row(&self, id: &RowId) -> Result<FieldErrors, GridError> {
        let mut inner = self.write();
        let row = inner
            .store
            .effective_row(id)
            .ok_or_else(|| GridError::RowNotFound(id.clone()))?;
        let errors = Validator::new(&inner.columns, &inner.schema).validate(&row);
        inner.store.errors_mut().set_row(id.clone(), errors.clone());
        self.touch(&mut inner);
        Ok(errors)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Base rows with pending edits applied, then staged rows.
    pub fn effective_rows(&self) -> Vec<EffectiveRow> {
        self.read().store.effective_rows()
    }

    /// Effective values of one row.
    pub fn effective_row(&self, id: &RowId) -> Option<Row> {
        self.read().store.effective_row(id)
    }

    /// Host rows as last supplied.
    pub fn base_rows(&self) -> Vec<Row> {
        self.read().store.base_rows().to_vec()
    }

    /// Staged rows in creation order.
    pub fn staged_rows(&self) -> Vec<StagedRow> {
        self.read().store.staged_rows().to_vec()
    }

    /// Pending edit of an existing row.
    pub fn pending_edit(&self, id: &RowId) -> Option<Row> {
        self.read().store.pending_edit(id).cloned()
    }

    /// Check whether a row renders editors.
    pub fn is_editing(&self, id: &RowId) -> bool {
        self.read().store.is_editing(id)
    }

    /// Check if a bulk save would send anything.
    pub fn has_changes(&self) -> bool {
        self.read().store.has_changes()
    }

    /// All current validation errors.
    pub fn errors(&self) -> ValidationErrors {
        self.read().store.errors().clone()
    }

    /// Error message for one cell.
    pub fn error(&self, id: &RowId, field: &str) -> Option<String> {
        self.read()
            .store
            .errors()
            .get(id, field)
            .map(str::to_string)
    }

    /// Options of a select column, resolved against the row's effective values.
    pub fn options_for(&self, id: &RowId, key: &str) -> Vec<SelectOption> {
        let inner = self.read();
        let Some(column) = find_column(&inner.columns, key) else {
            return Vec::new();
        };
        inner
            .store
            .effective_row(id)
            .map(|row| column.options_for(&row))
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Banner, flags, lifecycle
    // -------------------------------------------------------------------------

    /// The host-call error banner, if one is showing.
    pub fn banner(&self) -> Option<String> {
        self.read().banner.clone()
    }

    /// Hide the error banner.
    pub fn dismiss_banner(&self) {
        let mut inner = self.write();
        if inner.banner.take().is_some() {
            self.touch(&mut inner);
        }
    }

    /// Check if a save or delete is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Check if a refresh is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Whether the save action should be enabled.
    pub fn can_save(&self) -> bool {
        !self.is_submitting() && !self.is_loading() && self.has_changes()
    }

    /// Whether the delete affordance should be offered and enabled.
    pub fn can_delete(&self) -> bool {
        self.host.supports_delete() && !self.is_submitting() && !self.is_loading()
    }

    /// Number of logical updates applied so far.
    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    /// Check if the grid changed since last check.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Tear the grid down. Outstanding host calls resolve into nothing.
    pub fn dispose(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            log::debug!("Grid disposed");
        }
    }

    /// Check whether the grid is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        f.debug_struct("Grid")
            .field("columns", &inner.columns.len())
            .field("store", &inner.store)
            .field("banner", &inner.banner)
            .field("revision", &inner.revision)
            .field("submitting", &self.is_submitting())
            .field("loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Grid`].
pub struct GridBuilder {
    host: Arc<dyn GridHost>,
    config: GridConfig,
    columns: Vec<Column>,
    schema: ValidationSchema,
    cascade: Option<CascadeFn>,
    new_row_defaults: Row,
    data: Vec<Row>,
}

impl GridBuilder {
    fn new(host: Arc<dyn GridHost>) -> Self {
        Self {
            host,
            config: GridConfig::default(),
            columns: Vec::new(),
            schema: ValidationSchema::new(),
            cascade: None,
            new_row_defaults: Row::new(),
            data: Vec::new(),
        }
    }

    /// Set the configuration.
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the column definitions.
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Set the validation schema.
    pub fn schema(mut self, schema: ValidationSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Install a dependent-field cascade.
    pub fn on_field_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldChange<'_>) -> Option<Row> + Send + Sync + 'static,
    {
        self.cascade = Some(Arc::new(f));
        self
    }

    /// Install a prebuilt cascade.
    pub fn cascade(mut self, cascade: CascadeFn) -> Self {
        self.cascade = Some(cascade);
        self
    }

    /// Set the values every staged row starts with.
    pub fn new_row_defaults(mut self, defaults: Row) -> Self {
        self.new_row_defaults = defaults;
        self
    }

    /// Set the initial rows.
    pub fn data(mut self, rows: Vec<Row>) -> Self {
        self.data = rows;
        self
    }

    /// Build the grid.
    pub fn build(self) -> Grid {
        let mut store = RowStore::new(
            self.config.id_field.clone(),
            self.config.new_row_prefix.clone(),
        );
        store.set_base(self.data);
        let inner = GridInner {
            columns: self.columns.into(),
            schema: self.schema,
            store,
            cascade: self.cascade,
            new_row_defaults: self.new_row_defaults,
            banner: None,
            revision: 0,
        };
        Grid {
            inner: Arc::new(RwLock::new(inner)),
            host: self.host,
            config: Arc::new(self.config),
            submitting: Arc::new(AtomicBool::new(false)),
            loading: Arc::new(AtomicBool::new(false)),
            alive: Arc::new(AtomicBool::new(true)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }
}
