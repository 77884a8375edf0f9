//! Save, delete and refresh: the grid's only suspension points.
//!
//! Each command validates and snapshots under the lock, releases it, awaits
//! the host, then re-checks liveness before touching state again.

use std::sync::atomic::{AtomicBool, Ordering};

use super::Grid;
use crate::error::{CommandError, GridError};
use crate::host::{RowUpdate, SaveDiff};
use crate::model::RowId;
use crate::store::SaveBatch;

/// Set while a command is in flight; a second acquire fails instead of queueing.
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    /// Claims `flag`, then backs off if `other` is already claimed.
    ///
    /// Both sides set their own flag before reading the other's, so two
    /// racing commands can both fail but never both proceed.
    fn acquire(flag: &'a AtomicBool, other: &AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        let guard = Self { flag };
        (!other.load(Ordering::SeqCst)).then_some(guard)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// What a successful save sent to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Staged rows sent as `new`.
    pub created: usize,
    /// Existing rows sent as `updated`.
    pub updated: usize,
}

impl SaveOutcome {
    /// Check if nothing was sent.
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.updated == 0
    }
}

impl Grid {
    /// Save every staged row and every pending edit in one host call.
    ///
    /// All rows are validated first; a single failure aborts the whole save
    /// without calling the host. A host failure leaves every staged row and
    /// pending edit untouched and shows the banner.
    pub async fn save_all(&self) -> Result<SaveOutcome, CommandError> {
        let outcome = {
            let _guard = self.begin_submit()?;
            let batch = {
                let mut inner = self.write();
                let batch = inner.store.pending_batch();
                if batch.is_empty() {
                    return Ok(SaveOutcome::default());
                }
                let failed = inner.validate_batch(&batch);
                if !failed.is_empty() {
                    log::debug!("Bulk save blocked: {} invalid row(s)", failed.row_count());
                    self.touch(&mut inner);
                    return Err(CommandError::Validation(failed));
                }
                batch
            };
            self.send(batch).await?
        };
        self.reload_after_write().await;
        Ok(outcome)
    }

    /// Save a single existing row that is in edit mode.
    ///
    /// On success the row's pending edit is cleared and it leaves edit mode.
    /// On any failure it stays in edit mode with its edits intact.
    pub async fn save_row(&self, id: &RowId) -> Result<SaveOutcome, CommandError> {
        let outcome = {
            let _guard = self.begin_submit()?;
            let batch = {
                let mut inner = self.write();
                let batch = inner.store.row_batch(id)?;
                let failed = inner.validate_batch(&batch);
                if !failed.is_empty() {
                    self.touch(&mut inner);
                    return Err(CommandError::Validation(failed));
                }
                if batch.updated.iter().all(|u| u.changes.is_empty()) {
                    // Nothing edited: just close the editors
                    inner.store.commit(&batch);
                    self.touch(&mut inner);
                    return Ok(SaveOutcome::default());
                }
                batch
            };
            self.send(batch).await?
        };
        self.reload_after_write().await;
        Ok(outcome)
    }

    /// Delete a row.
    ///
    /// Staged rows are discarded locally. Persisted rows go through the
    /// host and are forgotten once it confirms.
    pub async fn delete_row(&self, id: &RowId) -> Result<(), CommandError> {
        {
            let mut inner = self.write();
            if inner.store.is_staged(id) {
                inner.store.remove_staged(id)?;
                self.touch(&mut inner);
                return Ok(());
            }
        }
        if !self.host.supports_delete() {
            return Err(GridError::DeleteUnsupported.into());
        }

        let _guard = self.begin_submit()?;
        let key = {
            let inner = self.read();
            inner
                .store
                .base_rows()
                .iter()
                .find(|row| &inner.store.base_id(row) == id)
                .map(|row| row.value(inner.store.id_field()).clone())
                .ok_or_else(|| GridError::RowNotFound(id.clone()))?
        };

        let result = self.host.delete(&key).await;
        if !self.is_alive() {
            return Err(CommandError::Disposed);
        }

        let mut inner = self.write();
        match result {
            Ok(()) => {
                // A refresh may already have dropped the row
                let _ = inner.store.remove_base(id);
                inner.banner = None;
                self.touch(&mut inner);
                log::info!("Deleted row {id}");
                Ok(())
            }
            Err(err) => {
                log::warn!("Deleting row {id} failed: {err}");
                inner.banner = Some(err.message.clone());
                self.touch(&mut inner);
                Err(err.into())
            }
        }
    }

    /// Reload base rows from the host.
    ///
    /// Refreshes never overlap each other or a save/delete; an overlapping
    /// call returns [`CommandError::Busy`] instead of applying a result
    /// fetched before the write landed.
    pub async fn refresh(&self) -> Result<usize, CommandError> {
        if !self.host.supports_fetch() {
            return Err(GridError::RefreshUnsupported.into());
        }
        let _guard = InFlight::acquire(&self.loading, &self.submitting).ok_or_else(|| {
            log::debug!("Refresh rejected: another operation is in flight");
            CommandError::Busy
        })?;

        let result = self.host.fetch().await;
        if !self.is_alive() {
            return Err(CommandError::Disposed);
        }

        let mut inner = self.write();
        match result {
            Ok(rows) => {
                let count = rows.len();
                inner.store.set_base(rows);
                inner.banner = None;
                self.touch(&mut inner);
                log::info!("Refreshed {count} row(s)");
                Ok(count)
            }
            Err(err) => {
                log::warn!("Refresh failed: {err}");
                inner.banner = Some(err.message.clone());
                self.touch(&mut inner);
                Err(err.into())
            }
        }
    }

    fn begin_submit(&self) -> Result<InFlight<'_>, CommandError> {
        InFlight::acquire(&self.submitting, &self.loading).ok_or_else(|| {
            log::warn!("Save rejected: another operation is in flight");
            CommandError::Busy
        })
    }

    fn diff_for(&self, batch: &SaveBatch) -> SaveDiff {
        let id_field = &self.config.id_field;
        SaveDiff {
            new: batch
                .staged
                .iter()
                .map(|s| {
                    let mut row = s.values.clone();
                    row.remove(id_field);
                    row
                })
                .collect(),
            updated: batch
                .updated
                .iter()
                .filter(|u| !u.changes.is_empty())
                .map(|u| RowUpdate {
                    id: u.key.clone(),
                    changes: u.changes.clone(),
                })
                .collect(),
        }
    }

    /// Hand a validated batch to the host and reconcile.
    async fn send(&self, batch: SaveBatch) -> Result<SaveOutcome, CommandError> {
        let diff = self.diff_for(&batch);
        let outcome = SaveOutcome {
            created: diff.new.len(),
            updated: diff.updated.len(),
        };

        let result = self.host.save(diff).await;
        if !self.is_alive() {
            return Err(CommandError::Disposed);
        }

        let mut inner = self.write();
        match result {
            Ok(()) => {
                inner.store.commit(&batch);
                inner.banner = None;
                self.touch(&mut inner);
                log::info!(
                    "Saved {} new and {} updated row(s)",
                    outcome.created,
                    outcome.updated
                );
                Ok(outcome)
            }
            Err(err) => {
                log::warn!("Save failed: {err}");
                inner.banner = Some(err.message.clone());
                self.touch(&mut inner);
                Err(err.into())
            }
        }
    }

    /// Pull fresh rows after a write, when the host can serve them.
    async fn reload_after_write(&self) {
        if !self.host.supports_fetch() {
            return;
        }
        match self.refresh().await {
            Ok(_) => {}
            Err(CommandError::Busy) => log::debug!("Refresh already in flight, skipping"),
            Err(err) => log::debug!("Refresh after save did not apply: {err}"),
        }
    }
}
