//! Host backing the CLI grid: an in-memory table, optionally mirrored to a
//! JSON file.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::PoisonError;

use async_trait::async_trait;
use portal_grid::error::HostError;
use portal_grid::host::{GridHost, SaveDiff};
use portal_grid::model::{Row, Value};

pub struct TableHost {
    id_field: String,
    rows: Mutex<Vec<Row>>,
    path: Option<PathBuf>,
}

impl TableHost {
    /// Load rows from `path` when given, otherwise start from `seed`.
    pub fn open(
        id_field: &str,
        path: Option<PathBuf>,
        seed: Vec<Row>,
    ) -> Result<Self, HostError> {
        let rows = match &path {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(path)?;
                let rows: Vec<Row> = serde_json::from_str(&text)?;
                log::info!("Loaded {} row(s) from {}", rows.len(), path.display());
                rows
            }
            _ => seed,
        };
        Ok(Self {
            id_field: id_field.to_string(),
            rows: Mutex::new(rows),
            path,
        })
    }

    fn next_id(&self, rows: &[Row]) -> i64 {
        rows.iter()
            .filter_map(|r| match r.get_int(&self.id_field) {
                Ok(id) => id,
                Err(err) => {
                    log::warn!("Ignoring row while allocating an id: {err}");
                    None
                }
            })
            .max()
            .unwrap_or(0)
            + 1
    }

    fn persist(&self, rows: &[Row]) -> Result<(), HostError> {
        if let Some(path) = &self.path {
            std::fs::write(path, serde_json::to_string_pretty(rows)?)?;
            log::debug!("Wrote {} row(s) to {}", rows.len(), path.display());
        }
        Ok(())
    }
}

#[async_trait]
impl GridHost for TableHost {
    async fn save(&self, diff: SaveDiff) -> Result<(), HostError> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        for update in diff.updated {
            let row = rows
                .iter_mut()
                .find(|r| r.value(&self.id_field) == &update.id)
                .ok_or_else(|| HostError::new(format!("Row {} no longer exists", update.id)))?;
            *row = row.merged(&update.changes);
        }
        for new in diff.new {
            let id = self.next_id(&rows);
            rows.push(new.set(self.id_field.as_str(), id));
        }
        self.persist(&rows)
    }

    fn supports_delete(&self) -> bool {
        true
    }

    async fn delete(&self, id: &Value) -> Result<(), HostError> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        let before = rows.len();
        rows.retain(|r| r.value(&self.id_field) != id);
        if rows.len() == before {
            return Err(HostError::new(format!("Row {id} not found")));
        }
        self.persist(&rows)
    }

    fn supports_fetch(&self) -> bool {
        true
    }

    async fn fetch(&self) -> Result<Vec<Row>, HostError> {
        Ok(self
            .rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
