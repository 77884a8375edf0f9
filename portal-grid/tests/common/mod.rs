//! Shared in-memory host for the grid tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use portal_grid::error::HostError;
use portal_grid::host::{GridHost, SaveDiff};
use portal_grid::model::{Row, Value};

/// Host backed by a vector of rows. Records every call it receives.
pub struct MemoryHost {
    id_field: String,
    rows: Mutex<Vec<Row>>,
    next_id: AtomicI64,
    saves: Mutex<Vec<SaveDiff>>,
    deletes: Mutex<Vec<Value>>,
    fetches: AtomicI64,
    fail_with: Mutex<Option<String>>,
    fetch_enabled: AtomicBool,
    delete_enabled: AtomicBool,
    /// Held by a test to keep host calls pending.
    pub gate: tokio::sync::Mutex<()>,
    /// Held by a test to park `fetch` after it has read the rows.
    pub fetch_gate: tokio::sync::Mutex<()>,
}

impl MemoryHost {
    pub fn new(id_field: &str, rows: Vec<Row>) -> Arc<Self> {
        let next_id = rows
            .iter()
            .filter_map(|r| r.get_int(id_field).ok().flatten())
            .max()
            .unwrap_or(0)
            + 1;
        Arc::new(Self {
            id_field: id_field.to_string(),
            rows: Mutex::new(rows),
            next_id: AtomicI64::new(next_id),
            saves: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            fetches: AtomicI64::new(0),
            fail_with: Mutex::new(None),
            fetch_enabled: AtomicBool::new(true),
            delete_enabled: AtomicBool::new(true),
            gate: tokio::sync::Mutex::new(()),
            fetch_gate: tokio::sync::Mutex::new(()),
        })
    }

    pub fn rows(&self) -> Vec<Row> {
        self.rows.lock().unwrap().clone()
    }

    pub fn saves(&self) -> Vec<SaveDiff> {
        self.saves.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn deletes(&self) -> Vec<Value> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> i64 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Make every following call fail with `message` until cleared.
    pub fn fail(&self, message: Option<&str>) {
        *self.fail_with.lock().unwrap() = message.map(str::to_string);
    }

    pub fn set_fetch_enabled(&self, enabled: bool) {
        self.fetch_enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn set_delete_enabled(&self, enabled: bool) {
        self.delete_enabled.store(enabled, Ordering::SeqCst);
    }

    fn failure(&self) -> Option<HostError> {
        self.fail_with.lock().unwrap().clone().map(HostError::new)
    }
}

#[async_trait]
impl GridHost for MemoryHost {
    async fn save(&self, diff: SaveDiff) -> Result<(), HostError> {
        let _open = self.gate.lock().await;
        self.saves.lock().unwrap().push(diff.clone());
        if let Some(err) = self.failure() {
            return Err(err);
        }
        let mut rows = self.rows.lock().unwrap();
        for new in diff.new {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            rows.push(new.set(self.id_field.as_str(), id));
        }
        for update in diff.updated {
            if let Some(row) = rows
                .iter_mut()
                .find(|r| r.value(&self.id_field) == &update.id)
            {
                *row = row.merged(&update.changes);
            }
        }
        Ok(())
    }

    fn supports_delete(&self) -> bool {
        self.delete_enabled.load(Ordering::SeqCst)
    }

    async fn delete(&self, id: &Value) -> Result<(), HostError> {
        let _open = self.gate.lock().await;
        self.deletes.lock().unwrap().push(id.clone());
        if let Some(err) = self.failure() {
            return Err(err);
        }
        self.rows
            .lock()
            .unwrap()
            .retain(|r| r.value(&self.id_field) != id);
        Ok(())
    }

    fn supports_fetch(&self) -> bool {
        self.fetch_enabled.load(Ordering::SeqCst)
    }

    async fn fetch(&self) -> Result<Vec<Row>, HostError> {
        let open = self.gate.lock().await;
        let snapshot = self.rows();
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failure() {
            return Err(err);
        }
        drop(open);
        let _parked = self.fetch_gate.lock().await;
        Ok(snapshot)
    }
}

/// `[{id: 1, name: "A"}, {id: 2, name: "B"}]`
pub fn two_rows() -> Vec<Row> {
    vec![
        Row::new().set("id", 1).set("name", "A"),
        Row::new().set("id", 2).set("name", "B"),
    ]
}

/// Wait until a spawned command has reached the host.
pub async fn until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}
