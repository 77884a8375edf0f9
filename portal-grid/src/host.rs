//! The boundary between the grid and the screen that hosts it.

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::error::HostError;
use crate::model::{Row, Value};

/// Changes to an existing row: its id plus only the edited fields.
///
/// Serializes flat, as `{"id": 7, "name": "Ada"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowUpdate {
    /// Original id-field value of the row.
    pub id: Value,
    /// Edited fields.
    #[serde(flatten)]
    pub changes: Row,
}

/// Payload handed to [`GridHost::save`].
///
/// `new` rows carry no identity; the host assigns one on insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveDiff {
    pub new: Vec<Row>,
    pub updated: Vec<RowUpdate>,
}

impl SaveDiff {
    /// Check if the diff carries no changes.
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.updated.is_empty()
    }
}

/// Persistence callbacks supplied by a host screen.
///
/// Only [`save`](GridHost::save) is mandatory. A host that leaves
/// [`supports_delete`](GridHost::supports_delete) at `false` gets no delete
/// affordance; one that leaves [`supports_fetch`](GridHost::supports_fetch)
/// at `false` pushes fresh rows through
/// [`Grid::set_data`](crate::Grid::set_data) itself.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use portal_grid::error::HostError;
/// use portal_grid::host::{GridHost, SaveDiff};
///
/// struct LoggingHost;
///
/// #[async_trait]
/// impl GridHost for LoggingHost {
///     async fn save(&self, diff: SaveDiff) -> Result<(), HostError> {
///         println!("{}", serde_json::to_string(&diff)?);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait GridHost: Send + Sync {
    /// Persist staged rows and row edits.
    async fn save(&self, diff: SaveDiff) -> Result<(), HostError>;

    /// Whether [`delete`](GridHost::delete) is implemented.
    fn supports_delete(&self) -> bool {
        false
    }

    /// Delete a persisted row by its id-field value.
    async fn delete(&self, _id: &Value) -> Result<(), HostError> {
        Err(HostError::new("delete is not supported"))
    }

    /// Whether [`fetch`](GridHost::fetch) is implemented.
    fn supports_fetch(&self) -> bool {
        false
    }

    /// Load the current rows.
    async fn fetch(&self) -> Result<Vec<Row>, HostError> {
        Err(HostError::new("fetch is not supported"))
    }
}
