//! Tabular data engine for the admin portal screens.
//!
//! Two grids share one column model:
//! - the editable [`Grid`], which stages new rows, tracks in-place edits,
//!   validates against a schema, cascades dependent fields and sends a
//!   batched diff to the host
//! - the read-oriented [`view::TableView`], which searches, filters, sorts
//!   and paginates any row set, usually the editable grid's effective rows
//!
//! Screens plug in by supplying columns, a [`host::GridHost`] and optionally
//! a validation schema and a field-change cascade.

pub mod auto_refresh;
pub mod cascade;
pub mod column;
pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod resize;
pub mod store;
pub mod validation;
pub mod view;

mod grid;

pub use config::GridConfig;
pub use grid::{Grid, GridBuilder, GridController, SaveOutcome};

pub mod prelude {
    pub use crate::auto_refresh::AutoRefresh;
    pub use crate::cascade::{FieldChange, reset_on_change};
    pub use crate::column::{Column, ColumnType, SelectOption};
    pub use crate::config::GridConfig;
    pub use crate::error::{CommandError, GridError, HostError};
    pub use crate::grid::{Grid, GridController, SaveOutcome};
    pub use crate::host::{GridHost, RowUpdate, SaveDiff};
    pub use crate::model::{Row, RowId, Value};
    pub use crate::resize::ColumnResizer;
    pub use crate::store::EffectiveRow;
    pub use crate::validation::{FieldRule, ValidationErrors, ValidationSchema};
    pub use crate::view::{ColumnFilter, SortDirection, TableView};
}
