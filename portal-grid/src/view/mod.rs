//! Read-oriented grid: search, per-column filters, sorting and pagination.
//!
//! The pipeline always runs in the same order over the full row set:
//! search, column filters, sort, then the page slice. [`TableView`] keeps
//! the state and re-derives the visible window after every change.

mod filter;
mod pagination;
mod sort;
mod table;

pub use filter::{ColumnFilter, FilterState};
pub use pagination::{PageItem, Pagination, page_items};
pub use sort::{SortDirection, SortState};
pub use table::TableView;

use crate::column::Column;
use crate::model::{Row, Value};
use crate::store::EffectiveRow;

/// Anything the read grid can display: it only needs cell lookup by key.
pub trait ViewRow {
    /// Value of a cell; missing cells read as null.
    fn cell(&self, key: &str) -> &Value;
}

impl ViewRow for Row {
    fn cell(&self, key: &str) -> &Value {
        self.value(key)
    }
}

impl ViewRow for EffectiveRow {
    fn cell(&self, key: &str) -> &Value {
        self.values.value(key)
    }
}

/// Indices of `rows` that pass `filter`, in `sort` order.
///
/// With no search, no active filter and no sort key this is `0..rows.len()`.
pub fn derive_visible<R: ViewRow>(
    rows: &[R],
    columns: &[Column],
    filter: &FilterState,
    sort: &SortState,
) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..rows.len())
        .filter(|&i| filter.matches(columns, &rows[i]))
        .collect();
    sort.sort_indices(columns, rows, &mut indices);
    indices
}
