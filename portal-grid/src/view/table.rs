//! Read grid state.

use std::sync::Arc;

use crate::column::Column;
use crate::config::GridConfig;

use super::filter::{ColumnFilter, FilterState};
use super::pagination::{PageItem, Pagination, page_items};
use super::sort::{SortDirection, SortState};
use super::{ViewRow, derive_visible};

/// A searchable, filterable, sortable, paginated view over a row set.
///
/// Every setter re-runs the pipeline, so the page index is clamped to the
/// filtered page count as soon as the filtered count changes.
///
/// # Example
///
/// ```
/// use portal_grid::column::Column;
/// use portal_grid::model::Row;
/// use portal_grid::view::TableView;
///
/// let columns = vec![Column::new("name", "Name")];
/// let rows: Vec<Row> = (0..23).map(|i| Row::new().set("name", format!("row {i}"))).collect();
///
/// let mut view = TableView::new(columns, 10);
/// view.set_rows(rows);
/// assert_eq!(view.page_count(), 3);
/// view.set_page(5);
/// assert_eq!(view.page_index(), 2);
/// assert_eq!(view.page_rows().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TableView<R: ViewRow> {
    columns: Arc<[Column]>,
    rows: Vec<R>,
    filter: FilterState,
    sort: SortState,
    pagination: Pagination,
    max_page_buttons: usize,
    /// Filtered and sorted indices into `rows`.
    visible: Vec<usize>,
}

impl<R: ViewRow> TableView<R> {
    /// Create an empty view.
    pub fn new(columns: impl Into<Arc<[Column]>>, page_size: usize) -> Self {
        Self {
            columns: columns.into(),
            rows: Vec::new(),
            filter: FilterState::default(),
            sort: SortState::default(),
            pagination: Pagination::new(page_size),
            max_page_buttons: GridConfig::default().max_page_buttons,
            visible: Vec::new(),
        }
    }

    /// Create an empty view sized by a grid config.
    pub fn with_config(columns: impl Into<Arc<[Column]>>, config: &GridConfig) -> Self {
        let mut view = Self::new(columns, config.page_size);
        view.max_page_buttons = config.max_page_buttons;
        view
    }

    fn recompute(&mut self) {
        self.visible = derive_visible(&self.rows, &self.columns, &self.filter, &self.sort);
        self.pagination.clamp(self.visible.len());
    }

    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------

    /// Replace the row set (e.g. the editable grid's effective rows).
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.recompute();
    }

    /// Replace the column list.
    pub fn set_columns(&mut self, columns: impl Into<Arc<[Column]>>) {
        self.columns = columns.into();
        self.recompute();
    }

    /// Get the column list.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get all rows, unfiltered.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    // -------------------------------------------------------------------------
    // Search and filters
    // -------------------------------------------------------------------------

    /// Set the global search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.search = term.into();
        self.recompute();
    }

    /// Set or replace one column's filter.
    pub fn set_filter(&mut self, key: impl Into<String>, filter: ColumnFilter) {
        self.filter.columns.insert(key.into(), filter);
        self.recompute();
    }

    /// Remove one column's filter.
    pub fn clear_filter(&mut self, key: &str) {
        if self.filter.columns.remove(key).is_some() {
            self.recompute();
        }
    }

    /// Remove the search term and every column filter.
    pub fn clear_filters(&mut self) {
        self.filter = FilterState::default();
        self.recompute();
    }

    /// Get the filter state.
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    // -------------------------------------------------------------------------
    // Sort
    // -------------------------------------------------------------------------

    /// Header click on a column. Unsortable columns are ignored.
    pub fn toggle_sort(&mut self, key: &str) {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.key == key && c.sortable);
        if sortable {
            self.sort.toggle(key);
            self.recompute();
        }
    }

    /// Sort by a column in a given direction.
    pub fn set_sort(&mut self, key: impl Into<String>, direction: SortDirection) {
        self.sort = SortState {
            key: Some(key.into()),
            direction,
        };
        self.recompute();
    }

    /// Return to input order.
    pub fn clear_sort(&mut self) {
        self.sort = SortState::default();
        self.recompute();
    }

    /// Get the sort state.
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Jump to a page; out-of-range indices clamp to the last page.
    pub fn set_page(&mut self, page_index: usize) {
        self.pagination.page_index = page_index;
        self.pagination.clamp(self.visible.len());
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination = Pagination::new(page_size);
    }

    /// Advance one page, if possible.
    pub fn next_page(&mut self) {
        self.set_page(self.pagination.page_index + 1);
    }

    /// Go back one page, if possible.
    pub fn prev_page(&mut self) {
        self.set_page(self.pagination.page_index.saturating_sub(1));
    }

    /// Zero-based current page.
    pub fn page_index(&self) -> usize {
        self.pagination.page_index
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.pagination.page_size
    }

    /// Number of rows passing search and filters.
    pub fn filtered_count(&self) -> usize {
        self.visible.len()
    }

    /// `ceil(filtered_count / page_size)`.
    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.visible.len())
    }

    /// Filtered, sorted rows (all pages).
    pub fn filtered_rows(&self) -> Vec<&R> {
        self.visible.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Rows of the current page.
    pub fn page_rows(&self) -> Vec<&R> {
        let range = self.pagination.range(self.visible.len());
        self.visible[range].iter().map(|&i| &self.rows[i]).collect()
    }

    /// Page-number strip for the pager.
    pub fn page_items(&self) -> Vec<PageItem> {
        page_items(self.page_index(), self.page_count(), self.max_page_buttons)
    }

    /// "11–20 of 23", or "0 of 0" when nothing matches.
    pub fn range_label(&self) -> String {
        let total = self.visible.len();
        let range = self.pagination.range(total);
        if range.is_empty() {
            return format!("0 of {total}");
        }
        format!("{}–{} of {total}", range.start + 1, range.end)
    }
}
