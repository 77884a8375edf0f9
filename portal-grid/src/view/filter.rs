//! Global search and per-column filters.

use std::collections::BTreeMap;

use crate::column::{Column, ColumnType, find_column, option_matches};
use crate::model::{Value, parse_number};

use super::ViewRow;

/// Filter applied to one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Case-insensitive substring for text columns; exact match for selects.
    Text(String),
    /// Inclusive bounds, compared numerically when both sides are numbers
    /// and lexicographically otherwise.
    Range {
        min: Option<String>,
        max: Option<String>,
    },
}

impl ColumnFilter {
    /// Create a text filter.
    pub fn text(term: impl Into<String>) -> Self {
        Self::Text(term.into())
    }

    /// Create a range filter.
    pub fn range(min: Option<&str>, max: Option<&str>) -> Self {
        Self::Range {
            min: min.map(str::to_string),
            max: max.map(str::to_string),
        }
    }

    /// Blank terms and bounds do not filter anything.
    pub fn is_active(&self) -> bool {
        match self {
            Self::Text(term) => !term.trim().is_empty(),
            Self::Range { min, max } => non_blank(min).is_some() || non_blank(max).is_some(),
        }
    }

    /// Check whether a cell value passes this filter.
    pub fn matches(&self, column: Option<&Column>, value: &Value) -> bool {
        match self {
            Self::Text(term) => {
                let term = term.trim();
                if term.is_empty() {
                    return true;
                }
                let is_select = column.is_some_and(|c| c.kind == ColumnType::Select);
                if is_select {
                    option_matches(&Value::from(term), value)
                } else {
                    contains_ci(&value.to_string(), &term.to_lowercase())
                }
            }
            Self::Range { min, max } => {
                let above = non_blank(min).is_none_or(|b| compare_bound(value, b).is_ge());
                let below = non_blank(max).is_none_or(|b| compare_bound(value, b).is_le());
                above && below
            }
        }
    }
}

fn non_blank(bound: &Option<String>) -> Option<&str> {
    bound.as_deref().map(str::trim).filter(|b| !b.is_empty())
}

fn compare_bound(value: &Value, bound: &str) -> std::cmp::Ordering {
    match (value.as_f64(), parse_number(bound)) {
        (Some(v), Some(b)) => v.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal),
        _ => value.to_string().as_str().cmp(bound),
    }
}

/// `needle` must already be lowercase.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Search term plus per-column filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Global search term.
    pub search: String,
    /// Column key to filter.
    pub columns: BTreeMap<String, ColumnFilter>,
}

impl FilterState {
    /// Check if neither search nor any column filter is active.
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && !self.columns.values().any(ColumnFilter::is_active)
    }

    /// Check a row against the search and every active column filter.
    pub fn matches<R: ViewRow>(&self, columns: &[Column], row: &R) -> bool {
        self.matches_search(columns, row) && self.matches_columns(columns, row)
    }

    /// A row matches the search if any searchable column contains the term.
    fn matches_search<R: ViewRow>(&self, columns: &[Column], row: &R) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        columns
            .iter()
            .filter(|c| c.searchable)
            .any(|c| contains_ci(&row.cell(&c.key).to_string(), &term))
    }

    fn matches_columns<R: ViewRow>(&self, columns: &[Column], row: &R) -> bool {
        self.columns
            .iter()
            .filter(|(_, filter)| filter.is_active())
            .all(|(key, filter)| filter.matches(find_column(columns, key), row.cell(key)))
    }
}
