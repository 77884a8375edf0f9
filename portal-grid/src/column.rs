//! Column definitions shared by the editable and read grids.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::model::Row;
use crate::model::Value;

/// Value type of a column; drives the editor and the type-shape checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Select,
}

/// One entry of a select column's option list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    /// Stored value.
    pub value: Value,
    /// Text shown to the user.
    pub label: String,
}

impl SelectOption {
    /// Create an option from a value and its label.
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Produces the options of a row-dependent select column.
pub type OptionsFn = Arc<dyn Fn(&Row) -> Vec<SelectOption> + Send + Sync>;

/// Custom ordering for a sortable column.
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// Custom cell text for a column, given the cell value and its effective row.
pub type Formatter = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

/// Option list of a column: absent, fixed, or derived from the row.
///
/// Dynamic options are evaluated against the effective (merged) row so a
/// dependent selector always enumerates against the current parent value.
#[derive(Clone, Default)]
pub enum Options {
    #[default]
    None,
    Static(Vec<SelectOption>),
    Dynamic(OptionsFn),
}

impl Options {
    /// Resolve the options for a given effective row.
    pub fn resolve(&self, row: &Row) -> Vec<SelectOption> {
        match self {
            Options::None => Vec::new(),
            Options::Static(options) => options.clone(),
            Options::Dynamic(f) => f(row),
        }
    }

    /// Returns `true` if the column declares no options at all.
    pub fn is_none(&self) -> bool {
        matches!(self, Options::None)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Options::None => f.write_str("None"),
            Options::Static(options) => f.debug_tuple("Static").field(options).finish(),
            Options::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Column configuration.
///
/// Columns are immutable once handed to a grid; to change options or
/// labels, build a new column list and replace the whole set.
///
/// # Examples
///
/// ```
/// use portal_grid::column::{Column, ColumnType, SelectOption};
///
/// let columns = vec![
///     Column::new("name", "Name").width(200),
///     Column::new("salary", "Salary").kind(ColumnType::Number),
///     Column::new("team_id", "Team")
///         .select(vec![SelectOption::new(1, "Core"), SelectOption::new(2, "Ops")]),
/// ];
/// assert_eq!(columns[2].kind, ColumnType::Select);
/// ```
#[derive(Clone)]
pub struct Column {
    /// Field key in each row.
    pub key: String,
    /// Header text.
    pub label: String,
    /// Value type.
    pub kind: ColumnType,
    /// Options for select columns.
    pub options: Options,
    /// Whether the column rejects edits.
    pub read_only: bool,
    /// Seed value for staged rows.
    pub default_value: Option<Value>,
    /// Initial width in pixels; the grid default applies when unset.
    pub width: Option<u32>,
    /// Whether the global search looks at this column.
    pub searchable: bool,
    /// Whether header clicks sort by this column.
    pub sortable: bool,
    /// Custom ordering used when sorting by this column.
    pub comparator: Option<Comparator>,
    /// Custom display text.
    pub formatter: Option<Formatter>,
}

impl Column {
    /// Create a text column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: ColumnType::Text,
            options: Options::None,
            read_only: false,
            default_value: None,
            width: None,
            searchable: true,
            sortable: true,
            comparator: None,
            formatter: None,
        }
    }

    /// Set the value type.
    pub fn kind(mut self, kind: ColumnType) -> Self {
        self.kind = kind;
        self
    }

    /// Make this a select column with a fixed option list.
    pub fn select(mut self, options: Vec<SelectOption>) -> Self {
        self.kind = ColumnType::Select;
        self.options = Options::Static(options);
        self
    }

    /// Make this a select column whose options depend on the row.
    pub fn select_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Row) -> Vec<SelectOption> + Send + Sync + 'static,
    {
        self.kind = ColumnType::Select;
        self.options = Options::Dynamic(Arc::new(f));
        self
    }

    /// Mark the column read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Set the default value for staged rows.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the initial width in pixels.
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Exclude the column from the global search.
    pub fn not_searchable(mut self) -> Self {
        self.searchable = false;
        self
    }

    /// Disable sorting by this column.
    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Sort this column with a custom comparator.
    pub fn comparator<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(f));
        self
    }

    /// Render cells of this column with a custom formatter.
    pub fn formatter<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(f));
        self
    }

    /// Label used in messages; falls back to the key when blank.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.key
        } else {
            &self.label
        }
    }

    /// Resolve this column's options against an effective row.
    pub fn options_for(&self, row: &Row) -> Vec<SelectOption> {
        self.options.resolve(row)
    }

    /// Text displayed for this column's cell in `row`.
    ///
    /// A formatter wins; otherwise select values show their option label,
    /// and everything else shows the value's string cast.
    pub fn display_value(&self, row: &Row) -> String {
        let value = row.value(&self.key);
        if let Some(formatter) = &self.formatter {
            return formatter(value, row);
        }
        if self.kind == ColumnType::Select
            && let Some(option) = self
                .options_for(row)
                .into_iter()
                .find(|o| option_matches(&o.value, value))
        {
            return option.label;
        }
        value.to_string()
    }

    /// Compare two cell values, honouring the custom comparator.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match &self.comparator {
            Some(cmp) => cmp(a, b),
            None => a.compare(b),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("read_only", &self.read_only)
            .field("default_value", &self.default_value)
            .field("width", &self.width)
            .field("searchable", &self.searchable)
            .field("sortable", &self.sortable)
            .finish_non_exhaustive()
    }
}

/// Select values coming from text inputs arrive as strings, so options
/// match on their string casts.
pub(crate) fn option_matches(option: &Value, value: &Value) -> bool {
    option == value || option.to_string() == value.to_string()
}

/// Find a column by key.
pub fn find_column<'a>(columns: &'a [Column], key: &str) -> Option<&'a Column> {
    columns.iter().find(|c| c.key == key)
}
