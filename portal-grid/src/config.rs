//! Grid configuration

use std::time::Duration;

use serde::Deserialize;

/// Minimum width, in pixels, any column can be resized to.
pub const MIN_COLUMN_WIDTH: u32 = 80;

/// Per-grid configuration.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use portal_grid::GridConfig;
///
/// let config = GridConfig::new("employee_id")
///     .with_page_size(25)
///     .with_auto_refresh(Duration::from_secs(30));
/// assert_eq!(config.id_field, "employee_id");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Name of the field holding each host row's identity.
    ///
    /// Default: `"id"`
    pub id_field: String,

    /// Rows per page in the read grid.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Lower bound applied to every column resize.
    ///
    /// Default: 80
    pub min_column_width: u32,

    /// Width used for columns that do not declare one.
    ///
    /// Default: 150
    pub default_column_width: u32,

    /// Number of page-number buttons rendered before ellipses kick in.
    ///
    /// Default: 5
    pub max_page_buttons: usize,

    /// Prefix of synthetic staged-row identities.
    ///
    /// Default: `"new-"`
    pub new_row_prefix: String,

    /// Interval of the timer-driven refresh, if any.
    ///
    /// Default: disabled
    #[serde(with = "optional_secs")]
    pub auto_refresh: Option<Duration>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            page_size: 10,
            min_column_width: MIN_COLUMN_WIDTH,
            default_column_width: 150,
            max_page_buttons: 5,
            new_row_prefix: "new-".to_string(),
            auto_refresh: None,
        }
    }
}

impl GridConfig {
    /// Creates a config for rows identified by `id_field`.
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            ..Default::default()
        }
    }

    /// Sets the page size (clamped to at least one row).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the minimum column width (never below [`MIN_COLUMN_WIDTH`]).
    pub fn with_min_column_width(mut self, width: u32) -> Self {
        self.min_column_width = width.max(MIN_COLUMN_WIDTH);
        self
    }

    /// Sets the default column width.
    pub fn with_default_column_width(mut self, width: u32) -> Self {
        self.default_column_width = width;
        self
    }

    /// Sets how many page buttons the pager renders.
    pub fn with_max_page_buttons(mut self, count: usize) -> Self {
        self.max_page_buttons = count;
        self
    }

    /// Enables the timer-driven refresh.
    pub fn with_auto_refresh(mut self, interval: Duration) -> Self {
        self.auto_refresh = Some(interval);
        self
    }

    /// Parses a config from JSON, filling gaps with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

mod optional_secs {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.filter(|s| *s > 0).map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_fills_defaults() {
        let config = GridConfig::from_json(r#"{"id_field": "team_id", "auto_refresh": 15}"#)
            .unwrap();
        assert_eq!(config.id_field, "team_id");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.auto_refresh, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_min_width_floor() {
        let config = GridConfig::default().with_min_column_width(20);
        assert_eq!(config.min_column_width, MIN_COLUMN_WIDTH);
    }
}
