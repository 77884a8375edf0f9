//! Drag-to-resize for column widths.

use std::collections::HashMap;

use crate::column::Column;
use crate::config::GridConfig;

/// Global pointer tracking owned by the host's UI layer.
///
/// The resizer attaches it when a drag starts and detaches it when the drag
/// ends or the resizer is torn down, so pointer listeners never outlive a
/// drag.
pub trait PointerCapture {
    /// Start observing pointer-move and pointer-up globally.
    fn attach(&mut self);

    /// Stop observing.
    fn detach(&mut self);
}

/// Capture for hosts that route pointer events to the resizer themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn attach(&mut self) {}
    fn detach(&mut self) {}
}

/// Drag state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Resizing {
        /// Column being resized.
        key: String,
        /// Pointer x when the drag started.
        anchor_x: i32,
        /// Column width when the drag started.
        anchor_width: u32,
    },
}

/// Column widths plus a two-state drag machine.
///
/// Widths update live on every pointer move; releasing the pointer just
/// ends the drag.
///
/// # Example
///
/// ```
/// use portal_grid::resize::ColumnResizer;
///
/// let mut resizer = ColumnResizer::new(150, 80);
/// resizer.pointer_down("name", 500);
/// resizer.pointer_move(560);
/// resizer.pointer_up();
/// assert_eq!(resizer.width("name"), 210);
/// ```
#[derive(Debug)]
pub struct ColumnResizer<C: PointerCapture = NoCapture> {
    widths: HashMap<String, u32>,
    default_width: u32,
    min_width: u32,
    state: ResizeState,
    capture: C,
}

impl ColumnResizer<NoCapture> {
    /// Create a resizer without global pointer capture.
    pub fn new(default_width: u32, min_width: u32) -> Self {
        Self::with_capture(default_width, min_width, NoCapture)
    }

    /// Create a resizer seeded from column widths and a grid config.
    pub fn from_columns(columns: &[Column], config: &GridConfig) -> Self {
        let mut resizer = Self::new(config.default_column_width, config.min_column_width);
        resizer.seed(columns);
        resizer
    }
}

impl<C: PointerCapture> ColumnResizer<C> {
    /// Create a resizer that drives a host pointer capture.
    pub fn with_capture(default_width: u32, min_width: u32, capture: C) -> Self {
        Self {
            widths: HashMap::new(),
            default_width: default_width.max(min_width),
            min_width,
            state: ResizeState::Idle,
            capture,
        }
    }

    /// Record the declared width of every column that has one.
    pub fn seed(&mut self, columns: &[Column]) {
        for column in columns {
            if let Some(width) = column.width {
                self.widths
                    .insert(column.key.clone(), width.max(self.min_width));
            }
        }
    }

    /// Current width of a column.
    pub fn width(&self, key: &str) -> u32 {
        self.widths.get(key).copied().unwrap_or(self.default_width)
    }

    /// All explicitly sized columns.
    pub fn widths(&self) -> &HashMap<String, u32> {
        &self.widths
    }

    /// Get the drag state.
    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    /// Check if a drag is in progress.
    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing { .. })
    }

    /// Start dragging the right edge of `key` at pointer `x`.
    pub fn pointer_down(&mut self, key: &str, x: i32) {
        let anchor_width = self.width(key);
        if !self.is_resizing() {
            self.capture.attach();
        }
        self.state = ResizeState::Resizing {
            key: key.to_string(),
            anchor_x: x,
            anchor_width,
        };
    }

    /// Apply pointer movement; returns the new width while resizing.
    pub fn pointer_move(&mut self, x: i32) -> Option<u32> {
        let ResizeState::Resizing {
            key,
            anchor_x,
            anchor_width,
        } = &self.state
        else {
            return None;
        };
        let proposed = i64::from(*anchor_width) + i64::from(x) - i64::from(*anchor_x);
        let width = proposed.clamp(i64::from(self.min_width), i64::from(u32::MAX)) as u32;
        self.widths.insert(key.clone(), width);
        Some(width)
    }

    /// End the drag.
    pub fn pointer_up(&mut self) {
        if self.is_resizing() {
            self.state = ResizeState::Idle;
            self.capture.detach();
        }
    }

    /// Abandon any drag and release pointer capture, keeping applied widths.
    pub fn teardown(&mut self) {
        self.pointer_up();
    }

    /// Get the pointer capture.
    pub fn capture(&self) -> &C {
        &self.capture
    }
}

impl<C: PointerCapture> Drop for ColumnResizer<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
