//! Sort state and ordering of filtered rows.

use std::cmp::Ordering;

use crate::column::{Column, find_column};

use super::ViewRow;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Current sort column and direction; no key keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: a new key sorts ascending, the same key flips direction.
    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    /// Stable sort of row indices.
    pub fn sort_indices<R: ViewRow>(&self, columns: &[Column], rows: &[R], indices: &mut [usize]) {
        let Some(key) = self.key.as_deref() else {
            return;
        };
        let column = find_column(columns, key);
        indices.sort_by(|&a, &b| {
            let (va, vb) = (rows[a].cell(key), rows[b].cell(key));
            let ordering = match column {
                Some(column) => column.compare(va, vb),
                None => va.compare(vb),
            };
            self.direction.apply(ordering)
        });
    }
}
