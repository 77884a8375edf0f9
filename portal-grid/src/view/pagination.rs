//! Page slicing and the page-number strip.

/// Current page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based page index.
    pub page_index: usize,
    /// Rows per page, at least one.
    pub page_size: usize,
}

impl Pagination {
    /// Create pagination on the first page.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    /// `ceil(filtered / page_size)`.
    pub fn page_count(&self, filtered: usize) -> usize {
        filtered.div_ceil(self.page_size)
    }

    /// Pull the page index back into `[0, max(0, page_count - 1)]`.
    pub fn clamp(&mut self, filtered: usize) {
        let last = self.page_count(filtered).saturating_sub(1);
        self.page_index = self.page_index.min(last);
    }

    /// Index range of the current page within `filtered` rows.
    pub fn range(&self, filtered: usize) -> std::ops::Range<usize> {
        let start = (self.page_index * self.page_size).min(filtered);
        let end = (start + self.page_size).min(filtered);
        start..end
    }
}

/// One entry of the page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// Zero-based page index; display as `index + 1`.
    Page(usize),
    /// A gap of skipped pages.
    Ellipsis,
}

/// Page numbers to render for `page_count` pages with `current` selected.
///
/// Up to `max_buttons` pages are shown outright. Past that, the first and
/// last pages are always present, a window centred on the current page fills
/// the remaining slots, and an ellipsis marks every gap between rendered
/// numbers.
pub fn page_items(current: usize, page_count: usize, max_buttons: usize) -> Vec<PageItem> {
    let max_buttons = max_buttons.max(3);
    if page_count <= max_buttons {
        return (0..page_count).map(PageItem::Page).collect();
    }

    let last = page_count - 1;
    let current = current.min(last);
    let window = max_buttons - 2;

    // Window lives strictly between the first and last page
    let lowest = 1;
    let highest = last - window;
    let start = current.saturating_sub(window / 2).clamp(lowest, highest);
    let end = start + window - 1;

    let mut items = Vec::with_capacity(max_buttons + 2);
    items.push(PageItem::Page(0));
    if start > 1 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < last - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(last));
    items
}
