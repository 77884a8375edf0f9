//! Plain-text rendering of grid pages.

use portal_grid::prelude::*;
use portal_grid::view::PageItem;

/// Pixels per rendered character.
const PX_PER_CHAR: u32 = 8;

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text:<width$}")
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn char_widths(columns: &[Column], resizer: &ColumnResizer) -> Vec<usize> {
    columns
        .iter()
        .map(|c| (resizer.width(&c.key) / PX_PER_CHAR) as usize)
        .collect()
}

pub fn print_view(view: &TableView<EffectiveRow>, config: &GridConfig) {
    let columns = view.columns();
    let resizer = ColumnResizer::from_columns(columns, config);
    let widths = char_widths(columns, &resizer);

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| fit(&c.label, *w))
        .collect();
    println!("  {}", header.join(" "));

    for row in view.page_rows() {
        let marker = match (row.is_new, row.editing) {
            (true, _) => '+',
            (false, true) => '~',
            _ => ' ',
        };
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| fit(&c.display_value(&row.values), *w))
            .collect();
        println!("{marker} {}", cells.join(" "));
    }

    let pages: Vec<String> = view
        .page_items()
        .into_iter()
        .map(|item| match item {
            PageItem::Page(i) if i == view.page_index() => format!("[{}]", i + 1),
            PageItem::Page(i) => (i + 1).to_string(),
            PageItem::Ellipsis => "…".to_string(),
        })
        .collect();
    println!("{}  {}", view.range_label(), pages.join(" "));
}

pub fn print_errors(errors: &ValidationErrors) {
    for (id, fields) in errors.iter() {
        for (field, message) in fields {
            println!("  {id}.{field}: {message}");
        }
    }
}
