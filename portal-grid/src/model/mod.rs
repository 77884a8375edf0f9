//! Row and value model shared by the editable and read grids

mod row;
mod value;

pub use row::Row;
pub use row::RowId;
pub use value::Value;

pub(crate) use value::parse_number;
