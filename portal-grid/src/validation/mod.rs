//! Schema-driven field validation for grid rows.
//!
//! A [`ValidationSchema`] maps column keys to [`FieldRule`]s. The
//! [`Validator`] runs them against a candidate row and yields one message per
//! failing field; [`ValidationErrors`] collects those per row identity.
//!
//! # Example
//!
//! ```
//! use portal_grid::column::Column;
//! use portal_grid::model::Row;
//! use portal_grid::validation::{FieldRule, ValidationSchema, Validator};
//!
//! let columns = vec![Column::new("name", "Name"), Column::new("email", "Email")];
//! let schema = ValidationSchema::new()
//!     .field("name", FieldRule::new().required())
//!     .field("email", FieldRule::new().email());
//!
//! let row = Row::new().set("name", "").set("email", "not-an-address");
//! let errors = Validator::new(&columns, &schema).validate(&row);
//!
//! assert_eq!(errors.get("name").map(String::as_str), Some("Name is required"));
//! assert!(errors.contains_key("email"));
//! ```

mod errors;
mod rule;
mod validator;

pub use errors::{FieldErrors, ValidationErrors};
pub use rule::{CustomRule, FieldRule, ShapeRule, ValidationSchema};
pub use validator::Validator;
