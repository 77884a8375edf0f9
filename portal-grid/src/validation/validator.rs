//! Runs a schema against candidate rows.

use super::errors::{FieldErrors, ValidationErrors};
use super::rule::{FieldRule, ShapeRule, ValidationSchema};
use crate::column::{Column, find_column, option_matches};
use crate::model::{Row, RowId, Value, parse_number};

/// Validates rows against a schema.
///
/// Pure and re-entrant: it borrows the column model for labels and options
/// and never touches grid state.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    columns: &'a [Column],
    schema: &'a ValidationSchema,
}

impl<'a> Validator<'a> {
    /// Create a validator over a column model and schema.
    pub fn new(columns: &'a [Column], schema: &'a ValidationSchema) -> Self {
        Self { columns, schema }
    }

    /// Validate one row, returning field key to message.
    ///
    /// An empty map means the row is valid.
    pub fn validate(&self, row: &Row) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for (field, rule) in self.schema.iter() {
            if let Some(msg) = self.check_field(field, rule, row) {
                errors.insert(field.clone(), msg);
            }
        }
        errors
    }

    /// Validate many rows, keeping only the ones that fail.
    pub fn validate_rows<'r, I>(&self, rows: I) -> ValidationErrors
    where
        I: IntoIterator<Item = (&'r RowId, &'r Row)>,
    {
        let mut errors = ValidationErrors::new();
        for (id, row) in rows {
            errors.set_row(id.clone(), self.validate(row));
        }
        errors
    }

    fn label<'b>(&'b self, field: &'b str) -> &'b str {
        find_column(self.columns, field)
            .map(Column::display_label)
            .unwrap_or(field)
    }

    fn check_field(&self, field: &str, rule: &FieldRule, row: &Row) -> Option<String> {
        let value = row.value(field);
        let label = self.label(field);

        if value.is_empty() {
            if rule.required {
                return Some(
                    rule.required_message
                        .clone()
                        .unwrap_or_else(|| format!("{label} is required")),
                );
            }
        } else {
            // Shape rules only see real input
            for (shape, message) in &rule.shapes {
                if !self.shape_ok(field, shape, value, row) {
                    return Some(
                        message
                            .clone()
                            .unwrap_or_else(|| default_message(shape, label)),
                    );
                }
            }
        }

        rule.custom.iter().find_map(|f| f(value, row))
    }

    fn shape_ok(&self, field: &str, shape: &ShapeRule, value: &Value, row: &Row) -> bool {
        let text = value.to_string();
        match shape {
            ShapeRule::Email => email_address::EmailAddress::is_valid(text.trim()),
            ShapeRule::Number => match value {
                Value::Int(_) | Value::Float(_) => true,
                other => parse_number(&other.to_string()).is_some(),
            },
            ShapeRule::Pattern(re) => re.is_match(&text),
            ShapeRule::MinLength(min) => text.chars().count() >= *min,
            ShapeRule::MaxLength(max) => text.chars().count() <= *max,
            ShapeRule::OneOfOptions => match find_column(self.columns, field) {
                Some(column) => column
                    .options_for(row)
                    .iter()
                    .any(|o| option_matches(&o.value, value)),
                None => true,
            },
        }
    }
}

fn default_message(shape: &ShapeRule, label: &str) -> String {
    match shape {
        ShapeRule::Email => format!("{label} must be a valid email"),
        ShapeRule::Number => format!("{label} must be a number"),
        ShapeRule::Pattern(_) => format!("{label} has an invalid format"),
        ShapeRule::MinLength(min) => format!("{label} must be at least {min} characters"),
        ShapeRule::MaxLength(max) => format!("{label} must be at most {max} characters"),
        ShapeRule::OneOfOptions => format!("{label} must be one of the available options"),
    }
}
