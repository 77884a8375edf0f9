//! Field rules and the schema that groups them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::model::Row;
use crate::model::Value;

/// Custom predicate: returns a message when the value is invalid.
pub type CustomRule = Arc<dyn Fn(&Value, &Row) -> Option<String> + Send + Sync>;

/// Type-shape checks, run after the required check.
#[derive(Debug, Clone)]
pub enum ShapeRule {
    /// Must be a syntactically valid email address.
    Email,
    /// Must parse as a number.
    Number,
    /// Must match the regex.
    Pattern(Regex),
    /// Minimum length in characters.
    MinLength(usize),
    /// Maximum length in characters.
    MaxLength(usize),
    /// Must equal one of the column's options, resolved against the row.
    OneOfOptions,
}

/// Validation rules for one field.
///
/// Rules run in a fixed order: required, then the shape rules in the order
/// they were added, then custom predicates. The first failure is reported.
/// Empty values skip the shape rules but custom predicates still see them.
/// `.message(..)` overrides the message of the rule added just before it.
#[derive(Clone, Default)]
pub struct FieldRule {
    pub(crate) required: bool,
    pub(crate) required_message: Option<String>,
    pub(crate) shapes: Vec<(ShapeRule, Option<String>)>,
    pub(crate) custom: Vec<CustomRule>,
    last: Option<LastRule>,
}

#[derive(Debug, Clone, Copy)]
enum LastRule {
    Required,
    Shape,
}

impl FieldRule {
    /// Create a rule set with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-empty value.
    pub fn required(mut self) -> Self {
        self.required = true;
        self.last = Some(LastRule::Required);
        self
    }

    /// Require a valid email address (empty values pass).
    pub fn email(self) -> Self {
        self.shape(ShapeRule::Email)
    }

    /// Require a numeric value (empty values pass).
    pub fn number(self) -> Self {
        self.shape(ShapeRule::Number)
    }

    /// Require the string cast to match a regex pattern.
    pub fn pattern(self, pattern: &str) -> Result<Self, regex::Error> {
        let re = Regex::new(pattern)?;
        Ok(self.shape(ShapeRule::Pattern(re)))
    }

    /// Require a minimum length in characters.
    pub fn min_length(self, min: usize) -> Self {
        self.shape(ShapeRule::MinLength(min))
    }

    /// Require a maximum length in characters.
    pub fn max_length(self, max: usize) -> Self {
        self.shape(ShapeRule::MaxLength(max))
    }

    /// Require a select value to be one of the column's current options.
    pub fn one_of_options(self) -> Self {
        self.shape(ShapeRule::OneOfOptions)
    }

    /// Add a custom predicate.
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Row) -> Option<String> + Send + Sync + 'static,
    {
        self.custom.push(Arc::new(f));
        self.last = None;
        self
    }

    /// Override the message of the previously added rule.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        match self.last {
            Some(LastRule::Required) => self.required_message = Some(msg.into()),
            Some(LastRule::Shape) => {
                if let Some((_, message)) = self.shapes.last_mut() {
                    *message = Some(msg.into());
                }
            }
            None => {}
        }
        self
    }

    fn shape(mut self, rule: ShapeRule) -> Self {
        self.shapes.push((rule, None));
        self.last = Some(LastRule::Shape);
        self
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("required", &self.required)
            .field("shapes", &self.shapes)
            .field("custom", &self.custom.len())
            .finish()
    }
}

/// Column key to rules.
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    rules: BTreeMap<String, FieldRule>,
}

impl ValidationSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rules for a field (builder pattern).
    pub fn field(mut self, key: impl Into<String>, rule: FieldRule) -> Self {
        self.rules.insert(key.into(), rule);
        self
    }

    /// Rules for a field.
    pub fn get(&self, key: &str) -> Option<&FieldRule> {
        self.rules.get(key)
    }

    /// Check if the schema has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over `(field, rule)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldRule)> {
        self.rules.iter()
    }
}
