use portal_grid::column::{Column, SelectOption};
use portal_grid::model::{Row, RowId, Value};
use portal_grid::validation::{FieldRule, ValidationErrors, ValidationSchema, Validator};

fn columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name"),
        Column::new("email", "Email"),
        Column::new("age", "Age"),
        Column::new("status", "Status").select(vec![
            SelectOption::new("active", "Active"),
            SelectOption::new("inactive", "Inactive"),
        ]),
    ]
}

fn check(schema: &ValidationSchema, row: &Row) -> Vec<(String, String)> {
    let columns = columns();
    Validator::new(&columns, schema)
        .validate(row)
        .into_iter()
        .collect()
}

// ============================================================================
// Required
// ============================================================================

#[test]
fn test_required_rejects_null_and_blank() {
    let schema = ValidationSchema::new().field("name", FieldRule::new().required());

    for value in [Value::Null, Value::from(""), Value::from("   ")] {
        let row = Row::new().set("name", value);
        assert_eq!(
            check(&schema, &row),
            vec![("name".to_string(), "Name is required".to_string())]
        );
    }
    assert!(check(&schema, &Row::new().set("name", "Ada")).is_empty());
}

#[test]
fn test_required_on_missing_field() {
    let schema = ValidationSchema::new().field("name", FieldRule::new().required());
    assert_eq!(check(&schema, &Row::new()).len(), 1);
}

#[test]
fn test_required_short_circuits_other_rules() {
    let schema = ValidationSchema::new().field(
        "email",
        FieldRule::new()
            .required()
            .email()
            .validate(|_, _| Some("never reached".into())),
    );

    assert_eq!(
        check(&schema, &Row::new().set("email", "")),
        vec![("email".to_string(), "Email is required".to_string())]
    );
}

#[test]
fn test_label_falls_back_to_key() {
    let schema = ValidationSchema::new().field("nickname", FieldRule::new().required());
    assert_eq!(
        check(&schema, &Row::new()),
        vec![("nickname".to_string(), "nickname is required".to_string())]
    );
}

// ============================================================================
// Shape rules
// ============================================================================

#[test]
fn test_email_rule() {
    let schema = ValidationSchema::new().field("email", FieldRule::new().email());

    assert!(check(&schema, &Row::new().set("email", "ada@example.com")).is_empty());
    assert_eq!(
        check(&schema, &Row::new().set("email", "not-an-email")),
        vec![("email".to_string(), "Email must be a valid email".to_string())]
    );
}

#[test]
fn test_empty_optional_field_skips_shape_rules() {
    let schema = ValidationSchema::new()
        .field("email", FieldRule::new().email())
        .field("age", FieldRule::new().number());

    assert!(check(&schema, &Row::new().set("email", "").set("age", Value::Null)).is_empty());
}

#[test]
fn test_number_rule_accepts_numeric_strings() {
    let schema = ValidationSchema::new().field("age", FieldRule::new().number());

    assert!(check(&schema, &Row::new().set("age", 42)).is_empty());
    assert!(check(&schema, &Row::new().set("age", "42.5")).is_empty());
    assert_eq!(
        check(&schema, &Row::new().set("age", "forty")),
        vec![("age".to_string(), "Age must be a number".to_string())]
    );
}

#[test]
fn test_pattern_and_length_rules() {
    let schema = ValidationSchema::new().field(
        "name",
        FieldRule::new()
            .pattern(r"^[A-Z]")
            .unwrap()
            .min_length(2)
            .max_length(5),
    );

    assert!(check(&schema, &Row::new().set("name", "Ada")).is_empty());
    assert_eq!(
        check(&schema, &Row::new().set("name", "ada"))[0].1,
        "Name has an invalid format"
    );
    assert_eq!(
        check(&schema, &Row::new().set("name", "A"))[0].1,
        "Name must be at least 2 characters"
    );
    assert_eq!(
        check(&schema, &Row::new().set("name", "Adalbert"))[0].1,
        "Name must be at most 5 characters"
    );
}

#[test]
fn test_invalid_pattern_is_an_error() {
    assert!(FieldRule::new().pattern("(unclosed").is_err());
}

#[test]
fn test_one_of_options() {
    let schema = ValidationSchema::new().field("status", FieldRule::new().one_of_options());

    assert!(check(&schema, &Row::new().set("status", "active")).is_empty());
    assert_eq!(
        check(&schema, &Row::new().set("status", "archived"))[0].1,
        "Status must be one of the available options"
    );
}

// ============================================================================
// Custom rules and messages
// ============================================================================

#[test]
fn test_custom_rule_sees_whole_row() {
    let schema = ValidationSchema::new().field(
        "age",
        FieldRule::new().number().validate(|value, row| {
            let adult = value.as_f64().is_some_and(|age| age >= 18.0);
            (row.value("status") == &Value::from("active") && !adult)
                .then(|| "Active members must be adults".to_string())
        }),
    );

    let minor = Row::new().set("age", 16).set("status", "active");
    assert_eq!(check(&schema, &minor)[0].1, "Active members must be adults");

    let inactive = Row::new().set("age", 16).set("status", "inactive");
    assert!(check(&schema, &inactive).is_empty());
}

#[test]
fn test_shape_rules_run_before_custom() {
    let schema = ValidationSchema::new().field(
        "age",
        FieldRule::new()
            .number()
            .validate(|_, _| Some("custom".into())),
    );
    assert_eq!(
        check(&schema, &Row::new().set("age", "x"))[0].1,
        "Age must be a number"
    );
    assert_eq!(check(&schema, &Row::new().set("age", 3))[0].1, "custom");
}

#[test]
fn test_custom_rule_runs_on_empty_optional_field() {
    let schema = ValidationSchema::new().field(
        "end_date",
        FieldRule::new().min_length(10).validate(|value, row| {
            (row.value("status") == &Value::from("inactive") && value.is_empty())
                .then(|| "End date is required for inactive members".to_string())
        }),
    );

    let closed = Row::new().set("status", "inactive").set("end_date", "");
    assert_eq!(
        check(&schema, &closed),
        vec![(
            "end_date".to_string(),
            "End date is required for inactive members".to_string()
        )]
    );

    let missing = Row::new().set("status", "inactive");
    assert_eq!(check(&schema, &missing).len(), 1);

    let open = Row::new().set("status", "active").set("end_date", "");
    assert!(check(&schema, &open).is_empty());
}

#[test]
fn test_message_overrides_previous_rule() {
    let schema = ValidationSchema::new().field(
        "email",
        FieldRule::new()
            .required()
            .message("We need an email")
            .email()
            .message("That does not look right"),
    );

    assert_eq!(
        check(&schema, &Row::new())[0].1,
        "We need an email"
    );
    assert_eq!(
        check(&schema, &Row::new().set("email", "nope"))[0].1,
        "That does not look right"
    );
}

#[test]
fn test_every_failing_field_reported() {
    let schema = ValidationSchema::new()
        .field("name", FieldRule::new().required())
        .field("email", FieldRule::new().required().email())
        .field("age", FieldRule::new().number());

    let errors = check(
        &schema,
        &Row::new().set("email", "bad").set("age", "old"),
    );
    let fields: Vec<&str> = errors.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(fields, vec!["age", "email", "name"]);
}

// ============================================================================
// Many rows
// ============================================================================

#[test]
fn test_validate_rows_keeps_only_failures() {
    let columns = columns();
    let schema = ValidationSchema::new().field("name", FieldRule::new().required());
    let good = (RowId::from("a"), Row::new().set("name", "Ada"));
    let bad = (RowId::from("b"), Row::new());

    let errors: ValidationErrors = Validator::new(&columns, &schema)
        .validate_rows([(&good.0, &good.1), (&bad.0, &bad.1)]);

    assert_eq!(errors.row_count(), 1);
    assert!(errors.row(&good.0).is_none());
    assert_eq!(errors.get(&bad.0, "name"), Some("Name is required"));
}
