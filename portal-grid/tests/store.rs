mod common;

use std::collections::HashSet;

use common::{MemoryHost, two_rows};
use portal_grid::column::{Column, SelectOption};
use portal_grid::error::GridError;
use portal_grid::model::{Row, RowId, Value};
use portal_grid::validation::{FieldRule, ValidationSchema};
use portal_grid::{Grid, GridConfig};

fn grid_with(columns: Vec<Column>, rows: Vec<Row>) -> Grid {
    let host = MemoryHost::new("id", rows.clone());
    Grid::builder(host)
        .config(GridConfig::new("id"))
        .columns(columns)
        .data(rows)
        .build()
}

fn name_columns() -> Vec<Column> {
    vec![Column::new("id", "ID").read_only(), Column::new("name", "name")]
}

// ============================================================================
// Staged rows
// ============================================================================

#[test]
fn test_add_row_ids_are_unique_and_disjoint() {
    let grid = grid_with(name_columns(), two_rows());
    let base: HashSet<RowId> = grid.effective_rows().into_iter().map(|r| r.id).collect();

    let staged: Vec<RowId> = (0..200).map(|_| grid.add_row()).collect();
    let unique: HashSet<&RowId> = staged.iter().collect();

    assert_eq!(unique.len(), staged.len());
    assert!(staged.iter().all(|id| !base.contains(id)));
    assert!(staged.iter().all(|id| id.as_str().starts_with("new-")));
}

#[test]
fn test_add_row_seeds_defaults_over_column_defaults() {
    let columns = vec![
        Column::new("id", "ID").read_only(),
        Column::new("name", "Name"),
        Column::new("status", "Status").default_value("active"),
        Column::new("country", "Country").default_value("BE"),
    ];
    let grid = grid_with(columns, Vec::new());

    let id = grid.add_row_with(Row::new().set("country", "NL").set("id", 99));
    let row = grid.effective_row(&id).unwrap();

    assert_eq!(row.get("status"), Some(&Value::from("active")));
    assert_eq!(row.get("country"), Some(&Value::from("NL")));
    assert_eq!(row.get("name"), Some(&Value::Null));
    assert!(!row.contains("id"));
}

#[test]
fn test_add_row_uses_builder_defaults() {
    let host = MemoryHost::new("id", Vec::new());
    let grid = Grid::builder(host)
        .columns(name_columns())
        .new_row_defaults(Row::new().set("name", "Unnamed"))
        .build();

    let id = grid.controller().add_row();
    assert_eq!(
        grid.effective_row(&id).unwrap().get("name"),
        Some(&Value::from("Unnamed"))
    );
    assert!(grid.is_editing(&id));
}

#[test]
fn test_staged_row_updates_in_place() {
    let grid = grid_with(name_columns(), two_rows());
    let id = grid.add_row();

    grid.update_field(&id, "name", "C").unwrap();

    assert_eq!(grid.pending_edit(&id), None);
    assert_eq!(grid.staged_rows()[0].values.get("name"), Some(&Value::from("C")));
}

#[test]
fn test_remove_staged() {
    let grid = grid_with(name_columns(), two_rows());
    let id = grid.add_row();
    grid.remove_staged(&id).unwrap();

    assert!(grid.staged_rows().is_empty());
    assert_eq!(
        grid.remove_staged(&id),
        Err(GridError::RowNotFound(id.clone()))
    );
}

// ============================================================================
// Merged view
// ============================================================================

#[test]
fn test_effective_rows_count_is_base_plus_staged() {
    let grid = grid_with(name_columns(), two_rows());
    let check = |grid: &Grid| {
        assert_eq!(
            grid.effective_rows().len(),
            grid.base_rows().len() + grid.staged_rows().len()
        );
    };

    check(&grid);
    let staged = grid.add_row();
    check(&grid);
    grid.toggle_edit(&RowId::from(1)).unwrap();
    grid.update_field(&RowId::from(1), "name", "A2").unwrap();
    check(&grid);
    grid.add_row();
    grid.remove_staged(&staged).unwrap();
    check(&grid);
    grid.remove_base(&RowId::from(2)).unwrap();
    check(&grid);
}

#[test]
fn test_effective_rows_order_base_then_staged() {
    let grid = grid_with(name_columns(), two_rows());
    let staged = grid.add_row();
    grid.toggle_edit(&RowId::from(2)).unwrap();
    grid.update_field(&RowId::from(2), "name", "Bee").unwrap();

    let rows = grid.effective_rows();
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", staged.as_str()]);
    assert_eq!(rows[1].values.get("name"), Some(&Value::from("Bee")));
    assert!(rows[1].editing);
    assert!(rows[2].is_new);
    assert!(!rows[0].is_new && !rows[0].editing);

    // The host's row is untouched
    assert_eq!(grid.base_rows()[1].get("name"), Some(&Value::from("B")));
}

// ============================================================================
// Edit mode
// ============================================================================

#[test]
fn test_update_requires_edit_mode() {
    let grid = grid_with(name_columns(), two_rows());
    let id = RowId::from(1);

    assert_eq!(
        grid.update_field(&id, "name", "X"),
        Err(GridError::NotEditing(id.clone()))
    );

    assert!(grid.toggle_edit(&id).unwrap());
    grid.update_field(&id, "name", "X").unwrap();
    assert_eq!(
        grid.pending_edit(&id),
        Some(Row::new().set("name", "X"))
    );
}

#[test]
fn test_toggle_off_discards_pending_edit() {
    let grid = grid_with(name_columns(), two_rows());
    let id = RowId::from(1);

    grid.toggle_edit(&id).unwrap();
    grid.update_field(&id, "name", "X").unwrap();
    assert!(!grid.toggle_edit(&id).unwrap());

    assert_eq!(grid.pending_edit(&id), None);
    assert!(!grid.has_changes());
    assert_eq!(
        grid.effective_row(&id).unwrap().get("name"),
        Some(&Value::from("A"))
    );
}

#[test]
fn test_read_only_and_unknown_columns_rejected() {
    let grid = grid_with(name_columns(), two_rows());
    let id = grid.add_row();

    assert_eq!(
        grid.update_field(&id, "id", 5),
        Err(GridError::ReadOnlyColumn("id".into()))
    );
    assert_eq!(
        grid.update_field(&id, "salary", 5),
        Err(GridError::UnknownColumn("salary".into()))
    );
    assert_eq!(
        grid.update_field(&RowId::from("nope"), "name", "x"),
        Err(GridError::RowNotFound(RowId::from("nope")))
    );
}

#[test]
fn test_set_data_keeps_state_for_surviving_rows() {
    let grid = grid_with(name_columns(), two_rows());
    grid.toggle_edit(&RowId::from(1)).unwrap();
    grid.update_field(&RowId::from(1), "name", "A2").unwrap();
    grid.toggle_edit(&RowId::from(2)).unwrap();
    grid.update_field(&RowId::from(2), "name", "B2").unwrap();
    let staged = grid.add_row();

    grid.set_data(vec![Row::new().set("id", 1).set("name", "A")]);

    assert!(grid.pending_edit(&RowId::from(1)).is_some());
    assert!(grid.pending_edit(&RowId::from(2)).is_none());
    assert!(!grid.is_editing(&RowId::from(2)));
    assert!(grid.effective_row(&staged).is_some());
}

// ============================================================================
// Validation errors vs edits
// ============================================================================

#[test]
fn test_edit_clears_only_that_fields_error() {
    let host = MemoryHost::new("id", Vec::new());
    let grid = Grid::builder(host)
        .columns(vec![
            Column::new("name", "Name"),
            Column::new("email", "Email"),
        ])
        .schema(
            ValidationSchema::new()
                .field("name", FieldRule::new().required())
                .field("email", FieldRule::new().required()),
        )
        .build();
    let id = grid.add_row();

    let errors = grid.validate_row(&id).unwrap();
    assert_eq!(errors.len(), 2);

    grid.update_field(&id, "name", "Ada").unwrap();

    assert_eq!(grid.error(&id, "name"), None);
    assert_eq!(grid.error(&id, "email").as_deref(), Some("Email is required"));
}

#[test]
fn test_editing_does_not_revalidate() {
    let host = MemoryHost::new("id", Vec::new());
    let grid = Grid::builder(host)
        .columns(vec![Column::new("name", "Name")])
        .schema(ValidationSchema::new().field("name", FieldRule::new().required()))
        .build();
    let id = grid.add_row();

    grid.update_field(&id, "name", "").unwrap();
    assert!(grid.errors().is_empty());
}

// ============================================================================
// Cascades
// ============================================================================

fn branch_team_grid() -> Grid {
    let rows = vec![
        Row::new()
            .set("id", 1)
            .set("branch_id", 1)
            .set("team_id", 10),
    ];
    let host = MemoryHost::new("id", rows.clone());
    Grid::builder(host)
        .columns(vec![
            Column::new("id", "ID").read_only(),
            Column::new("branch_id", "Branch").select(vec![
                SelectOption::new(1, "North"),
                SelectOption::new(2, "South"),
            ]),
            Column::new("team_id", "Team").select_with(|row| {
                match row.value("branch_id") {
                    Value::Int(1) => vec![SelectOption::new(10, "Core")],
                    Value::Int(2) => vec![SelectOption::new(20, "Field"), SelectOption::new(21, "Ops")],
                    _ => Vec::new(),
                }
            }),
        ])
        .on_field_change(|change| {
            (change.field == "branch_id").then(|| Row::new().set("team_id", ""))
        })
        .data(rows)
        .build()
}

#[test]
fn test_cascade_resets_dependent_in_one_update() {
    let grid = branch_team_grid();
    let id = RowId::from(1);
    grid.toggle_edit(&id).unwrap();

    let before = grid.revision();
    grid.update_field(&id, "branch_id", 2).unwrap();

    assert_eq!(grid.revision(), before + 1);
    assert_eq!(
        grid.pending_edit(&id),
        Some(Row::new().set("branch_id", 2).set("team_id", ""))
    );
}

#[test]
fn test_cascade_not_triggered_by_other_fields() {
    let grid = branch_team_grid();
    let id = RowId::from(1);
    grid.toggle_edit(&id).unwrap();

    grid.update_field(&id, "team_id", 10).unwrap();
    assert_eq!(grid.pending_edit(&id), Some(Row::new().set("team_id", 10)));
}

#[test]
fn test_cascade_clears_cascaded_field_errors() {
    let grid = branch_team_grid();
    grid.set_schema(ValidationSchema::new().field("team_id", FieldRule::new().required()));
    let id = grid.add_row();

    grid.validate_row(&id).unwrap();
    assert!(grid.error(&id, "team_id").is_some());

    grid.update_field(&id, "branch_id", 1).unwrap();
    assert_eq!(grid.error(&id, "team_id"), None);
}

#[test]
fn test_dynamic_options_follow_effective_row() {
    let grid = branch_team_grid();
    let id = RowId::from(1);

    let labels = |grid: &Grid| -> Vec<String> {
        grid.options_for(&id, "team_id")
            .into_iter()
            .map(|o| o.label)
            .collect()
    };
    assert_eq!(labels(&grid), vec!["Core"]);

    grid.toggle_edit(&id).unwrap();
    grid.update_field(&id, "branch_id", 2).unwrap();
    assert_eq!(labels(&grid), vec!["Field", "Ops"]);
}

#[test]
fn test_replacing_columns_is_atomic_swap() {
    let grid = grid_with(name_columns(), two_rows());
    let before = grid.columns();

    grid.set_columns(vec![Column::new("name", "Full name")]);

    assert_eq!(before.len(), 2);
    assert_eq!(grid.columns().len(), 1);
    assert_eq!(grid.columns()[0].label, "Full name");
}

#[test]
fn test_reset_on_change_cascade() {
    let host = MemoryHost::new("id", Vec::new());
    let grid = Grid::builder(host)
        .columns(vec![
            Column::new("country", "Country"),
            Column::new("region", "Region"),
            Column::new("city", "City"),
        ])
        .cascade(portal_grid::cascade::reset_on_change("country", &["region", "city"]))
        .build();
    let id = grid.add_row_with(Row::new().set("region", "Flanders").set("city", "Ghent"));

    grid.update_field(&id, "city", "Bruges").unwrap();
    assert_eq!(grid.effective_row(&id).unwrap().value("region"), &Value::from("Flanders"));

    grid.update_field(&id, "country", "NL").unwrap();
    let row = grid.effective_row(&id).unwrap();
    assert_eq!(row.value("region"), &Value::from(""));
    assert_eq!(row.value("city"), &Value::from(""));
}
