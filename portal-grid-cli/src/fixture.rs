//! The employees screen: columns, rules and seed data.

use portal_grid::cascade::{CascadeFn, reset_on_change};
use portal_grid::column::{Column, ColumnType, SelectOption};
use portal_grid::model::{Row, Value};
use portal_grid::validation::{FieldRule, ValidationSchema};

const BRANCHES: &[(i64, &str)] = &[(1, "Antwerp"), (2, "Ghent"), (3, "Liège")];

const TEAMS: &[(i64, i64, &str)] = &[
    (10, 1, "Logistics"),
    (11, 1, "Sales"),
    (20, 2, "Platform"),
    (21, 2, "Support"),
    (30, 3, "Finance"),
];

fn teams_of(branch: &Value) -> Vec<SelectOption> {
    let Some(branch) = branch.as_f64() else {
        return Vec::new();
    };
    TEAMS
        .iter()
        .filter(|(_, b, _)| *b as f64 == branch)
        .map(|(id, _, name)| SelectOption::new(*id, *name))
        .collect()
}

pub fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID")
            .kind(ColumnType::Number)
            .read_only()
            .width(60),
        Column::new("name", "Name").width(180),
        Column::new("email", "Email").width(240),
        Column::new("branch_id", "Branch").select(
            BRANCHES
                .iter()
                .map(|(id, name)| SelectOption::new(*id, *name))
                .collect(),
        ),
        Column::new("team_id", "Team").select_with(|row| teams_of(row.value("branch_id"))),
        Column::new("salary", "Salary")
            .kind(ColumnType::Number)
            .width(110)
            .formatter(|value, _| match value.as_f64() {
                Some(n) => format!("€{n:.0}"),
                None => String::new(),
            }),
        Column::new("hired", "Hired")
            .kind(ColumnType::Date)
            .width(120)
            .not_searchable(),
    ]
}

pub fn schema() -> ValidationSchema {
    ValidationSchema::new()
        .field("name", FieldRule::new().required().max_length(60))
        .field("email", FieldRule::new().required().email())
        .field("branch_id", FieldRule::new().required().one_of_options())
        .field(
            "team_id",
            FieldRule::new()
                .required()
                .message("Pick a team for this branch")
                .one_of_options(),
        )
        .field("salary", FieldRule::new().number())
}

pub fn cascade() -> CascadeFn {
    reset_on_change("branch_id", &["team_id"])
}

pub fn employees() -> Vec<Row> {
    let rows = [
        (1, "Ada Lovelace", "ada@example.com", 1, 10, 5200, "2021-03-01"),
        (2, "Grace Hopper", "grace@example.com", 2, 20, 6100, "2019-11-15"),
        (3, "Linus Torvalds", "linus@example.com", 2, 21, 4800, "2022-06-20"),
        (4, "Barbara Liskov", "barbara@example.com", 3, 30, 7300, "2018-01-08"),
        (5, "Ken Thompson", "ken@example.com", 1, 11, 5900, "2020-09-30"),
        (6, "Margaret Hamilton", "margaret@example.com", 3, 30, 6600, "2017-05-12"),
        (7, "Dennis Ritchie", "dennis@example.com", 1, 10, 5100, "2023-02-14"),
    ];
    rows.into_iter()
        .map(|(id, name, email, branch, team, salary, hired)| {
            Row::new()
                .set("id", id)
                .set("name", name)
                .set("email", email)
                .set("branch_id", branch)
                .set("team_id", team)
                .set("salary", salary)
                .set("hired", hired)
        })
        .collect()
}
