use casewhen_common::any_to_string;
use casewhen_model::DatasetMeta;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

use casewhen_engine::{CaseOutcome, LineageHistory};

use crate::commands::RunResult;

pub fn print_summary(result: &RunResult, max_rows: usize) {
    if let Some(meta) = &result.dataset.meta {
        print_meta(meta);
    }

    let derived: Vec<&str> = result
        .outcomes
        .iter()
        .map(|outcome| outcome.output_name.as_str())
        .collect();
    println!();
    println!(
        "{}",
        data_table(
            &result.dataset.data,
            &derived,
            result.duplicates.as_deref(),
            max_rows
        )
    );
    if result.dataset.height() > max_rows {
        println!("showing {max_rows} of {} rows", result.dataset.height());
    }

    println!();
    println!("{}", outcome_table(&result.outcomes));
    println!();
    println!("{}", lineage_table(result.dataset.lineage()));
}

fn print_meta(meta: &DatasetMeta) {
    let entries = meta.entries();
    if entries.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (key, value) in entries {
        table.add_row(vec![dim_cell(key), Cell::new(value)]);
    }
    println!("{table}");
}

/// First `max_rows` rows, null cells on yellow and derived columns in green.
/// Rows flagged in `duplicates` are shown on yellow throughout.
fn data_table(
    df: &DataFrame,
    derived: &[&str],
    duplicates: Option<&[bool]>,
    max_rows: usize,
) -> Table {
    let mut table = Table::new();
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    table.set_header(
        names
            .iter()
            .map(|name| {
                if derived.contains(&name.as_str()) {
                    Cell::new(name).fg(Color::Green).add_attribute(Attribute::Bold)
                } else {
                    header_cell(name)
                }
            })
            .collect::<Vec<_>>(),
    );
    apply_summary_table_style(&mut table);

    for row in 0..df.height().min(max_rows) {
        let duplicate = duplicates
            .and_then(|flags| flags.get(row).copied())
            .unwrap_or(false);
        let cells = df
            .get_columns()
            .iter()
            .zip(&names)
            .map(|(column, name)| {
                let value = column.get(row).unwrap_or(AnyValue::Null);
                let cell = value_cell(value, derived.contains(&name.as_str()));
                if duplicate {
                    cell.bg(Color::Yellow)
                } else {
                    cell
                }
            })
            .collect::<Vec<_>>();
        table.add_row(cells);
    }
    table
}

fn outcome_table(outcomes: &[CaseOutcome]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Output"),
        header_cell("Statement rows"),
        header_cell("Else rows"),
        header_cell("Lineage"),
        header_cell("Replaced"),
    ]);
    apply_table_style(&mut table);
    for outcome in outcomes {
        let statement_rows = outcome
            .statement_rows
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" / ");
        table.add_row(vec![
            Cell::new(&outcome.output_name)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            Cell::new(if statement_rows.is_empty() {
                "-".to_string()
            } else {
                statement_rows
            }),
            Cell::new(outcome.else_rows),
            Cell::new(outcome.lineage_records),
            if outcome.replaced {
                Cell::new("yes").fg(Color::Yellow)
            } else {
                dim_cell("no")
            },
        ]);
    }
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table
}

fn lineage_table(history: &LineageHistory) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Dataset"),
        header_cell("Function"),
        header_cell("Input"),
        header_cell("Criteria"),
        header_cell("Logical"),
        header_cell("Group"),
        header_cell("Output"),
        header_cell("Output column"),
    ]);
    apply_summary_table_style(&mut table);
    for (index, record) in history.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(record.dataset.as_deref().unwrap_or("-")),
            Cell::new(record.function.as_str()).fg(Color::Blue),
            Cell::new(&record.input),
            optional_cell(record.criteria.as_deref()),
            optional_cell(record.logical.map(|op| op.as_str())),
            optional_cell(record.group_id.map(|id| id.to_string()).as_deref()),
            Cell::new(&record.output),
            Cell::new(&record.output_name).fg(Color::Green),
        ]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    table
}

fn value_cell(value: AnyValue<'_>, derived: bool) -> Cell {
    if value.is_null() {
        return Cell::new("null").fg(Color::Black).bg(Color::Yellow);
    }
    let cell = Cell::new(any_to_string(value));
    if derived {
        cell.fg(Color::Green)
    } else {
        cell
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
