use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rawload_transform::ColumnKind;

use crate::types::LoadResult;

pub fn print_summary(result: &LoadResult) {
    println!("Table: {}", result.table_name);
    println!("Source: {}", result.csv_path.display());
    match (&result.delivered, result.rows_delivered()) {
        (Some((path, _)), Some(rows)) => println!("Sink: {} ({rows} rows)", path.display()),
        _ => println!("Sink: skipped (dry run)"),
    }
    if let Some(report) = &result.duplicates {
        let location = report
            .path
            .as_ref()
            .map_or_else(|| "not written".to_string(), |path| path.display().to_string());
        println!(
            "Duplicate PK candidates [{}]: {} rows, sample {}",
            report.key.join(", "),
            report.duplicate_rows,
            location
        );
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Nulls"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in &result.columns {
        table.add_row(vec![
            Cell::new(&column.name),
            kind_cell(column.kind),
            null_cell(column.nulls),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell(format!("{} columns", result.columns.len())),
        Cell::new(format!("{} rows", result.rows)).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

fn kind_cell(kind: ColumnKind) -> Cell {
    match kind {
        ColumnKind::Text => dim_cell(kind),
        ColumnKind::Integer => Cell::new(kind).fg(Color::Green),
        ColumnKind::Float => Cell::new(kind).fg(Color::Blue),
    }
}

fn null_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
