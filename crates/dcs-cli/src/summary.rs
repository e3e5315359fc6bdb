use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dcs_cli::pipeline::{CleanResult, MissingReport, ProfileReport};
use dcs_clean::TreatmentKind;
use dcs_model::{Confidence, SemanticType};

pub fn print_profile(report: &ProfileReport) {
    println!("Dataset: {}", report.source);
    println!("Rows: {}  Columns: {}", report.rows, report.columns);
    println!("{}", profile_table(report));
}

pub fn print_missing(report: &MissingReport) {
    println!("Dataset: {}", report.source);
    if report.columns.is_empty() {
        println!("No missing values found.");
        return;
    }
    println!("{}", missing_table(report));
}

pub fn print_clean(result: &CleanResult) {
    println!("Dataset: {}", result.summary.source);
    println!("Output: {}", result.output.display());
    if let Some(path) = &result.audit_log {
        println!("Audit log: {}", path.display());
    }
    println!("{}", session_table(result));
    if !result.currency.is_empty() {
        println!();
        println!("Currency columns:");
        println!("{}", currency_table(result));
    }
    println!();
    println!("Actions:");
    for action in &result.actions {
        println!("- {action}");
    }
}

pub fn profile_table(report: &ProfileReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Storage"),
        header_cell("Type"),
        header_cell("Confidence"),
        header_cell("Non-null"),
        header_cell("Missing"),
        header_cell("Unique"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    let mut total_non_null = 0usize;
    for profile in &report.profiles {
        total_non_null += profile.non_null;
        table.add_row(vec![
            Cell::new(&profile.name).add_attribute(Attribute::Bold),
            dim_cell(profile.storage.as_str()),
            type_cell(profile.classification.semantic_type),
            confidence_cell(profile.classification.confidence),
            Cell::new(profile.non_null),
            count_cell(profile.missing, Color::Yellow),
            Cell::new(profile.unique),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} columns", report.columns))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_non_null).add_attribute(Attribute::Bold),
        count_cell(report.total_missing(), Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

pub fn missing_table(report: &MissingReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Missing"),
        header_cell("Percent"),
        header_cell("Treatments"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for column in &report.columns {
        let options: Vec<&str> = column.options.iter().map(TreatmentKind::label).collect();
        table.add_row(vec![
            Cell::new(&column.summary.column).add_attribute(Attribute::Bold),
            type_cell(column.summary.semantic_type),
            count_cell(column.summary.missing_count, Color::Yellow),
            Cell::new(format!("{:.2}%", column.summary.missing_percent)),
            Cell::new(options.join(", ")),
        ]);
    }
    table
}

pub fn session_table(result: &CleanResult) -> Table {
    let summary = &result.summary;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(""),
        header_cell("Before"),
        header_cell("After"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Rows").add_attribute(Attribute::Bold),
        Cell::new(summary.original_rows),
        change_cell(summary.original_rows, summary.rows),
    ]);
    table.add_row(vec![
        Cell::new("Columns").add_attribute(Attribute::Bold),
        Cell::new(summary.original_columns),
        change_cell(summary.original_columns, summary.columns),
    ]);
    table.add_row(vec![
        Cell::new("Actions").add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(summary.actions),
    ]);
    table
}

pub fn currency_table(result: &CleanResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Min"),
        header_cell("Max"),
        header_cell("Mean"),
        header_cell("New nulls"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for outcome in &result.currency {
        table.add_row(vec![
            Cell::new(&outcome.column).add_attribute(Attribute::Bold),
            amount_cell(outcome.min),
            amount_cell(outcome.max),
            amount_cell(outcome.mean),
            count_cell(outcome.new_nulls, Color::Red),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn type_cell(semantic_type: SemanticType) -> Cell {
    let color = match semantic_type {
        SemanticType::Empty => Color::DarkGrey,
        SemanticType::Boolean => Color::Magenta,
        SemanticType::Currency => Color::Green,
        SemanticType::DateTime => Color::Blue,
        SemanticType::Numerical => Color::Cyan,
        SemanticType::Categorical => Color::Yellow,
        SemanticType::Text => Color::White,
    };
    Cell::new(semantic_type.as_str()).fg(color)
}

fn confidence_cell(confidence: Confidence) -> Cell {
    match confidence {
        Confidence::High => Cell::new(confidence.as_str()),
        Confidence::Medium => Cell::new(confidence.as_str()).fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn change_cell(before: usize, after: usize) -> Cell {
    if after < before {
        Cell::new(format!("{after} (-{})", before - after)).fg(Color::Yellow)
    } else {
        Cell::new(after)
    }
}

fn amount_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.2}")),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
