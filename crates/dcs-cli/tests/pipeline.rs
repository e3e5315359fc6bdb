//! Integration tests for the pipeline module.

use std::fs;

use dcs_cli::pipeline::{CleanOptions, clean_file, missing_file, profile_file};
use dcs_clean::TreatmentKind;
use dcs_ingest::{ExportFormat, read_table};
use dcs_model::{CellValue, CurrencyFormatConfig, SemanticType};
use tempfile::TempDir;

const ORDERS: &str = "\
id,price,paid,city
1,$10.00,yes,Oslo
2,,no,Oslo
3,$12.50,yes,
3,$12.50,yes,
";

fn orders_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("orders.csv");
    fs::write(&path, ORDERS).unwrap();
    path
}

fn clean_options(dir: &TempDir) -> CleanOptions {
    CleanOptions {
        input: orders_file(dir),
        output: dir.path().join("clean.csv"),
        format: ExportFormat::Csv,
        recipe: None,
        currency_columns: vec!["price".to_string()],
        currency_format: CurrencyFormatConfig::us(),
        dedupe: true,
        trim: false,
        audit_log: None,
    }
}

#[test]
fn test_profile_report() {
    let dir = TempDir::new().unwrap();
    let report = profile_file(&orders_file(&dir)).unwrap();

    insta::assert_json_snapshot!(report, @r#"
    {
      "source": "orders.csv",
      "rows": 4,
      "columns": 4,
      "profiles": [
        {
          "name": "id",
          "storage": "integer",
          "classification": {
            "type": "numerical",
            "confidence": "high"
          },
          "non_null": 4,
          "null": 0,
          "missing": 0,
          "unique": 3
        },
        {
          "name": "price",
          "storage": "text",
          "classification": {
            "type": "currency",
            "confidence": "high"
          },
          "non_null": 3,
          "null": 1,
          "missing": 1,
          "unique": 2
        },
        {
          "name": "paid",
          "storage": "text",
          "classification": {
            "type": "boolean",
            "confidence": "high"
          },
          "non_null": 4,
          "null": 0,
          "missing": 0,
          "unique": 2
        },
        {
          "name": "city",
          "storage": "text",
          "classification": {
            "type": "categorical",
            "confidence": "high"
          },
          "non_null": 2,
          "null": 2,
          "missing": 2,
          "unique": 1
        }
      ]
    }
    "#);
    assert_eq!(report.total_missing(), 3);
}

#[test]
fn test_missing_report() {
    let dir = TempDir::new().unwrap();
    let report = missing_file(&orders_file(&dir)).unwrap();

    let names: Vec<&str> = report
        .columns
        .iter()
        .map(|c| c.summary.column.as_str())
        .collect();
    assert_eq!(names, vec!["price", "city"]);

    let price = &report.columns[0];
    assert_eq!(price.summary.semantic_type, SemanticType::Currency);
    assert_eq!(price.summary.missing_percent, 25.0);
    assert!(price.options.contains(&TreatmentKind::Median));

    let city = &report.columns[1];
    assert_eq!(city.summary.missing_count, 2);
    assert_eq!(city.options[0], TreatmentKind::Mode);
}

#[test]
fn test_clean_file() {
    let dir = TempDir::new().unwrap();
    let recipe = dir.path().join("recipe.toml");
    fs::write(
        &recipe,
        "[[steps]]\nstep = \"treat_missing\"\ncolumn = \"city\"\nmethod = \"mode\"\n",
    )
    .unwrap();
    let audit = dir.path().join("audit.csv");
    let options = CleanOptions {
        recipe: Some(recipe),
        audit_log: Some(audit.clone()),
        ..clean_options(&dir)
    };

    let result = clean_file(&options).unwrap();
    assert_eq!(result.duplicates_removed, Some(1));
    assert_eq!(result.text_columns_trimmed, None);
    assert_eq!(result.recipe_steps, 1);
    assert_eq!(result.summary.original_rows, 4);
    assert_eq!(result.summary.rows, 3);
    assert_eq!(result.currency[0].mean, Some(11.25));
    assert_eq!(result.actions.len(), 5);
    assert!(result.actions[4].ends_with("Applied Mode to 'city' - Affected rows: 0"));

    assert_eq!(
        fs::read_to_string(&options.output).unwrap(),
        "id,price,paid,city\n1,10.0,yes,Oslo\n2,,no,Oslo\n3,12.5,yes,Oslo\n"
    );
    let audit_lines = fs::read_to_string(&audit).unwrap();
    assert_eq!(audit_lines.lines().count(), 6);
}

#[test]
fn test_clean_file_to_xlsx() {
    let dir = TempDir::new().unwrap();
    let options = CleanOptions {
        output: dir.path().join("clean.xlsx"),
        format: ExportFormat::Excel,
        ..clean_options(&dir)
    };

    clean_file(&options).unwrap();
    let table = read_table(&options.output).unwrap();
    assert_eq!(table.height(), 3);
    assert_eq!(
        table.column("price").unwrap().values(),
        &[CellValue::Int(10), CellValue::Null, CellValue::Float(12.5)]
    );
}

#[test]
fn test_clean_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let options = CleanOptions {
        currency_columns: vec!["missing_column".to_string()],
        ..clean_options(&dir)
    };

    let error = clean_file(&options).unwrap_err();
    assert!(format!("{error:#}").contains("clean currency column 'missing_column'"));
    assert!(!options.output.exists());
}
