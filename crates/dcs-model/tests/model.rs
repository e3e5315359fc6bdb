//! Integration tests for the data model.

use dcs_model::{
    CellValue, ClassificationResult, Column, Confidence, CurrencyFormatConfig, DecimalSeparator,
    SemanticType, StorageKind, Table, ThousandSeparator,
};

#[test]
fn classification_result_serializes_lowercase() {
    let result = ClassificationResult::medium(SemanticType::DateTime);
    let json = serde_json::to_string(&result).expect("serialize result");
    assert_eq!(json, r#"{"type":"datetime","confidence":"medium"}"#);

    let round: ClassificationResult = serde_json::from_str(&json).expect("deserialize result");
    assert_eq!(round, result);
}

#[test]
fn currency_config_deserializes_with_defaults() {
    let config: CurrencyFormatConfig =
        serde_json::from_str(r#"{"symbol":"€","decimal_separator":",","thousand_separator":"."}"#)
            .expect("deserialize config");
    assert_eq!(config, CurrencyFormatConfig::european());

    let config: CurrencyFormatConfig = serde_json::from_str("{}").expect("defaults");
    assert_eq!(config.symbol(), "$");
    assert_eq!(config.decimal_separator(), DecimalSeparator::Dot);
    assert_eq!(config.thousand_separator(), ThousandSeparator::Comma);
}

#[test]
fn currency_config_decimal_comma_alone_groups_with_dots() {
    let config: CurrencyFormatConfig =
        serde_json::from_str(r#"{"symbol":"€","decimal_separator":","}"#)
            .expect("decimal comma without thousands");
    assert_eq!(config, CurrencyFormatConfig::european());

    let config: CurrencyFormatConfig =
        serde_json::from_str(r#"{"decimal_separator":",","thousand_separator":"none"}"#)
            .expect("explicit none");
    assert_eq!(config.thousand_separator(), ThousandSeparator::None);
}

#[test]
fn currency_config_rejects_conflicting_separators_on_deserialize() {
    let result: Result<CurrencyFormatConfig, _> =
        serde_json::from_str(r#"{"decimal_separator":",","thousand_separator":","}"#);
    assert!(result.is_err());
}

#[test]
fn table_preserves_column_order_and_storage() {
    let table = Table::new(vec![
        Column::new("flag", vec![true, false]),
        Column::new("score", vec![Some(1.5), None]),
        Column::new("note", vec!["a", "b"]),
    ])
    .expect("valid table");

    assert_eq!(table.column_names(), vec!["flag", "score", "note"]);
    assert_eq!(table.column("flag").unwrap().storage(), StorageKind::Boolean);
    assert_eq!(table.column("score").unwrap().storage(), StorageKind::Float);
    assert_eq!(table.column("note").unwrap().storage(), StorageKind::Text);
    assert_eq!(
        table.row(1).unwrap(),
        vec![
            &CellValue::Bool(false),
            &CellValue::Null,
            &CellValue::text("b")
        ]
    );
}

#[test]
fn confidence_displays_lowercase() {
    assert_eq!(Confidence::High.to_string(), "high");
    assert_eq!(Confidence::Medium.to_string(), "medium");
}
