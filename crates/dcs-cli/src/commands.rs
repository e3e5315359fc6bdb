use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use dcs_cli::pipeline::{CleanOptions, clean_file, missing_file, profile_file};
use dcs_ingest::ExportFormat;
use dcs_model::{CurrencyFormatConfig, DecimalSeparator, ThousandSeparator};

use crate::cli::{CleanArgs, ExportFormatArg, InputArgs};
use crate::summary::{print_clean, print_missing, print_profile};

pub fn run_profile(args: &InputArgs) -> Result<()> {
    let report = profile_file(&args.file)?;
    if args.json {
        print_json(&report)
    } else {
        print_profile(&report);
        Ok(())
    }
}

pub fn run_missing(args: &InputArgs) -> Result<()> {
    let report = missing_file(&args.file)?;
    if args.json {
        print_json(&report)
    } else {
        print_missing(&report);
        Ok(())
    }
}

pub fn run_clean(args: &CleanArgs) -> Result<()> {
    let options = CleanOptions {
        input: args.file.clone(),
        output: args.output.clone(),
        format: export_format(args.format, &args.output),
        recipe: args.recipe.clone(),
        currency_columns: args.currency.clone(),
        currency_format: currency_format(&args.symbol, args.decimal, args.thousands.as_deref())?,
        dedupe: args.dedupe,
        trim: args.trim,
        audit_log: args.audit_log.clone(),
    };
    let result = clean_file(&options)?;
    if args.json {
        print_json(&result)
    } else {
        print_clean(&result);
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize report")?;
    println!("{text}");
    Ok(())
}

/// An explicit `--format` wins; otherwise the output extension decides.
fn export_format(arg: Option<ExportFormatArg>, output: &Path) -> ExportFormat {
    match arg {
        Some(ExportFormatArg::Csv) => ExportFormat::Csv,
        Some(ExportFormatArg::Json) => ExportFormat::Json,
        Some(ExportFormatArg::Xlsx) => ExportFormat::Excel,
        None => output
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .unwrap_or_default(),
    }
}

fn currency_format(
    symbol: &str,
    decimal: char,
    thousands: Option<&str>,
) -> Result<CurrencyFormatConfig> {
    let thousands = match thousands {
        None => {
            let decimal = DecimalSeparator::try_from(decimal).context("invalid currency format")?;
            ThousandSeparator::default_for(decimal).as_char()
        }
        Some(text) if text.eq_ignore_ascii_case("none") => None,
        Some(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => bail!("thousands separator must be one character or 'none', got '{text}'"),
            }
        }
    };
    CurrencyFormatConfig::from_chars(symbol, decimal, thousands).context("invalid currency format")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format() {
        assert_eq!(
            export_format(None, Path::new("out.JSON")),
            ExportFormat::Json
        );
        assert_eq!(export_format(None, Path::new("out.txt")), ExportFormat::Csv);
        assert_eq!(
            export_format(Some(ExportFormatArg::Csv), Path::new("out.json")),
            ExportFormat::Csv
        );
        assert_eq!(
            export_format(None, Path::new("clean.xlsx")),
            ExportFormat::Excel
        );
        assert_eq!(
            export_format(Some(ExportFormatArg::Xlsx), Path::new("out.csv")),
            ExportFormat::Excel
        );
    }

    #[test]
    fn test_currency_format() {
        let config = currency_format("€", ',', Some(".")).unwrap();
        assert_eq!(config, CurrencyFormatConfig::european());

        let config = currency_format("$", '.', Some("none")).unwrap();
        assert_eq!(config.decimal_separator(), DecimalSeparator::Dot);
        assert_eq!(config.thousand_separator(), ThousandSeparator::None);

        assert!(currency_format("$", '.', Some(".")).is_err());
        assert!(currency_format("$", '.', Some("'")).is_err());
        assert!(currency_format("$", '.', Some(",,")).is_err());
    }

    #[test]
    fn test_currency_format_default_thousands() {
        let config = currency_format("€", ',', None).unwrap();
        assert_eq!(config, CurrencyFormatConfig::european());
        assert_eq!(currency_format("$", '.', None).unwrap(), CurrencyFormatConfig::us());
        assert!(currency_format("$", ';', None).is_err());
    }
}
