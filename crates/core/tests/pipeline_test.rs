//! End-to-end pipeline tests over on-disk fixtures.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use ledgerfolio_core::{run_pipeline, Error, PipelineConfig};
use rust_decimal_macros::dec;
use tempfile::TempDir;

const LEDGER_HEADER: &str = "Data Negócio,C/V,Mercado,Prazo,Código,Especificação do Ativo,Quantidade,Preço (R$),Valor Total (R$),Fator de Cotação\n";

fn quote_line(date: &str, code: &str, hundredths: i64) -> String {
    let mut line = vec![b' '; 245];
    line[0..2].copy_from_slice(b"01");
    line[2..10].copy_from_slice(date.as_bytes());
    line[12..24].copy_from_slice(format!("{:<12}", code).as_bytes());
    line[108..121].copy_from_slice(format!("{:013}", hundredths).as_bytes());
    String::from_utf8(line).unwrap()
}

fn write_feed(dir: &Path, name: &str, quotes: &[(&str, &str, i64)]) {
    let mut content = String::from("00COTAHIST.2021BOVESPA 20210805\n");
    for (date, code, hundredths) in quotes {
        content.push_str(&quote_line(date, code, *hundredths));
        content.push('\n');
    }
    content.push_str("99COTAHIST.2021BOVESPA 2021080500000000009\n");
    fs::write(dir.join(name), content).unwrap();
}

fn write_ledger(path: &Path, rows: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut content = LEDGER_HEADER.to_string();
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(path, content).unwrap();
}

struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("import")).unwrap();
        Fixture { root }
    }

    fn import_dir(&self) -> std::path::PathBuf {
        self.root.path().join("import")
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            import_dir: self.import_dir(),
            ledger_path: self.root.path().join("cei").join("data.csv"),
            output_path: self.root.path().join("result").join("result.csv"),
            end_date: NaiveDate::from_ymd_opt(2021, 8, 5),
            ..PipelineConfig::default()
        }
    }
}

fn standard_quotes() -> Vec<(&'static str, &'static str, i64)> {
    vec![
        ("20210802", "PETR4", 1000),
        ("20210802", "BOVA11", 10000),
        ("20210802", "IVVB11", 20000),
        ("20210803", "PETR4", 1100),
        ("20210803", "BOVA11", 10100),
        ("20210805", "PETR4", 1100),
        ("20210805", "BOVA11", 10100),
        ("20210805", "IVVB11", 20000),
    ]
}

#[test]
fn test_pipeline_writes_daily_returns() {
    let fixture = Fixture::new();
    write_feed(&fixture.import_dir(), "COTAHIST_A2021.TXT", &standard_quotes());
    let config = fixture.config();
    write_ledger(
        &config.ledger_path,
        &["02/08/21,C,Mercado a Vista,,PETR4,PETROBRAS PN,100,\"10,00\",\"1000,00\",1"],
    );

    let summary = run_pipeline(&config).unwrap();

    let output = fs::read_to_string(&config.output_path).unwrap();
    // The 4th has no prices and the 5th is measured against the 3rd.
    assert_eq!(output, "03/08/21,10.00,1.00,\n05/08/21,0.00,0.00,\n");

    assert_eq!(summary.trades, 1);
    assert_eq!(summary.prices, 8);
    assert_eq!(summary.snapshots, 4);
    assert_eq!(summary.rows_written, 2);
    assert_eq!(summary.skipped_days, 1);
    assert_eq!(summary.warnings, 0);
    assert_eq!(summary.price_gaps, 2);
    assert_eq!(summary.returns.cumulative_return, dec!(10));
    assert_eq!(
        summary.returns.benchmark_cumulative_returns,
        vec![Some(dec!(1)), None]
    );
}

#[test]
fn test_pipeline_header_and_custom_benchmarks() {
    let fixture = Fixture::new();
    write_feed(&fixture.import_dir(), "COTAHIST_A2021.TXT", &standard_quotes());
    let config = PipelineConfig {
        benchmark_codes: vec!["IVVB11".to_string()],
        include_header: true,
        ..fixture.config()
    };
    write_ledger(
        &config.ledger_path,
        &["02/08/21,C,Mercado a Vista,,PETR4F,PETROBRAS PN,5,\"10,00\",\"50,00\",1"],
    );

    run_pipeline(&config).unwrap();

    let output = fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(
        output,
        "date,portfolio,IVVB11\n03/08/21,10.00,\n05/08/21,0.00,\n"
    );
}

#[test]
fn test_later_feed_overrides_earlier_prices() {
    let fixture = Fixture::new();
    write_feed(&fixture.import_dir(), "COTAHIST_A2021.TXT", &standard_quotes());
    write_feed(
        &fixture.import_dir(),
        "COTAHIST_D03082021.TXT",
        &[("20210803", "PETR4", 1200)],
    );
    let config = fixture.config();
    write_ledger(
        &config.ledger_path,
        &["02/08/21,C,Mercado a Vista,,PETR4,PETROBRAS PN,100,\"10,00\",\"1000,00\",1"],
    );

    run_pipeline(&config).unwrap();

    let output = fs::read_to_string(&config.output_path).unwrap();
    let first_row = output.lines().next().unwrap();
    assert_eq!(first_row, "03/08/21,20.00,1.00,");
}

#[test]
fn test_oversell_is_reported_but_run_completes() {
    let fixture = Fixture::new();
    write_feed(&fixture.import_dir(), "COTAHIST_A2021.TXT", &standard_quotes());
    let config = fixture.config();
    write_ledger(
        &config.ledger_path,
        &[
            "02/08/21,C,Mercado a Vista,,PETR4,PETROBRAS PN,100,\"10,00\",\"1000,00\",1",
            "03/08/21,V,Mercado a Vista,,PETR4,PETROBRAS PN,150,\"11,00\",\"1650,00\",1",
        ],
    );

    let summary = run_pipeline(&config).unwrap();

    assert_eq!(summary.warnings, 1);
    let output = fs::read_to_string(&config.output_path).unwrap();
    // Nothing is held after the sell, so the portfolio return is zero.
    assert!(output.starts_with("03/08/21,0.00,1.00,"));
}

#[test]
fn test_malformed_ledger_aborts_without_output() {
    let fixture = Fixture::new();
    write_feed(&fixture.import_dir(), "COTAHIST_A2021.TXT", &standard_quotes());
    let config = fixture.config();
    write_ledger(
        &config.ledger_path,
        &[
            "02/08/21,C,Mercado a Vista,,PETR4,PETROBRAS PN,100,\"10,00\",\"1000,00\",1",
            "03/08/21,C,Mercado a Vista,,VALE3,VALE ON,cem,\"50,00\",\"5000,00\",1",
        ],
    );

    let error = run_pipeline(&config).unwrap_err();

    assert!(matches!(error, Error::MalformedTrade { line: 3, .. }));
    assert!(!config.output_path.exists());
}

#[test]
fn test_empty_ledger_fails() {
    let fixture = Fixture::new();
    write_feed(&fixture.import_dir(), "COTAHIST_A2021.TXT", &standard_quotes());
    let config = fixture.config();
    write_ledger(&config.ledger_path, &[]);

    let error = run_pipeline(&config).unwrap_err();

    assert!(matches!(error, Error::Calculation(_)));
}

#[test]
fn test_invalid_config_fails_before_reading_inputs() {
    let config = PipelineConfig {
        import_dir: "/nonexistent/import".into(),
        benchmark_codes: Vec::new(),
        ..PipelineConfig::default()
    };

    let error = run_pipeline(&config).unwrap_err();

    assert!(matches!(error, Error::InvalidConfigValue(_)));
}

#[test]
fn test_missing_import_dir_is_ingestion_error() {
    let fixture = Fixture::new();
    let config = PipelineConfig {
        import_dir: fixture.root.path().join("absent"),
        ..fixture.config()
    };

    let error = run_pipeline(&config).unwrap_err();

    assert!(matches!(error, Error::Ingestion { .. }));
}
