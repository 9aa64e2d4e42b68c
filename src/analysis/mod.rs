//! Failure analysis pipeline: load, split limits, classify, aggregate.
pub mod aggregate;
pub mod benchmark;
pub mod classify;
pub mod loader;
pub mod table;

pub use aggregate::{
    count_occurrences, failing_units, strip_unit_suffix, summarize_by_unit, FailingUnit, FailureSummaryEntry,
    OccurrenceCount, ProductFailures, RankedReport,
};
pub use benchmark::{BenchmarkColumn, Benchmarks, Bound};
pub use table::{CellValue, Row, Table};

use crate::error::FormatError;
use crate::options::AnalysisOptions;
use tracing::info;

/// Runs the workbook through every stage up to the failing units.
pub fn evaluate(name: &str, bytes: &[u8], options: &AnalysisOptions) -> Result<Vec<FailingUnit>, FormatError> {
    let mut table = loader::load_table(name, bytes, options)?;
    if options.normalize_invalid {
        table.normalize_invalid(options.test_column_offset);
    }
    let (benchmarks, measurements) = benchmark::split(&table, options)?;
    let units = failing_units(&table, measurements, &benchmarks, options);
    info!(
        "'{}': {} measurement rows, {} judged '{}'",
        name,
        measurements.len(),
        units.len(),
        options.failing_judgement
    );
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::fixture::{Fixture, FixtureCell};

    fn text(value: &str) -> FixtureCell {
        FixtureCell::text(value)
    }

    fn number(value: f64) -> FixtureCell {
        FixtureCell::number(value)
    }

    fn workbook(measurements: Vec<Vec<FixtureCell>>) -> Vec<u8> {
        let mut rows = vec![
            vec![text("File name"), text("Judgement"), text("T1"), text("T2")],
            vec![text("Nominal"), FixtureCell::Blank, number(5.0), number(1.0)],
            vec![text("Upper limit"), FixtureCell::Blank, number(10.0)],
            vec![text("Lower limit"), FixtureCell::Blank, number(0.0)],
        ];
        rows.extend(measurements);
        Fixture::new("Results").rows(rows).build()
    }

    fn options() -> AnalysisOptions {
        AnalysisOptions { benchmark_rows: 3, ..AnalysisOptions::default() }
    }

    #[test]
    fn only_failing_rows_are_classified() {
        let bytes = workbook(vec![
            vec![text("AB123456-01"), text("NG"), number(15.0), number(3.0)],
            vec![text("AB123456-02"), text("OK"), number(15.0)],
            vec![text("CD000001-01"), text("NG"), number(5.0)],
            vec![text("CD000001-02"), text("ng"), number(-1.0)],
        ]);
        let units = evaluate("results.xlsx", &bytes, &options()).unwrap();
        assert_eq!(units, vec![
            FailingUnit { product_code: "AB123456".into(), failed_tests: vec!["T1".into()] },
            FailingUnit { product_code: "CD000001".into(), failed_tests: vec![] },
        ]);
    }

    #[test]
    fn normalization_compares_blank_limits_as_zero() {
        let bytes = workbook(vec![vec![text("AB123456-01"), text("NG"), number(5.0), number(3.0)]]);
        let units = evaluate("results.xlsx", &bytes, &options()).unwrap();
        assert!(units[0].failed_tests.is_empty());

        let normalized = AnalysisOptions { normalize_invalid: true, ..options() };
        let units = evaluate("results.xlsx", &bytes, &normalized).unwrap();
        assert_eq!(units[0].failed_tests, vec!["T2"]);
    }

    #[test]
    fn repeated_test_names_count_once_per_column() {
        let bytes = Fixture::new("Results")
            .rows(vec![
                vec![text("File name"), text("Judgement"), text("T1"), text("T1")],
                vec![text("Upper limit"), FixtureCell::Blank, number(10.0), number(10.0)],
                vec![text("Lower limit"), FixtureCell::Blank, number(0.0), number(0.0)],
                vec![text("AB123456-01"), text("NG"), number(15.0), number(15.0)],
            ])
            .build();
        let options = AnalysisOptions { benchmark_rows: 2, ..AnalysisOptions::default() };
        let units = evaluate("results.xlsx", &bytes, &options).unwrap();
        assert_eq!(units[0].failed_tests, vec!["T1", "T1.1"]);

        let report = summarize_by_unit(&units, &options);
        for entry in &report.tests {
            let sum: usize = entry.products.iter().map(|product| product.failures).sum();
            assert_eq!(entry.total_failures, sum);
        }
    }

    #[test]
    fn no_failing_rows() {
        let bytes = workbook(vec![vec![text("AB123456-01"), text("OK"), number(50.0)]]);
        assert!(evaluate("results.xlsx", &bytes, &options()).unwrap().is_empty());
    }

    #[test]
    fn limit_rows_must_sit_in_the_benchmark_block() {
        let bytes = workbook(vec![]);
        let short = AnalysisOptions { benchmark_rows: 2, ..AnalysisOptions::default() };
        let error = evaluate("results.xlsx", &bytes, &short).unwrap_err();
        assert!(matches!(error, FormatError::MissingLimitRow { .. }));
    }
}
