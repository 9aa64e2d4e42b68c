//! Benchmark extractor: splits the limit block from the measurements.
use crate::analysis::table::{Row, Table};
use crate::error::FormatError;
use crate::options::AnalysisOptions;
use tracing::{debug, warn};

/// Closed tolerance band of one test column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bound {
    pub lower: f64,
    pub upper: f64,
}

impl Bound {
    /// Strictly outside `[lower, upper]`; a reading equal to a limit passes.
    pub fn is_breached_by(&self, value: f64) -> bool {
        value > self.upper || value < self.lower
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkColumn {
    /// Position in the table
    pub index: usize,
    pub name: String,
    /// `None` when either limit cell is blank or non-numeric; such a column never fails
    pub bound: Option<Bound>,
}

/// Per-column limits read from the benchmark block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Benchmarks {
    pub columns: Vec<BenchmarkColumn>,
}

impl Benchmarks {
    /// Limits of the named test column.
    pub fn bounds(&self, column: &str) -> Option<Bound> {
        self.columns
            .iter()
            .find(|benchmark| benchmark.name == column)
            .and_then(|benchmark| benchmark.bound)
    }

    /// Columns that can trigger a failure, in table order.
    pub fn bounded(&self) -> impl Iterator<Item = (&BenchmarkColumn, Bound)> {
        self.columns
            .iter()
            .filter_map(|benchmark| benchmark.bound.map(|bound| (benchmark, bound)))
    }
}

/// Cuts the table after `benchmark_rows` rows and reads the labelled limit rows.
///
/// The cut is positional; a table shorter than the block has no measurements.
pub fn split<'t>(table: &'t Table, options: &AnalysisOptions) -> Result<(Benchmarks, &'t [Row]), FormatError> {
    let cut = options.benchmark_rows.min(table.rows.len());
    let (block, measurements) = table.rows.split_at(cut);

    let find = |label: &str| {
        let code = options.label_code(label);
        block
            .iter()
            .find(|row| row.product_code == code)
            .ok_or_else(|| FormatError::MissingLimitRow {
                label: label.to_string(),
                rows: options.benchmark_rows,
            })
    };
    let upper = find(&options.upper_limit_label)?;
    let lower = find(&options.lower_limit_label)?;

    let columns: Vec<BenchmarkColumn> = table
        .test_columns(options.test_column_offset)
        .into_iter()
        .map(|index| {
            let bound = match (lower.get(index).to_numeric(), upper.get(index).to_numeric()) {
                (Some(lower), Some(upper)) => Some(Bound { lower, upper }),
                _ => None,
            };
            BenchmarkColumn { index, name: table.columns[index].to_owned(), bound }
        })
        .collect();

    let unbounded: Vec<&str> = columns
        .iter()
        .filter(|column| column.bound.is_none())
        .map(|column| column.name.as_str())
        .collect();
    if !unbounded.is_empty() {
        warn!("{} test columns have no usable limits and never fail: {:?}", unbounded.len(), unbounded);
    }
    debug!(
        "Benchmark block of {} rows, {} test columns, {} measurement rows",
        block.len(),
        columns.len(),
        measurements.len()
    );

    Ok((Benchmarks { columns }, measurements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::table::CellValue;

    fn row(code: &str, values: Vec<CellValue>) -> Row {
        Row { product_code: code.to_string(), values }
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn table(rows: Vec<Row>) -> Table {
        Table {
            columns: vec!["File name".into(), "Judgement".into(), "T1".into(), "T2".into(), "T3".into()],
            rows,
            identifier: 0,
            judgement: 1,
        }
    }

    fn options(benchmark_rows: usize) -> AnalysisOptions {
        AnalysisOptions { benchmark_rows, ..AnalysisOptions::default() }
    }

    #[test]
    fn reads_limits_from_labelled_rows() {
        let table = table(vec![
            row("Nominal", vec![text("Nominal"), CellValue::Missing, CellValue::Number(5.0)]),
            row("Lower li", vec![text("Lower limit"), CellValue::Missing, CellValue::Number(0.0), text("1.5"), CellValue::Number(0.0)]),
            row("Upper li", vec![text("Upper limit"), CellValue::Missing, CellValue::Number(10.0), text("2.5"), CellValue::Missing]),
            row("AB123456", vec![text("AB123456-1"), text("NG"), CellValue::Number(15.0)]),
        ]);

        let (benchmarks, measurements) = split(&table, &options(3)).unwrap();
        assert_eq!(measurements.len(), 1);
        assert_eq!(measurements[0].product_code, "AB123456");
        assert_eq!(benchmarks.bounds("T1"), Some(Bound { lower: 0.0, upper: 10.0 }));
        assert_eq!(benchmarks.bounds("T2"), Some(Bound { lower: 1.5, upper: 2.5 }));
        assert_eq!(benchmarks.bounds("T3"), None);
        assert_eq!(benchmarks.bounds("Judgement"), None);
        assert_eq!(benchmarks.columns.len(), 3);
        assert_eq!(benchmarks.bounded().count(), 2);
    }

    #[test]
    fn missing_limit_row_fails_fast() {
        let table = table(vec![
            row("Upper li", vec![text("Upper limit")]),
            row("AB123456", vec![text("AB123456-1")]),
            row("Lower li", vec![text("Lower limit")]),
        ]);
        let error = split(&table, &options(2)).unwrap_err();
        assert!(matches!(error, FormatError::MissingLimitRow { label, rows: 2 } if label == "Lower limit"));
    }

    #[test]
    fn short_table_has_no_measurements() {
        let table = table(vec![
            row("Upper li", vec![text("Upper limit")]),
            row("Lower li", vec![text("Lower limit")]),
        ]);
        let (benchmarks, measurements) = split(&table, &options(8)).unwrap();
        assert!(measurements.is_empty());
        assert_eq!(benchmarks.bounded().count(), 0);
    }

    #[test]
    fn limit_equality_is_not_a_breach() {
        let bound = Bound { lower: 0.0, upper: 10.0 };
        assert!(!bound.is_breached_by(0.0));
        assert!(!bound.is_breached_by(10.0));
        assert!(bound.is_breached_by(10.000001));
        assert!(bound.is_breached_by(-0.5));
        assert!(bound.is_breached_by(f64::INFINITY));
    }
}
