//! Failure classifier for a single measurement row.
use crate::analysis::benchmark::Benchmarks;
use crate::analysis::table::Row;

/// Names of the test columns whose reading lies strictly outside its band, in
/// column order. Blank and non-numeric readings and unbounded columns never fail.
pub fn classify(row: &Row, benchmarks: &Benchmarks) -> Vec<String> {
    benchmarks
        .bounded()
        .filter(|(column, bound)| {
            row.get(column.index)
                .to_numeric()
                .is_some_and(|value| bound.is_breached_by(value))
        })
        .map(|(column, _)| column.name.to_owned())
        .collect()
}
