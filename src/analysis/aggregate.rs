//! Failure aggregator: rolls failing units up per test and per product.
//!
//! Two metrics are produced from the same failing units and are deliberately kept
//! apart:
//!
//! - [`summarize_by_unit`] counts, per test, the failing units citing it
//!   (`total_failures`) and breaks that down by product code.
//! - [`count_occurrences`] counts every citation of a test name after cutting unit
//!   annotations, which is what the chart ranks.
use crate::analysis::benchmark::Benchmarks;
use crate::analysis::classify::classify;
use crate::analysis::table::{Row, Table};
use crate::options::AnalysisOptions;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::info;

/// A failing-judgement row reduced to what the aggregation needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FailingUnit {
    pub product_code: String,
    pub failed_tests: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductFailures {
    pub product_code: String,
    pub failures: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FailureSummaryEntry {
    pub test_name: String,
    pub total_failures: usize,
    /// Sorted by product code
    pub products: Vec<ProductFailures>,
}

/// Tests ranked by `total_failures`, longest first, at most `top_k` entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RankedReport {
    pub tests: Vec<FailureSummaryEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OccurrenceCount {
    pub test_name: String,
    pub occurrences: usize,
}

/// Cuts a test name at its first `" ("`, dropping unit annotations such as `"Vout (mV)"`.
pub fn strip_unit_suffix(name: &str) -> &str {
    match name.find(" (") {
        Some(index) => &name[..index],
        None => name,
    }
}

/// Classifies every measurement row judged failing; other rows are never classified.
pub fn failing_units(
    table: &Table,
    measurements: &[Row],
    benchmarks: &Benchmarks,
    options: &AnalysisOptions,
) -> Vec<FailingUnit> {
    measurements
        .iter()
        .filter(|row| row.get(table.judgement).as_text() == Some(options.failing_judgement.as_str()))
        .map(|row| FailingUnit {
            product_code: row.product_code.to_owned(),
            failed_tests: classify(row, benchmarks),
        })
        .collect()
}

/// Structured report: per test, the number of failing units citing it and the
/// per-product citation counts, ranked by unit count with ties in discovery order.
pub fn summarize_by_unit(units: &[FailingUnit], options: &AnalysisOptions) -> RankedReport {
    let names: Vec<Vec<&str>> = units
        .iter()
        .map(|unit| {
            unit.failed_tests
                .iter()
                .map(|test| if options.strip_unit_suffix { strip_unit_suffix(test) } else { test.as_str() })
                .collect()
        })
        .collect();

    let mut seen = HashSet::new();
    let discovered: Vec<&str> = names
        .iter()
        .flatten()
        .copied()
        .filter(|name| seen.insert(*name))
        .collect();

    let mut tests: Vec<FailureSummaryEntry> = discovered
        .into_iter()
        .map(|test| {
            let mut total_failures = 0usize;
            let mut products = BTreeMap::<&str, usize>::new();
            for (unit, unit_names) in units.iter().zip(&names) {
                let occurrences = unit_names.iter().filter(|name| **name == test).count();
                if occurrences > 0 {
                    total_failures += 1;
                    *products.entry(unit.product_code.as_str()).or_default() += occurrences;
                }
            }
            FailureSummaryEntry {
                test_name: test.to_string(),
                total_failures,
                products: products
                    .into_iter()
                    .map(|(product_code, failures)| ProductFailures {
                        product_code: product_code.to_string(),
                        failures,
                    })
                    .collect(),
            }
        })
        .collect();

    tests.sort_by(|a, b| b.total_failures.cmp(&a.total_failures));
    let distinct = tests.len();
    tests.truncate(options.top_k);
    info!(
        "{} failing units cite {} distinct tests, reporting top {}",
        units.len(),
        distinct,
        tests.len()
    );
    RankedReport { tests }
}

/// Chart metric: every citation of a test name (unit annotation cut), ranked by
/// count with ties in discovery order, at most `top_k` entries.
pub fn count_occurrences(units: &[FailingUnit], top_k: usize) -> Vec<OccurrenceCount> {
    let mut positions = HashMap::<&str, usize>::new();
    let mut counts = Vec::<OccurrenceCount>::new();
    for test in units.iter().flat_map(|unit| &unit.failed_tests) {
        let name = strip_unit_suffix(test);
        let position = *positions.entry(name).or_insert_with(|| {
            counts.push(OccurrenceCount { test_name: name.to_string(), occurrences: 0 });
            counts.len() - 1
        });
        counts[position].occurrences += 1;
    }
    counts.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    counts.truncate(top_k);
    counts
}
