//! Turns failing units into one of the two response payloads.
mod chart;

pub use chart::render_ranking_svg;

use crate::analysis::{count_occurrences, summarize_by_unit, FailingUnit, OccurrenceCount, RankedReport};
use crate::artifact::{Artifact, ArtifactStore};
use crate::error::ComputeError;
use crate::options::AnalysisOptions;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    /// Ranked per-test report with product breakdown
    #[default]
    Structured,
    /// Ranked occurrence counts rendered as a bar chart
    Chart,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSummary {
    /// Top of the full ranking, even when `top_k` hides it; `None` when no test failed
    pub most_failed_test: Option<String>,
    pub counts: Vec<OccurrenceCount>,
    pub artifact: Artifact,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AnalysisOutput {
    Structured(RankedReport),
    Chart(ChartSummary),
}

pub fn present(
    units: &[FailingUnit],
    mode: PresentationMode,
    options: &AnalysisOptions,
    store: &ArtifactStore,
) -> Result<AnalysisOutput, ComputeError> {
    match mode {
        PresentationMode::Structured => Ok(AnalysisOutput::Structured(summarize_by_unit(units, options))),
        PresentationMode::Chart => {
            let mut counts = count_occurrences(units, usize::MAX);
            let most_failed_test = counts.first().map(|count| count.test_name.to_owned());
            counts.truncate(options.top_k);
            let svg = render_ranking_svg(&counts, placeholder(units, &counts))?;
            let artifact = store.publish(svg.as_bytes(), "svg")?;
            Ok(AnalysisOutput::Chart(ChartSummary { most_failed_test, counts, artifact }))
        }
    }
}

/// Message drawn when the ranking has no bars.
fn placeholder(units: &[FailingUnit], counts: &[OccurrenceCount]) -> &'static str {
    if units.is_empty() {
        "No failing units"
    } else if units.iter().all(|unit| unit.failed_tests.is_empty()) {
        "No out-of-limit tests"
    } else if counts.is_empty() {
        "No tests ranked"
    } else {
        ""
    }
}
