//! # NG Report
//!
//! Benchmark tolerance evaluation for production test-result workbooks. An uploaded
//! `.xlsx` export is split into its benchmark block and its measurement rows, every
//! unit judged "NG" is checked against the per-test upper and lower limits, and the
//! breaches are rolled up into a ranked report.
//!
//! ## Features
//!
//! - **Pure Rust workbook reader**: `.xlsx`/`.xlsm` parsed straight from memory through
//!   the ZIP container and streaming XML, with shared strings and inline strings
//! - **Limit extraction**: "Upper limit"/"Lower limit" rows located by label inside the
//!   leading benchmark block; columns without numeric limits never fail
//! - **Two presentations**: a structured top-k report with per-product breakdown, or a
//!   ranked bar chart (SVG) published as a downloadable artifact
//! - **Configurable layout**: column names, verdict value, block size and ranking
//!   length loaded from JSON
//!
//! ## Entry points
//!
//! - [`Analyzer::analyse`]: upload bytes and filename in, JSON-serializable payload out
//! - [`Analyzer::plot`]: bytes of the most recently published chart
mod helpers;
mod spreadsheet;

pub mod analysis;
pub mod artifact;
pub mod error;
pub mod options;
pub mod presentation;
pub mod service;

pub use analysis::{evaluate, FailingUnit, FailureSummaryEntry, OccurrenceCount, ProductFailures, RankedReport};
pub use artifact::{Artifact, ArtifactStore};
pub use error::{AnalysisError, ComputeError, FormatError, NotFoundError, ReadError};
pub use options::AnalysisOptions;
pub use presentation::{present, AnalysisOutput, ChartSummary, PresentationMode};
pub use service::{Analyzer, ServiceError};
