use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Layout of the test-result workbook and the knobs of the failure analysis.
///
/// Every field has a default matching the production line exports, so a JSON
/// config file only needs to name what differs.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisOptions {
    /// Column whose text prefix identifies the product
    pub identifier_column: String,
    /// Column holding the overall verdict of a unit
    pub judgement_column: String,
    /// Verdict value marking a failed unit
    pub failing_judgement: String,
    /// Number of leading identifier characters forming the product code
    pub product_code_len: usize,
    /// Number of leading data rows holding benchmark and limit rows
    pub benchmark_rows: usize,
    pub upper_limit_label: String,
    pub lower_limit_label: String,
    /// Position of the first test column; earlier columns are metadata
    pub test_column_offset: usize,
    /// Length of ranked outputs
    pub top_k: usize,
    /// Replace missing, NaN, infinite and not-available (`#N/A`, `NULL`, ...) test
    /// cells with 0 before comparing. Blank limits then become 0 and blank readings
    /// are compared as 0; other text stays non-numeric.
    pub normalize_invalid: bool,
    /// Cut structured-report test names at the first " (" (unit annotations)
    pub strip_unit_suffix: bool,
    /// Glob pattern selecting the worksheet; the first sheet when unset
    pub sheet: Option<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            identifier_column: "File name".to_string(),
            judgement_column: "Judgement".to_string(),
            failing_judgement: "NG".to_string(),
            product_code_len: 8,
            benchmark_rows: 8,
            upper_limit_label: "Upper limit".to_string(),
            lower_limit_label: "Lower limit".to_string(),
            test_column_offset: 2,
            top_k: 15,
            normalize_invalid: false,
            strip_unit_suffix: false,
            sheet: None,
        }
    }
}

impl AnalysisOptions {
    /// Reads options from a JSON file; absent fields keep their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config '{}'", path.display()))
    }

    /// Truncates a label the way product codes are derived, so limit rows can be
    /// found by comparing codes.
    pub(crate) fn label_code(&self, label: &str) -> String {
        label.chars().take(self.product_code_len).collect()
    }
}
