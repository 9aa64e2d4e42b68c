//! Row/column view of a test-result worksheet.

/// Text that stands for "no value" in exported sheets, including the `#N/A` error.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A",
    "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A cell as seen by the analysis: numbers stay numbers, everything else is text.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Missing,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Lenient numeric coercion: text is parsed after trimming, anything that does
    /// not yield a number (including NaN) is `None`.
    pub fn to_numeric(&self) -> Option<f64> {
        let value = match self {
            CellValue::Missing => return None,
            CellValue::Number(value) => *value,
            CellValue::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        (!value.is_nan()).then_some(value)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Missing, or text that is one of the common not-available markers.
    pub fn is_na(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Number(value) => value.is_nan(),
            CellValue::Text(text) => NA_MARKERS.contains(&text.trim()),
        }
    }
}

/// One worksheet row keyed by its product code.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Leading characters of the identifier text; empty when the identifier is not text
    pub product_code: String,
    /// Values aligned with [`Table::columns`]
    pub values: Vec<CellValue>,
}

impl Row {
    pub fn get(&self, column: usize) -> &CellValue {
        self.values.get(column).unwrap_or(&CellValue::Missing)
    }
}

/// Header names plus rows in worksheet order.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Position of the identifier column
    pub identifier: usize,
    /// Position of the judgement column
    pub judgement: usize,
}

impl Table {
    /// Test channel positions: every column from `offset` on, except identifier and judgement.
    pub fn test_columns(&self, offset: usize) -> Vec<usize> {
        (offset..self.columns.len())
            .filter(|column| *column != self.identifier && *column != self.judgement)
            .collect()
    }

    /// Replaces missing, not-available and non-finite test cells with 0 in every row.
    /// Other text is kept and stays non-numeric.
    pub fn normalize_invalid(&mut self, offset: usize) {
        let columns = self.test_columns(offset);
        for row in &mut self.rows {
            if row.values.len() < self.columns.len() {
                row.values.resize(self.columns.len(), CellValue::Missing);
            }
            for column in &columns {
                let value = &mut row.values[*column];
                let invalid = match &*value {
                    CellValue::Number(number) => !number.is_finite(),
                    other => other.is_na(),
                };
                if invalid {
                    *value = CellValue::Number(0.0);
                }
            }
        }
    }
}
