use thiserror::Error;

/// Low-level failure while decoding the workbook container.
/// Aggregates errors from the standard library, the ZIP/XML stack and the reader helpers.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),
}

/// The uploaded file is not a workbook of the expected shape.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Unsupported file '{0}': please select a .xlsx file")]
    UnsupportedFile(String),

    #[error("Cannot read workbook: {0}")]
    Unreadable(#[from] ReadError),

    #[error("No worksheet matches '{0}'")]
    SheetNotFound(String),

    #[error("Worksheet '{0}' has no header row")]
    MissingHeaderRow(String),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("No '{label}' row within the first {rows} rows")]
    MissingLimitRow { label: String, rows: usize },
}

/// Unexpected failure after the workbook was accepted.
#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("Artifact write to '{path}' failed: {source}")]
    Artifact {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A chart was requested before one exists.
#[derive(Error, Debug)]
pub enum NotFoundError {
    #[error("No plot available yet")]
    NoArtifact,

    #[error("No plot for run '{0}'")]
    UnknownRun(String),
}

/// Umbrella error of the analysis core.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{0}")]
    Format(#[from] FormatError),

    #[error("{0}")]
    Compute(#[from] ComputeError),

    #[error("{0}")]
    NotFound(#[from] NotFoundError),
}

impl From<ReadError> for AnalysisError {
    fn from(error: ReadError) -> Self {
        AnalysisError::Format(FormatError::Unreadable(error))
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, ReadError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| ReadError::WithContextError(format!("{}: {}", message, e)))
    }
}
