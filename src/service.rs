//! Request boundary: upload in, JSON payload or chart bytes out.
use crate::analysis::evaluate;
use crate::artifact::ArtifactStore;
use crate::error::{AnalysisError, FormatError};
use crate::options::AnalysisOptions;
use crate::presentation::{present, AnalysisOutput, PresentationMode};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{error, info, warn};

static WORKBOOK_EXTENSION: OnceLock<Regex> = OnceLock::new();

/// What a caller of [`Analyzer`] gets back on failure. Internal errors carry no
/// detail; it is logged instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal Server Error")]
    Internal,
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Internal => 500,
        }
    }
}

/// Analysis options plus the artifact store, shareable across request handlers.
#[derive(Debug)]
pub struct Analyzer {
    options: AnalysisOptions,
    store: ArtifactStore,
}

impl Analyzer {
    pub fn new(options: AnalysisOptions, store: ArtifactStore) -> Self {
        Self { options, store }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Analyses one uploaded workbook.
    pub fn analyse(&self, bytes: &[u8], filename: &str, mode: PresentationMode) -> Result<AnalysisOutput, ServiceError> {
        info!("Analysing '{}' ({} bytes) as {:?}", filename, bytes.len(), mode);
        self.run(bytes, filename, mode).map_err(|e| to_service_error(filename, e))
    }

    /// Bytes of the most recently published chart.
    pub fn plot(&self) -> Result<Vec<u8>, ServiceError> {
        self.store.read_latest().map_err(|e| to_service_error("latest plot", e))
    }

    fn run(&self, bytes: &[u8], filename: &str, mode: PresentationMode) -> Result<AnalysisOutput, AnalysisError> {
        let pattern = WORKBOOK_EXTENSION.get_or_init(|| Regex::new(r"(?i)\.xls[xm]$").expect("Hardcode regex pattern"));
        if !pattern.is_match(filename) {
            return Err(FormatError::UnsupportedFile(filename.to_string()).into());
        }
        let units = evaluate(filename, bytes, &self.options)?;
        Ok(present(&units, mode, &self.options, &self.store)?)
    }
}

fn to_service_error(subject: &str, e: AnalysisError) -> ServiceError {
    match e {
        AnalysisError::Format(FormatError::UnsupportedFile(_)) => {
            warn!("Rejected '{}': not an .xlsx workbook", subject);
            ServiceError::BadRequest("Please select a .xlsx file".to_string())
        }
        AnalysisError::Format(FormatError::Unreadable(e)) => {
            warn!("Rejected '{}': cannot read workbook: {}", subject, e);
            ServiceError::BadRequest("Cannot read workbook".to_string())
        }
        AnalysisError::Format(e) => {
            warn!("Rejected '{}': {}", subject, e);
            ServiceError::BadRequest(e.to_string())
        }
        AnalysisError::NotFound(e) => ServiceError::NotFound(e.to_string()),
        AnalysisError::Compute(e) => {
            error!("Processing '{}' failed: {}", subject, e);
            ServiceError::Internal
        }
    }
}
