//! # Workbook Reader
//!
//! Decodes Excel 2007+ workbooks (`.xlsx`, `.xlsm`) held in memory into sparse
//! [`Sheet`]s of typed cells. Only the parts needed to recover cell values are read:
//! the workbook sheet list, worksheet relationships, shared strings and the selected
//! worksheet itself. Number formats are ignored since every reading is compared as a
//! plain number.
pub(crate) mod cell;
pub(crate) mod criteria;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

#[cfg(test)]
pub(crate) mod fixture;

pub(crate) use cell::Cell;
pub(crate) use cell::CellType;
pub(crate) use criteria::Criteria;
pub(crate) use sheet::Sheet;
pub(crate) use xlsx::XlsxSpreadsheet;

use thiserror::Error;

/// Structural problems with the workbook container.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Missing workbook part '{0}'")]
    FileError(String),

    #[error("Workbook '{0}' contains no worksheets")]
    SpreadsheetEmptyError(String),

    #[error("Workbook '{0}' is encrypted or uses the legacy binary format")]
    SpreadsheetCompoundFileError(String),

    #[error("Invalid cell reference '{0}'")]
    CellReferenceError(String),
}
