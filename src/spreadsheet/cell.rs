use crate::spreadsheet::reference::index_to_reference;
use std::fmt::Display;

/// Types of cell data in a worksheet.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as "1"/"0"
    Boolean,
    /// Numeric values
    Number,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references, resolved to text when read
    SharedString,
    /// Error values such as "#DIV/0!"
    Error,
}

impl CellType {
    /// Maps the `t` attribute of a `<c>` element.
    pub(crate) fn from_type_attribute(kind: Option<&str>) -> Self {
        match kind {
            Some("inlineStr") | Some("str") => Self::InlineString,
            Some("s") => Self::SharedString,
            Some("d") => Self::IsoDateTime,
            Some("b") => Self::Boolean,
            Some("e") => Self::Error,
            _ => Self::Number,
        }
    }

    pub(crate) fn is_text(&self) -> bool {
        matches!(self, Self::InlineString | Self::SharedString)
    }
}

/// A single worksheet cell with position, type and raw value.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Numeric reading of the cell, if it holds one.
    pub(crate) fn to_double(&self) -> Option<f64> {
        match self.kind {
            CellType::Number => self.value.trim().parse::<f64>().ok(),
            CellType::Boolean => Some(if self.value == "1" { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            CellType::Boolean => write!(f, "{}", if self.value == "1" { "TRUE" } else { "FALSE" }),
            CellType::IsoDateTime => write!(f, "{}", self.value.replace('T', " ")),
            _ => write!(f, "{}", self.value),
        }
    }
}
