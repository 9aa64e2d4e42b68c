use crate::spreadsheet::cell::Cell;

/// A worksheet read from a workbook, stored sparsely as its populated cells.
pub(crate) struct Sheet {
    /// Sheet name
    pub(crate) name: String,
    /// Populated cells in row-major order once finished
    pub(crate) cells: Vec<Cell>,
}

impl Sheet {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(super) fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Sorts cells into row-major order; worksheets written out of order still read correctly.
    pub(super) fn finish(&mut self) {
        self.cells.sort_by_key(|cell| (cell.row, cell.col));
    }

    /// Populated rows in worksheet order, each holding its cells by column.
    /// Rows without any cell are not returned.
    pub(crate) fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunk_by(|a, b| a.row == b.row)
    }
}
