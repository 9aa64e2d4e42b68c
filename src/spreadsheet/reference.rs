//! A1-style cell reference conversion.
use regex::Regex;
use std::sync::OnceLock;

/// Worksheet size limits of Excel 2007+: rows 1..=1048576, columns A..=XFD.
pub(crate) const MAX_ROWS: usize = 1_048_576;
pub(crate) const MAX_COLS: usize = 16_384;

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\$?([A-Z]{1,3})\$?([1-9]\d*)$").expect("Hardcode regex pattern"))
}

/// Converts a column name ("A", "AB") to a 0-based index, `None` beyond `XFD`.
pub(crate) fn col_to_index(name: &str) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    name.chars().try_fold(0usize, |index, character| {
        character
            .is_ascii_uppercase()
            .then(|| index * 26 + (character as usize - 'A' as usize + 1))
    })
    .map(|index| index - 1)
    .filter(|index| *index < MAX_COLS)
}

/// Converts a 1-based row label ("12") to a 0-based index, `None` beyond row 1048576.
pub(crate) fn row_to_index(label: &str) -> Option<usize> {
    label.parse::<usize>().ok().filter(|row| (1..=MAX_ROWS).contains(row)).map(|row| row - 1)
}

/// Parses a cell reference ("B12", "$B$12") into 0-based (row, col).
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let value = reference.to_ascii_uppercase();
    let captures = reference_pattern().captures(&value)?;
    let col = captures.get(1).map(|matcher| matcher.as_str()).and_then(col_to_index)?;
    let row = captures.get(2).map(|matcher| matcher.as_str()).and_then(row_to_index)?;
    Some((row, col))
}

/// Converts a 0-based column index to its name.
pub(crate) fn index_to_col(mut col: usize) -> String {
    let mut name = Vec::<u8>::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Converts 0-based (row, col) to a cell reference such as "B12".
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", index_to_col(col), row + 1)
}
