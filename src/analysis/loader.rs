//! Tabular loader: workbook bytes to a [`Table`] keyed by product code.
use crate::analysis::table::{CellValue, Row, Table};
use crate::error::FormatError;
use crate::options::AnalysisOptions;
use crate::spreadsheet::{Cell, CellType, Criteria, XlsxSpreadsheet};
use std::collections::HashMap;
use tracing::debug;

/// Parses the selected worksheet: first populated row is the header, every row
/// below it is data. Fails when the identifier or judgement column is absent.
pub fn load_table(name: &str, bytes: &[u8], options: &AnalysisOptions) -> Result<Table, FormatError> {
    let criteria = Criteria::new(options.sheet.as_deref())?;
    let mut spreadsheet = XlsxSpreadsheet::open(name, bytes)?;
    let Some(sheet) = spreadsheet.read_sheet(&criteria)? else {
        debug!("Worksheets of '{}': {:?}", name, spreadsheet.sheet_names().collect::<Vec<_>>());
        return Err(FormatError::SheetNotFound(options.sheet.clone().unwrap_or_default()));
    };
    if sheet.is_empty() {
        return Err(FormatError::MissingHeaderRow(sheet.name));
    }

    let mut grid = sheet.rows();
    let header = grid.next().unwrap_or_default();
    let width = header.last().map_or(0, |cell| cell.col + 1);
    let mut names = vec![None; width];
    for cell in header {
        names[cell.col] = Some(cell.to_string().trim().to_string());
    }
    let columns = dedupe_columns(
        names
            .into_iter()
            .enumerate()
            .map(|(position, name)| name.unwrap_or_else(|| format!("Unnamed: {position}")))
            .collect(),
    );

    let find = |name: &str| {
        columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| FormatError::MissingColumn(name.to_string()))
    };
    let identifier = find(&options.identifier_column)?;
    let judgement = find(&options.judgement_column)?;

    let mut dropped = 0usize;
    let rows: Vec<Row> = grid
        .map(|cells| {
            let mut values = vec![CellValue::Missing; width];
            for cell in cells {
                match values.get_mut(cell.col) {
                    Some(value) => *value = to_value(cell),
                    None => dropped += 1,
                }
            }
            let product_code = values[identifier]
                .as_text()
                .map(|text| text.chars().take(options.product_code_len).collect())
                .unwrap_or_default();
            Row { product_code, values }
        })
        .collect();
    if dropped > 0 {
        debug!("Ignored {} cells right of the last header column", dropped);
    }

    debug!(
        "Loaded sheet '{}' from '{}': {} columns, {} rows",
        sheet.name,
        name,
        columns.len(),
        rows.len()
    );
    Ok(Table { columns, rows, identifier, judgement })
}

/// Suffixes repeated header names with `.1`, `.2`, ... so every column name is unique.
fn dedupe_columns(names: Vec<String>) -> Vec<String> {
    let mut seen = HashMap::<String, usize>::new();
    names
        .into_iter()
        .map(|name| {
            let mut name = name;
            let mut count = seen.get(&name).copied().unwrap_or(0);
            while count > 0 {
                seen.insert(name.clone(), count + 1);
                name = format!("{name}.{count}");
                count = seen.get(&name).copied().unwrap_or(0);
            }
            seen.insert(name.clone(), count + 1);
            name
        })
        .collect()
}

fn to_value(cell: &Cell) -> CellValue {
    match cell.kind {
        CellType::Empty => CellValue::Missing,
        CellType::Number | CellType::Boolean => match cell.to_double() {
            Some(value) => CellValue::Number(value),
            None => CellValue::Text(cell.value.to_owned()),
        },
        CellType::Error => {
            debug!("Error value {} at {}", cell.value, cell.reference());
            CellValue::Text(cell.value.to_owned())
        }
        _ if cell.kind.is_text() && cell.value.is_empty() => CellValue::Missing,
        _ => CellValue::Text(cell.to_string()),
    }
}
