use crate::error::ReadError;
use crate::error::ResultMessage;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::excel;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::excel::ByteReader;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::reference::row_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io::BufRead;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_VALUE: QName = QName(b"v");                 // Cell value content

/// An Excel XLSX workbook held in memory
pub(crate) struct XlsxSpreadsheet<'a> {
    /// File name of the workbook, used in messages
    pub(crate) name: String,
    /// ZIP archive containing the XLSX parts
    zip: ZipArchive<ByteReader<'a>>,
    /// Worksheets as (name, zip_path) pairs in workbook order
    sheets: Vec<(String, String)>,
}

impl<'a> XlsxSpreadsheet<'a> {
    /// Opens workbook bytes and reads the worksheet list
    pub(crate) fn open(name: &str, bytes: &'a [u8]) -> Result<XlsxSpreadsheet<'a>, ReadError> {
        let mut zip = excel::open(name, bytes)?;
        let sheets = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(name.to_owned()))?
        }
        Ok(XlsxSpreadsheet {
            name: name.to_owned(),
            zip,
            sheets,
        })
    }

    /// Names of the worksheets in workbook order
    pub(crate) fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(name, _)| name.as_str())
    }

    /// Loads the shared string table
    ///
    /// Shared strings are stored once in a separate part and referenced by index
    /// from `t="s"` cells.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, ReadError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };

        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                shared_strings.push(string);
            }
        });
        Ok(shared_strings)
    }

    /// Reads the first worksheet accepted by the criteria
    ///
    /// Returns `None` when no worksheet name matches.
    pub(crate) fn read_sheet(&mut self, criteria: &Criteria) -> Result<Option<Sheet>, ReadError> {
        let Some((sheet_name, zip_path)) = self.sheets
            .iter()
            .find(|(sheet_name, _)| criteria.accept(sheet_name))
            .cloned()
        else {
            return Ok(None);
        };

        let shared_strings = self.load_shared_strings()
            .with_prefix("read shared strings")?;
        let mut sheet = Sheet::new(&sheet_name);
        let mut reader = self.zip.xml_reader(&zip_path)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;

        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => {
                if let Some(label) = event.get_attribute_value("r")? {
                    row_count = row_to_index(&label)
                        .ok_or_else(|| SpreadsheetError::CellReferenceError(label.to_string()))?;
                }
                col_count = 0;
            }
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
                col_count = 0;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = match event.get_attribute_value("r")? {
                    Some(reference) => reference_to_index(&reference)
                        .ok_or_else(|| SpreadsheetError::CellReferenceError(reference.to_string()))?,
                    None => (row_count, col_count),
                };
                col_count = col + 1;
                kind = CellType::from_type_attribute(event.get_attribute_value("t")?.as_deref());
                value.clear();
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if event.name() == TAG_CELL => {
                if kind != CellType::Empty && !value.is_empty() {
                    if kind == CellType::SharedString {
                        value = value.trim()
                            .parse::<usize>()
                            .ok()
                            .and_then(|index| shared_strings.get(index))
                            .cloned()
                            .ok_or_else(|| ReadError::WithContextError(format!(
                                "shared string '{}' at {} out of range",
                                value,
                                index_to_reference(row, col)
                            )))?;
                    }
                    sheet.push(Cell {
                        row,
                        col,
                        kind,
                        value: std::mem::take(&mut value),
                    });
                }
                kind = CellType::Empty;
            }
        });
        sheet.finish();
        Ok(Some(sheet))
    }
}

/// Loads worksheet names and their part paths from `xl/workbook.xml`
fn load_workbook(zip: &mut ZipArchive<ByteReader<'_>>) -> Result<Vec<(String, String)>, ReadError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(id.as_ref()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
    });
    Ok(sheets)
}

/// Reads string content up to `end_tag`, skipping phonetic runs
///
/// With `is_text_content` the element's own text counts (`<v>`); otherwise only
/// `<t>` children do (`<si>`, `<is>`, rich text runs).
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, ReadError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
