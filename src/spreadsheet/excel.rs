//! Office Open XML container helpers
use crate::error::ReadError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Cursor;
use zip::ZipArchive;

/// In-memory workbook bytes
pub(crate) type ByteReader<'a> = Cursor<&'a [u8]>;

/// XML tag name for relationship elements
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Signature of OLE compound documents: legacy `.xls` and password protected workbooks
const COMPOUND_FILE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Opens workbook bytes as a ZIP archive.
pub(super) fn open<'a>(name: &str, bytes: &'a [u8]) -> Result<ZipArchive<ByteReader<'a>>, ReadError> {
    if bytes.starts_with(&COMPOUND_FILE_MAGIC) {
        Err(SpreadsheetError::SpreadsheetCompoundFileError(name.to_owned()))?;
    }
    Ok(ZipArchive::new(Cursor::new(bytes))?)
}

/// Loads the worksheet relationships of the workbook part, keyed by relationship id.
pub(super) fn load_relationships(
    zip: &mut ZipArchive<ByteReader<'_>>,
    path: &str,
) -> Result<HashMap<String, String>, ReadError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Normalizes a relationship target to a path inside the archive.
pub(crate) fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(absolute) = path.strip_prefix('/') {
        absolute.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}
