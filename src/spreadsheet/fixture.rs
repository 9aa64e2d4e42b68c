//! In-memory `.xlsx` builder for tests.
use std::io::Cursor;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

#[derive(Clone, Debug)]
pub(crate) enum FixtureCell {
    Blank,
    Text(String),
    Shared(String),
    Number(f64),
    Boolean(bool),
    Error(String),
}

impl FixtureCell {
    pub(crate) fn text(value: &str) -> Self {
        FixtureCell::Text(value.to_owned())
    }

    pub(crate) fn number(value: f64) -> Self {
        FixtureCell::Number(value)
    }
}

struct FixtureSheet {
    name: String,
    rows: Vec<Vec<FixtureCell>>,
    raw: Option<String>,
}

pub(crate) struct Fixture {
    sheets: Vec<FixtureSheet>,
    raw_shared_strings: Option<String>,
}

impl Fixture {
    pub(crate) fn new(sheet_name: &str) -> Self {
        Fixture { sheets: Vec::new(), raw_shared_strings: None }.sheet(sheet_name)
    }

    /// Adds a worksheet; subsequent rows go to it.
    pub(crate) fn sheet(mut self, name: &str) -> Self {
        self.sheets.push(FixtureSheet { name: name.to_owned(), rows: Vec::new(), raw: None });
        self
    }

    pub(crate) fn row(mut self, cells: Vec<FixtureCell>) -> Self {
        if let Some(sheet) = self.sheets.last_mut() {
            sheet.rows.push(cells);
        }
        self
    }

    pub(crate) fn rows(self, rows: Vec<Vec<FixtureCell>>) -> Self {
        rows.into_iter().fold(self, Fixture::row)
    }

    /// Replaces the current worksheet part with literal XML.
    pub(crate) fn raw_sheet(mut self, xml: &str) -> Self {
        if let Some(sheet) = self.sheets.last_mut() {
            sheet.raw = Some(xml.to_owned());
        }
        self
    }

    pub(crate) fn raw_shared_strings(mut self, xml: &str) -> Self {
        self.raw_shared_strings = Some(xml.to_owned());
        self
    }

    pub(crate) fn empty_workbook() -> Vec<u8> {
        Fixture { sheets: Vec::new(), raw_shared_strings: None }.build()
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut shared = Vec::<String>::new();
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let mut workbook = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
        );
        let mut relationships = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (index, sheet) in self.sheets.iter().enumerate() {
            let id = index + 1;
            workbook.push_str(&format!(
                r#"<sheet name="{}" sheetId="{id}" r:id="rId{id}"/>"#,
                escape(&sheet.name)
            ));
            relationships.push_str(&format!(
                r#"<Relationship Id="rId{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{id}.xml"/>"#
            ));
        }
        workbook.push_str("</sheets></workbook>");
        relationships.push_str("</Relationships>");

        let mut parts = vec![
            ("xl/workbook.xml".to_string(), workbook),
            ("xl/_rels/workbook.xml.rels".to_string(), relationships),
        ];
        for (index, sheet) in self.sheets.iter().enumerate() {
            let xml = match &sheet.raw {
                Some(raw) => raw.to_owned(),
                None => sheet_xml(&sheet.rows, &mut shared),
            };
            parts.push((format!("xl/worksheets/sheet{}.xml", index + 1), xml));
        }
        let shared_strings = self.raw_shared_strings.or_else(|| {
            (!shared.is_empty()).then(|| {
                let items: String = shared
                    .iter()
                    .map(|value| format!("<si><t>{}</t></si>", escape(value)))
                    .collect();
                format!(r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{items}</sst>"#)
            })
        });
        if let Some(xml) = shared_strings {
            parts.push(("xl/sharedStrings.xml".to_string(), xml));
        }

        for (name, xml) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

fn sheet_xml(rows: &[Vec<FixtureCell>], shared: &mut Vec<String>) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row, cells) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, row + 1));
        for (col, cell) in cells.iter().enumerate() {
            let reference = crate::spreadsheet::reference::index_to_reference(row, col);
            match cell {
                FixtureCell::Blank => (),
                FixtureCell::Text(value) => xml.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(value)
                )),
                FixtureCell::Shared(value) => {
                    shared.push(value.to_owned());
                    xml.push_str(&format!(r#"<c r="{reference}" t="s"><v>{}</v></c>"#, shared.len() - 1));
                }
                FixtureCell::Number(value) => {
                    xml.push_str(&format!(r#"<c r="{reference}"><v>{value}</v></c>"#))
                }
                FixtureCell::Boolean(value) => xml.push_str(&format!(
                    r#"<c r="{reference}" t="b"><v>{}</v></c>"#,
                    u8::from(*value)
                )),
                FixtureCell::Error(value) => xml.push_str(&format!(
                    r#"<c r="{reference}" t="e"><v>{}</v></c>"#,
                    escape(value)
                )),
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
