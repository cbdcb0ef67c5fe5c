//! PDF reader: AcroForm fields, with a text-extraction fallback

use std::collections::HashSet;
use std::path::Path;

use lopdf::{Dictionary, Document, Object};
use tracing::{debug, info};

use crate::config::ReadOptions;
use crate::convert::{parse_cell, rows_to_table};
use crate::error::{Result, TabportError};
use crate::model::{CellValue, Column, Table};
use crate::sql::{sanitize_column_name, unique_name};

use super::line::parse_line;
use super::{table_name_for, TableReader};

/// Reader for PDF documents.
///
/// Form documents yield a one-row table of field name/value pairs. When the
/// document carries no form fields, page text is extracted and parsed as
/// delimited lines instead.
pub struct PdfReader;

impl TableReader for PdfReader {
    fn read(&self, path: &Path, options: &ReadOptions) -> Result<Table> {
        let doc = Document::load(path)?;
        let name = table_name_for(path, options);

        let fields = form_fields(&doc)?;
        if !fields.is_empty() {
            info!(file = %path.display(), fields = fields.len(), "read PDF form fields");
            return fields_to_table(name, fields);
        }

        debug!(file = %path.display(), "no form fields, falling back to page text");
        text_to_table(&doc, name, options.delimiter)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext == "pdf"
    }
}

/// Collect (name, value) pairs from the document's AcroForm fields.
pub fn form_fields(doc: &Document) -> Result<Vec<(String, String)>> {
    let catalog = doc.catalog()?;

    let acro_form = match catalog.get(b"AcroForm") {
        Ok(obj) => resolve(doc, obj)?.as_dict()?,
        Err(_) => return Ok(Vec::new()),
    };

    let field_refs = match acro_form.get(b"Fields") {
        Ok(obj) => resolve(doc, obj)?.as_array()?,
        Err(_) => return Ok(Vec::new()),
    };

    let mut fields = Vec::new();
    for field_ref in field_refs {
        let field = resolve(doc, field_ref)?.as_dict()?;
        if let Some(name) = field_text(doc, field, b"T") {
            let value = field_text(doc, field, b"V").unwrap_or_default();
            fields.push((name, value));
        }
    }
    Ok(fields)
}

fn fields_to_table(name: String, fields: Vec<(String, String)>) -> Result<Table> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(fields.len());
    let mut cells: Vec<CellValue> = Vec::with_capacity(fields.len());

    for (idx, (field_name, value)) in fields.into_iter().enumerate() {
        let clean = sanitize_column_name(&field_name);
        columns.push(Column::new(unique_name(&clean, &mut seen), idx));
        cells.push(parse_cell(&value));
    }

    let mut table = Table::new(name, columns);
    table.add_row(cells, 1);
    table.infer_column_types();
    Ok(table)
}

fn text_to_table(doc: &Document, name: String, delimiter: char) -> Result<Table> {
    let mut rows = Vec::new();
    let mut line_number = 0;

    for page_number in doc.get_pages().keys() {
        let text = doc.extract_text(&[*page_number])?;
        for line in text.lines() {
            line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            rows.push((parse_line(line, delimiter), line_number));
        }
    }

    if rows.len() < 2 {
        return Err(TabportError::InvalidTable(
            "PDF contains neither form fields nor tabular text".into(),
        ));
    }

    rows_to_table(&name, &rows)
}

/// Read a text entry from a field dictionary, resolving references.
fn field_text(doc: &Document, field: &Dictionary, key: &[u8]) -> Option<String> {
    let obj = field.get(key).ok()?;
    let obj = resolve(doc, obj).ok()?;
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// PDF text strings are either UTF-16BE (with BOM) or PDFDocEncoding;
/// the latter is close enough to Latin-1 for form field names.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let code_units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&code_units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}
