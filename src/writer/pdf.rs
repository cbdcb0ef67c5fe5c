//! PDF form filling

use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use tracing::{info, warn};

use crate::error::{Result, TabportError};
use crate::model::Table;
use crate::reader::pdf::decode_pdf_string;
use crate::sql::sanitize_column_name;

/// Fill a PDF form template with values from the first row of `table`,
/// matching sanitized field names against column names, and save the
/// result to `output`. Returns the number of fields filled.
pub fn fill_form(template: &Path, output: &Path, table: &Table) -> Result<usize> {
    let row = table
        .rows
        .first()
        .ok_or_else(|| TabportError::InvalidTable("table has no rows to write".into()))?;

    let mut doc = Document::load(template)?;
    let field_ids = form_field_ids(&doc)?;
    if field_ids.is_empty() {
        return Err(TabportError::InvalidTable(format!(
            "{} has no form fields",
            template.display()
        )));
    }

    let mut filled = 0;
    for field_id in field_ids {
        let field = doc.get_object(field_id)?.as_dict()?;
        let name = match field.get(b"T") {
            Ok(Object::String(bytes, _)) => decode_pdf_string(bytes),
            _ => continue,
        };

        let column = sanitize_column_name(&name);
        let Some(idx) = table.column_index(&column) else {
            warn!(field = %name, "no matching column for form field");
            continue;
        };

        let value = row.cells[idx].to_text();
        let field = doc.get_object_mut(field_id)?.as_dict_mut()?;
        field.set("V", Object::string_literal(value));
        filled += 1;
    }

    set_need_appearances(&mut doc)?;
    doc.save(output)?;

    info!(file = %output.display(), fields = filled, "filled PDF form");
    Ok(filled)
}

/// Object ids of the AcroForm field dictionaries.
fn form_field_ids(doc: &Document) -> Result<Vec<ObjectId>> {
    let catalog = doc.catalog()?;

    let acro_form = match catalog.get(b"AcroForm") {
        Ok(Object::Reference(id)) => doc.get_object(*id)?.as_dict()?,
        Ok(Object::Dictionary(dict)) => dict,
        _ => return Ok(Vec::new()),
    };

    let fields = match acro_form.get(b"Fields") {
        Ok(Object::Array(items)) => items,
        Ok(Object::Reference(id)) => doc.get_object(*id)?.as_array()?,
        _ => return Ok(Vec::new()),
    };

    Ok(fields
        .iter()
        .filter_map(|item| item.as_reference().ok())
        .collect())
}

/// Ask viewers to regenerate field appearances so new values render.
fn set_need_appearances(doc: &mut Document) -> Result<()> {
    let acro_form_id = {
        let catalog = doc.catalog()?;
        match catalog.get(b"AcroForm") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        }
    };

    if let Some(id) = acro_form_id {
        let acro_form = doc.get_object_mut(id)?.as_dict_mut()?;
        acro_form.set("NeedAppearances", true);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use tempfile::tempdir;

    use crate::model::{CellValue, Column};
    use crate::reader::pdf::form_fields;

    /// Build a one-page document with empty text fields named `field_names`.
    fn form_template(path: &Path, field_names: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let fields: Vec<Object> = field_names
            .iter()
            .map(|name| {
                doc.add_object(dictionary! {
                    "FT" => "Tx",
                    "T" => Object::string_literal(*name),
                })
                .into()
            })
            .collect();
        let form_id = doc.add_object(dictionary! { "Fields" => fields });

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "AcroForm" => form_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn fills_matching_fields_from_first_row() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("template.pdf");
        form_template(&template, &["name", "age"]);

        let mut table = Table::new(
            "people",
            vec![Column::new("name", 0), Column::new("age", 1)],
        );
        table.add_row(vec![CellValue::from("Jane"), CellValue::Int(41)], 2);

        let output = dir.path().join("filled.pdf");
        assert_eq!(fill_form(&template, &output, &table).unwrap(), 2);

        let doc = Document::load(&output).unwrap();
        let fields = form_fields(&doc).unwrap();
        assert!(fields.contains(&("name".to_string(), "Jane".to_string())));
        assert!(fields.contains(&("age".to_string(), "41".to_string())));
    }

    #[test]
    fn fields_without_a_matching_column_are_skipped() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("template.pdf");
        form_template(&template, &["name", "shoe_size"]);

        let mut table = Table::new("people", vec![Column::new("name", 0)]);
        table.add_row(vec![CellValue::from("Jane")], 2);

        let output = dir.path().join("filled.pdf");
        assert_eq!(fill_form(&template, &output, &table).unwrap(), 1);
    }

    #[test]
    fn empty_table_is_rejected() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("template.pdf");
        form_template(&template, &["name"]);

        let table = Table::new("empty", vec![Column::new("name", 0)]);
        let output = dir.path().join("filled.pdf");
        assert!(fill_form(&template, &output, &table).is_err());
    }

    #[test]
    fn template_without_fields_is_rejected() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("plain.pdf");

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(&template).unwrap();

        let mut table = Table::new("t", vec![Column::new("name", 0)]);
        table.add_row(vec![CellValue::from("Jane")], 2);
        assert!(fill_form(&template, &dir.path().join("out.pdf"), &table).is_err());
    }
}
