// ddeps-core/src/domain/rules/format.rs
//
// `format` is the discriminator: it decides which of `columns` / `keys` is
// mandatory, forbidden or ignored. Kept as explicit code since a static field
// table cannot say "required only when the sibling equals X".

use crate::doc_path;
use crate::domain::document::{DataFormat, Document};
use crate::domain::report::ValidationReport;

/// Allowed format value plus presence of `columns` / `keys` per format.
pub fn format_and_columns(doc: &Document, report: &mut ValidationReport) {
    for data in &doc.data {
        let name = data.name.as_str();

        let Some(format) = data.data_format() else {
            report.add_error(
                doc_path!["data", name, "format"],
                format!(
                    "Invalid 'format' value '{}'. Allowed values are: {}",
                    data.format,
                    DataFormat::allowed_list()
                ),
            );
            continue;
        };

        match format {
            DataFormat::Table => {
                if data.columns.is_none() {
                    report.add_error(
                        doc_path!["data", name],
                        "'columns' key is required when 'format' is 'table'",
                    );
                }
                if data.keys.is_some() {
                    report.add_error(
                        doc_path!["data", name, "keys"],
                        "'keys' cannot be specified when 'format' is 'table'.",
                    );
                }
            }
            DataFormat::Dictionary => {
                if data.keys.is_none() {
                    report.add_error(
                        doc_path!["data", name],
                        "'keys' key is required when 'format' is 'dictionary'",
                    );
                }
                if data.columns.is_some() {
                    report.add_error(
                        doc_path!["data", name, "columns"],
                        "'columns' cannot be specified when 'format' is 'dictionary'.",
                    );
                }
            }
            _ => {}
        }
    }
}

/// Present-but-empty `columns` (table) or `keys` (dictionary).
pub fn emptiness(doc: &Document, report: &mut ValidationReport) {
    for data in &doc.data {
        let name = data.name.as_str();
        match data.data_format() {
            Some(DataFormat::Table) if data.columns.as_ref().is_some_and(Vec::is_empty) => {
                report.add_error(
                    doc_path!["data", name, "columns"],
                    "`columns` list cannot be empty when format is 'table'.",
                );
            }
            Some(DataFormat::Dictionary) if data.keys.as_ref().is_some_and(Vec::is_empty) => {
                report.add_error(
                    doc_path!["data", name, "keys"],
                    "`keys` list cannot be empty when format is 'dictionary'.",
                );
            }
            _ => {}
        }
    }
}
