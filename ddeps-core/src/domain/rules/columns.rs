// ddeps-core/src/domain/rules/columns.rs

use crate::doc_path;
use crate::domain::document::{Column, DataFormat, Document};
use crate::domain::report::ValidationReport;
use crate::domain::violation::DocPath;

/// Variable columns (`name*`) and their `key_source`.
pub fn variable_columns(doc: &Document, report: &mut ValidationReport) {
    for data in &doc.data {
        for (index, column) in data.columns.iter().flatten().enumerate() {
            let path = doc_path!["data", data.name.as_str(), "columns", index];
            check_column(doc, column, &path, report);
        }
    }
}

fn check_column(doc: &Document, column: &Column, path: &DocPath, report: &mut ValidationReport) {
    let name = column.name.as_str();

    let Some(referenced) = column.variable_reference() else {
        if column.key_source.is_some() {
            report.add_error(
                path.child("name"),
                format!(
                    "'key_source' is specified, but the column name '{}' does not end with '*'.",
                    name
                ),
            );
        }
        return;
    };

    let Some(target) = doc.data_def(referenced) else {
        report.add_error(
            path.child("name"),
            format!(
                "Referenced data '{}' for variable column '{}' is not defined in the 'data' section.",
                referenced, name
            ),
        );
        return;
    };

    if target.data_format() == Some(DataFormat::Table) {
        match &column.key_source {
            None => report.add_error(
                path.clone(),
                format!(
                    "'key_source' is required for variable column '{}' because referenced data '{}' has format 'table'.",
                    name, referenced
                ),
            ),
            Some(key) if !target.has_column(key) => report.add_error(
                path.child("key_source"),
                format!(
                    "The column '{}' specified by 'key_source' for variable column '{}' does not exist in the referenced data '{}'.",
                    key, name, referenced
                ),
            ),
            Some(_) => {}
        }
    } else if column.key_source.is_some() {
        report.add_error(
            path.child("key_source"),
            format!(
                "'key_source' cannot be specified for variable column '{}' because referenced data '{}' has format '{}' (must be 'table').",
                name, referenced, target.format
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::DataDefinition;
    use crate::domain::rules::fixtures::*;

    fn table(name: &str, columns: Vec<Column>) -> DataDefinition {
        let mut d = data(name, "table");
        d.columns = Some(columns);
        d
    }

    fn run(defs: Vec<DataDefinition>) -> Vec<String> {
        let mut report = ValidationReport::new("t");
        variable_columns(&doc(defs), &mut report);
        report.rendered_errors()
    }

    #[test]
    fn test_valid_variable_columns() {
        let errors = run(vec![
            table("out", vec![column("region*", Some("code")), column("tags*", None)]),
            table("region", vec![column("code", None)]),
            data("tags", "list"),
        ]);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_undefined_reference_skips_remaining_checks() {
        let errors = run(vec![table("out", vec![column("ghost*", Some("id"))])]);
        assert_eq!(
            errors,
            vec!["Error at 'data.out.columns.0.name': Referenced data 'ghost' for variable column 'ghost*' is not defined in the 'data' section."]
        );
    }

    #[test]
    fn test_table_reference_needs_existing_key_source() {
        let errors = run(vec![
            table("out", vec![column("a", None), column("ref*", None), column("ref*", Some("nope"))]),
            table("ref", vec![column("id", None)]),
        ]);
        assert_eq!(
            errors,
            vec![
                "Error at 'data.out.columns.1': 'key_source' is required for variable column 'ref*' because referenced data 'ref' has format 'table'.",
                "Error at 'data.out.columns.2.key_source': The column 'nope' specified by 'key_source' for variable column 'ref*' does not exist in the referenced data 'ref'.",
            ]
        );
    }

    #[test]
    fn test_non_table_reference_forbids_key_source() {
        let errors = run(vec![
            table("out", vec![column("lookup*", Some("id"))]),
            data("lookup", "dictionary"),
        ]);
        assert_eq!(
            errors,
            vec!["Error at 'data.out.columns.0.key_source': 'key_source' cannot be specified for variable column 'lookup*' because referenced data 'lookup' has format 'dictionary' (must be 'table')."]
        );
    }

    #[test]
    fn test_plain_column_forbids_key_source() {
        let errors = run(vec![table("out", vec![column("id", Some("x"))])]);
        assert_eq!(
            errors,
            vec!["Error at 'data.out.columns.0.name': 'key_source' is specified, but the column name 'id' does not end with '*'."]
        );
    }

    #[test]
    fn test_columns_on_non_table_entries_are_checked_too() {
        let mut list = data("l", "list");
        list.columns = Some(vec![column("id", Some("x"))]);
        assert_eq!(run(vec![list]).len(), 1);
    }
}
