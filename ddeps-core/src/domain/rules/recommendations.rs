// ddeps-core/src/domain/rules/recommendations.rs
//
// Warning-only checks. Nothing here affects the verdict.

use crate::doc_path;
use crate::domain::document::{DataFormat, Document};
use crate::domain::report::ValidationReport;

const EMPTY_DESCRIPTIONS: &str = "`descriptions` list is empty. Consider adding a description.";

fn empty_dependencies(field: &str) -> String {
    format!(
        "`{}` list is empty. If there are no dependencies, consider removing the key.",
        field
    )
}

/// Empty-but-allowed lists and questionable variable column targets.
pub fn recommendations(doc: &Document, report: &mut ValidationReport) {
    let metadata = &doc.metadata;

    if metadata.purposes.is_empty() {
        report.add_warning(
            doc_path!["metadata", "purposes"],
            "`purposes` list is empty. Consider describing the purpose.",
        );
    }
    if metadata.terms.as_ref().is_some_and(Vec::is_empty) {
        report.add_warning(
            doc_path!["metadata", "terms"],
            "`terms` list is empty. If there are no terms, consider removing the key.",
        );
    }
    if metadata.note.as_ref().is_some_and(Vec::is_empty) {
        report.add_warning(doc_path!["metadata", "note"], "`note` list is empty.");
    }

    for (index, term) in metadata.terms.iter().flatten().enumerate() {
        if term.descriptions.is_empty() {
            report.add_warning(
                doc_path!["metadata", "terms", index, "descriptions"],
                format!("Term '{}' has an empty `descriptions` list.", term.name),
            );
        }
    }

    for data in &doc.data {
        let name = data.name.as_str();

        if data.descriptions.is_empty() {
            report.add_warning(doc_path!["data", name, "descriptions"], EMPTY_DESCRIPTIONS);
        }
        if data.required_data.as_ref().is_some_and(Vec::is_empty) {
            report.add_warning(
                doc_path!["data", name, "required_data"],
                empty_dependencies("required_data"),
            );
        }
        if data.required_parameter.as_ref().is_some_and(Vec::is_empty) {
            report.add_warning(
                doc_path!["data", name, "required_parameter"],
                empty_dependencies("required_parameter"),
            );
        }

        for (index, column) in data.columns.iter().flatten().enumerate() {
            let Some(referenced) = column.variable_reference() else {
                continue;
            };
            let Some(target) = doc.data_def(referenced) else {
                continue;
            };
            if target
                .data_format()
                .is_some_and(|f| f.is_unsuited_for_key_lookup())
            {
                report.add_warning(
                    doc_path!["data", name, "columns", index, "name"],
                    format!(
                        "Variable column '{}' references data '{}' with format '{}', which might be inappropriate for key-based referencing.",
                        column.name, referenced, target.format
                    ),
                );
            }
        }
    }

    for param in doc.parameter.iter().flatten() {
        if param.descriptions.is_empty() {
            report.add_warning(
                doc_path!["parameter", param.name.as_str(), "descriptions"],
                EMPTY_DESCRIPTIONS,
            );
        }
    }
}

/// Allowed formats outside `recommended` draw a warning. Invalid formats are
/// left to `format_and_columns`.
pub fn recommended_formats(doc: &Document, recommended: &[DataFormat], report: &mut ValidationReport) {
    let listed = recommended
        .iter()
        .map(DataFormat::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    for data in &doc.data {
        let Some(format) = data.data_format() else {
            continue;
        };
        if !recommended.contains(&format) {
            report.add_warning(
                doc_path!["data", data.name.as_str(), "format"],
                format!(
                    "Format '{}' is not in the recommended list: {}.",
                    format, listed
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::Term;
    use crate::domain::rules::fixtures::*;

    #[test]
    fn test_clean_document_has_no_warnings() {
        let mut report = ValidationReport::new("t");
        recommendations(&doc(vec![data("a", "list")]), &mut report);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_empty_lists_warn_in_document_order() {
        let mut d = doc(vec![data("a", "list")]);
        d.metadata.purposes.clear();
        d.metadata.terms = Some(vec![Term {
            name: "kWh".into(),
            descriptions: vec![],
        }]);
        d.metadata.note = Some(vec![]);
        d.data[0].descriptions.clear();
        d.data[0].required_data = Some(vec![]);
        d.data[0].required_parameter = Some(vec![]);
        let mut p = param("rate");
        p.descriptions.clear();
        d.parameter = Some(vec![p]);

        let mut report = ValidationReport::new("t");
        recommendations(&d, &mut report);
        assert!(report.is_valid());
        assert_eq!(
            report.rendered_warnings(),
            vec![
                "Warning at 'metadata.purposes': `purposes` list is empty. Consider describing the purpose.",
                "Warning at 'metadata.note': `note` list is empty.",
                "Warning at 'metadata.terms.0.descriptions': Term 'kWh' has an empty `descriptions` list.",
                "Warning at 'data.a.descriptions': `descriptions` list is empty. Consider adding a description.",
                "Warning at 'data.a.required_data': `required_data` list is empty. If there are no dependencies, consider removing the key.",
                "Warning at 'data.a.required_parameter': `required_parameter` list is empty. If there are no dependencies, consider removing the key.",
                "Warning at 'parameter.rate.descriptions': `descriptions` list is empty. Consider adding a description.",
            ]
        );
    }

    #[test]
    fn test_empty_terms_list() {
        let mut d = doc(vec![data("a", "list")]);
        d.metadata.terms = Some(vec![]);
        let mut report = ValidationReport::new("t");
        recommendations(&d, &mut report);
        assert_eq!(
            report.rendered_warnings(),
            vec!["Warning at 'metadata.terms': `terms` list is empty. If there are no terms, consider removing the key."]
        );
    }

    #[test]
    fn test_variable_column_to_unsuited_format() {
        let mut out = data("out", "table");
        out.columns = Some(vec![
            column("blob*", None),
            column("items*", None),
            column("ghost*", None),
        ]);
        let d = doc(vec![out, data("blob", "binary"), data("items", "list")]);

        let mut report = ValidationReport::new("t");
        recommendations(&d, &mut report);
        assert_eq!(
            report.rendered_warnings(),
            vec!["Warning at 'data.out.columns.0.name': Variable column 'blob*' references data 'blob' with format 'binary', which might be inappropriate for key-based referencing."]
        );
    }

    #[test]
    fn test_recommended_formats() {
        let d = doc(vec![
            data("a", "table"),
            data("b", "single"),
            data("c", "weird"),
        ]);
        let mut report = ValidationReport::new("t");
        recommended_formats(&d, &[DataFormat::Table, DataFormat::Dictionary], &mut report);
        assert_eq!(
            report.rendered_warnings(),
            vec!["Warning at 'data.b.format': Format 'single' is not in the recommended list: table, dictionary."]
        );
    }
}
