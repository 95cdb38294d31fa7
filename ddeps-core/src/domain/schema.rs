// ddeps-core/src/domain/schema.rs
//
// Shape Schema: presence, container type and non-emptiness of every field.
// Extra keys are ignored everywhere. Conditional requirements keyed on
// `format` are NOT expressed here; they live in the rule engine.

use tracing::debug;

use crate::domain::document::{
    Column, DataDefinition, Document, Key, Metadata, ParameterDefinition, Term,
};
use crate::domain::node::{Mapping, Node};
use crate::domain::violation::{DocPath, Violation};

const REQUIRED: &str = "Schema error: required key not provided";
const EXPECTED_DICT: &str = "Schema error: expected a dictionary";
const EXPECTED_LIST: &str = "Schema error: expected a list";
const EXPECTED_STRING: &str = "Schema error: expected a string";
const TOO_SHORT: &str = "Schema error: length of value must be at least 1";

// =============================================================================
//  1. DECLARATIVE FIELD TABLES
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    NonEmptyString,
    /// Any string, `""` and the `-` sentinel included.
    String,
    /// List of strings, empty allowed.
    StringList,
    NonEmptyStringList,
    Object(&'static [Field]),
    ObjectList(&'static [Field]),
    /// Mapping of non-empty name → object.
    NamedObjects {
        min_entries: usize,
        fields: &'static [Field],
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
    pub ty: FieldType,
}

const fn required(name: &'static str, ty: FieldType) -> Field {
    Field {
        name,
        required: true,
        ty,
    }
}

const fn optional(name: &'static str, ty: FieldType) -> Field {
    Field {
        name,
        required: false,
        ty,
    }
}

pub const COLUMN_FIELDS: &[Field] = &[
    required("name", FieldType::NonEmptyString),
    required("description", FieldType::NonEmptyString),
    optional("key_source", FieldType::String),
];

pub const KEY_FIELDS: &[Field] = &[
    required("name", FieldType::NonEmptyString),
    required("description", FieldType::NonEmptyString),
];

pub const DATA_FIELDS: &[Field] = &[
    required("descriptions", FieldType::StringList),
    required("format", FieldType::NonEmptyString),
    required("unit", FieldType::String),
    optional("columns", FieldType::ObjectList(COLUMN_FIELDS)),
    optional("keys", FieldType::ObjectList(KEY_FIELDS)),
    optional("process", FieldType::NonEmptyStringList),
    optional("required_data", FieldType::StringList),
    optional("required_parameter", FieldType::StringList),
];

pub const PARAMETER_FIELDS: &[Field] = &[
    required("descriptions", FieldType::StringList),
    required("unit", FieldType::String),
];

pub const TERM_FIELDS: &[Field] = &[
    required("name", FieldType::NonEmptyString),
    required("descriptions", FieldType::StringList),
];

pub const METADATA_FIELDS: &[Field] = &[
    required("title", FieldType::NonEmptyString),
    required("purposes", FieldType::StringList),
    optional("terms", FieldType::ObjectList(TERM_FIELDS)),
    optional("note", FieldType::StringList),
];

pub const DATA_DEPENDENCIES_FIELDS: &[Field] = &[
    required("metadata", FieldType::Object(METADATA_FIELDS)),
    required("target", FieldType::NonEmptyStringList),
    required(
        "data",
        FieldType::NamedObjects {
            min_entries: 1,
            fields: DATA_FIELDS,
        },
    ),
    optional(
        "parameter",
        FieldType::NamedObjects {
            min_entries: 0,
            fields: PARAMETER_FIELDS,
        },
    ),
];

// =============================================================================
//  2. CHECKER
// =============================================================================

/// Turns a raw node tree into a typed document, or explains why it cannot.
pub trait DocumentSchema {
    type Output;

    fn conform(&self, node: &Node) -> Result<Self::Output, Vec<Violation>>;
}

/// Shape Schema of `data_dependencies.yml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataDependenciesSchema;

impl DocumentSchema for DataDependenciesSchema {
    type Output = Document;

    fn conform(&self, node: &Node) -> Result<Document, Vec<Violation>> {
        let violations = check_fields(node, DATA_DEPENDENCIES_FIELDS);
        if !violations.is_empty() {
            debug!(count = violations.len(), "Shape schema rejected document");
            return Err(violations);
        }
        Ok(build_document(node))
    }
}

/// Checks `node` against a field table. Violations come out in table order.
pub fn check_fields(node: &Node, fields: &[Field]) -> Vec<Violation> {
    let mut out = Vec::new();
    check_object(node, fields, &DocPath::root(), &mut out);
    out
}

fn check_object(node: &Node, fields: &[Field], path: &DocPath, out: &mut Vec<Violation>) {
    let Some(map) = node.as_mapping() else {
        out.push(Violation::error(path.clone(), EXPECTED_DICT));
        return;
    };

    for field in fields {
        let field_path = path.child(field.name);
        match map.get(field.name) {
            Some(value) => check_value(value, field.ty, &field_path, out),
            None if field.required => out.push(Violation::error(field_path, REQUIRED)),
            None => {}
        }
    }
}

fn check_value(node: &Node, ty: FieldType, path: &DocPath, out: &mut Vec<Violation>) {
    match ty {
        FieldType::String => {
            if node.as_str().is_none() {
                out.push(Violation::error(path.clone(), EXPECTED_STRING));
            }
        }
        FieldType::NonEmptyString => match node.as_str() {
            Some("") => out.push(Violation::error(path.clone(), TOO_SHORT)),
            Some(_) => {}
            None => out.push(Violation::error(path.clone(), EXPECTED_STRING)),
        },
        FieldType::StringList | FieldType::NonEmptyStringList => {
            let Some(items) = node.as_sequence() else {
                out.push(Violation::error(path.clone(), EXPECTED_LIST));
                return;
            };
            if matches!(ty, FieldType::NonEmptyStringList) && items.is_empty() {
                out.push(Violation::error(path.clone(), TOO_SHORT));
            }
            for (i, item) in items.iter().enumerate() {
                if item.as_str().is_none() {
                    out.push(Violation::error(path.child(i), EXPECTED_STRING));
                }
            }
        }
        FieldType::Object(fields) => check_object(node, fields, path, out),
        FieldType::ObjectList(fields) => {
            let Some(items) = node.as_sequence() else {
                out.push(Violation::error(path.clone(), EXPECTED_LIST));
                return;
            };
            for (i, item) in items.iter().enumerate() {
                check_object(item, fields, &path.child(i), out);
            }
        }
        FieldType::NamedObjects {
            min_entries,
            fields,
        } => {
            let Some(map) = node.as_mapping() else {
                out.push(Violation::error(path.clone(), EXPECTED_DICT));
                return;
            };
            if map.len() < min_entries {
                out.push(Violation::error(path.clone(), TOO_SHORT));
            }
            for (name, entry) in map.iter() {
                let entry_path = path.child(name);
                if name.is_empty() {
                    out.push(Violation::error(entry_path.clone(), TOO_SHORT));
                }
                check_object(entry, fields, &entry_path, out);
            }
        }
    }
}

// =============================================================================
//  3. TYPED CONSTRUCTION (only after a clean check)
// =============================================================================

fn string(node: &Node, key: &str) -> String {
    node.get(key)
        .and_then(Node::as_str)
        .unwrap_or_default()
        .to_string()
}

fn opt_string(node: &Node, key: &str) -> Option<String> {
    node.get(key).and_then(Node::as_str).map(str::to_string)
}

fn opt_strings(node: &Node, key: &str) -> Option<Vec<String>> {
    node.get(key).and_then(Node::as_sequence).map(|items| {
        items
            .iter()
            .filter_map(Node::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn strings(node: &Node, key: &str) -> Vec<String> {
    opt_strings(node, key).unwrap_or_default()
}

fn opt_objects<T>(node: &Node, key: &str, build: impl Fn(&Node) -> T) -> Option<Vec<T>> {
    node.get(key)
        .and_then(Node::as_sequence)
        .map(|items| items.iter().map(&build).collect())
}

fn named<T>(section: Option<&Mapping>, build: impl Fn(&str, &Node) -> T) -> Option<Vec<T>> {
    section.map(|map| map.iter().map(|(name, n)| build(name, n)).collect())
}

fn build_document(node: &Node) -> Document {
    let metadata = node.get("metadata").unwrap_or(&Node::Null);

    Document {
        metadata: Metadata {
            title: string(metadata, "title"),
            purposes: strings(metadata, "purposes"),
            terms: opt_objects(metadata, "terms", |t| Term {
                name: string(t, "name"),
                descriptions: strings(t, "descriptions"),
            }),
            note: opt_strings(metadata, "note"),
        },
        target: strings(node, "target"),
        data: named(node.get("data").and_then(Node::as_mapping), |name, d| {
            DataDefinition {
                name: name.to_string(),
                descriptions: strings(d, "descriptions"),
                format: string(d, "format"),
                unit: string(d, "unit"),
                columns: opt_objects(d, "columns", |c| Column {
                    name: string(c, "name"),
                    description: string(c, "description"),
                    key_source: opt_string(c, "key_source"),
                }),
                keys: opt_objects(d, "keys", |k| Key {
                    name: string(k, "name"),
                    description: string(k, "description"),
                }),
                process: opt_strings(d, "process"),
                required_data: opt_strings(d, "required_data"),
                required_parameter: opt_strings(d, "required_parameter"),
            }
        })
        .unwrap_or_default(),
        parameter: named(node.get("parameter").and_then(Node::as_mapping), |name, p| {
            ParameterDefinition {
                name: name.to_string(),
                descriptions: strings(p, "descriptions"),
                unit: string(p, "unit"),
            }
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::loader::parse_document;

    fn violations(yaml: &str) -> Vec<String> {
        let node = parse_document(yaml).unwrap();
        match DataDependenciesSchema.conform(&node) {
            Ok(_) => vec![],
            Err(v) => v.iter().map(Violation::render).collect(),
        }
    }

    const MINIMAL: &str = r#"
metadata:
  title: Minimal
  purposes: [demo]
target: [a]
data:
  a:
    descriptions: [first]
    format: list
    unit: "-"
"#;

    #[test]
    fn test_minimal_document_conforms() {
        let node = parse_document(MINIMAL).unwrap();
        let doc = DataDependenciesSchema.conform(&node).unwrap();
        assert_eq!(doc.metadata.title, "Minimal");
        assert_eq!(doc.target, vec!["a"]);
        assert_eq!(doc.data.len(), 1);
        assert_eq!(doc.data[0].unit, "-");
        assert!(doc.parameter.is_none());
        assert!(doc.data[0].columns.is_none());
    }

    #[test]
    fn test_missing_required_keys() {
        let errs = violations(
            r#"
target: [a]
data:
  a:
    descriptions: []
    unit: kg
parameter:
  p:
    descriptions: []
"#,
        );
        assert_eq!(
            errs,
            vec![
                "Error at 'metadata': Schema error: required key not provided",
                "Error at 'data.a.format': Schema error: required key not provided",
                "Error at 'parameter.p.unit': Schema error: required key not provided",
            ]
        );
    }

    #[test]
    fn test_type_mismatches() {
        let errs = violations(
            r#"
metadata:
  title: T
  purposes: nope
  terms: [plain]
target: a
data:
  a:
    descriptions: [1]
    format: table
    unit: 3
    columns: {name: x}
parameter: [p]
"#,
        );
        assert!(errs.contains(&"Error at 'metadata.purposes': Schema error: expected a list".into()));
        assert!(errs.contains(&"Error at 'metadata.terms.0': Schema error: expected a dictionary".into()));
        assert!(errs.contains(&"Error at 'target': Schema error: expected a list".into()));
        assert!(errs.contains(&"Error at 'data.a.descriptions.0': Schema error: expected a string".into()));
        assert!(errs.contains(&"Error at 'data.a.unit': Schema error: expected a string".into()));
        assert!(errs.contains(&"Error at 'data.a.columns': Schema error: expected a list".into()));
        assert!(errs.contains(&"Error at 'parameter': Schema error: expected a dictionary".into()));
    }

    #[test]
    fn test_length_constraints() {
        let errs = violations(
            r#"
metadata: {title: "", purposes: []}
target: []
data: {}
"#,
        );
        assert_eq!(
            errs,
            vec![
                "Error at 'metadata.title': Schema error: length of value must be at least 1",
                "Error at 'target': Schema error: length of value must be at least 1",
                "Error at 'data': Schema error: length of value must be at least 1",
            ]
        );
    }

    #[test]
    fn test_empty_columns_list_passes_schema() {
        let yaml = MINIMAL.replace("format: list", "format: table\n    columns: []");
        assert!(violations(&yaml).is_empty());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let yaml = format!("{}\nextra: {{anything: 1}}\n", MINIMAL);
        assert!(violations(&yaml).is_empty());
    }

    #[test]
    fn test_data_entry_sharing_fields_through_merge_key() {
        let yaml = r#"
metadata:
  title: Shared
  purposes: [demo]
target: [b]
data:
  a: &base
    descriptions: [x]
    format: list
    unit: "-"
  b:
    <<: *base
    descriptions: [y]
"#;
        assert!(violations(yaml).is_empty());

        let doc = DataDependenciesSchema.conform(&parse_document(yaml).unwrap()).unwrap();
        let b = doc.data_def("b").unwrap();
        assert_eq!(b.format, "list");
        assert_eq!(b.descriptions, vec!["y"]);
    }

    #[test]
    fn test_root_must_be_a_mapping() {
        assert_eq!(
            violations("- a\n- b\n"),
            vec!["Error: Schema error: expected a dictionary"]
        );
    }
}
