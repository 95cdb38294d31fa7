// ddeps-core/src/domain/document.rs
//
// Typed view of a data_dependencies document. Built by the shape schema once
// the raw node tree conforms; never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Value of `data.<name>.format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    Table,
    Dictionary,
    List,
    Single,
    Binary,
    Document,
}

impl DataFormat {
    /// Every accepted format, sorted by name.
    pub const ALL: [DataFormat; 6] = [
        DataFormat::Binary,
        DataFormat::Dictionary,
        DataFormat::Document,
        DataFormat::List,
        DataFormat::Single,
        DataFormat::Table,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Table => "table",
            DataFormat::Dictionary => "dictionary",
            DataFormat::List => "list",
            DataFormat::Single => "single",
            DataFormat::Binary => "binary",
            DataFormat::Document => "document",
        }
    }

    /// Formats that cannot sensibly back a key-based (variable column) lookup.
    pub fn is_unsuited_for_key_lookup(&self) -> bool {
        matches!(
            self,
            DataFormat::Single | DataFormat::Binary | DataFormat::Document
        )
    }

    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(DataFormat::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| DomainError::UnknownFormat(s.to_string()))
    }
}

// =============================================================================
//  DOCUMENT
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub metadata: Metadata,
    pub target: Vec<String>,
    /// In document order.
    pub data: Vec<DataDefinition>,
    /// `None` when the section is absent (distinct from an empty section).
    pub parameter: Option<Vec<ParameterDefinition>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub purposes: Vec<String>,
    pub terms: Option<Vec<Term>>,
    pub note: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub name: String,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataDefinition {
    pub name: String,
    pub descriptions: Vec<String>,
    /// Raw value; may lie outside [`DataFormat::ALL`] until the rule engine says otherwise.
    pub format: String,
    pub unit: String,
    pub columns: Option<Vec<Column>>,
    pub keys: Option<Vec<Key>>,
    pub process: Option<Vec<String>>,
    pub required_data: Option<Vec<String>>,
    pub required_parameter: Option<Vec<String>>,
}

impl DataDefinition {
    pub fn data_format(&self) -> Option<DataFormat> {
        self.format.parse().ok()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns
            .as_deref()
            .is_some_and(|cols| cols.iter().any(|c| c.name == name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub description: String,
    pub key_source: Option<String>,
}

impl Column {
    pub const VARIABLE_SUFFIX: char = '*';

    /// For a variable column (`sales*`), the referenced data name (`sales`).
    pub fn variable_reference(&self) -> Option<&str> {
        self.name.strip_suffix(Self::VARIABLE_SUFFIX)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    pub name: String,
    pub descriptions: Vec<String>,
    pub unit: String,
}

impl Document {
    pub fn data_def(&self, name: &str) -> Option<&DataDefinition> {
        self.data.iter().find(|d| d.name == name)
    }

    pub fn has_data(&self, name: &str) -> bool {
        self.data_def(name).is_some()
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter
            .as_deref()
            .is_some_and(|params| params.iter().any(|p| p.name == name))
    }
}
