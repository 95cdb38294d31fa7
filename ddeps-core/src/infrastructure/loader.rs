// ddeps-core/src/infrastructure/loader.rs
//
// Structured-document loader.
//
// Two passes over the same text:
// 1. `parse_document`: lenient. Builds the generic `Node` tree; a repeated key
//    silently replaces the earlier value (plain YAML mapping semantics).
// 2. `check_duplicate_keys`: strict probe. Walks every mapping with its own
//    key set and stops at the first repeated key, reporting where it sits.

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

use crate::domain::node::{Mapping, Node};
use crate::infrastructure::error::InfrastructureError;

// =============================================================================
//  1. FILE ACCESS
// =============================================================================

/// Reads the whole input. The handle is released before returning, on every path.
#[instrument]
pub fn read_source(path: &Path) -> Result<String, InfrastructureError> {
    if !path.is_file() {
        return Err(InfrastructureError::FileAccess {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| InfrastructureError::FileAccess {
        path: path.display().to_string(),
        source,
    })?;
    debug!(bytes = content.len(), "Source loaded");
    Ok(content)
}

// =============================================================================
//  2. LENIENT PARSE
// =============================================================================

/// Parses YAML text into a [`Node`]. An empty document yields [`Node::Null`].
pub fn parse_document(source: &str) -> Result<Node, InfrastructureError> {
    if source.trim().is_empty() {
        return Ok(Node::Null);
    }
    serde_yaml::from_str::<Node>(source).map_err(|e| {
        let location = e.location();
        InfrastructureError::Parse {
            message: e.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
        }
    })
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_unit<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Node, D::Error> {
        Node::deserialize(d)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Node, E> {
        Ok(i64::try_from(v).map_or(Node::Float(v as f64), Node::Integer))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Node, E> {
        Ok(Node::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Node, E> {
        Ok(Node::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<Node>()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut explicit = Vec::new();
        let mut merged = Vec::new();
        while let Some(key) = map.next_key_seed(KeySeed { seen: None })? {
            let value = map.next_value::<Node>()?;
            if key == MERGE_KEY {
                merged.extend(merge_sources(value).map_err(<A::Error as de::Error>::custom)?);
            } else {
                explicit.push((key, value));
            }
        }
        if merged.is_empty() {
            return Ok(Node::Mapping(explicit.into_iter().collect()));
        }

        // Merged entries come first. Explicit keys override them, and among
        // merged mappings the first one listed wins.
        let mut mapping = Mapping::new();
        for source in merged.into_iter().rev() {
            for (key, value) in source.into_entries() {
                mapping.insert(key, value);
            }
        }
        for (key, value) in explicit {
            mapping.insert(key, value);
        }
        Ok(Node::Mapping(mapping))
    }
}

const MERGE_KEY: &str = "<<";

/// Mappings pulled in by a `<<` entry: one mapping or a sequence of them.
fn merge_sources(value: Node) -> Result<Vec<Mapping>, &'static str> {
    const INVALID: &str = "merge key '<<' expects a mapping or a list of mappings";
    match value {
        Node::Mapping(m) => Ok(vec![m]),
        Node::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                Node::Mapping(m) => Ok(m),
                _ => Err(INVALID),
            })
            .collect(),
        _ => Err(INVALID),
    }
}

// =============================================================================
//  3. KEYS
// =============================================================================

/// Scalar key rendered as text. With `seen` set, a repeat is an error.
struct KeySeed<'a> {
    seen: Option<Probe<'a>>,
}

struct Probe<'a> {
    keys: &'a mut HashSet<String>,
    duplicate: &'a mut Option<String>,
}

impl<'de> DeserializeSeed<'de> for KeySeed<'_> {
    type Value = String;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(KeyVisitor { seen: self.seen })
    }
}

struct KeyVisitor<'a> {
    seen: Option<Probe<'a>>,
}

impl KeyVisitor<'_> {
    fn accept<E: de::Error>(self, key: String) -> Result<String, E> {
        if let Some(Probe { keys, duplicate }) = self.seen {
            if !keys.insert(key.clone()) {
                *duplicate = Some(key.clone());
                return Err(E::custom(format!("duplicate key '{}'", key)));
            }
        }
        Ok(key)
    }
}

impl<'de> Visitor<'de> for KeyVisitor<'_> {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        self.accept(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        self.accept(v)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        self.accept(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        self.accept(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        self.accept(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        self.accept(v.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        self.accept("null".to_string())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        self.accept("null".to_string())
    }
}

// =============================================================================
//  4. DUPLICATE-KEY PROBE
// =============================================================================

/// Fails with [`InfrastructureError::DuplicateKey`] on the first key repeated
/// inside one mapping. Nested mappings have independent key sets. Only the
/// first repeat is reported.
pub fn check_duplicate_keys(source: &str) -> Result<(), InfrastructureError> {
    if source.trim().is_empty() {
        return Ok(());
    }
    let mut duplicate = None;
    let result = DuplicateProbe {
        duplicate: &mut duplicate,
    }
    .deserialize(serde_yaml::Deserializer::from_str(source));

    match (result, duplicate) {
        (Ok(()), _) => Ok(()),
        (Err(e), Some(key)) => {
            let location = e.location();
            Err(InfrastructureError::DuplicateKey {
                key,
                line: location.as_ref().map(|l| l.line()),
                column: location.as_ref().map(|l| l.column()),
            })
        }
        (Err(e), None) => {
            let location = e.location();
            Err(InfrastructureError::Parse {
                message: e.to_string(),
                line: location.as_ref().map(|l| l.line()),
                column: location.as_ref().map(|l| l.column()),
            })
        }
    }
}

struct DuplicateProbe<'a> {
    duplicate: &'a mut Option<String>,
}

impl<'de> DeserializeSeed<'de> for DuplicateProbe<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for DuplicateProbe<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_unit<E>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_none<E>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<(), D::Error> {
        self.deserialize(d)
    }

    fn visit_bool<E>(self, _: bool) -> Result<(), E> {
        Ok(())
    }

    fn visit_i64<E>(self, _: i64) -> Result<(), E> {
        Ok(())
    }

    fn visit_u64<E>(self, _: u64) -> Result<(), E> {
        Ok(())
    }

    fn visit_f64<E>(self, _: f64) -> Result<(), E> {
        Ok(())
    }

    fn visit_str<E>(self, _: &str) -> Result<(), E> {
        Ok(())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        let duplicate = self.duplicate;
        while seq
            .next_element_seed(DuplicateProbe {
                duplicate: &mut *duplicate,
            })?
            .is_some()
        {}
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let duplicate = self.duplicate;
        let mut keys = HashSet::new();
        loop {
            let key = map.next_key_seed(KeySeed {
                seen: Some(Probe {
                    keys: &mut keys,
                    duplicate: &mut *duplicate,
                }),
            })?;
            if key.is_none() {
                break;
            }
            map.next_value_seed(DuplicateProbe {
                duplicate: &mut *duplicate,
            })?;
        }
        Ok(())
    }
}
