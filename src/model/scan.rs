//! model::scan
//!
//! First pass: enumerate entity and property nodes in document order.
//!
//! # Matching
//!
//! Elements are matched purely by local name (`EntityType`, `Property`), so
//! whatever namespace prefixes the model uses are irrelevant. An edmx file
//! carries the same entity in both its conceptual and storage sections; each
//! occurrence is scanned separately and later resolved separately - there is
//! no caching across occurrences.

use quick_xml::events::BytesStart;
use quick_xml::{events::Event, Reader};

use super::ModelError;

/// One `EntityType` occurrence: its table name and the names of its
/// `Property` descendants, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityScan {
    /// Table name (the `Name` attribute).
    pub name: String,
    /// Column names, in document order.
    pub properties: Vec<String>,
}

/// Scan the model text for entity and property nodes.
///
/// # Errors
///
/// - [`ModelError::NoRootElement`] when the document has no element at all
/// - [`ModelError::MissingName`] when an entity or property has no non-empty
///   `Name` attribute
/// - [`ModelError::Xml`] when the document is not well-formed
pub fn scan(xml: &str) -> Result<Vec<EntityScan>, ModelError> {
    let mut reader = Reader::from_str(xml);
    let mut entities: Vec<EntityScan> = Vec::new();
    // Stack of entity indexes currently open; `Property` elements attach to
    // the innermost one.
    let mut open_entities: Vec<usize> = Vec::new();
    // Whether each currently open element is an EntityType.
    let mut elem_is_entity: Vec<bool> = Vec::new();
    let mut saw_element = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                saw_element = true;
                let is_entity = has_local_name(&e, b"EntityType");
                if is_entity {
                    let name = require_name(&e, "EntityType", entities.len())?;
                    open_entities.push(entities.len());
                    entities.push(EntityScan {
                        name,
                        properties: Vec::new(),
                    });
                } else if has_local_name(&e, b"Property") {
                    if let Some(&idx) = open_entities.last() {
                        let count = entities[idx].properties.len();
                        let name = require_name(&e, "Property", count)?;
                        entities[idx].properties.push(name);
                    }
                }
                elem_is_entity.push(is_entity);
            }
            Event::Empty(e) => {
                saw_element = true;
                if has_local_name(&e, b"EntityType") {
                    let name = require_name(&e, "EntityType", entities.len())?;
                    entities.push(EntityScan {
                        name,
                        properties: Vec::new(),
                    });
                } else if has_local_name(&e, b"Property") {
                    if let Some(&idx) = open_entities.last() {
                        let count = entities[idx].properties.len();
                        let name = require_name(&e, "Property", count)?;
                        entities[idx].properties.push(name);
                    }
                }
            }
            Event::End(_) => {
                if elem_is_entity.pop().unwrap_or(false) {
                    open_entities.pop();
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_element {
        return Err(ModelError::NoRootElement);
    }
    Ok(entities)
}

/// Compare an element's local name, ignoring any namespace prefix.
pub(crate) fn has_local_name(e: &BytesStart<'_>, local: &[u8]) -> bool {
    e.name().local_name().as_ref() == local
}

/// Extract a non-empty `Name` attribute or fail with identifying context.
pub(crate) fn require_name(
    e: &BytesStart<'_>,
    kind: &'static str,
    index: usize,
) -> Result<String, ModelError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"Name" {
            let value = attr.unescape_value()?;
            if value.is_empty() {
                break;
            }
            return Ok(value.into_owned());
        }
    }
    Err(ModelError::MissingName { kind, index })
}
