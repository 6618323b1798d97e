//! model::merge
//!
//! Second pass: rewrite `Documentation` nodes from resolved catalog text.
//!
//! # Idempotence
//!
//! Every existing `Documentation` child of an entity or property is dropped
//! unconditionally, then a fresh node is emitted only when the catalog has
//! non-empty text for it. Re-running against unchanged metadata therefore
//! reproduces byte-identical output, and re-running after metadata changes
//! always reflects the latest state instead of appending duplicates.
//!
//! Inserted nodes are unprefixed, so they land in the element's default
//! namespace the way the edmx schema expects.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

use super::scan::{has_local_name, scan, EntityScan};
use super::ModelError;
use crate::catalog::{CatalogError, MetadataSource};
use crate::ui::output::{self, Verbosity};

/// Errors from a full merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Resolved documentation for one entity occurrence.
///
/// `columns` is aligned with the occurrence's scanned property order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityDocs {
    /// Table-level documentation, if any.
    pub table: Option<String>,
    /// Column-level documentation, aligned with the scanned properties.
    pub columns: Vec<Option<String>>,
}

/// Merge catalog documentation into the model text.
///
/// Scans, resolves every entity and property against `source` (one blocking
/// round trip each, sequential, no caching), and applies the results.
/// Nothing is written to disk here; the caller saves the returned text.
pub async fn merge_document(
    xml: &str,
    source: &dyn MetadataSource,
    verbosity: Verbosity,
) -> Result<String, MergeError> {
    let entities = scan(xml)?;
    let docs = resolve(&entities, source, verbosity).await?;
    Ok(apply(xml, &docs)?)
}

/// Resolve documentation for every scanned occurrence, in document order.
pub async fn resolve(
    entities: &[EntityScan],
    source: &dyn MetadataSource,
    verbosity: Verbosity,
) -> Result<Vec<EntityDocs>, CatalogError> {
    let total = entities.len();
    let mut resolved = Vec::with_capacity(total);

    for (i, entity) in entities.iter().enumerate() {
        output::print(
            format!(
                "Analyzing table {} of {}: {} ({} properties)",
                i + 1,
                total,
                entity.name,
                entity.properties.len()
            ),
            verbosity,
        );

        let table = source.table_documentation(&entity.name).await?;
        let mut columns = Vec::with_capacity(entity.properties.len());
        for property in &entity.properties {
            columns.push(
                source
                    .column_documentation(&entity.name, property)
                    .await?,
            );
        }
        resolved.push(EntityDocs { table, columns });
    }

    Ok(resolved)
}

/// What each open element is, for parent checks during the rewrite.
#[derive(Clone, Copy)]
enum Elem {
    /// An `EntityType` occurrence; holds its index into the docs slice.
    Entity(usize),
    Property,
    Other,
}

/// Apply resolved documentation to the model text.
///
/// Entity and property occurrences are consumed positionally, in the same
/// document order [`scan`] produced them. Everything else round-trips
/// unchanged.
pub fn apply(xml: &str, docs: &[EntityDocs]) -> Result<String, ModelError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());

    let mut stack: Vec<Elem> = Vec::new();
    let mut entity_cursor = 0usize;
    // One property cursor per entity occurrence, grown as occurrences appear
    // so a docs slice shorter than the document cannot index out of bounds.
    let mut prop_cursors: Vec<usize> = Vec::with_capacity(docs.len());

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if has_local_name(&e, b"Documentation") && owner_is_documented(&stack) {
                    // Dropped wholesale; a fresh node was already emitted.
                    skip_subtree(&mut reader)?;
                    continue;
                }

                if has_local_name(&e, b"EntityType") {
                    let idx = entity_cursor;
                    entity_cursor += 1;
                    prop_cursors.push(0);
                    writer.write_event(Event::Start(e))?;
                    if let Some(text) = table_doc(docs, idx) {
                        write_documentation(&mut writer, text)?;
                    }
                    stack.push(Elem::Entity(idx));
                } else if has_local_name(&e, b"Property") && innermost_entity(&stack).is_some() {
                    let idx = innermost_entity(&stack).unwrap();
                    let prop = prop_cursors[idx];
                    prop_cursors[idx] += 1;
                    writer.write_event(Event::Start(e))?;
                    if let Some(text) = column_doc(docs, idx, prop) {
                        write_documentation(&mut writer, text)?;
                    }
                    stack.push(Elem::Property);
                } else {
                    writer.write_event(Event::Start(e))?;
                    stack.push(Elem::Other);
                }
            }
            Event::Empty(e) => {
                if has_local_name(&e, b"Documentation") && owner_is_documented(&stack) {
                    continue;
                }

                if has_local_name(&e, b"EntityType") {
                    let idx = entity_cursor;
                    entity_cursor += 1;
                    prop_cursors.push(0);
                    match table_doc(docs, idx) {
                        Some(text) => expand_empty(&mut writer, e, text)?,
                        None => writer.write_event(Event::Empty(e))?,
                    }
                } else if has_local_name(&e, b"Property") && innermost_entity(&stack).is_some() {
                    let idx = innermost_entity(&stack).unwrap();
                    let prop = prop_cursors[idx];
                    prop_cursors[idx] += 1;
                    match column_doc(docs, idx, prop) {
                        Some(text) => expand_empty(&mut writer, e, text)?,
                        None => writer.write_event(Event::Empty(e))?,
                    }
                } else {
                    writer.write_event(Event::Empty(e))?;
                }
            }
            Event::End(e) => {
                stack.pop();
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    String::from_utf8(writer.into_inner()).map_err(|_| ModelError::NonUtf8)
}

fn table_doc<'a>(docs: &'a [EntityDocs], idx: usize) -> Option<&'a str> {
    docs.get(idx)
        .and_then(|d| d.table.as_deref())
        .filter(|t| !t.is_empty())
}

fn column_doc<'a>(docs: &'a [EntityDocs], idx: usize, prop: usize) -> Option<&'a str> {
    docs.get(idx)
        .and_then(|d| d.columns.get(prop))
        .and_then(|c| c.as_deref())
        .filter(|t| !t.is_empty())
}

/// Is the innermost open element an entity or property?
fn owner_is_documented(stack: &[Elem]) -> bool {
    matches!(stack.last(), Some(Elem::Entity(_)) | Some(Elem::Property))
}

/// Index of the innermost open entity, if any.
fn innermost_entity(stack: &[Elem]) -> Option<usize> {
    stack.iter().rev().find_map(|elem| match elem {
        Elem::Entity(idx) => Some(*idx),
        _ => None,
    })
}

/// Consume events up to and including the end of the current element.
fn skip_subtree(reader: &mut Reader<&[u8]>) -> Result<(), ModelError> {
    let mut depth = 1usize;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => return Err(ModelError::TruncatedDocument),
            _ => {}
        }
    }
}

/// Emit `<Documentation><Summary>text</Summary></Documentation>`.
fn write_documentation<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<(), ModelError> {
    writer.write_event(Event::Start(BytesStart::new("Documentation")))?;
    writer.write_event(Event::Start(BytesStart::new("Summary")))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("Summary")))?;
    writer.write_event(Event::End(BytesEnd::new("Documentation")))?;
    Ok(())
}

/// Rewrite a self-closing element as start/doc/end so the documentation node
/// becomes its first (and only) child.
fn expand_empty<W: Write>(
    writer: &mut Writer<W>,
    e: BytesStart<'_>,
    text: &str,
) -> Result<(), ModelError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    // `<Property ... />` keeps the space before `/` in its raw buffer; trim
    // it so the opened form is `<Property ...>`.
    let content = String::from_utf8_lossy(&e);
    let start = BytesStart::from_content(content.trim_end().to_string(), name.len());
    writer.write_event(Event::Start(start))?;
    write_documentation(writer, text)?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
