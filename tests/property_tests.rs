//! Property-based tests for the merge engine.
//!
//! Generates small random models and documentation sets and checks the
//! invariants that must hold for any input: idempotence and the
//! one-documentation-node-per-owner coverage rule.

use proptest::prelude::*;

use edmxdoc::model::merge::{apply, EntityDocs};
use edmxdoc::model::scan::scan;

/// XML-safe identifier.
fn ident() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,8}"
}

/// Documentation text without markup characters; escaping is covered by
/// unit tests.
fn doc_text() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[A-Za-z0-9 .,]{1,24}")
}

#[derive(Debug, Clone)]
struct GenEntity {
    name: String,
    properties: Vec<(String, Option<String>)>,
    table_doc: Option<String>,
}

fn gen_entity() -> impl Strategy<Value = GenEntity> {
    (
        ident(),
        proptest::collection::vec((ident(), doc_text()), 0..4),
        doc_text(),
    )
        .prop_map(|(name, properties, table_doc)| GenEntity {
            name,
            properties,
            table_doc,
        })
}

fn render_model(entities: &[GenEntity]) -> String {
    let mut xml = String::from("<Schema xmlns=\"http://example/edm\">\n");
    for entity in entities {
        xml.push_str(&format!("  <EntityType Name=\"{}\">\n", entity.name));
        for (prop, _) in &entity.properties {
            xml.push_str(&format!("    <Property Name=\"{prop}\" />\n"));
        }
        xml.push_str("  </EntityType>\n");
    }
    xml.push_str("</Schema>\n");
    xml
}

fn render_docs(entities: &[GenEntity]) -> Vec<EntityDocs> {
    entities
        .iter()
        .map(|entity| EntityDocs {
            table: entity.table_doc.clone(),
            columns: entity.properties.iter().map(|(_, d)| d.clone()).collect(),
        })
        .collect()
}

proptest! {
    #[test]
    fn applying_docs_twice_is_byte_identical(entities in proptest::collection::vec(gen_entity(), 0..6)) {
        let xml = render_model(&entities);
        let docs = render_docs(&entities);

        let once = apply(&xml, &docs).unwrap();
        let twice = apply(&once, &docs).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn documented_output_rescans_to_the_same_shape(entities in proptest::collection::vec(gen_entity(), 0..6)) {
        let xml = render_model(&entities);
        let docs = render_docs(&entities);
        let merged = apply(&xml, &docs).unwrap();

        // Documentation nodes never change what the scan sees.
        let before = scan(&xml).unwrap();
        let after = scan(&merged).unwrap();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn coverage_invariant_holds(entities in proptest::collection::vec(gen_entity(), 1..6)) {
        let xml = render_model(&entities);
        let docs = render_docs(&entities);
        let merged = apply(&xml, &docs).unwrap();

        let expected: usize = docs
            .iter()
            .map(|d| {
                usize::from(d.table.is_some())
                    + d.columns.iter().filter(|c| c.is_some()).count()
            })
            .sum();
        prop_assert_eq!(merged.matches("<Documentation>").count(), expected);
        prop_assert_eq!(merged.matches("</Documentation>").count(), expected);
    }
}
