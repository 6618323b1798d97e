//! Integration tests for the documentation merge.
//!
//! These exercise the full scan -> resolve -> apply pipeline against the
//! in-memory metadata source, including the invariants the merge must hold:
//! idempotence, first-child placement, and absence/update propagation.

use edmxdoc::catalog::MockMetadataSource;
use edmxdoc::model::merge::merge_document;
use edmxdoc::ui::output::Verbosity;

const MODEL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="3.0" xmlns:edmx="http://schemas.microsoft.com/ado/2009/11/edmx">
  <edmx:Runtime>
    <Schema Namespace="TestModel" xmlns="http://schemas.microsoft.com/ado/2009/11/edm">
      <EntityType Name="Customer">
        <Key>
          <PropertyRef Name="Id" />
        </Key>
        <Property Name="Id" Type="Int32" Nullable="false" />
        <Property Name="Email" Type="String" />
      </EntityType>
    </Schema>
  </edmx:Runtime>
</edmx:Edmx>
"#;

async fn merge(xml: &str, source: &MockMetadataSource) -> String {
    merge_document(xml, source, Verbosity::Quiet).await.unwrap()
}

#[tokio::test]
async fn customer_scenario_end_to_end() {
    // Table documented, column absent: the entity gets a Documentation node
    // as its first child, the property gets none.
    let source = MockMetadataSource::new().with_table("Customer", "Customer record");
    let out = merge(MODEL, &source).await;

    assert!(out.contains(
        "<EntityType Name=\"Customer\"><Documentation><Summary>Customer record</Summary></Documentation>"
    ));
    assert!(out.contains("<Property Name=\"Id\" Type=\"Int32\" Nullable=\"false\" />"));
    assert!(!out.contains("<Property Name=\"Id\"><Documentation>"));
}

#[tokio::test]
async fn column_documentation_lands_under_the_property() {
    let source = MockMetadataSource::new()
        .with_table("Customer", "Customer record")
        .with_column("Customer", "Email", "Primary contact address");
    let out = merge(MODEL, &source).await;

    assert!(out.contains(
        "<Property Name=\"Email\" Type=\"String\"><Documentation><Summary>Primary contact address</Summary></Documentation></Property>"
    ));
    // The undocumented sibling stays self-closing.
    assert!(out.contains("<Property Name=\"Id\" Type=\"Int32\" Nullable=\"false\" />"));
}

#[tokio::test]
async fn merge_is_idempotent_byte_for_byte() {
    let source = MockMetadataSource::new()
        .with_table("Customer", "Customer record")
        .with_column("Customer", "Id", "Surrogate key");

    let once = merge(MODEL, &source).await;
    let twice = merge(&once, &source).await;
    assert_eq!(once, twice);
}

#[tokio::test]
async fn absent_metadata_removes_preexisting_documentation() {
    let source = MockMetadataSource::new()
        .with_table("Customer", "Customer record")
        .with_column("Customer", "Id", "Surrogate key");
    let documented = merge(MODEL, &source).await;

    // Metadata was since deleted: a re-run strips every node it had added.
    let empty = MockMetadataSource::new();
    let stripped = merge(&documented, &empty).await;
    assert!(!stripped.contains("<Documentation>"));
    assert!(!stripped.contains("Customer record"));
    assert!(!stripped.contains("Surrogate key"));
}

#[tokio::test]
async fn changed_metadata_replaces_prior_text() {
    let source = MockMetadataSource::new().with_table("Customer", "Customer record");
    let documented = merge(MODEL, &source).await;

    source.set_table("Customer", "Customer master record");
    let updated = merge(&documented, &source).await;
    assert!(updated.contains("<Summary>Customer master record</Summary>"));
    assert!(!updated.contains("<Summary>Customer record</Summary>"));
}

#[tokio::test]
async fn every_node_has_at_most_one_documentation_child() {
    let source = MockMetadataSource::new()
        .with_table("Customer", "Customer record")
        .with_column("Customer", "Id", "Surrogate key")
        .with_column("Customer", "Email", "Primary contact address");
    let out = merge(MODEL, &source).await;

    // 1 entity + 2 properties documented.
    assert_eq!(out.matches("<Documentation>").count(), 3);
    assert_eq!(out.matches("</Documentation>").count(), 3);

    // Merging the merged output must not duplicate any of them.
    let again = merge(&out, &source).await;
    assert_eq!(again.matches("<Documentation>").count(), 3);
}

#[tokio::test]
async fn namespace_prefixes_do_not_affect_matching() {
    let xml = r#"<ssdl:Schema xmlns:ssdl="http://schemas.microsoft.com/ado/2009/11/edm/ssdl">
  <ssdl:EntityType Name="Customer">
    <ssdl:Property Name="Id" Type="int" />
  </ssdl:EntityType>
</ssdl:Schema>
"#;
    let source = MockMetadataSource::new()
        .with_table("Customer", "Customer record")
        .with_column("Customer", "Id", "Surrogate key");
    let out = merge(xml, &source).await;

    // Matched by local name; inserted nodes stay in the default namespace.
    assert!(out.contains(
        "<ssdl:EntityType Name=\"Customer\"><Documentation><Summary>Customer record</Summary></Documentation>"
    ));
    assert!(out.contains(
        "<ssdl:Property Name=\"Id\" Type=\"int\"><Documentation><Summary>Surrogate key</Summary></Documentation></ssdl:Property>"
    ));
}

#[tokio::test]
async fn untouched_regions_round_trip_exactly() {
    let source = MockMetadataSource::new();
    let out = merge(MODEL, &source).await;
    // Nothing resolved, nothing to remove: byte-identical passthrough.
    assert_eq!(out, MODEL);
}

#[tokio::test]
async fn catalog_failure_aborts_the_merge() {
    let source = MockMetadataSource::new().with_table("Customer", "Customer record");
    source.set_unavailable("connection reset");
    let result = merge_document(MODEL, &source, Verbosity::Quiet).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn model_without_root_fails_before_any_lookup() {
    let source = MockMetadataSource::new();
    source.set_unavailable("must never be reached");
    let result = merge_document("<?xml version=\"1.0\"?>", &source, Verbosity::Quiet).await;
    let rendered = result.unwrap_err().to_string();
    assert!(rendered.contains("no root element"), "got: {rendered}");
}
