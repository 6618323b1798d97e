//! templates::markers
//!
//! The versioned marker table for the EF 6 DbContext T4 templates.
//!
//! # Design
//!
//! Each rule pairs one exact generator expression with its wrapped
//! replacement. The replacement re-emits the original expression, prefixed at
//! generation time with a `/// <summary>` block built from the member's own
//! `Documentation.Summary` (empty when the member has none).
//!
//! Because the replacement still contains the logic of the original
//! expression but not its literal text, patching is a no-op once a file has
//! been patched: the marker is simply no longer present. That absence check
//! is the governing idempotence contract; if someone reverts part of a file
//! and the literal marker reappears, it will be wrapped again.

/// One literal substitution: an exact marker and its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRule {
    /// Exact source-text fragment to search for.
    pub marker: &'static str,
    /// Text that replaces the whole marker.
    pub replacement: &'static str,
}

/// Version tag for the marker table (EF 6 DbContext templates).
pub const MARKER_TABLE_VERSION: &str = "ef6-v1";

/// Rules for the context template (`.Context.tt`): the DbSet accessor.
pub const CONTEXT_RULES: &[MarkerRule] = &[MarkerRule {
    marker: "<#=codeStringGenerator.DbSet(entitySet)#>",
    replacement: r#"<#="/// <summary>" + Environment.NewLine + "    " + "/// " + ((entitySet.ElementType.Documentation != null) ? entitySet.ElementType.Documentation.Summary : "") + Environment.NewLine + "    " + "/// </summary>" + Environment.NewLine + "    " + codeStringGenerator.DbSet(entitySet)#>"#,
}];

/// Rules for the entity template (`.tt`): class opening, scalar property,
/// complex property.
pub const ENTITY_RULES: &[MarkerRule] = &[
    MarkerRule {
        marker: "<#=codeStringGenerator.EntityClassOpening(entity)#>",
        replacement: r#"<#="/// <summary>" + Environment.NewLine + "/// " + ((entity.Documentation != null) ? entity.Documentation.Summary : "") + Environment.NewLine + "/// </summary>" + Environment.NewLine + codeStringGenerator.EntityClassOpening(entity)#>"#,
    },
    MarkerRule {
        marker: "<#=codeStringGenerator.Property(edmProperty)#>",
        replacement: r#"<#="/// <summary>" + Environment.NewLine + "    " + "/// " + ((edmProperty.Documentation != null) ? edmProperty.Documentation.Summary : "") + Environment.NewLine + "    " + "/// </summary>" + Environment.NewLine + "    " + codeStringGenerator.Property(edmProperty)#>"#,
    },
    MarkerRule {
        marker: "<#=codeStringGenerator.Property(complexProperty)#>",
        replacement: r#"<#="/// <summary>" + Environment.NewLine + "    " + "/// " + ((complexProperty.Documentation != null) ? complexProperty.Documentation.Summary : "") + Environment.NewLine + "    " + "/// </summary>" + Environment.NewLine + "    " + codeStringGenerator.Property(complexProperty)#>"#,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn all_rules() -> impl Iterator<Item = &'static MarkerRule> {
        CONTEXT_RULES.iter().chain(ENTITY_RULES.iter())
    }

    #[test]
    fn every_replacement_re_emits_its_original_expression() {
        for rule in all_rules() {
            // The wrapped form must still evaluate the generator call the
            // marker evaluated, stripped of its T4 delimiters.
            let inner = rule
                .marker
                .strip_prefix("<#=")
                .and_then(|m| m.strip_suffix("#>"))
                .unwrap();
            assert!(
                rule.replacement.contains(inner),
                "replacement for '{}' drops the original expression",
                rule.marker
            );
        }
    }

    #[test]
    fn no_replacement_contains_a_whole_marker() {
        // Otherwise a second patch run would wrap the wrapped form.
        for rule in all_rules() {
            for other in all_rules() {
                assert!(
                    !rule.replacement.contains(other.marker),
                    "replacement for '{}' contains marker '{}'",
                    rule.marker,
                    other.marker
                );
            }
        }
    }

    #[test]
    fn replacements_emit_summary_blocks() {
        for rule in all_rules() {
            assert!(rule.replacement.contains(r#""/// <summary>""#));
            assert!(rule.replacement.contains(r#""/// </summary>""#));
            assert!(rule.replacement.contains("Documentation != null"));
        }
    }

    #[test]
    fn table_version_is_stable() {
        assert_eq!(MARKER_TABLE_VERSION, "ef6-v1");
        assert_eq!(CONTEXT_RULES.len(), 1);
        assert_eq!(ENTITY_RULES.len(), 3);
    }
}
