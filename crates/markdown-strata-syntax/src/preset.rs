//! The default augmented grammar: base rules, the builtin language table, and
//! every reference extension at its usual priority.

use crate::catalog::{NodeTypeCatalog, StyleTag};
use crate::compose::{Grammar, GrammarBuilder};
use crate::error::ConfigError;
use crate::extension::{ExtensionSlots, Priority};
use crate::extensions::{
    BlockMath, Citation, FootnoteDefinition, FootnoteReference, FrontMatter, InlineMath, PlainLink,
};

/// Node types used by the reference extensions. The style tag of each is
/// its name.
pub const NODE_TYPES: [&str; 18] = [
    "YAMLFrontmatter",
    "YAMLFrontmatterStart",
    "YAMLFrontmatterEnd",
    "YAMLFrontmatterKey",
    "YAMLFrontmatterString",
    "YAMLFrontmatterBoolean",
    "YAMLFrontmatterNumber",
    "YAMLFrontmatterPlain",
    "YAMLFrontmatterPair",
    "YAMLFrontmatterSeq",
    "YAMLFrontmatterMap",
    "Citation",
    "Footnote",
    "FootnoteRef",
    "FootnoteBody",
    "InlineMath",
    "BlockMath",
    "PlainLink",
];

pub fn default_node_types() -> NodeTypeCatalog {
    let mut catalog = NodeTypeCatalog::new();
    for name in NODE_TYPES {
        catalog.register(name, StyleTag::new_static(name));
    }
    catalog
}

/// The reference extensions, front matter first.
pub fn standard_slots() -> ExtensionSlots {
    let mut slots = ExtensionSlots::new();
    slots
        .block(FrontMatter, Priority::HIGH)
        .block(BlockMath, Priority::HIGH)
        .block(FootnoteDefinition, Priority::HIGH)
        .inline(InlineMath, Priority::HIGH)
        .inline(FootnoteReference, Priority::HIGH)
        .inline(Citation, Priority::HIGH)
        .inline(PlainLink, Priority::LOW);
    slots
}

/// A builder preloaded with the standard catalog and extensions, for callers
/// that want to swap the resolver or add their own extensions.
pub fn standard_builder() -> GrammarBuilder {
    GrammarBuilder::new()
        .node_types(default_node_types())
        .slots(standard_slots())
}

/// The standard grammar.
pub fn standard() -> Result<Grammar, ConfigError> {
    standard_builder().build()
}
