//! Composing the base grammar, extensions, node types and a language
//! resolver into one immutable [`Grammar`].

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use log::debug;
use rowan::NodeOrToken;

use crate::catalog::{NodeType, NodeTypeCatalog, StyleTag};
use crate::error::ConfigError;
use crate::extension::{
    BlockExtension, BlockSlot, ExtensionSlots, InlineExtension, InlineSlot, Priority,
};
use crate::language::{LanguageRegistry, LanguageResolver, TokenizerHandle};
use crate::lexer::lex;
use crate::parser::sink::Sink;
use crate::parser::{BaseBlock, BaseGrammar, BaseInline, Parse, Parser};
use crate::syntax_kind::{Kind, SyntaxKind, SyntaxNode};

pub(crate) enum BlockRule {
    Base(BaseBlock),
    Extension(Box<dyn BlockExtension>),
}

impl BlockRule {
    fn name(&self) -> &str {
        match self {
            BlockRule::Base(base) => base.name(),
            BlockRule::Extension(ext) => ext.name(),
        }
    }
}

pub(crate) enum InlineRule {
    Base(BaseInline),
    Extension(Box<dyn InlineExtension>),
}

impl InlineRule {
    fn name(&self) -> &str {
        match self {
            InlineRule::Base(base) => base.name(),
            InlineRule::Extension(ext) => ext.name(),
        }
    }
}

/// A composed grammar: base rules and extensions in their final order, the
/// fence-language resolver, and the node-type vocabulary.
///
/// Immutable once built; share it freely across threads and parse any number
/// of documents with it.
pub struct Grammar {
    base: BaseGrammar,
    resolver: Box<dyn LanguageResolver>,
    block_rules: Vec<BlockRule>,
    inline_rules: Vec<InlineRule>,
    node_types: Vec<NodeType>,
    kinds: HashMap<String, Kind>,
}

/// Compose a grammar.
///
/// Validates the catalog (style conflicts, reserved names), checks that every
/// node an extension emits is known, rejects two same-kind extensions claiming
/// one node at the same priority, and fixes the rule order: descending
/// priority, base rules first among equals, then registration order.
pub fn compose(
    base: BaseGrammar,
    resolver: impl LanguageResolver + 'static,
    slots: ExtensionSlots,
    node_types: NodeTypeCatalog,
) -> Result<Grammar, ConfigError> {
    compose_boxed(base, Box::new(resolver), slots, node_types)
}

fn compose_boxed(
    base: BaseGrammar,
    resolver: Box<dyn LanguageResolver>,
    slots: ExtensionSlots,
    node_types: NodeTypeCatalog,
) -> Result<Grammar, ConfigError> {
    let node_types = node_types.into_validated()?;
    let capacity = usize::from(u16::MAX - Kind::FIRST_CUSTOM);
    if node_types.len() > capacity {
        return Err(ConfigError::TooManyNodeKinds {
            count: node_types.len(),
        });
    }

    let kinds: HashMap<String, Kind> = node_types
        .iter()
        .zip(Kind::FIRST_CUSTOM..)
        .map(|(node_type, raw)| (node_type.name.clone(), Kind::from_raw(raw)))
        .collect();

    let (block_slots, inline_slots) = slots.into_parts();

    let is_known = |name: &str| kinds.contains_key(name) || SyntaxKind::from_name(name).is_some();
    let block_claims: Vec<_> = block_slots
        .iter()
        .map(|s| (s.extension.name(), s.extension.emits(), s.priority))
        .collect();
    let inline_claims: Vec<_> = inline_slots
        .iter()
        .map(|s| (s.extension.name(), s.extension.emits(), s.priority))
        .collect();
    check_claims(&block_claims, is_known)?;
    check_claims(&inline_claims, is_known)?;

    let block_rules = order_block_rules(base.blocks(), block_slots);
    let inline_rules = order_inline_rules(base.inlines(), inline_slots);

    debug!(
        "composed grammar: blocks [{}], inlines [{}], {} node types",
        block_rules.iter().map(BlockRule::name).collect::<Vec<_>>().join(", "),
        inline_rules.iter().map(InlineRule::name).collect::<Vec<_>>().join(", "),
        node_types.len()
    );

    Ok(Grammar {
        base,
        resolver,
        block_rules,
        inline_rules,
        node_types,
        kinds,
    })
}

type Claim<'a> = (&'a str, &'a [&'a str], Priority);

fn check_claims(claims: &[Claim<'_>], is_known: impl Fn(&str) -> bool) -> Result<(), ConfigError> {
    for (i, (extension, emits, priority)) in claims.iter().enumerate() {
        if let Some(unknown) = emits.iter().find(|name| !is_known(**name)) {
            return Err(ConfigError::UnknownNodeKind {
                extension: (*extension).to_owned(),
                name: (*unknown).to_owned(),
            });
        }
        for (other, other_emits, other_priority) in &claims[..i] {
            if other_priority != priority {
                continue;
            }
            if let Some(shared) = emits.iter().find(|name| other_emits.contains(*name)) {
                return Err(ConfigError::AmbiguousNodeClaim {
                    name: (*shared).to_owned(),
                    first: (*other).to_owned(),
                    second: (*extension).to_owned(),
                    priority: *priority,
                });
            }
        }
    }
    Ok(())
}

// Base rules are listed before extensions, so the stable sort keeps them
// ahead of equal-priority extensions.
fn order_block_rules(base: &[BaseBlock], slots: Vec<BlockSlot>) -> Vec<BlockRule> {
    let mut rules: Vec<(Priority, BlockRule)> = base
        .iter()
        .map(|b| (Priority::BASE, BlockRule::Base(*b)))
        .chain(
            slots
                .into_iter()
                .map(|s| (s.priority, BlockRule::Extension(s.extension))),
        )
        .collect();
    rules.sort_by_key(|(priority, _)| Reverse(*priority));
    rules.into_iter().map(|(_, rule)| rule).collect()
}

fn order_inline_rules(base: &[BaseInline], slots: Vec<InlineSlot>) -> Vec<InlineRule> {
    let mut rules: Vec<(Priority, InlineRule)> = base
        .iter()
        .map(|b| (Priority::BASE, InlineRule::Base(*b)))
        .chain(
            slots
                .into_iter()
                .map(|s| (s.priority, InlineRule::Extension(s.extension))),
        )
        .collect();
    rules.sort_by_key(|(priority, _)| Reverse(*priority));
    rules.into_iter().map(|(_, rule)| rule).collect()
}

impl Grammar {
    /// Parse a document.
    pub fn parse(&self, text: &str) -> Parse {
        let (events, fences, tokens) = Parser::new(self, text, lex(text)).run();
        let green = Sink::new(&tokens, events).finish();
        Parse::new(green, fences)
    }

    /// Kind for a base or catalog node name.
    pub fn kind(&self, name: &str) -> Option<Kind> {
        SyntaxKind::from_name(name)
            .map(Kind::from)
            .or_else(|| self.kinds.get(name).copied())
    }

    /// Name of a kind in this grammar's vocabulary.
    pub fn kind_name(&self, kind: Kind) -> Option<&str> {
        match kind.base() {
            Some(base) => Some(base.name()),
            None => self.node_type(kind).map(|t| t.name.as_str()),
        }
    }

    /// Catalog entry for a custom kind.
    pub fn node_type(&self, kind: Kind) -> Option<&NodeType> {
        let index = kind.raw().checked_sub(Kind::FIRST_CUSTOM)?;
        self.node_types.get(usize::from(index))
    }

    /// Style tag for a custom kind.
    pub fn style(&self, kind: Kind) -> Option<&StyleTag> {
        self.node_type(kind).map(|t| &t.style)
    }

    pub fn node_types(&self) -> &[NodeType] {
        &self.node_types
    }

    pub fn base(&self) -> &BaseGrammar {
        &self.base
    }

    /// Block rule names in the order they are tried.
    pub fn block_order(&self) -> Vec<&str> {
        self.block_rules.iter().map(BlockRule::name).collect()
    }

    /// Inline rule names in the order they are tried.
    pub fn inline_order(&self) -> Vec<&str> {
        self.inline_rules.iter().map(InlineRule::name).collect()
    }

    /// Resolve a fence info string with this grammar's resolver.
    pub fn resolve_language(&self, info: &str) -> Option<TokenizerHandle> {
        self.resolver.resolve(info)
    }

    pub(crate) fn block_rules(&self) -> &[BlockRule] {
        &self.block_rules
    }

    pub(crate) fn inline_rules(&self) -> &[InlineRule] {
        &self.inline_rules
    }

    /// Render a tree with kind names from this grammar, one element per line.
    pub fn debug_tree(&self, node: &SyntaxNode) -> String {
        let mut out = String::new();
        self.write_tree(node, 0, &mut out);
        out
    }

    fn write_tree(&self, node: &SyntaxNode, indent: usize, out: &mut String) {
        let prefix = "  ".repeat(indent);
        let name = self.kind_name(node.kind()).unwrap_or("?");
        out.push_str(&format!("{prefix}{name}@{:?}\n", node.text_range()));

        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(n) => self.write_tree(&n, indent + 1, out),
                NodeOrToken::Token(t) => {
                    let name = self.kind_name(t.kind()).unwrap_or("?");
                    out.push_str(&format!(
                        "{prefix}  {name}@{:?} {:?}\n",
                        t.text_range(),
                        t.text()
                    ));
                }
            }
        }
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("blocks", &self.block_order())
            .field("inlines", &self.inline_order())
            .field("node_types", &self.node_types)
            .finish_non_exhaustive()
    }
}

/// Builder over [`compose`].
///
/// Starts from the default base grammar, the builtin language table, no
/// extensions and an empty catalog.
pub struct GrammarBuilder {
    base: BaseGrammar,
    resolver: Box<dyn LanguageResolver>,
    slots: ExtensionSlots,
    node_types: NodeTypeCatalog,
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self {
            base: BaseGrammar::default(),
            resolver: Box::new(LanguageRegistry::builtin()),
            slots: ExtensionSlots::new(),
            node_types: NodeTypeCatalog::new(),
        }
    }
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, base: BaseGrammar) -> Self {
        self.base = base;
        self
    }

    pub fn resolver(mut self, resolver: impl LanguageResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn block(mut self, extension: impl BlockExtension + 'static, priority: Priority) -> Self {
        self.slots.block(extension, priority);
        self
    }

    pub fn inline(mut self, extension: impl InlineExtension + 'static, priority: Priority) -> Self {
        self.slots.inline(extension, priority);
        self
    }

    /// Replace all extensions.
    pub fn slots(mut self, slots: ExtensionSlots) -> Self {
        self.slots = slots;
        self
    }

    pub fn node_type(mut self, name: impl Into<String>, style: impl Into<StyleTag>) -> Self {
        self.node_types.register(name, style);
        self
    }

    /// Replace the catalog.
    pub fn node_types(mut self, node_types: NodeTypeCatalog) -> Self {
        self.node_types = node_types;
        self
    }

    pub fn build(self) -> Result<Grammar, ConfigError> {
        compose_boxed(self.base, self.resolver, self.slots, self.node_types)
    }
}
