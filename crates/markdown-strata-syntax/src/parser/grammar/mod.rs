//! # Grammar Rules
//!
//! This module contains the base grammar rules that drive parsing, and the
//! dispatch loops that interleave them with extension parsers.
//!
//! ## Dispatch
//!
//! At every block start, [`block::block`] walks the grammar's ordered block
//! rules (base rules and block extensions, highest priority first). The first
//! rule that matches wins; if none does, a paragraph is parsed. Inline
//! scanning does the same with inline rules; if nothing matches, the current
//! token is consumed as literal text.
//!
//! ## Error Recovery
//!
//! Grammar functions are lenient: they produce a tree even for invalid input
//! and never drop bytes. The root loop additionally guarantees progress by
//! wrapping a stuck token in an ERROR node.

pub(crate) mod block;
pub(crate) mod inline;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

pub use block::BaseBlock;
pub use inline::BaseInline;

/// The base block and inline rules a grammar is composed from, in their
/// base-grammar order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseGrammar {
    blocks: Vec<BaseBlock>,
    inlines: Vec<BaseInline>,
}

impl Default for BaseGrammar {
    fn default() -> Self {
        Self {
            blocks: BaseBlock::ALL.to_vec(),
            inlines: BaseInline::ALL.to_vec(),
        }
    }
}

impl BaseGrammar {
    pub fn new(
        blocks: impl IntoIterator<Item = BaseBlock>,
        inlines: impl IntoIterator<Item = BaseInline>,
    ) -> Self {
        Self {
            blocks: blocks.into_iter().collect(),
            inlines: inlines.into_iter().collect(),
        }
    }

    pub fn without_block(mut self, rule: BaseBlock) -> Self {
        self.blocks.retain(|b| *b != rule);
        self
    }

    pub fn without_inline(mut self, rule: BaseInline) -> Self {
        self.inlines.retain(|i| *i != rule);
        self
    }

    pub fn blocks(&self) -> &[BaseBlock] {
        &self.blocks
    }

    pub fn inlines(&self) -> &[BaseInline] {
        &self.inlines
    }
}

/// Parse the root document.
pub(crate) fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while !p.at_end() {
        let before = p.checkpoint();
        block::block(p);
        if !p.progressed_since(&before) {
            let error = p.start();
            p.bump();
            error.complete(p, SyntaxKind::ERROR);
        }
    }

    m.complete(p, SyntaxKind::ROOT);
}
