//! # markdown-strata-syntax
//!
//! A lossless, extensible Markdown syntax tree using [Rowan] + [Logos],
//! following the [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## Composing a Grammar
//!
//! A [`Grammar`] is assembled once from four parts and then shared:
//!
//! - a [`BaseGrammar`]: the CommonMark-flavoured block and inline rules;
//! - a [`LanguageResolver`] that maps fenced-code info strings to
//!   tokenizers, usually a [`LanguageRegistry`];
//! - [`ExtensionSlots`]: block and inline parsers with a [`Priority`];
//! - a [`NodeTypeCatalog`]: the node kinds the extensions add to the tree.
//!
//! Composition validates the pieces against each other and fixes the order
//! in which rules are tried. After that the grammar never changes, and any
//! number of threads may parse with it.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar +        (GreenNodeBuilder)
//!                                 extensions)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Every character becomes part of some token - nothing is discarded. The
//! lexer is shared by the base grammar and all extensions.
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser walks the grammar's ordered rules at every block start and
//! inline position. Base rules and extensions emit **events** through the same
//! marker system; an extension that fails is rewound without a trace.
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! The sink consumes events and builds a Rowan green tree. Node kinds added
//! by the catalog are plain [`Kind`] ids above the base vocabulary; the
//! grammar names them.
//!
//! ## Module Structure
//!
//! ```text
//! markdown-strata-syntax/
//! ├── lib.rs           # This file - public API
//! ├── syntax_kind.rs   # SyntaxKind vocabulary, open Kind ids, Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── language/        # Language registry, resolver, code tokenizers
//! ├── extension.rs     # Extension traits, priorities, slot set
//! ├── catalog.rs       # Node-type catalog
//! ├── compose.rs       # Grammar composition
//! ├── extensions/      # Front matter, math, citations, footnotes, plain links
//! ├── preset.rs        # The standard grammar
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, Parse result
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/     # Base rules and rule dispatch
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use markdown_strata_syntax::{SyntaxKind, preset};
//!
//! let grammar = preset::standard().unwrap();
//! let parse = grammar.parse("Euler: $e^{i\\pi} = -1$ [@euler1748]\n");
//! let tree = parse.syntax();
//!
//! // The tree preserves all text
//! assert_eq!(tree.text().to_string(), "Euler: $e^{i\\pi} = -1$ [@euler1748]\n");
//!
//! // Extension nodes carry catalog kinds
//! let math = grammar.kind("InlineMath").unwrap();
//! assert!(tree.descendants().any(|n| n.kind() == math));
//! assert_eq!(tree.kind(), SyntaxKind::ROOT);
//! ```

pub mod catalog;
pub mod compose;
pub mod error;
pub mod extension;
pub mod extensions;
pub mod language;
pub mod lexer;
pub mod parser;
pub mod preset;
pub mod syntax_kind;

pub use catalog::{NodeType, NodeTypeCatalog, StyleTag};
pub use compose::{Grammar, GrammarBuilder, compose};
pub use error::{ConfigError, ExtensionError};
pub use extension::{Attempt, BlockExtension, ExtensionSlots, InlineExtension, Priority};
pub use language::{
    CodeToken, HighlightKind, LanguageRegistry, LanguageResolver, Tokenizer, TokenizerHandle,
};
pub use parser::{BaseBlock, BaseGrammar, BaseInline, Fence, Marker, Parse, Parser};
pub use syntax_kind::{Kind, MarkdownLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn standard() -> Grammar {
        preset::standard().unwrap()
    }

    #[test]
    fn snapshot_simple_paragraph() {
        let grammar = standard();
        let tree = grammar.parse("Hello, world!\n").syntax();
        assert_snapshot!(grammar.debug_tree(&tree), @r#"
        ROOT@0..14
          PARAGRAPH@0..14
            TEXT@0..5 "Hello"
            COMMA@5..6 ","
            WHITESPACE@6..7 " "
            TEXT@7..12 "world"
            EXCLAIM@12..13 "!"
            NEWLINE@13..14 "\n"
        "#);
    }

    #[test]
    fn snapshot_inline_math_and_citation() {
        let grammar = standard();
        let tree = grammar.parse("$x$ [@doe]\n").syntax();
        assert_snapshot!(grammar.debug_tree(&tree), @r#"
        ROOT@0..11
          PARAGRAPH@0..11
            InlineMath@0..3
              DOLLAR@0..1 "$"
              TEXT@1..2 "x"
              DOLLAR@2..3 "$"
            WHITESPACE@3..4 " "
            Citation@4..10
              LBRACKET@4..5 "["
              AT@5..6 "@"
              TEXT@6..9 "doe"
              RBRACKET@9..10 "]"
            NEWLINE@10..11 "\n"
        "#);
    }

    #[test]
    fn snapshot_fenced_code() {
        let grammar = standard();
        let tree = grammar.parse("```rust\nfn main() {}\n```\n").syntax();
        assert_snapshot!(grammar.debug_tree(&tree), @r#"
        ROOT@0..25
          FENCED_CODE@0..25
            BACKTICK@0..1 "`"
            BACKTICK@1..2 "`"
            BACKTICK@2..3 "`"
            CODE_INFO@3..7
              TEXT@3..7 "rust"
            NEWLINE@7..8 "\n"
            CODE_TEXT@8..21
              TEXT@8..10 "fn"
              WHITESPACE@10..11 " "
              TEXT@11..15 "main"
              LPAREN@15..16 "("
              RPAREN@16..17 ")"
              WHITESPACE@17..18 " "
              LBRACE@18..19 "{"
              RBRACE@19..20 "}"
              NEWLINE@20..21 "\n"
            BACKTICK@21..22 "`"
            BACKTICK@22..23 "`"
            BACKTICK@23..24 "`"
            NEWLINE@24..25 "\n"
        "#);
    }

    #[test]
    fn snapshot_messy_unclosed_constructs() {
        let input = r#"---
title: unterminated front matter

Check out $unclosed math and [@broken citation

Also see [^note without a close

Some *half done emphasis

```python
def broken():
    # oops forgot to close the fence
"#;
        let grammar = standard();
        let tree = grammar.parse(input).syntax();
        // Critical: all bytes preserved even for garbage
        assert_eq!(tree.text().to_string(), input);
        assert!(
            !tree
                .descendants()
                .any(|n| n.kind().is_custom())
        );
    }

    #[test]
    fn roundtrip_preserves_text() {
        let grammar = standard();
        let inputs = [
            "Hello, world!\n",
            "---\ntitle: x\n---\n",
            "$$\nx\n$$\n",
            "$a$ and $$b$$\n",
            "[^1]: note\n",
            "see[^1] and ^[inline]\n",
            "[see @doe, p. 1]\n",
            "https://example.com.\n",
            "```\ncode\n```\n",
            "no trailing newline",
            "\r\nCRLF\r\n",
        ];

        for input in inputs {
            let tree = grammar.parse(input).syntax();
            assert_eq!(
                tree.text().to_string(),
                input,
                "Roundtrip failed for: {:?}",
                input
            );
        }
    }
}
