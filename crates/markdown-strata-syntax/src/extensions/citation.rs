//! Pandoc-style citations.

use std::sync::LazyLock;

use regex::Regex;
use rowan::TextSize;

use super::at_word_start;
use crate::error::ExtensionError;
use crate::extension::{Attempt, InlineExtension};
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// A citation key: starts with a letter, digit or underscore; internal
/// punctuation must be followed by a word character.
const KEY: &str = r"[\p{L}\p{N}_](?:[\p{L}\p{N}_]|[:.#$%&\-+?<>~/][\p{L}\p{N}_])*";

/// `[see @doe99, p. 33; -@roe]`, with the first key at a word boundary.
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\[(?:[^\[\]\n]*[\s;])?-?@{KEY}[^\[\]\n]*\]"))
        .expect("bracketed citation regex")
});

/// `@doe99` or `-@doe99`, optionally followed by a ` [p. 33]` locator.
static IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^-?@{KEY}(?:[ \t]\[[^\[\]@\n]*\])?")).expect("in-text citation regex")
});

/// A bracketed or in-text citation.
///
/// ```text
/// As shown [see @doe99, p. 33; @roe].
/// @doe99 [p. 4] says otherwise.
/// ```
///
/// A bracket followed by `(` is left to the link rule. In-text keys must
/// start a word, so e-mail addresses stay text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Citation;

impl Citation {
    /// Byte length of the citation at the cursor.
    fn match_len(p: &Parser<'_, '_>) -> Option<usize> {
        let line = p.rest_of_line();
        match p.current() {
            SyntaxKind::LBRACKET => {
                let m = BRACKETED.find(line)?;
                (!line[m.end()..].starts_with('(')).then_some(m.end())
            }
            SyntaxKind::AT | SyntaxKind::DASH if at_word_start(p) => {
                IN_TEXT.find(line).map(|m| m.end())
            }
            _ => None,
        }
    }
}

impl InlineExtension for Citation {
    fn name(&self) -> &str {
        "Citation"
    }

    fn emits(&self) -> &[&str] {
        &["Citation"]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        let Some(len) = Self::match_len(p) else {
            return Ok(Attempt::NoMatch);
        };
        let kind = p.kind("Citation")?;
        let end = p.offset() + TextSize::of(&p.rest_of_line()[..len]);

        let m = p.start();
        p.bump_until(end);
        m.complete(p, kind);
        Ok(Attempt::Matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::GrammarBuilder;
    use crate::extension::Priority;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn citations(input: &str) -> Vec<String> {
        let grammar = GrammarBuilder::new()
            .node_type("Citation", "citation")
            .inline(Citation, Priority::HIGH)
            .build()
            .unwrap();
        let kind = grammar.kind("Citation").unwrap();
        let tree = grammar.parse(input).syntax();
        assert_eq!(tree.text().to_string(), input);
        tree.descendants()
            .filter(|n| n.kind() == kind)
            .map(|n| n.text().to_string())
            .collect()
    }

    #[rstest]
    #[case::bracketed("As shown [@doe99].\n", &["[@doe99]"])]
    #[case::prefix_and_locator("Yes [see @doe99, p. 33].\n", &["[see @doe99, p. 33]"])]
    #[case::several("[@a; @b-c]\n", &["[@a; @b-c]"])]
    #[case::suppressed_author("[-@doe99]\n", &["[-@doe99]"])]
    #[case::in_text("@doe99 says so.\n", &["@doe99"])]
    #[case::in_text_locator("@doe99 [p. 4] says so.\n", &["@doe99 [p. 4]"])]
    #[case::in_parens("(@doe99)\n", &["@doe99"])]
    #[case::key_punctuation("@doe:1999 wrote.\n", &["@doe:1999"])]
    #[case::sentence_end("As @doe said. Then @doe.\n", &["@doe", "@doe"])]
    #[case::possessive("Ask @doe's book\n", &["@doe"])]
    #[case::question("Was it @doe?\n", &["@doe"])]
    #[case::email("mail me@example.com\n", &[])]
    #[case::bracketed_email("[mail me@example.com]\n", &[])]
    #[case::inside_link_text("[see @doe](https://example.com)\n", &["@doe"])]
    #[case::no_key("[just text]\n", &[])]
    fn citation_forms(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(citations(input), expected);
    }

    #[test]
    fn bracketed_citation_beats_link_rule() {
        let grammar = GrammarBuilder::new()
            .node_type("Citation", "citation")
            .inline(Citation, Priority::HIGH)
            .build()
            .unwrap();
        let tree = grammar.parse("[@doe]\n").syntax();
        assert!(!tree.descendants().any(|n| n.kind() == SyntaxKind::INLINE));
    }
}
