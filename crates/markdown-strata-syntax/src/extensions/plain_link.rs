//! Bare URLs.

use std::sync::LazyLock;

use regex::Regex;
use rowan::TextSize;

use super::at_word_start;
use crate::error::ExtensionError;
use crate::extension::{Attempt, InlineExtension};
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:https?|ftp)://[^\s<>\[\]()]+|www\.[^\s<>\[\]()]+\.[^\s<>\[\]()]+)")
        .expect("plain link regex")
});

/// Characters that end a sentence rather than a URL.
const TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"', '*', '_', '~'];

/// A bare `http(s)://`, `ftp://` or `www.` URL at the start of a word.
///
/// Trailing sentence punctuation is not part of the link.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainLink;

impl PlainLink {
    fn match_len(p: &Parser<'_, '_>) -> Option<usize> {
        if !p.at(SyntaxKind::TEXT) || !at_word_start(p) {
            return None;
        }
        let line = p.rest_of_line();
        let url = URL.find(line)?.as_str().trim_end_matches(TRAILING);
        (!url.ends_with("://")).then_some(url.len())
    }
}

impl InlineExtension for PlainLink {
    fn name(&self) -> &str {
        "PlainLink"
    }

    fn emits(&self) -> &[&str] {
        &["PlainLink"]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        let Some(len) = Self::match_len(p) else {
            return Ok(Attempt::NoMatch);
        };
        let kind = p.kind("PlainLink")?;
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

    fn links(input: &str) -> Vec<String> {
        let grammar = GrammarBuilder::new()
            .node_type("PlainLink", "link")
            .inline(PlainLink, Priority::LOW)
            .build()
            .unwrap();
        let kind = grammar.kind("PlainLink").unwrap();
        let tree = grammar.parse(input).syntax();
        assert_eq!(tree.text().to_string(), input);
        tree.descendants()
            .filter(|n| n.kind() == kind)
            .map(|n| n.text().to_string())
            .collect()
    }

    #[rstest]
    #[case::https("Go to https://example.com now\n", &["https://example.com"])]
    #[case::path_and_query(
        "see https://example.com/a_b/c-d?x=1#top\n",
        &["https://example.com/a_b/c-d?x=1#top"]
    )]
    #[case::ftp("ftp://files.example.org\n", &["ftp://files.example.org"])]
    #[case::www("visit www.example.com today\n", &["www.example.com"])]
    #[case::trailing_comma("https://example.com, then\n", &["https://example.com"])]
    #[case::in_parens("(https://example.com)\n", &["https://example.com"])]
    #[case::sentence_end("See https://example.com. Next\n", &["https://example.com"])]
    #[case::question("Is it https://example.com/a?\n", &["https://example.com/a"])]
    #[case::glued("xhttps://example.com\n", &[])]
    #[case::scheme_only("https:// nothing\n", &[])]
    #[case::bare_www("www. nope\n", &[])]
    fn bare_urls(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(links(input), expected);
    }

    #[test]
    fn link_rule_keeps_its_url() {
        let input = "[docs](https://example.com)\n";
        assert!(links(input).is_empty());
    }

    #[test]
    fn autolink_keeps_its_url() {
        assert!(links("<https://example.com>\n").is_empty());
    }
}
