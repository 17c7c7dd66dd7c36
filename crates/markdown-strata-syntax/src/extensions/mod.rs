//! # Reference Extensions
//!
//! Non-standard syntaxes built on the public extension traits, with no
//! special access to the base grammar:
//!
//! | Extension | Slot | Syntax |
//! |-----------|------|--------|
//! | [`FrontMatter`] | block | `---` YAML block at the top of the document |
//! | [`BlockMath`] | block | `$$` ... `$$` |
//! | [`FootnoteDefinition`] | block | `[^id]: text` |
//! | [`InlineMath`] | inline | `$x$`, `$$x$$` |
//! | [`FootnoteReference`] | inline | `[^id]`, `^[inline note]` |
//! | [`Citation`] | inline | `[see @doe, p. 1]`, `@doe` |
//! | [`PlainLink`] | inline | bare `https://...` and `www.` URLs |
//!
//! [`crate::preset`] registers all of them with their usual priorities.

mod citation;
mod footnote;
mod front_matter;
mod math;
mod plain_link;

pub use citation::Citation;
pub use footnote::{FootnoteDefinition, FootnoteReference};
pub use front_matter::FrontMatter;
pub use math::{BlockMath, InlineMath};
pub use plain_link::PlainLink;

use rowan::TextSize;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Not glued to a preceding word.
fn at_word_start(p: &Parser<'_, '_>) -> bool {
    matches!(
        p.prev(),
        None | Some(SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::LPAREN)
    )
}

/// A line of the unconsumed input, without its line ending.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    start: TextSize,
    text: &'a str,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start().len()
    }
}

/// Lines from the cursor to the end of the document.
fn lines<'a>(p: &Parser<'_, 'a>) -> Vec<Line<'a>> {
    let mut start = p.offset();
    p.rest()
        .split_inclusive('\n')
        .map(|raw| {
            let text = raw.strip_suffix('\n').unwrap_or(raw);
            let text = text.strip_suffix('\r').unwrap_or(text);
            let line = Line { start, text };
            start += TextSize::of(raw);
            line
        })
        .collect()
}

/// Bump the rest of the current line and its line ending.
fn bump_line(p: &mut Parser<'_, '_>) {
    p.bump_to_line_end();
    p.eat(SyntaxKind::NEWLINE);
}
