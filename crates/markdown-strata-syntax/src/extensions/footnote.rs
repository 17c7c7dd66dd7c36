//! Footnotes: `[^id]` references, `^[...]` inline notes and `[^id]: ...`
//! definitions.

use crate::error::ExtensionError;
use crate::extension::{Attempt, BlockExtension, InlineExtension};
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Token count of a `[^id]` label at `from`, if there is one there.
fn label_len(p: &Parser<'_, '_>, from: usize) -> Option<usize> {
    if p.nth(from) != SyntaxKind::LBRACKET || p.nth(from + 1) != SyntaxKind::CARET {
        return None;
    }
    let mut i = from + 2;
    loop {
        match p.nth(i) {
            SyntaxKind::RBRACKET if i > from + 2 => return Some(i + 1 - from),
            SyntaxKind::RBRACKET
            | SyntaxKind::LBRACKET
            | SyntaxKind::WHITESPACE
            | SyntaxKind::NEWLINE
            | SyntaxKind::EOF => return None,
            _ => i += 1,
        }
    }
}

/// Token count of a `^[note]` at the cursor, brackets balanced on one line.
fn inline_note_len(p: &Parser<'_, '_>) -> Option<usize> {
    if !p.at(SyntaxKind::CARET) || p.nth(1) != SyntaxKind::LBRACKET {
        return None;
    }
    let mut depth = 0usize;
    let mut i = 1;
    loop {
        match p.nth(i) {
            SyntaxKind::LBRACKET => depth += 1,
            SyntaxKind::RBRACKET => {
                depth -= 1;
                if depth == 0 {
                    return (i > 2).then_some(i + 1);
                }
            }
            SyntaxKind::NEWLINE | SyntaxKind::EOF => return None,
            _ => {}
        }
        i += 1;
    }
}

/// A footnote reference, `[^1]`, or an inline note, `^[text]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FootnoteReference;

impl InlineExtension for FootnoteReference {
    fn name(&self) -> &str {
        "FootnoteReference"
    }

    fn emits(&self) -> &[&str] {
        &["Footnote"]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        let Some(len) = label_len(p, 0).or_else(|| inline_note_len(p)) else {
            return Ok(Attempt::NoMatch);
        };
        let kind = p.kind("Footnote")?;

        let m = p.start();
        for _ in 0..len {
            p.bump();
        }
        m.complete(p, kind);
        Ok(Attempt::Matched)
    }
}

/// A footnote definition.
///
/// ```text
/// [^1]: The note text, with *inline* markup.
///     Indented lines continue the note.
/// ```
///
/// Produces `FootnoteRef` around the label and a `FootnoteBody`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FootnoteDefinition;

impl FootnoteDefinition {
    fn label(p: &Parser<'_, '_>) -> Option<usize> {
        label_len(p, 0).filter(|&len| p.nth(len) == SyntaxKind::COLON)
    }
}

/// The line after the cursor's NEWLINE is indented and not blank.
fn continues(p: &Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::NEWLINE)
        && p.nth(1) == SyntaxKind::WHITESPACE
        && !matches!(p.nth(2), SyntaxKind::NEWLINE | SyntaxKind::EOF)
}

impl BlockExtension for FootnoteDefinition {
    fn name(&self) -> &str {
        "FootnoteDefinition"
    }

    fn emits(&self) -> &[&str] {
        &["FootnoteRef", "FootnoteBody"]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        let Some(len) = Self::label(p) else {
            return Ok(Attempt::NoMatch);
        };
        let definition = p.kind("FootnoteRef")?;
        let body_kind = p.kind("FootnoteBody")?;

        let m = p.start();
        for _ in 0..=len {
            p.bump();
        }
        p.eat(SyntaxKind::WHITESPACE);

        let body = p.start();
        loop {
            p.inline_until_newline();
            if !continues(p) {
                break;
            }
            p.bump();
            p.bump();
        }
        body.complete(p, body_kind);

        p.eat(SyntaxKind::NEWLINE);
        m.complete(p, definition);
        Ok(Attempt::Matched)
    }

    fn interrupts_paragraph(&self, p: &Parser<'_, '_>) -> bool {
        Self::label(p).is_some()
    }
}
