//! TeX math: `$$` display blocks and `$...$` / `$$...$$` inline spans.

use super::{Line, bump_line, lines};
use crate::error::ExtensionError;
use crate::extension::{Attempt, BlockExtension, InlineExtension};
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// A display math block.
///
/// ```text
/// $$
/// \int_0^1 x\,dx
/// $$
/// ```
///
/// A single line `$$ x^2 $$` is also a block. An opening `$$` without a
/// closing line is left to the other rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockMath;

impl BlockMath {
    /// The lines of the block at the cursor, if there is one.
    fn block_lines<'a>(p: &Parser<'_, 'a>) -> Option<Vec<Line<'a>>> {
        if !(p.at(SyntaxKind::DOLLAR) && p.nth(1) == SyntaxKind::DOLLAR) {
            return None;
        }
        let mut lines = lines(p);
        let opening = lines.first()?.text.trim_end();
        if opening.len() > 4 && opening.ends_with("$$") {
            lines.truncate(1);
            return Some(lines);
        }
        if opening != "$$" {
            return None;
        }
        let close = lines
            .iter()
            .skip(1)
            .position(|line| line.text.trim() == "$$")?;
        lines.truncate(close + 2);
        Some(lines)
    }
}

impl BlockExtension for BlockMath {
    fn name(&self) -> &str {
        "BlockMath"
    }

    fn emits(&self) -> &[&str] {
        &["BlockMath"]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        let Some(lines) = Self::block_lines(p) else {
            return Ok(Attempt::NoMatch);
        };
        let kind = p.kind("BlockMath")?;

        let m = p.start();
        for _ in &lines {
            bump_line(p);
        }
        m.complete(p, kind);
        Ok(Attempt::Matched)
    }

    fn interrupts_paragraph(&self, p: &Parser<'_, '_>) -> bool {
        Self::block_lines(p).is_some()
    }
}

/// Inline math: `$x$` and `$$x$$`.
///
/// A single-dollar span may not start or end with whitespace, and its closing
/// `$` may not be followed by a digit, so `$5 and $6` stays text. `\$` is a
/// literal dollar.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineMath;

impl InlineMath {
    /// Index of the token that closes a span whose content starts at `from`.
    fn closing(p: &Parser<'_, '_>, from: usize, double: bool) -> Option<usize> {
        let mut i = from;
        loop {
            match p.nth(i) {
                SyntaxKind::NEWLINE | SyntaxKind::EOF => return None,
                SyntaxKind::DOLLAR if double => {
                    if p.nth(i + 1) == SyntaxKind::DOLLAR && i > from {
                        return Some(i);
                    }
                }
                SyntaxKind::DOLLAR => {
                    let escaped = p.nth(i - 1) == SyntaxKind::BACKSLASH;
                    let spaced = p.nth(i - 1) == SyntaxKind::WHITESPACE;
                    let before_digit = p
                        .nth_text(i + 1)
                        .starts_with(|c: char| c.is_ascii_digit());
                    if i > from && !escaped && !spaced && !before_digit {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }
}

impl InlineExtension for InlineMath {
    fn name(&self) -> &str {
        "InlineMath"
    }

    fn emits(&self) -> &[&str] {
        &["InlineMath"]
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        if !p.at(SyntaxKind::DOLLAR) || p.prev() == Some(SyntaxKind::BACKSLASH) {
            return Ok(Attempt::NoMatch);
        }
        let double = p.nth(1) == SyntaxKind::DOLLAR;
        let open = if double { 2 } else { 1 };
        if !double && matches!(p.nth(1), SyntaxKind::WHITESPACE | SyntaxKind::EOF) {
            return Ok(Attempt::NoMatch);
        }
        let Some(close) = Self::closing(p, open, double) else {
            return Ok(Attempt::NoMatch);
        };
        let kind = p.kind("InlineMath")?;

        let m = p.start();
        for _ in 0..open {
            p.bump();
        }
        p.bump_n(close - open, SyntaxKind::TEXT);
        for _ in 0..open {
            p.bump();
        }
        m.complete(p, kind);
        Ok(Attempt::Matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{Grammar, GrammarBuilder};
    use crate::extension::Priority;
    use crate::syntax_kind::SyntaxNode;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn grammar() -> Grammar {
        GrammarBuilder::new()
            .node_type("BlockMath", "math-block")
            .node_type("InlineMath", "math-inline")
            .block(BlockMath, Priority::HIGH)
            .inline(InlineMath, Priority::HIGH)
            .build()
            .unwrap()
    }

    fn nodes(input: &str, name: &str) -> Vec<String> {
        let grammar = grammar();
        let kind = grammar.kind(name).unwrap();
        let tree: SyntaxNode = grammar.parse(input).syntax();
        assert_eq!(tree.text().to_string(), input);
        tree.descendants()
            .filter(|n| n.kind() == kind)
            .map(|n| n.text().to_string())
            .collect()
    }

    #[rstest]
    #[case::single("Let $x$ be.\n", &["$x$"])]
    #[case::double("Let $$x + y$$ be.\n", &["$$x + y$$"])]
    #[case::two("$a$ and $b$\n", &["$a$", "$b$"])]
    #[case::inner_space("$a + b$\n", &["$a + b$"])]
    #[case::prices("costs $5 and $6\n", &[])]
    #[case::leading_space("$ x$\n", &[])]
    #[case::trailing_space("$x $\n", &[])]
    #[case::escaped_open("\\$x$\n", &[])]
    #[case::unclosed("just $x\n", &[])]
    #[case::empty("$$\n", &[])]
    fn inline_math(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(nodes(input, "InlineMath"), expected);
    }

    #[test]
    fn inline_content_is_one_token() {
        let grammar = grammar();
        let tree = grammar.parse("$a_b*c$\n").syntax();
        let math = tree
            .descendants()
            .find(|n| n.kind() == grammar.kind("InlineMath").unwrap())
            .unwrap();
        let texts: Vec<_> = math
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.text().to_string())
            .collect();
        assert_eq!(texts, vec!["$", "a_b*c", "$"]);
    }

    #[test]
    fn display_block() {
        let input = "$$\n\\int_0^1 x\n$$\nafter\n";
        assert_eq!(nodes(input, "BlockMath"), vec!["$$\n\\int_0^1 x\n$$\n"]);
    }

    #[test]
    fn single_line_block() {
        assert_eq!(nodes("$$ x^2 $$\n", "BlockMath"), vec!["$$ x^2 $$\n"]);
    }

    #[test]
    fn unterminated_block_is_not_math() {
        assert!(nodes("$$\nx\n", "BlockMath").is_empty());
    }

    #[test]
    fn block_interrupts_paragraph() {
        let input = "text\n$$\nx\n$$\n";
        assert_eq!(nodes(input, "BlockMath"), vec!["$$\nx\n$$\n"]);
    }
}
