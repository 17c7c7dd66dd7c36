//! Block-level grammar rules.

use log::trace;
use rowan::TextRange;

use crate::compose::BlockRule;
use crate::extension;
use crate::parser::{Fence, Parser};
use crate::syntax_kind::SyntaxKind;

use super::inline;

/// Block rules of the base grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseBlock {
    ThematicBreak,
    ListItem,
    Heading,
    BlockQuote,
    FencedCode,
}

impl BaseBlock {
    /// Base-grammar order. Thematic breaks come before list items so that
    /// `- - -` is a break.
    pub const ALL: [BaseBlock; 5] = [
        BaseBlock::ThematicBreak,
        BaseBlock::ListItem,
        BaseBlock::Heading,
        BaseBlock::BlockQuote,
        BaseBlock::FencedCode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BaseBlock::ThematicBreak => "ThematicBreak",
            BaseBlock::ListItem => "ListItem",
            BaseBlock::Heading => "Heading",
            BaseBlock::BlockQuote => "BlockQuote",
            BaseBlock::FencedCode => "FencedCode",
        }
    }

    /// The node this rule produces.
    pub fn node(self) -> SyntaxKind {
        match self {
            BaseBlock::ThematicBreak => SyntaxKind::THEMATIC_BREAK,
            BaseBlock::ListItem => SyntaxKind::LIST_ITEM,
            BaseBlock::Heading => SyntaxKind::HEADING,
            BaseBlock::BlockQuote => SyntaxKind::BLOCK_QUOTE,
            BaseBlock::FencedCode => SyntaxKind::FENCED_CODE,
        }
    }

    pub(crate) fn applies(self, p: &Parser<'_, '_>) -> bool {
        match self {
            BaseBlock::ThematicBreak => is_thematic_break(p),
            BaseBlock::ListItem => is_list_item(p),
            BaseBlock::Heading => is_heading(p),
            BaseBlock::BlockQuote => p.at(SyntaxKind::GT),
            BaseBlock::FencedCode => is_code_fence(p),
        }
    }

    /// Whether this rule may start on the line right after paragraph text.
    pub(crate) fn interrupts_paragraph(self, p: &Parser<'_, '_>) -> bool {
        match self {
            BaseBlock::ThematicBreak => false,
            _ => self.applies(p),
        }
    }

    pub(crate) fn parse(self, p: &mut Parser<'_, '_>) {
        match self {
            BaseBlock::ThematicBreak => thematic_break(p),
            BaseBlock::ListItem => list_item(p),
            BaseBlock::Heading => heading(p),
            BaseBlock::BlockQuote => blockquote(p),
            BaseBlock::FencedCode => fenced_code(p),
        }
    }
}

/// Parse a block element.
pub(crate) fn block(p: &mut Parser<'_, '_>) {
    skip_blank_lines(p);

    if p.at_end() {
        return;
    }

    let grammar = p.grammar();
    for rule in grammar.block_rules() {
        match rule {
            BlockRule::Base(base) => {
                if base.applies(p) {
                    base.parse(p);
                    return;
                }
            }
            BlockRule::Extension(ext) => {
                if extension::attempt_block(p, ext.as_ref()) {
                    return;
                }
            }
        }
    }

    paragraph(p);
}

/// True when the cursor is on a line holding nothing but whitespace.
fn at_blank_line(p: &Parser<'_, '_>) -> bool {
    match p.current() {
        SyntaxKind::NEWLINE => true,
        SyntaxKind::WHITESPACE => matches!(p.nth(1), SyntaxKind::NEWLINE | SyntaxKind::EOF),
        _ => false,
    }
}

fn skip_blank_lines(p: &mut Parser<'_, '_>) {
    while at_blank_line(p) {
        p.eat(SyntaxKind::WHITESPACE);
        p.eat(SyntaxKind::NEWLINE);
    }
}

/// Check if current position is a thematic break (---, ***, ___).
fn is_thematic_break(p: &Parser<'_, '_>) -> bool {
    let marker = p.current();
    if !matches!(
        marker,
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::UNDERSCORE
    ) {
        return false;
    }

    let mut count = 0;
    let mut i = 0;

    while p.nth(i) != SyntaxKind::EOF && p.nth(i) != SyntaxKind::NEWLINE {
        match p.nth(i) {
            k if k == marker => count += 1,
            SyntaxKind::WHITESPACE => {}
            _ => return false,
        }
        i += 1;
    }

    count >= 3
}

fn is_list_item(p: &Parser<'_, '_>) -> bool {
    matches!(
        p.current(),
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::PLUS
    ) && p.nth(1) == SyntaxKind::WHITESPACE
}

/// One to six `#` followed by a space or the end of the line. `#tag` is text.
fn is_heading(p: &Parser<'_, '_>) -> bool {
    let mut level = 0;
    while p.nth(level) == SyntaxKind::HASH {
        level += 1;
    }
    (1..=6).contains(&level)
        && matches!(
            p.nth(level),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
        )
}

/// Check if current position starts a code fence.
fn is_code_fence(p: &Parser<'_, '_>) -> bool {
    let marker = p.current();
    if !matches!(marker, SyntaxKind::BACKTICK | SyntaxKind::TILDE) {
        return false;
    }

    let mut count = 0;
    while p.nth(count) == marker {
        count += 1;
    }
    if count < 3 {
        return false;
    }

    // A backtick fence's info string may not contain backticks, otherwise
    // this is an inline code span.
    if marker == SyntaxKind::BACKTICK {
        let mut i = count;
        while !matches!(p.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
            if p.nth(i) == SyntaxKind::BACKTICK {
                return false;
            }
            i += 1;
        }
    }

    true
}

/// Parse an ATX heading.
fn heading(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while p.at(SyntaxKind::HASH) {
        p.bump();
    }
    p.eat(SyntaxKind::WHITESPACE);

    inline::inline_until_newline(p);
    p.eat(SyntaxKind::NEWLINE);

    m.complete(p, SyntaxKind::HEADING);
}

/// Parse a blockquote.
fn blockquote(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while p.at(SyntaxKind::GT) {
        p.bump();
        p.eat(SyntaxKind::WHITESPACE);

        inline::inline_until_newline(p);

        if !p.eat(SyntaxKind::NEWLINE) {
            break;
        }
        // Continuation only if the next line is quoted too
        if !p.at(SyntaxKind::GT) {
            break;
        }
    }

    m.complete(p, SyntaxKind::BLOCK_QUOTE);
}

/// Parse a list item.
fn list_item(p: &mut Parser<'_, '_>) {
    let m = p.start();

    // Marker and the space after it
    p.bump();
    p.eat(SyntaxKind::WHITESPACE);

    inline::inline_until_newline(p);
    p.eat(SyntaxKind::NEWLINE);

    m.complete(p, SyntaxKind::LIST_ITEM);
}

/// Parse a thematic break.
fn thematic_break(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump_to_line_end();
    p.eat(SyntaxKind::NEWLINE);
    m.complete(p, SyntaxKind::THEMATIC_BREAK);
}

/// Length of a closing fence run on the current line, if the line is one.
fn closing_fence(p: &Parser<'_, '_>, marker: SyntaxKind, open_len: usize) -> Option<usize> {
    let mut len = 0;
    while p.nth(len) == marker {
        len += 1;
    }
    if len < open_len {
        return None;
    }
    let mut i = len;
    while p.nth(i) == SyntaxKind::WHITESPACE {
        i += 1;
    }
    matches!(p.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF).then_some(len)
}

/// Parse a fenced code block.
///
/// The grammar's language resolver is consulted exactly once, with the raw
/// info string. The body is always wrapped in CODE_TEXT, whether or not a
/// language was found and even when it is empty.
fn fenced_code(p: &mut Parser<'_, '_>) {
    let start = p.offset();
    let m = p.start();

    let fence_marker = p.current();
    let mut fence_len = 0;
    while p.at(fence_marker) {
        p.bump();
        fence_len += 1;
    }

    let info = p.rest_of_line().to_owned();
    p.eat(SyntaxKind::WHITESPACE);
    if !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        let info_marker = p.start();
        p.bump_to_line_end();
        info_marker.complete(p, SyntaxKind::CODE_INFO);
    }

    let language = p.grammar().resolve_language(&info);
    trace!(
        "fence at {start:?} with info {info:?} resolved to {:?}",
        language.as_ref().map(|t| t.name())
    );

    p.eat(SyntaxKind::NEWLINE);

    let code_start = p.offset();
    let code = p.start();
    let mut closing = None;
    while !p.at_end() {
        if let Some(len) = closing_fence(p, fence_marker, fence_len) {
            closing = Some(len);
            break;
        }
        p.bump_to_line_end();
        p.eat(SyntaxKind::NEWLINE);
    }
    let code_end = p.offset();
    code.complete(p, SyntaxKind::CODE_TEXT);

    if let Some(len) = closing {
        for _ in 0..len {
            p.bump();
        }
        p.eat(SyntaxKind::WHITESPACE);
        p.eat(SyntaxKind::NEWLINE);
    }

    m.complete(p, SyntaxKind::FENCED_CODE);

    p.record_fence(Fence {
        range: TextRange::new(start, p.offset()),
        code: TextRange::new(code_start, code_end),
        info,
        language,
    });
}

/// Does any block rule claim the line the cursor is on?
fn interrupted(p: &Parser<'_, '_>) -> bool {
    p.grammar().block_rules().iter().any(|rule| match rule {
        BlockRule::Base(base) => base.interrupts_paragraph(p),
        BlockRule::Extension(ext) => extension::interrupts_paragraph(p, ext.as_ref()),
    })
}

/// Parse a paragraph (default block).
fn paragraph(p: &mut Parser<'_, '_>) {
    let m = p.start();

    loop {
        inline::inline_until_newline(p);

        if !p.eat(SyntaxKind::NEWLINE) {
            break;
        }

        if p.at_end() || at_blank_line(p) || interrupted(p) {
            break;
        }
    }

    m.complete(p, SyntaxKind::PARAGRAPH);
}

#[cfg(test)]
mod tests {
    use crate::compose::GrammarBuilder;
    use crate::syntax_kind::{SyntaxKind, SyntaxNode};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(input: &str) -> SyntaxNode {
        GrammarBuilder::new().build().unwrap().parse(input).syntax()
    }

    fn top_level(input: &str) -> Vec<SyntaxKind> {
        parse(input)
            .children()
            .filter_map(|n| n.kind().base())
            .collect()
    }

    #[rstest]
    #[case::heading("# Heading\n", SyntaxKind::HEADING)]
    #[case::h6("###### Six\n", SyntaxKind::HEADING)]
    #[case::empty_heading("#\n", SyntaxKind::HEADING)]
    #[case::blockquote("> quoted text\n", SyntaxKind::BLOCK_QUOTE)]
    #[case::list_item("- item\n", SyntaxKind::LIST_ITEM)]
    #[case::plus_item("+ item\n", SyntaxKind::LIST_ITEM)]
    #[case::thematic_break("---\n", SyntaxKind::THEMATIC_BREAK)]
    #[case::spaced_break("* * *\n", SyntaxKind::THEMATIC_BREAK)]
    #[case::underscore_break("___\n", SyntaxKind::THEMATIC_BREAK)]
    #[case::fenced_code("```rust\ncode\n```\n", SyntaxKind::FENCED_CODE)]
    #[case::tilde_fence("~~~\ncode\n~~~\n", SyntaxKind::FENCED_CODE)]
    #[case::paragraph("Just some text.\n", SyntaxKind::PARAGRAPH)]
    #[case::tag_is_not_heading("#tag here\n", SyntaxKind::PARAGRAPH)]
    #[case::seven_hashes("####### no\n", SyntaxKind::PARAGRAPH)]
    #[case::dash_without_space("-item\n", SyntaxKind::PARAGRAPH)]
    #[case::inline_triple_backticks("```a``` b\n", SyntaxKind::PARAGRAPH)]
    fn block_kinds(#[case] input: &str, #[case] expected: SyntaxKind) {
        assert_eq!(top_level(input), vec![expected]);
    }

    #[test]
    fn parse_multiple_blocks() {
        let input = "# Heading\n\nParagraph text.\n\n- list item\n";
        assert_eq!(
            top_level(input),
            vec![
                SyntaxKind::HEADING,
                SyntaxKind::PARAGRAPH,
                SyntaxKind::LIST_ITEM
            ]
        );
    }

    #[test]
    fn paragraph_spans_lines_until_blank() {
        let input = "one\ntwo\n   \nthree\n";
        assert_eq!(
            top_level(input),
            vec![SyntaxKind::PARAGRAPH, SyntaxKind::PARAGRAPH]
        );
    }

    #[test]
    fn paragraph_interrupted_by_blocks() {
        let input = "text\n# Heading\ntext\n- item\ntext\n```\ncode\n```\n";
        assert_eq!(
            top_level(input),
            vec![
                SyntaxKind::PARAGRAPH,
                SyntaxKind::HEADING,
                SyntaxKind::PARAGRAPH,
                SyntaxKind::LIST_ITEM,
                SyntaxKind::PARAGRAPH,
                SyntaxKind::FENCED_CODE,
            ]
        );
    }

    #[test]
    fn fence_always_has_code_text() {
        for input in ["```\n```\n", "```python\n```", "```"] {
            let tree = parse(input);
            let fence = tree.children().next().unwrap();
            assert_eq!(fence.kind(), SyntaxKind::FENCED_CODE);
            let code_text: Vec<_> = fence
                .children()
                .filter(|n| n.kind() == SyntaxKind::CODE_TEXT)
                .collect();
            assert_eq!(code_text.len(), 1, "{input:?}");
            assert_eq!(code_text[0].text().to_string(), "");
        }
    }

    #[test]
    fn fence_structure() {
        let tree = parse("```{python} x\nprint(1)\n```\nafter\n");
        let fence = tree.children().next().unwrap();
        let children: Vec<_> = fence
            .children()
            .map(|n| (n.kind(), n.text().to_string()))
            .collect();
        assert_eq!(
            children,
            vec![
                (SyntaxKind::CODE_INFO.into(), "{python} x".to_string()),
                (SyntaxKind::CODE_TEXT.into(), "print(1)\n".to_string()),
            ]
        );
        assert_eq!(fence.text().to_string(), "```{python} x\nprint(1)\n```\n");
    }

    #[test]
    fn closing_fence_must_be_long_enough() {
        let tree = parse("````\n```\n````\n");
        let fence = tree.children().next().unwrap();
        let code = fence
            .children()
            .find(|n| n.kind() == SyntaxKind::CODE_TEXT)
            .unwrap();
        assert_eq!(code.text().to_string(), "```\n");
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let input = "```\nnever closed\n# not a heading\n";
        assert_eq!(top_level(input), vec![SyntaxKind::FENCED_CODE]);
        assert_eq!(parse(input).text().to_string(), input);
    }

    #[test]
    fn text_preservation() {
        let input = "# Heading\n\n> Quote\n> more\n\n- Item\n  \n***\n";
        let tree = parse(input);
        assert_eq!(tree.text().to_string(), input);
    }
}
