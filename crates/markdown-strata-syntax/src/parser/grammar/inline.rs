//! # Inline-Level Grammar
//!
//! Inline elements are the formatting within blocks: links, emphasis, code spans.
//! Unlike blocks, inline parsing is driven by **special characters** rather than
//! line-start patterns.
//!
//! ## Dispatch Logic
//!
//! [`inline_element`] walks the grammar's ordered inline rules. Each base rule
//! first checks whether it applies at the cursor:
//!
//! | Token | Base rule |
//! |-------|-----------|
//! | `` ` `` | Code span (needs a matching closing run) |
//! | `*` `_` | Emphasis or strong (needs a closing run) |
//! | `~~` | Strikethrough (needs a closing `~~`) |
//! | `![` | Image |
//! | `[` | Link, or an INLINE node for `[text]` |
//! | `<scheme:` | Autolink |
//!
//! Inline extensions sit in the same ordered list, so a high-priority
//! citation rule sees `[@key]` before the link rule does. If no rule matches,
//! the token is literal text.
//!
//! ## Error Tolerance
//!
//! - `[text]` without `(url)` becomes an INLINE node
//! - Unmatched delimiters are consumed as plain text
//!
//! This ensures we always produce a valid tree that preserves all bytes.

use crate::compose::InlineRule;
use crate::extension;
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Inline rules of the base grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseInline {
    CodeSpan,
    Emphasis,
    Strikethrough,
    Image,
    Link,
    Autolink,
}

impl BaseInline {
    pub const ALL: [BaseInline; 6] = [
        BaseInline::CodeSpan,
        BaseInline::Emphasis,
        BaseInline::Strikethrough,
        BaseInline::Image,
        BaseInline::Link,
        BaseInline::Autolink,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BaseInline::CodeSpan => "CodeSpan",
            BaseInline::Emphasis => "Emphasis",
            BaseInline::Strikethrough => "Strikethrough",
            BaseInline::Image => "Image",
            BaseInline::Link => "Link",
            BaseInline::Autolink => "Autolink",
        }
    }

    pub(crate) fn applies(self, p: &Parser<'_, '_>) -> bool {
        match self {
            BaseInline::CodeSpan => is_code_span(p),
            BaseInline::Emphasis => is_emphasis(p),
            BaseInline::Strikethrough => is_strikethrough(p),
            BaseInline::Image => p.at(SyntaxKind::EXCLAIM) && p.nth(1) == SyntaxKind::LBRACKET,
            BaseInline::Link => p.at(SyntaxKind::LBRACKET),
            BaseInline::Autolink => is_autolink(p),
        }
    }

    pub(crate) fn parse(self, p: &mut Parser<'_, '_>) {
        match self {
            BaseInline::CodeSpan => code_span(p),
            BaseInline::Emphasis => emphasis_or_strong(p, p.current()),
            BaseInline::Strikethrough => strikethrough(p),
            BaseInline::Image => image(p),
            BaseInline::Link => link_or_text(p),
            BaseInline::Autolink => autolink(p),
        }
    }
}

/// Parse inline content until newline or EOF.
pub(crate) fn inline_until_newline(p: &mut Parser<'_, '_>) {
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        inline_element(p);
    }
}

/// Parse a single inline element. Always consumes at least one token.
///
/// Past the nesting limit the current token is taken as plain text, so
/// runs like `[[[[...` cannot exhaust the stack.
pub(crate) fn inline_element(p: &mut Parser<'_, '_>) {
    if !p.enter_inline() {
        p.bump();
        return;
    }
    inline_rule(p);
    p.exit_inline();
}

fn inline_rule(p: &mut Parser<'_, '_>) {
    let grammar = p.grammar();
    for rule in grammar.inline_rules() {
        match rule {
            InlineRule::Base(base) => {
                if base.applies(p) {
                    base.parse(p);
                    return;
                }
            }
            InlineRule::Extension(ext) => {
                if extension::attempt_inline(p, ext.as_ref()) {
                    return;
                }
            }
        }
    }
    p.bump();
}

fn run_length(p: &Parser<'_, '_>, from: usize, kind: SyntaxKind) -> usize {
    let mut len = 0;
    while p.nth(from + len) == kind {
        len += 1;
    }
    len
}

/// Find a run of `kind` on the current line, starting the search at `from`,
/// that satisfies `accept(run_length)`.
fn closing_run(
    p: &Parser<'_, '_>,
    from: usize,
    kind: SyntaxKind,
    accept: impl Fn(usize) -> bool,
) -> bool {
    let mut i = from;
    while !matches!(p.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
        if p.nth(i) == kind {
            let len = run_length(p, i, kind);
            if accept(len) {
                return true;
            }
            i += len;
        } else {
            i += 1;
        }
    }
    false
}

fn is_code_span(p: &Parser<'_, '_>) -> bool {
    if !p.at(SyntaxKind::BACKTICK) {
        return false;
    }
    let open = run_length(p, 0, SyntaxKind::BACKTICK);
    closing_run(p, open, SyntaxKind::BACKTICK, |len| len == open)
}

fn is_emphasis(p: &Parser<'_, '_>) -> bool {
    let delimiter = p.current();
    if !matches!(delimiter, SyntaxKind::STAR | SyntaxKind::UNDERSCORE) {
        return false;
    }
    // snake_case words are not emphasis
    if delimiter == SyntaxKind::UNDERSCORE && p.prev() == Some(SyntaxKind::TEXT) {
        return false;
    }
    let open = run_length(p, 0, delimiter).min(2);
    if matches!(
        p.nth(open),
        SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
    ) {
        return false;
    }
    closing_run(p, open + 1, delimiter, |len| len >= open)
}

fn is_strikethrough(p: &Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::TILDE)
        && p.nth(1) == SyntaxKind::TILDE
        && !matches!(
            p.nth(2),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
        )
        && closing_run(p, 3, SyntaxKind::TILDE, |len| len >= 2)
}

/// `<scheme:...>` or `<user@host>` with no whitespace inside.
fn is_autolink(p: &Parser<'_, '_>) -> bool {
    if !p.at(SyntaxKind::LT)
        || p.nth(1) != SyntaxKind::TEXT
        || !matches!(p.nth(2), SyntaxKind::COLON | SyntaxKind::AT)
    {
        return false;
    }
    let mut i = 3;
    loop {
        match p.nth(i) {
            SyntaxKind::GT => return true,
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF | SyntaxKind::LT => {
                return false;
            }
            _ => i += 1,
        }
    }
}

/// Parse a standard link [text](url) or plain text.
fn link_or_text(p: &mut Parser<'_, '_>) {
    let m = p.start();

    debug_assert!(p.at(SyntaxKind::LBRACKET));
    p.bump();

    // Link text may hold nested inline elements
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::RBRACKET) {
        inline_element(p);
    }

    if !p.eat(SyntaxKind::RBRACKET) {
        m.complete(p, SyntaxKind::INLINE);
        return;
    }

    if p.at(SyntaxKind::LPAREN) {
        p.bump();

        while !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::RPAREN) {
            p.bump();
        }

        if p.eat(SyntaxKind::RPAREN) {
            m.complete(p, SyntaxKind::LINK);
        } else {
            m.complete(p, SyntaxKind::INLINE);
        }
    } else {
        // Just [text] without (url)
        m.complete(p, SyntaxKind::INLINE);
    }
}

/// Parse a code span `code`.
fn code_span(p: &mut Parser<'_, '_>) {
    let m = p.start();

    let mut open_count = 0;
    while p.at(SyntaxKind::BACKTICK) {
        p.bump();
        open_count += 1;
    }

    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        if p.at(SyntaxKind::BACKTICK) {
            let close_count = run_length(p, 0, SyntaxKind::BACKTICK);
            for _ in 0..close_count {
                p.bump();
            }
            if close_count == open_count {
                break;
            }
        } else {
            p.bump();
        }
    }

    m.complete(p, SyntaxKind::CODE_SPAN);
}

/// Parse emphasis *text* or strong **text** (or underscore variants).
fn emphasis_or_strong(p: &mut Parser<'_, '_>, delimiter: SyntaxKind) {
    let m = p.start();

    let mut open_count = 0;
    while p.at(delimiter) && open_count < 2 {
        p.bump();
        open_count += 1;
    }

    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        if p.at(delimiter) && run_length(p, 0, delimiter) >= open_count {
            for _ in 0..open_count {
                p.bump();
            }
            break;
        }
        inline_element(p);
    }

    let kind = if open_count >= 2 {
        SyntaxKind::STRONG
    } else {
        SyntaxKind::EMPHASIS
    };

    m.complete(p, kind);
}

/// Parse image ![alt](url).
fn image(p: &mut Parser<'_, '_>) {
    let m = p.start();

    debug_assert!(p.at(SyntaxKind::EXCLAIM));
    p.bump();
    debug_assert!(p.at(SyntaxKind::LBRACKET));
    p.bump();

    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::RBRACKET) {
        p.bump();
    }

    if !p.eat(SyntaxKind::RBRACKET) {
        m.complete(p, SyntaxKind::INLINE);
        return;
    }

    if p.at(SyntaxKind::LPAREN) {
        p.bump();

        while !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::RPAREN) {
            p.bump();
        }

        if p.eat(SyntaxKind::RPAREN) {
            m.complete(p, SyntaxKind::IMAGE);
        } else {
            m.complete(p, SyntaxKind::INLINE);
        }
    } else {
        m.complete(p, SyntaxKind::INLINE);
    }
}

/// Parse autolink <url>.
fn autolink(p: &mut Parser<'_, '_>) {
    let m = p.start();

    debug_assert!(p.at(SyntaxKind::LT));
    p.bump();

    while !p.at_end() && !p.at(SyntaxKind::GT) {
        p.bump();
    }
    p.eat(SyntaxKind::GT);

    m.complete(p, SyntaxKind::AUTOLINK);
}

/// Parse strikethrough ~~text~~.
fn strikethrough(p: &mut Parser<'_, '_>) {
    let m = p.start();

    p.bump(); // ~
    p.bump(); // ~

    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        if p.at(SyntaxKind::TILDE) && p.nth(1) == SyntaxKind::TILDE {
            p.bump();
            p.bump();
            break;
        }
        inline_element(p);
    }

    m.complete(p, SyntaxKind::STRIKETHROUGH);
}
