//! # Lexer - Tokenizing Markdown Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! **Every byte in the input appears in exactly one token.** We never skip or
//! discard characters, which is what makes round-tripping possible:
//!
//! ```
//! use markdown_strata_syntax::lexer::lex;
//!
//! let input = "# Hello, $x$ [@doe]!\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are kept **minimal and context-free**. The lexer doesn't know if `$`
//! opens a math span or is a price tag, or whether `@` starts a citation - the
//! base grammar and its extensions decide that. Every punctuation character
//! that any rule (base or extension) dispatches on gets its own token; all
//! other characters are grouped into `TEXT` runs.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Each variant maps to a corresponding `SyntaxKind` token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"")]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    #[token(">")]
    Gt,

    #[token("<")]
    Lt,

    #[token("-")]
    Dash,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("_")]
    Underscore,

    #[token("`")]
    Backtick,

    #[token("~")]
    Tilde,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("|")]
    Pipe,

    #[token("#")]
    Hash,

    #[token("!")]
    Exclaim,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("$")]
    Dollar,

    #[token("@")]
    At,

    #[token("^")]
    Caret,

    #[token("\\")]
    Backslash,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^\s\[\](){}<>`*+#|~\-_!:,$@^\\]+")]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Dash => SyntaxKind::DASH,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Underscore => SyntaxKind::UNDERSCORE,
            TokenKind::Backtick => SyntaxKind::BACKTICK,
            TokenKind::Tilde => SyntaxKind::TILDE,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::LBrace => SyntaxKind::LBRACE,
            TokenKind::RBrace => SyntaxKind::RBRACE,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::Pipe => SyntaxKind::PIPE,
            TokenKind::Hash => SyntaxKind::HASH,
            TokenKind::Exclaim => SyntaxKind::EXCLAIM,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Dollar => SyntaxKind::DOLLAR,
            TokenKind::At => SyntaxKind::AT,
            TokenKind::Caret => SyntaxKind::CARET,
            TokenKind::Backslash => SyntaxKind::BACKSLASH,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Logos error means unrecognized character - treat as TEXT
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push((Token { kind, text }, span));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(kind: SyntaxKind, text: &str) -> Token<'_> {
        Token { kind, text }
    }

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_plain_text() {
        assert_eq!(lex("hello"), vec![token(SyntaxKind::TEXT, "hello")]);
    }

    #[test]
    fn lex_newline_crlf() {
        assert_eq!(lex("\r\n"), vec![token(SyntaxKind::NEWLINE, "\r\n")]);
    }

    #[test]
    fn lex_code_fence_with_braced_info() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("```{python}\n"),
            vec![BACKTICK, BACKTICK, BACKTICK, LBRACE, TEXT, RBRACE, NEWLINE]
        );
    }

    #[test]
    fn lex_math_span() {
        assert_eq!(
            lex("$x^2$"),
            vec![
                token(SyntaxKind::DOLLAR, "$"),
                token(SyntaxKind::TEXT, "x"),
                token(SyntaxKind::CARET, "^"),
                token(SyntaxKind::TEXT, "2"),
                token(SyntaxKind::DOLLAR, "$"),
            ]
        );
    }

    #[test]
    fn lex_citation() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("[@doe99, p. 3]"),
            vec![LBRACKET, AT, TEXT, COMMA, WHITESPACE, TEXT, WHITESPACE, TEXT, RBRACKET]
        );
    }

    #[test]
    fn lex_footnote_definition() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("[^1]: note"),
            vec![LBRACKET, CARET, TEXT, RBRACKET, COLON, WHITESPACE, TEXT]
        );
    }

    #[test]
    fn lex_url_splits_on_scheme_colon() {
        assert_eq!(
            lex("https://a.org/x"),
            vec![
                token(SyntaxKind::TEXT, "https"),
                token(SyntaxKind::COLON, ":"),
                token(SyntaxKind::TEXT, "//a.org/x"),
            ]
        );
    }

    #[test]
    fn all_bytes_preserved_complex() {
        let input = "---\ntitle: \"x\"\n---\n## H\n\n> *q* [[l]] $$a$$ ^[n] <u> \\$ ~~s~~\n\n```rust\ncode\n```";
        let tokens = lex(input);
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }

    #[test]
    fn spans_are_correct() {
        let input = "hello @world, $1";
        for (token, span) in &lex_with_spans(input) {
            assert_eq!(token.text, &input[span.clone()]);
        }
    }
}
