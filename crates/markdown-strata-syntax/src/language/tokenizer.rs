//! Tokenizers for the contents of fenced code blocks.
//!
//! The grammar never runs a tokenizer while parsing; it only resolves which
//! one applies to a fence. Consumers call [`Tokenizer::tokenize`] (usually via
//! [`Fence::highlight`](crate::Fence::highlight)) when they need highlight
//! tokens.

use std::ops::Range;
use std::sync::Arc;

/// Shared handle to a tokenizer, as returned by fence-language resolution.
pub type TokenizerHandle = Arc<dyn Tokenizer>;

/// Semantic categories for highlighted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Keyword,
    Type,
    String,
    Number,
    Boolean,
    Comment,
    Identifier,
    Operator,
    Punctuation,
}

/// A highlight token: a kind and a byte range into the tokenized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeToken {
    pub kind: HighlightKind,
    pub range: Range<usize>,
}

impl CodeToken {
    pub fn new(kind: HighlightKind, range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end, "token range must be ordered");
        Self { kind, range }
    }

    /// Extract the token's text from the tokenized source.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.clone()]
    }
}

/// Lexical state carried across lines for multi-line constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineState {
    #[default]
    Normal,
    /// Inside a string opened by the given quote byte.
    InString(u8),
    /// Inside a block comment.
    InComment,
}

/// An opaque lexical analyser for one embedded language.
///
/// Implementors produce tokens for a single line given the state from the
/// previous line. The default `tokenize()` threads state across all lines and
/// rebases ranges onto the full text.
pub trait Tokenizer: Send + Sync {
    /// Human-readable name (e.g. `"rust"`).
    fn name(&self) -> &'static str;

    /// Tokenize one line (without its line ending). Ranges are offsets into `line`.
    fn tokenize_line(&self, line: &str, state: LineState) -> (Vec<CodeToken>, LineState);

    /// Tokenize a full text buffer. Handles LF and CRLF line endings.
    fn tokenize(&self, text: &str) -> Vec<CodeToken> {
        let mut tokens = Vec::new();
        let mut state = LineState::Normal;
        let mut offset = 0usize;

        for segment in text.split_inclusive('\n') {
            let line = segment.trim_end_matches(['\r', '\n']);
            let (line_tokens, next) = self.tokenize_line(line, state);
            tokens.extend(line_tokens.into_iter().map(|mut token| {
                token.range = token.range.start + offset..token.range.end + offset;
                token
            }));
            offset += segment.len();
            state = next;
        }

        tokens
    }
}

/// Tokenizer that recognises nothing.
///
/// Languages without highlighting of their own (diagram languages such as
/// mermaid) are registered with this so that resolution still yields a
/// language for their fences.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTokenizer;

impl Tokenizer for PlainTokenizer {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn tokenize_line(&self, _line: &str, state: LineState) -> (Vec<CodeToken>, LineState) {
        (Vec::new(), state)
    }
}

/// Configuration for a [`GenericTokenizer`].
#[derive(Debug)]
pub struct GenericTokenizerConfig {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    /// Line comment marker, empty if the language has none.
    pub line_comment: &'static str,
    /// Block comment delimiters, empty strings if the language has none.
    pub block_comment: (&'static str, &'static str),
    /// Bytes that open (and close) string literals.
    pub quotes: &'static [u8],
    /// Whether keywords match regardless of ASCII case (SQL, VB, Fortran).
    pub case_insensitive: bool,
}

/// A configurable tokenizer handling the patterns most languages share:
/// comments, quoted strings with backslash escapes, numbers, keywords.
#[derive(Debug)]
pub struct GenericTokenizer {
    config: &'static GenericTokenizerConfig,
}

impl GenericTokenizer {
    pub const fn new(config: &'static GenericTokenizerConfig) -> Self {
        Self { config }
    }

    fn classify_word(&self, word: &str) -> HighlightKind {
        let matches = |list: &[&str]| {
            if self.config.case_insensitive {
                list.iter().any(|k| k.eq_ignore_ascii_case(word))
            } else {
                list.contains(&word)
            }
        };
        if matches(self.config.keywords) {
            HighlightKind::Keyword
        } else if matches(self.config.types) {
            HighlightKind::Type
        } else if word == "true" || word == "false" {
            HighlightKind::Boolean
        } else {
            HighlightKind::Identifier
        }
    }

    /// Scan a string body starting after the opening quote. Returns the end and
    /// whether the string closed on this line.
    fn scan_string(bytes: &[u8], mut pos: usize, quote: u8) -> (usize, bool) {
        while pos < bytes.len() {
            if bytes[pos] == b'\\' {
                pos = (pos + 2).min(bytes.len());
            } else if bytes[pos] == quote {
                return (pos + 1, true);
            } else {
                pos += 1;
            }
        }
        (pos, false)
    }

    fn tokenize_normal(&self, line: &str, base: usize) -> (Vec<CodeToken>, LineState) {
        let bytes = line.as_bytes();
        let (block_open, block_close) = self.config.block_comment;
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let ch = bytes[pos];
            let rest = &line[pos..];

            if ch.is_ascii_whitespace() {
                pos += 1;
                continue;
            }

            if !self.config.line_comment.is_empty() && rest.starts_with(self.config.line_comment) {
                tokens.push(CodeToken::new(
                    HighlightKind::Comment,
                    base + pos..base + bytes.len(),
                ));
                return (tokens, LineState::Normal);
            }

            if !block_open.is_empty() && rest.starts_with(block_open) {
                let after = pos + block_open.len();
                match line[after..].find(block_close) {
                    Some(end) => {
                        let end = after + end + block_close.len();
                        tokens.push(CodeToken::new(HighlightKind::Comment, base + pos..base + end));
                        pos = end;
                        continue;
                    }
                    None => {
                        tokens.push(CodeToken::new(
                            HighlightKind::Comment,
                            base + pos..base + bytes.len(),
                        ));
                        return (tokens, LineState::InComment);
                    }
                }
            }

            if self.config.quotes.contains(&ch) {
                let (end, closed) = Self::scan_string(bytes, pos + 1, ch);
                tokens.push(CodeToken::new(HighlightKind::String, base + pos..base + end));
                if !closed {
                    return (tokens, LineState::InString(ch));
                }
                pos = end;
                continue;
            }

            if ch.is_ascii_digit() {
                let start = pos;
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'.')
                {
                    pos += 1;
                }
                tokens.push(CodeToken::new(HighlightKind::Number, base + start..base + pos));
                continue;
            }

            if ch.is_ascii_alphabetic() || ch == b'_' {
                let start = pos;
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                let kind = self.classify_word(&line[start..pos]);
                tokens.push(CodeToken::new(kind, base + start..base + pos));
                continue;
            }

            // Advance by full UTF-8 character width, not just one byte.
            let width = rest.chars().next().map_or(1, char::len_utf8);
            let kind = if is_operator_byte(ch) {
                HighlightKind::Operator
            } else {
                HighlightKind::Punctuation
            };
            tokens.push(CodeToken::new(kind, base + pos..base + pos + width));
            pos += width;
        }

        (tokens, LineState::Normal)
    }
}

fn is_operator_byte(b: u8) -> bool {
    matches!(
        b,
        b'+' | b'-' | b'*' | b'/' | b'%' | b'=' | b'!' | b'<' | b'>' | b'&' | b'|' | b'^' | b'~'
    )
}

impl Tokenizer for GenericTokenizer {
    fn name(&self) -> &'static str {
        self.config.name
    }

    fn tokenize_line(&self, line: &str, state: LineState) -> (Vec<CodeToken>, LineState) {
        match state {
            LineState::Normal => self.tokenize_normal(line, 0),
            LineState::InComment => {
                let close = self.config.block_comment.1;
                match line.find(close) {
                    Some(end) if !close.is_empty() => {
                        let end = end + close.len();
                        let (mut rest, state) = self.tokenize_normal(&line[end..], end);
                        rest.insert(0, CodeToken::new(HighlightKind::Comment, 0..end));
                        (rest, state)
                    }
                    _ => (
                        vec![CodeToken::new(HighlightKind::Comment, 0..line.len())],
                        LineState::InComment,
                    ),
                }
            }
            LineState::InString(quote) => {
                let (end, closed) = Self::scan_string(line.as_bytes(), 0, quote);
                let string = CodeToken::new(HighlightKind::String, 0..end);
                if !closed {
                    return (vec![string], LineState::InString(quote));
                }
                let (mut rest, state) = self.tokenize_normal(&line[end..], end);
                rest.insert(0, string);
                (rest, state)
            }
        }
    }
}
