//! # Parser - Event-Based Tree Construction
//!
//! This module implements the core parsing logic, transforming a token stream
//! into a syntax tree using the **event-based** architecture from rust-analyzer.
//!
//! Instead of building the tree directly, grammar rules emit a flat list of
//! **events** ([`Event`]) that describe the tree structure. The [`Sink`] then
//! builds the green tree from them.
//!
//! ## The Marker System
//!
//! When you call `parser.start()`, you get a [`Marker`]. It **must** be either:
//!
//! - Completed with `marker.complete(parser, KIND)` → emits Start+Finish
//! - Abandoned with `marker.abandon(parser)` → removes the placeholder
//!
//! If you drop a marker without doing either, **the program panics**. This
//! prevents accidentally leaving the tree in an inconsistent state.
//!
//! ```ignore
//! let m = parser.start();
//! parser.bump();
//! m.complete(parser, SyntaxKind::PARAGRAPH);
//! ```
//!
//! ## Extensions and the Parser
//!
//! Extension parsers receive the same `&mut Parser` the base grammar uses.
//! Kinds they emit come from the node-type catalog, looked up by name with
//! [`Parser::kind`]; during an attempt only the names the extension declares
//! in `emits()` resolve. Every attempt runs against a checkpoint: if it
//! declines, fails or panics, the parser is rewound so that no trace of it
//! remains.
//!
//! ## Module Structure
//!
//! - [`event`] - The Event enum
//! - [`sink`] - Converts events to a green tree
//! - `grammar` - Base grammar rules (root, block, inline) and rule dispatch

pub mod event;
pub mod sink;

pub(crate) mod grammar;

use std::fmt;

use rowan::{GreenNode, TextRange, TextSize};

use crate::compose::Grammar;
use crate::error::ExtensionError;
use crate::language::{CodeToken, TokenizerHandle};
use crate::lexer::Token;
use crate::syntax_kind::{Kind, SyntaxKind, SyntaxNode};
use event::Event;

pub use grammar::{BaseBlock, BaseGrammar, BaseInline};

/// Inline constructs nested deeper than this are read as plain tokens.
pub(crate) const MAX_INLINE_DEPTH: usize = 32;

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
/// Grammar functions and extensions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_end()`, `rest_of_line()`
/// - Consume tokens: `bump()`, `eat()`, `bump_to_line_end()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
pub struct Parser<'t, 'input> {
    grammar: &'t Grammar,
    input: &'input str,
    tokens: Vec<Token<'input>>,
    /// Byte offset of each token start, plus the end of input.
    offsets: Vec<TextSize>,
    /// Byte offset of the line ending that follows each token.
    line_ends: Vec<TextSize>,
    pos: usize,
    events: Vec<Event>,
    fences: Vec<Fence>,
    inline_depth: usize,
    /// Node names the running extension declared, if one is running.
    emits: Option<&'t [&'t str]>,
}

/// Parser state captured before an extension attempt.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    pos: usize,
    events: usize,
    fences: usize,
    inline_depth: usize,
}

impl<'t, 'input> Parser<'t, 'input> {
    pub(crate) fn new(grammar: &'t Grammar, input: &'input str, tokens: Vec<Token<'input>>) -> Self {
        let mut offsets = Vec::with_capacity(tokens.len() + 1);
        let mut offset = TextSize::from(0);
        offsets.push(offset);
        for token in &tokens {
            offset += TextSize::of(token.text);
            offsets.push(offset);
        }

        let mut line_end = TextSize::of(input.strip_suffix('\r').unwrap_or(input));
        let mut line_ends = vec![line_end; tokens.len()];
        for (i, token) in tokens.iter().enumerate().rev() {
            if token.kind == SyntaxKind::NEWLINE {
                line_end = offsets[i];
            }
            line_ends[i] = line_end;
        }

        Self {
            grammar,
            input,
            tokens,
            offsets,
            line_ends,
            pos: 0,
            events: Vec::new(),
            fences: Vec::new(),
            inline_depth: 0,
            emits: None,
        }
    }

    /// Run the root rule and hand back the raw results, with the tokens as
    /// finally split.
    pub(crate) fn run(mut self) -> (Vec<Event>, Vec<Fence>, Vec<Token<'input>>) {
        grammar::root(&mut self);
        (self.events, self.fences, self.tokens)
    }

    pub(crate) fn grammar(&self) -> &'t Grammar {
        self.grammar
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Kind of the token just before the cursor, if any.
    pub fn prev(&self) -> Option<SyntaxKind> {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.kind)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Consume n tokens as a single composite token.
    pub fn bump_n(&mut self, n: usize, kind: SyntaxKind) {
        let n = n.min(self.remaining());
        let mut left = n;
        while left > 0 {
            let chunk = left.min(usize::from(u8::MAX));
            self.events.push(Event::Token {
                kind: kind.into(),
                n_raw_tokens: chunk as u8,
            });
            left -= chunk;
        }
        self.pos += n;
    }

    /// Consume tokens until the cursor reaches byte offset `end`.
    ///
    /// A token that straddles `end` is split there and only its head is
    /// consumed; the tail stays at the cursor with the same kind. The split
    /// survives a rewind.
    pub fn bump_until(&mut self, end: TextSize) {
        while !self.at_end() && self.offset() < end {
            if self.offsets[self.pos + 1] > end {
                self.split_current(end);
            }
            self.bump();
        }
    }

    /// Split the current token at byte offset `at`. Offsets that are not a
    /// char boundary inside the token leave it whole.
    fn split_current(&mut self, at: TextSize) {
        let Token { kind, text } = self.tokens[self.pos].clone();
        let mid = usize::from(at - self.offset());
        if mid == 0 || mid >= text.len() || !text.is_char_boundary(mid) {
            return;
        }
        let (head, tail) = text.split_at(mid);
        self.tokens[self.pos].text = head;
        self.tokens.insert(self.pos + 1, Token { kind, text: tail });
        self.offsets.insert(self.pos + 1, at);
        let line_end = self.line_ends[self.pos];
        self.line_ends.insert(self.pos + 1, line_end);
    }

    /// Consume tokens up to, but not including, the next NEWLINE.
    pub fn bump_to_line_end(&mut self) {
        while !self.at_end() && !self.at(SyntaxKind::NEWLINE) {
            self.bump();
        }
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.nth_text(0)
    }

    /// Text of the token n ahead, empty past the end.
    pub fn nth_text(&self, n: usize) -> &'input str {
        self.tokens.get(self.pos + n).map(|t| t.text).unwrap_or("")
    }

    /// Check if we're at the start of a line (after newline or at start).
    pub fn at_line_start(&self) -> bool {
        matches!(self.prev(), None | Some(SyntaxKind::NEWLINE))
    }

    /// True only at the very first token of the document.
    pub fn at_document_start(&self) -> bool {
        self.pos == 0
    }

    /// Remaining tokens count.
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.pos)
    }

    /// Byte offset of the cursor.
    pub fn offset(&self) -> TextSize {
        self.offsets
            .get(self.pos)
            .copied()
            .unwrap_or_else(|| TextSize::of(self.input))
    }

    /// Unconsumed input from the cursor to the end of the document.
    pub fn rest(&self) -> &'input str {
        &self.input[usize::from(self.offset())..]
    }

    /// Unconsumed input from the cursor to the end of the line, without the
    /// line ending.
    pub fn rest_of_line(&self) -> &'input str {
        let Some(&end) = self.line_ends.get(self.pos) else {
            return "";
        };
        &self.input[TextRange::new(self.offset(), end.max(self.offset()))]
    }

    /// Look up a node kind by its name in the grammar being parsed.
    ///
    /// While an extension runs, only the names it declares in `emits()`
    /// resolve; any other name fails with [`ExtensionError::UndeclaredKind`],
    /// even one the grammar knows.
    pub fn kind(&self, name: &str) -> Result<Kind, ExtensionError> {
        if self.emits.is_some_and(|emits| !emits.contains(&name)) {
            return Err(ExtensionError::UndeclaredKind {
                name: name.to_owned(),
            });
        }
        self.grammar
            .kind(name)
            .ok_or_else(|| ExtensionError::UnknownKind {
                name: name.to_owned(),
            })
    }

    /// Parse inline content (base rules and inline extensions) up to the end
    /// of the current line.
    pub fn inline_until_newline(&mut self) {
        grammar::inline::inline_until_newline(self);
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            events: self.events.len(),
            fences: self.fences.len(),
            inline_depth: self.inline_depth,
        }
    }

    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.events.truncate(checkpoint.events);
        self.fences.truncate(checkpoint.fences);
        self.inline_depth = checkpoint.inline_depth;
    }

    pub(crate) fn progressed_since(&self, checkpoint: &Checkpoint) -> bool {
        self.pos > checkpoint.pos
    }

    pub(crate) fn record_fence(&mut self, fence: Fence) {
        self.fences.push(fence);
    }

    /// Restrict [`Parser::kind`] to `emits`, returning the previous scope.
    pub(crate) fn scope_kinds(&mut self, emits: Option<&'t [&'t str]>) -> Option<&'t [&'t str]> {
        std::mem::replace(&mut self.emits, emits)
    }

    /// Enter one level of inline nesting. False once the limit is reached.
    pub(crate) fn enter_inline(&mut self) -> bool {
        if self.inline_depth >= MAX_INLINE_DEPTH {
            return false;
        }
        self.inline_depth += 1;
        true
    }

    pub(crate) fn exit_inline(&mut self) {
        self.inline_depth = self.inline_depth.saturating_sub(1);
    }
}

/// A marker for a node being constructed.
///
/// The `#[must_use]` attribute and the `Drop` impl together enforce that
/// every marker is either completed or abandoned. Dropping one otherwise
/// panics; inside an extension attempt that panic is caught and the attempt
/// counts as a no-match.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: impl Into<Kind>) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::Start {
            kind: kind.into(),
            forward_parent: None,
        };
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Abandon this marker without creating a node.
    ///
    /// This only removes the placeholder if it's the last event; otherwise
    /// the placeholder is left inert and the Sink skips it.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A marker for a node that has been completed.
///
/// `precede()` wraps the completed node in a new parent.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    pos: usize,
}

impl CompletedMarker {
    /// Create a new parent node that will contain this node.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }
}

/// A fenced code block and the language resolved for it.
#[derive(Clone)]
pub struct Fence {
    /// The whole `FENCED_CODE` node.
    pub range: TextRange,
    /// The `CODE_TEXT` node (may be empty).
    pub code: TextRange,
    /// Raw info string, everything after the opening marks on that line.
    pub info: String,
    /// Tokenizer chosen by the grammar's resolver.
    pub language: Option<TokenizerHandle>,
}

impl Fence {
    /// The code body as it appears in `source`.
    pub fn code_text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.code]
    }

    /// Name of the resolved tokenizer.
    pub fn language_name(&self) -> Option<&'static str> {
        self.language.as_ref().map(|t| t.name())
    }

    /// Run the resolved tokenizer over the code body. Token ranges are
    /// offsets into `source`. Empty when no language was resolved.
    pub fn highlight(&self, source: &str) -> Vec<CodeToken> {
        let Some(tokenizer) = &self.language else {
            return Vec::new();
        };
        let base = usize::from(self.code.start());
        tokenizer
            .tokenize(self.code_text(source))
            .into_iter()
            .map(|mut token| {
                token.range = token.range.start + base..token.range.end + base;
                token
            })
            .collect()
    }
}

impl fmt::Debug for Fence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fence")
            .field("range", &self.range)
            .field("code", &self.code)
            .field("info", &self.info)
            .field("language", &self.language_name())
            .finish()
    }
}

/// The result of parsing one document.
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    fences: Vec<Fence>,
}

impl Parse {
    pub(crate) fn new(green: GreenNode, fences: Vec<Fence>) -> Self {
        Self { green, fences }
    }

    /// A fresh red tree over the green tree.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Fenced code blocks in source order.
    pub fn fences(&self) -> &[Fence] {
        &self.fences
    }
}
