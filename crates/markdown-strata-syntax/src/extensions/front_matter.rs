//! YAML front matter.
//!
//! The block must open on the very first line of the document with `---` and
//! close with a `---` or `...` line. Its content is structured into pairs,
//! keys, sequences, mappings and classified scalars so that renderers can
//! style it, but it is never validated: anything that does not look like a
//! pair is kept as plain tokens inside the block.
//!
//! ```text
//! YAMLFrontmatter
//!   YAMLFrontmatterStart        ---
//!   YAMLFrontmatterMap
//!     YAMLFrontmatterPair
//!       YAMLFrontmatterKey      title
//!       YAMLFrontmatterString   "Notes"
//!     YAMLFrontmatterPair
//!       YAMLFrontmatterKey      tags
//!       YAMLFrontmatterSeq      [a, b]
//!   YAMLFrontmatterEnd          ---
//! ```

use std::sync::LazyLock;

use regex::Regex;
use rowan::TextSize;

use super::{Line, bump_line, lines};
use crate::error::ExtensionError;
use crate::extension::{Attempt, BlockExtension};
use crate::parser::Parser;
use crate::syntax_kind::{Kind, SyntaxKind};

const NODES: &[&str] = &[
    "YAMLFrontmatter",
    "YAMLFrontmatterStart",
    "YAMLFrontmatterEnd",
    "YAMLFrontmatterKey",
    "YAMLFrontmatterString",
    "YAMLFrontmatterBoolean",
    "YAMLFrontmatterNumber",
    "YAMLFrontmatterPlain",
    "YAMLFrontmatterPair",
    "YAMLFrontmatterSeq",
    "YAMLFrontmatterMap",
];

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?|0x[0-9a-fA-F]+|0o[0-7]+)$")
        .expect("yaml number regex")
});

/// Scalar styles a value can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scalar {
    String,
    Boolean,
    Number,
    Plain,
}

fn classify(value: &str) -> Scalar {
    let quoted = |q: char| value.len() >= 2 && value.starts_with(q) && value.ends_with(q);
    if quoted('"') || quoted('\'') {
        return Scalar::String;
    }
    const BOOLEANS: &[&str] = &["true", "false", "yes", "no", "on", "off"];
    if BOOLEANS.iter().any(|b| value.eq_ignore_ascii_case(b)) {
        return Scalar::Boolean;
    }
    if NUMBER.is_match(value) {
        return Scalar::Number;
    }
    Scalar::Plain
}

/// Node kinds, looked up once per attempt.
struct Kinds {
    root: Kind,
    start: Kind,
    end: Kind,
    key: Kind,
    string: Kind,
    boolean: Kind,
    number: Kind,
    plain: Kind,
    pair: Kind,
    seq: Kind,
    map: Kind,
}

impl Kinds {
    fn lookup(p: &Parser<'_, '_>) -> Result<Self, ExtensionError> {
        Ok(Self {
            root: p.kind("YAMLFrontmatter")?,
            start: p.kind("YAMLFrontmatterStart")?,
            end: p.kind("YAMLFrontmatterEnd")?,
            key: p.kind("YAMLFrontmatterKey")?,
            string: p.kind("YAMLFrontmatterString")?,
            boolean: p.kind("YAMLFrontmatterBoolean")?,
            number: p.kind("YAMLFrontmatterNumber")?,
            plain: p.kind("YAMLFrontmatterPlain")?,
            pair: p.kind("YAMLFrontmatterPair")?,
            seq: p.kind("YAMLFrontmatterSeq")?,
            map: p.kind("YAMLFrontmatterMap")?,
        })
    }

    fn scalar(&self, value: &str) -> Kind {
        match classify(value) {
            Scalar::String => self.string,
            Scalar::Boolean => self.boolean,
            Scalar::Number => self.number,
            Scalar::Plain => self.plain,
        }
    }
}

/// Front matter at the top of the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontMatter;

impl BlockExtension for FrontMatter {
    fn name(&self) -> &str {
        "FrontMatter"
    }

    fn emits(&self) -> &[&str] {
        NODES
    }

    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError> {
        if !p.at_document_start() || p.rest_of_line().trim_end() != "---" {
            return Ok(Attempt::NoMatch);
        }
        let lines = lines(p);
        let Some(close) = lines
            .iter()
            .skip(1)
            .position(|line| matches!(line.text.trim_end(), "---" | "..."))
            .map(|i| i + 1)
        else {
            return Ok(Attempt::NoMatch);
        };
        let k = Kinds::lookup(p)?;
        let body = &lines[1..close];

        let m = p.start();

        let start = p.start();
        p.bump_to_line_end();
        start.complete(p, k.start);
        p.eat(SyntaxKind::NEWLINE);

        if body.iter().any(|line| !line.is_blank()) {
            let map = p.start();
            let mut yaml = Yaml { p: &mut *p, k: &k, lines: body };
            yaml.mapping(0, 0);
            map.complete(p, k.map);
        } else {
            for _ in body {
                bump_line(p);
            }
        }

        let end = p.start();
        p.bump_to_line_end();
        end.complete(p, k.end);
        p.eat(SyntaxKind::NEWLINE);

        m.complete(p, k.root);
        Ok(Attempt::Matched)
    }
}

/// Offset of the `:` that separates a key from its value in `text`, if the
/// text is a `key: value` pair.
fn pair_colon(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') if i == 0 => quote = Some(b),
            (None, b':') => {
                let separated = bytes.get(i + 1).is_none_or(|c| c.is_ascii_whitespace());
                if separated && i > 0 {
                    return Some(i);
                }
            }
            (None, b'#') if i == 0 => return None,
            _ => {}
        }
    }
    None
}

/// Byte ranges of the comma-separated items inside a flow collection's
/// brackets, each trimmed, relative to `inner`.
fn flow_items(inner: &str) -> Vec<(usize, usize)> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut item_start = 0;
    let push = |from: usize, to: usize, items: &mut Vec<(usize, usize)>| {
        let raw = &inner[from..to];
        let lead = raw.len() - raw.trim_start().len();
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            items.push((from + lead, from + lead + trimmed.len()));
        }
    };
    for (i, b) in inner.bytes().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'[' | b'{') => depth += 1,
            (None, b']' | b'}') => depth = depth.saturating_sub(1),
            (None, b',') if depth == 0 => {
                push(item_start, i, &mut items);
                item_start = i + 1;
            }
            _ => {}
        }
    }
    push(item_start, inner.len(), &mut items);
    items
}

/// Block-structure walk over the body lines, driving the parser.
struct Yaml<'p, 't, 'input, 'l> {
    p: &'p mut Parser<'t, 'input>,
    k: &'l Kinds,
    lines: &'l [Line<'input>],
}

impl Yaml<'_, '_, '_, '_> {
    fn is_seq_item(line: &Line<'_>) -> bool {
        let text = line.text.trim_start();
        text == "-" || text.starts_with("- ")
    }

    fn is_comment(line: &Line<'_>) -> bool {
        line.text.trim_start().starts_with('#')
    }

    /// Pairs at `indent` from line `i`. Returns the first line not consumed.
    fn mapping(&mut self, mut i: usize, indent: usize) -> usize {
        while let Some(line) = self.lines.get(i).copied() {
            if line.is_blank() || Self::is_comment(&line) {
                bump_line(self.p);
                i += 1;
                continue;
            }
            if line.indent() < indent {
                break;
            }
            let content = &line.text[line.indent()..];
            match pair_colon(content) {
                Some(colon) if line.indent() == indent => {
                    self.p.eat(SyntaxKind::WHITESPACE);
                    i = self.block_pair(i, line, colon);
                }
                _ => {
                    bump_line(self.p);
                    i += 1;
                }
            }
        }
        i
    }

    /// Items at `indent` from line `i`. Returns the first line not consumed.
    fn sequence(&mut self, mut i: usize, indent: usize) -> usize {
        while let Some(line) = self.lines.get(i).copied() {
            if line.is_blank() || Self::is_comment(&line) {
                bump_line(self.p);
                i += 1;
                continue;
            }
            if line.indent() < indent || (line.indent() == indent && !Self::is_seq_item(&line)) {
                break;
            }
            if line.indent() > indent {
                bump_line(self.p);
                i += 1;
                continue;
            }
            self.p.eat(SyntaxKind::WHITESPACE);
            self.p.bump();
            self.p.eat(SyntaxKind::WHITESPACE);

            let item_start = usize::from(self.p.offset() - line.start);
            let item = line.text[item_start..].trim_end();
            if !item.is_empty() {
                match pair_colon(item) {
                    Some(colon) => {
                        let map = self.p.start();
                        let pair = self.p.start();
                        self.inline_pair(item, colon);
                        pair.complete(self.p, self.k.pair);
                        map.complete(self.p, self.k.map);
                    }
                    None => self.value(item),
                }
            }
            bump_line(self.p);
            i += 1;
        }
        i
    }

    /// A `key: value` line, with any nested block collection below it.
    fn block_pair(&mut self, i: usize, line: Line<'_>, colon: usize) -> usize {
        let pair = self.p.start();
        let content = line.text[line.indent()..].trim_end();
        let has_value = !content[colon + 1..].trim().is_empty();
        self.inline_pair(content, colon);
        bump_line(self.p);

        let mut next = i + 1;
        if !has_value {
            let child = self.lines[next..]
                .iter()
                .find(|l| !l.is_blank() && !Self::is_comment(l))
                .copied();
            match child {
                Some(child) if Self::is_seq_item(&child) && child.indent() >= line.indent() => {
                    let seq = self.p.start();
                    next = self.sequence(next, child.indent());
                    seq.complete(self.p, self.k.seq);
                }
                Some(child) if child.indent() > line.indent() => {
                    let map = self.p.start();
                    next = self.mapping(next, child.indent());
                    map.complete(self.p, self.k.map);
                }
                _ => {}
            }
        }

        pair.complete(self.p, self.k.pair);
        next
    }

    /// Key, colon and value of a pair written on one line. The cursor is at
    /// the key; the caller opens and closes the pair node.
    fn inline_pair(&mut self, text: &str, colon: usize) {
        let key = self.p.start();
        let key_end = self.p.offset() + TextSize::of(&text[..colon]);
        self.p.bump_until(key_end);
        key.complete(self.p, self.k.key);
        self.p.bump();
        self.p.eat(SyntaxKind::WHITESPACE);

        let value = text[colon + 1..].trim();
        if !value.is_empty() {
            self.value(value);
        }
    }

    /// A scalar or flow collection; the cursor is at its first byte.
    fn value(&mut self, text: &str) {
        let base = self.p.offset();
        let end = base + TextSize::of(text);
        let flow = match (text.as_bytes().first(), text.as_bytes().last()) {
            (Some(b'['), Some(b']')) if text.len() >= 2 => Some(self.k.seq),
            (Some(b'{'), Some(b'}')) if text.len() >= 2 => Some(self.k.map),
            _ => None,
        };
        let Some(kind) = flow else {
            let scalar = self.p.start();
            self.p.bump_until(end);
            scalar.complete(self.p, self.k.scalar(text));
            return;
        };

        let m = self.p.start();
        self.p.bump();
        let inner = &text[1..text.len() - 1];
        for (from, to) in flow_items(inner) {
            self.p.bump_until(base + TextSize::of(&text[..1 + from]));
            let item = &inner[from..to];
            match pair_colon(item) {
                Some(colon) if kind == self.k.map => {
                    let pair = self.p.start();
                    self.inline_pair(item, colon);
                    pair.complete(self.p, self.k.pair);
                }
                _ => self.value(item),
            }
        }
        self.p.bump_until(end);
        m.complete(self.p, kind);
    }
}
