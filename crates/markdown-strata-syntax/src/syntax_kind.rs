//! Node and token kinds for the Markdown CST.
//!
//! Following the rust-analyzer model, the base grammar's tokens and nodes
//! share a single enum, [`SyntaxKind`]. Extensions may add node kinds at
//! runtime through the node-type catalog, so the tree itself is typed over
//! [`Kind`]: an open `u16` id space whose low range is exactly `SyntaxKind`
//! and whose upper range belongs to catalog entries.

use std::fmt;

/// All syntax kinds of the base grammar.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// Plain text content
    TEXT,
    /// `>` for blockquotes and autolinks
    GT,
    /// `<` for autolinks
    LT,
    /// `-` for lists, thematic breaks and front matter fences
    DASH,
    /// `*` for lists, emphasis, and thematic breaks
    STAR,
    /// `+` for lists
    PLUS,
    /// `_` for emphasis
    UNDERSCORE,
    /// Single backtick for code spans and fences
    BACKTICK,
    /// `~` for fenced code and strikethrough
    TILDE,
    /// `[` for links, citations and footnotes
    LBRACKET,
    /// `]` for links, citations and footnotes
    RBRACKET,
    /// `{` for brace-wrapped info strings and flow mappings
    LBRACE,
    /// `}`
    RBRACE,
    /// `(` for link URLs
    LPAREN,
    /// `)` for link URLs
    RPAREN,
    /// `|`
    PIPE,
    /// `#` for headings
    HASH,
    /// `!` for images
    EXCLAIM,
    /// `:` for footnote definitions, URL schemes and mapping pairs
    COLON,
    /// `,` for flow sequences
    COMMA,
    /// `$` for math
    DOLLAR,
    /// `@` for citations
    AT,
    /// `^` for footnotes
    CARET,
    /// `\` escapes
    BACKSLASH,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root document node
    ROOT,
    /// Blockquote container (`> ...`)
    BLOCK_QUOTE,
    /// Individual list item
    LIST_ITEM,
    /// Paragraph block
    PARAGRAPH,
    /// ATX heading (`# ...`)
    HEADING,
    /// Thematic break (`---`, `***`, etc.)
    THEMATIC_BREAK,
    /// Fenced code block
    FENCED_CODE,
    /// Info string of a fenced code block
    CODE_INFO,
    /// Body of a fenced code block; present even when empty
    CODE_TEXT,
    /// Inline content that did not form a construct (e.g. `[text]` without url)
    INLINE,
    /// Inline code span
    CODE_SPAN,
    /// Emphasis `*text*`
    EMPHASIS,
    /// Strong emphasis `**text**`
    STRONG,
    /// Strikethrough `~~text~~`
    STRIKETHROUGH,
    /// Standard link `[text](url)`
    LINK,
    /// Image `![alt](url)`
    IMAGE,
    /// Autolink `<url>`
    AUTOLINK,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Every base kind, indexed by its `u16` value.
    pub const ALL: &'static [SyntaxKind] = &[
        Self::WHITESPACE,
        Self::NEWLINE,
        Self::TEXT,
        Self::GT,
        Self::LT,
        Self::DASH,
        Self::STAR,
        Self::PLUS,
        Self::UNDERSCORE,
        Self::BACKTICK,
        Self::TILDE,
        Self::LBRACKET,
        Self::RBRACKET,
        Self::LBRACE,
        Self::RBRACE,
        Self::LPAREN,
        Self::RPAREN,
        Self::PIPE,
        Self::HASH,
        Self::EXCLAIM,
        Self::COLON,
        Self::COMMA,
        Self::DOLLAR,
        Self::AT,
        Self::CARET,
        Self::BACKSLASH,
        Self::EOF,
        Self::ROOT,
        Self::BLOCK_QUOTE,
        Self::LIST_ITEM,
        Self::PARAGRAPH,
        Self::HEADING,
        Self::THEMATIC_BREAK,
        Self::FENCED_CODE,
        Self::CODE_INFO,
        Self::CODE_TEXT,
        Self::INLINE,
        Self::CODE_SPAN,
        Self::EMPHASIS,
        Self::STRONG,
        Self::STRIKETHROUGH,
        Self::LINK,
        Self::IMAGE,
        Self::AUTOLINK,
        Self::ERROR,
    ];

    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/newlines).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }

    /// Looks up a base kind from its raw id.
    pub fn from_raw(raw: u16) -> Option<SyntaxKind> {
        Self::ALL.get(usize::from(raw)).copied()
    }

    /// The vocabulary name of this kind, e.g. `"FENCED_CODE"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::WHITESPACE => "WHITESPACE",
            Self::NEWLINE => "NEWLINE",
            Self::TEXT => "TEXT",
            Self::GT => "GT",
            Self::LT => "LT",
            Self::DASH => "DASH",
            Self::STAR => "STAR",
            Self::PLUS => "PLUS",
            Self::UNDERSCORE => "UNDERSCORE",
            Self::BACKTICK => "BACKTICK",
            Self::TILDE => "TILDE",
            Self::LBRACKET => "LBRACKET",
            Self::RBRACKET => "RBRACKET",
            Self::LBRACE => "LBRACE",
            Self::RBRACE => "RBRACE",
            Self::LPAREN => "LPAREN",
            Self::RPAREN => "RPAREN",
            Self::PIPE => "PIPE",
            Self::HASH => "HASH",
            Self::EXCLAIM => "EXCLAIM",
            Self::COLON => "COLON",
            Self::COMMA => "COMMA",
            Self::DOLLAR => "DOLLAR",
            Self::AT => "AT",
            Self::CARET => "CARET",
            Self::BACKSLASH => "BACKSLASH",
            Self::EOF => "EOF",
            Self::ROOT => "ROOT",
            Self::BLOCK_QUOTE => "BLOCK_QUOTE",
            Self::LIST_ITEM => "LIST_ITEM",
            Self::PARAGRAPH => "PARAGRAPH",
            Self::HEADING => "HEADING",
            Self::THEMATIC_BREAK => "THEMATIC_BREAK",
            Self::FENCED_CODE => "FENCED_CODE",
            Self::CODE_INFO => "CODE_INFO",
            Self::CODE_TEXT => "CODE_TEXT",
            Self::INLINE => "INLINE",
            Self::CODE_SPAN => "CODE_SPAN",
            Self::EMPHASIS => "EMPHASIS",
            Self::STRONG => "STRONG",
            Self::STRIKETHROUGH => "STRIKETHROUGH",
            Self::LINK => "LINK",
            Self::IMAGE => "IMAGE",
            Self::AUTOLINK => "AUTOLINK",
            Self::ERROR => "ERROR",
        }
    }

    /// Looks up a base kind by its vocabulary name.
    pub fn from_name(name: &str) -> Option<SyntaxKind> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

/// A node or token kind in an augmented tree.
///
/// Ids up to [`SyntaxKind::ERROR`] are base kinds; higher ids are assigned
/// to catalog entries by the grammar composer. Only the [`Grammar`] that
/// produced a tree can name its custom kinds.
///
/// [`Grammar`]: crate::Grammar
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Kind(u16);

impl Kind {
    /// First id available to catalog entries.
    pub const FIRST_CUSTOM: u16 = SyntaxKind::ERROR as u16 + 1;

    pub(crate) const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub fn raw(self) -> u16 {
        self.0
    }

    /// The base kind, if this is one.
    pub fn base(self) -> Option<SyntaxKind> {
        SyntaxKind::from_raw(self.0)
    }

    /// Returns true if this kind was registered through the node-type catalog.
    pub fn is_custom(self) -> bool {
        self.0 >= Self::FIRST_CUSTOM
    }
}

impl From<SyntaxKind> for Kind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl PartialEq<SyntaxKind> for Kind {
    fn eq(&self, other: &SyntaxKind) -> bool {
        self.0 == *other as u16
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.base() {
            Some(kind) => f.write_str(kind.name()),
            None => write!(f, "CUSTOM#{}", self.0),
        }
    }
}

impl From<Kind> for rowan::SyntaxKind {
    fn from(kind: Kind) -> Self {
        Self(kind.0)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkdownLang {}

impl rowan::Language for MarkdownLang {
    type Kind = Kind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        Kind(raw.0)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<MarkdownLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<MarkdownLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<MarkdownLang>;
