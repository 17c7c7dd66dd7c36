//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree building.
//! Instead of building the tree directly, the parser emits a **flat sequence**
//! of events that describe the tree structure.
//!
//! ```text
//! Start(HEADING)     ← Begin a HEADING node
//!   Token(HASH)      ← Add a HASH token
//!   Token(WHITESPACE)
//!   Token(TEXT)
//!   Token(NEWLINE)
//! Finish             ← End the HEADING node
//! ```
//!
//! A flat list is also what makes extension attempts cheap to undo: rolling
//! back a failed attempt is a `truncate` to the length recorded before it.
//!
//! ## Forward Parent Links
//!
//! The `forward_parent` field in `Start` handles cases where we need to wrap
//! an already-parsed node. Instead of restructuring the event list, we store
//! a link that says "when you process me, also process that other Start first."

use crate::syntax_kind::Kind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node of a base or catalog kind.
    Start {
        kind: Kind,
        forward_parent: Option<usize>,
    },

    /// Add a token to the current node.
    ///
    /// `n_raw_tokens` lexer tokens are glued into one tree token of `kind`.
    Token { kind: Kind, n_raw_tokens: u8 },

    /// Finish the current node.
    Finish,

    /// Reserved slot for a node whose marker is still open (or was abandoned).
    Placeholder,
}

impl Event {
    /// Create a start event with no forward parent.
    pub fn start(kind: impl Into<Kind>) -> Self {
        Event::Start {
            kind: kind.into(),
            forward_parent: None,
        }
    }

    /// Create a token event for a single raw token.
    pub fn token(kind: impl Into<Kind>) -> Self {
        Event::Token {
            kind: kind.into(),
            n_raw_tokens: 1,
        }
    }
}
