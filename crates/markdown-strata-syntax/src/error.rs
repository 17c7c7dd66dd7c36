use thiserror::Error;

use crate::catalog::StyleTag;
use crate::extension::Priority;

/// A grammar could not be configured. No grammar is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a language entry needs at least one selector")]
    EmptySelectors,
    #[error("invalid language selector {selector:?}: selectors are non-empty and contain no whitespace")]
    InvalidSelector { selector: String },
    #[error("language selector `{selector}` is already registered")]
    DuplicateSelector { selector: String },
    #[error("no language entry has the selector `{selector}`")]
    UnknownSelector { selector: String },
    #[error("node type `{name}` registered with style `{existing}` and again with `{requested}`")]
    ConflictingNodeStyle {
        name: String,
        existing: StyleTag,
        requested: StyleTag,
    },
    #[error("node type `{name}` collides with a base grammar node")]
    ReservedNodeName { name: String },
    #[error("extension `{extension}` emits `{name}`, which is not a known node type")]
    UnknownNodeKind { extension: String, name: String },
    #[error(
        "extensions `{first}` and `{second}` both claim node `{name}` at priority {priority}"
    )]
    AmbiguousNodeClaim {
        name: String,
        first: String,
        second: String,
        priority: Priority,
    },
    #[error("too many node types: {count}")]
    TooManyNodeKinds { count: usize },
}

/// An extension attempt failed. The grammar treats this as a no-match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    #[error("node kind `{name}` is not defined in this grammar")]
    UnknownKind { name: String },
    #[error("node kind `{name}` is not among the kinds this extension emits")]
    UndeclaredKind { name: String },
    #[error("{0}")]
    Invalid(String),
}
