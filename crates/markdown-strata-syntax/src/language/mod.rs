//! Embedded code languages: tokenizers, the selector registry and the
//! resolver the fenced-code rule consults.

mod builtin;
pub mod registry;
pub mod resolver;
pub mod tokenizer;

pub use registry::LanguageRegistry;
pub use resolver::{LanguageResolver, normalize_info};
pub use tokenizer::{
    CodeToken, GenericTokenizer, GenericTokenizerConfig, HighlightKind, LineState,
    PlainTokenizer, Tokenizer, TokenizerHandle,
};
