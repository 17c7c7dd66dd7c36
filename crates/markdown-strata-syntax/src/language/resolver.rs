//! Fence-language resolution.

use super::registry::LanguageRegistry;
use super::tokenizer::TokenizerHandle;

/// Maps a fenced code block's info string to a tokenizer.
///
/// The fenced-code rule calls this exactly once per opened fence with the raw
/// info string. Returning `None` never fails the parse; the fence is still
/// wrapped, just without a language.
pub trait LanguageResolver: Send + Sync {
    fn resolve(&self, info: &str) -> Option<TokenizerHandle>;
}

impl LanguageResolver for LanguageRegistry {
    fn resolve(&self, info: &str) -> Option<TokenizerHandle> {
        LanguageRegistry::resolve(self, info)
    }
}

impl<F> LanguageResolver for F
where
    F: Fn(&str) -> Option<TokenizerHandle> + Send + Sync,
{
    fn resolve(&self, info: &str) -> Option<TokenizerHandle> {
        self(info)
    }
}

/// Reduce an info string to the selector it names.
///
/// Trims, strips one layer of `{...}` wrapping (only when the braces enclose
/// something), and keeps the first whitespace-separated token. Returns `None`
/// when nothing is left.
pub fn normalize_info(info: &str) -> Option<&str> {
    let trimmed = info.trim();
    let unwrapped = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|inner| !inner.is_empty())
        .unwrap_or(trimmed);
    unwrapped.split_whitespace().next()
}
