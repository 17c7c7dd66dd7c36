//! Selector → tokenizer table.

use std::fmt;

use super::builtin;
use super::resolver::normalize_info;
use super::tokenizer::TokenizerHandle;
use crate::error::ConfigError;

struct Entry {
    tokenizer: Option<TokenizerHandle>,
    selectors: Vec<String>,
}

/// An ordered table of selector entries.
///
/// Selectors are unique across the registry; an info string resolves to the
/// tokenizer of the (only) entry listing its normalised first token.
#[derive(Default)]
pub struct LanguageRegistry {
    entries: Vec<Entry>,
}

impl LanguageRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the default language table.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        builtin::populate(&mut registry);
        registry
    }

    /// Add an entry.
    ///
    /// `tokenizer` may be `None`; fences choosing such an entry resolve to no
    /// language, exactly like an unknown selector.
    pub fn register<I, S>(
        &mut self,
        tokenizer: Option<TokenizerHandle>,
        selectors: I,
    ) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selectors: Vec<String> = selectors.into_iter().map(Into::into).collect();
        if selectors.is_empty() {
            return Err(ConfigError::EmptySelectors);
        }
        for (i, selector) in selectors.iter().enumerate() {
            self.check_new_selector(selector)?;
            if selectors[..i].contains(selector) {
                return Err(ConfigError::DuplicateSelector {
                    selector: selector.clone(),
                });
            }
        }
        self.push_entry(tokenizer, selectors);
        Ok(())
    }

    /// Add `selector` to the entry that already owns `existing`.
    pub fn alias(&mut self, selector: impl Into<String>, existing: &str) -> Result<(), ConfigError> {
        let selector = selector.into();
        self.check_new_selector(&selector)?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.selectors.iter().any(|s| s == existing))
            .ok_or_else(|| ConfigError::UnknownSelector {
                selector: existing.to_owned(),
            })?;
        entry.selectors.push(selector);
        Ok(())
    }

    /// Drop a selector. Entries left without selectors are removed.
    ///
    /// Returns whether the selector was present.
    pub fn remove(&mut self, selector: &str) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|e| e.selectors.iter().any(|s| s == selector))
        else {
            return false;
        };
        self.entries[index].selectors.retain(|s| s != selector);
        if self.entries[index].selectors.is_empty() {
            self.entries.remove(index);
        }
        true
    }

    /// Resolve a raw fence info string to a tokenizer.
    pub fn resolve(&self, info: &str) -> Option<TokenizerHandle> {
        let selector = normalize_info(info)?;
        self.entries
            .iter()
            .find(|e| e.selectors.iter().any(|s| s == selector))
            .and_then(|e| e.tokenizer.clone())
    }

    /// Whether `selector` is registered (regardless of its tokenizer).
    pub fn contains(&self, selector: &str) -> bool {
        self.selectors().any(|s| s == selector)
    }

    /// All selectors in registration order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|e| e.selectors.iter().map(String::as_str))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry whose selectors are already known to be valid.
    pub(super) fn push_entry(&mut self, tokenizer: Option<TokenizerHandle>, selectors: Vec<String>) {
        self.entries.push(Entry {
            tokenizer,
            selectors,
        });
    }

    fn check_new_selector(&self, selector: &str) -> Result<(), ConfigError> {
        if selector.is_empty() || selector.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidSelector {
                selector: selector.to_owned(),
            });
        }
        if self.contains(selector) {
            return Err(ConfigError::DuplicateSelector {
                selector: selector.to_owned(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for entry in &self.entries {
            let name = entry.tokenizer.as_ref().map(|t| t.name());
            list.entry(&(name, &entry.selectors));
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::tokenizer::PlainTokenizer;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    fn plain() -> TokenizerHandle {
        Arc::new(PlainTokenizer)
    }

    #[rstest]
    #[case::exact("python", Some("python"))]
    #[case::alias("py", Some("python"))]
    #[case::braces("{python}", Some("python"))]
    #[case::extra_tokens("python linenums=1", Some("python"))]
    #[case::padded("  rs  ", Some("rust"))]
    #[case::literal_plus("c++", Some("cpp"))]
    #[case::literal_hash("c#", Some("csharp"))]
    #[case::dotted("vb.net", Some("vb"))]
    #[case::case_sensitive("Python", None)]
    #[case::unknown("brainfuck", None)]
    #[case::empty("", None)]
    #[case::empty_braces("{}", None)]
    fn builtin_resolution(#[case] info: &str, #[case] expected: Option<&str>) {
        let registry = LanguageRegistry::builtin();
        let resolved = registry.resolve(info).map(|t| t.name());
        assert_eq!(resolved, expected);
    }

    #[test]
    fn mermaid_resolves_to_plain() {
        let registry = LanguageRegistry::builtin();
        assert_eq!(registry.resolve("mermaid").map(|t| t.name()), Some("plain"));
    }

    #[test]
    fn selectors_of_one_entry_share_a_handle() {
        let registry = LanguageRegistry::builtin();
        let (Some(a), Some(b)) = (registry.resolve("js"), registry.resolve("node")) else {
            panic!("javascript selectors must resolve");
        };
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn resolution_is_pure() {
        let registry = LanguageRegistry::builtin();
        let first = registry.resolve("{rust}").map(|t| t.name());
        for _ in 0..3 {
            assert_eq!(registry.resolve("{rust}").map(|t| t.name()), first);
        }
    }

    #[test]
    fn null_tokenizer_entry_resolves_to_none() {
        let mut registry = LanguageRegistry::new();
        registry.register(None, ["dot"]).unwrap();
        assert!(registry.contains("dot"));
        assert!(registry.resolve("dot").is_none());
    }

    #[test]
    fn duplicate_selector_is_rejected_at_registration() {
        let mut registry = LanguageRegistry::builtin();
        let err = registry.register(Some(plain()), ["rs"]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSelector { ref selector } if selector == "rs"));

        let mut registry = LanguageRegistry::new();
        let err = registry.register(Some(plain()), ["a", "a"]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSelector { .. }));
    }

    #[rstest]
    #[case::empty("")]
    #[case::space("two words")]
    fn invalid_selectors_are_rejected(#[case] selector: &str) {
        let mut registry = LanguageRegistry::new();
        let err = registry.register(Some(plain()), [selector]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelector { .. }));
    }

    #[test]
    fn empty_selector_set_is_rejected() {
        let mut registry = LanguageRegistry::new();
        let err = registry
            .register(Some(plain()), Vec::<String>::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptySelectors));
    }

    #[test]
    fn alias_and_remove() {
        let mut registry = LanguageRegistry::builtin();
        registry.alias("rustlang", "rust").unwrap();
        assert_eq!(registry.resolve("rustlang").map(|t| t.name()), Some("rust"));

        let err = registry.alias("x", "no-such-language").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSelector { .. }));

        assert!(registry.remove("rs"));
        assert!(!registry.remove("rs"));
        assert!(registry.resolve("rs").is_none());
        assert!(registry.resolve("rust").is_some());
    }

    #[test]
    fn removing_last_selector_drops_entry() {
        let mut registry = LanguageRegistry::new();
        registry.register(Some(plain()), ["only"]).unwrap();
        assert_eq!(registry.len(), 1);
        registry.remove("only");
        assert!(registry.is_empty());
    }

    #[test]
    fn selectors_in_registration_order() {
        let mut registry = LanguageRegistry::new();
        registry.register(Some(plain()), ["b", "a"]).unwrap();
        registry.register(None, ["c"]).unwrap();
        assert_eq!(registry.selectors().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }
}
