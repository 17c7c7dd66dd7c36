//! Node types that extensions add to the tree vocabulary.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::syntax_kind::SyntaxKind;

/// Opaque style tag attached to a node type, for renderers and themes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleTag(Cow<'static, str>);

impl StyleTag {
    pub const fn new_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for StyleTag {
    fn from(tag: &'static str) -> Self {
        Self::new_static(tag)
    }
}

impl From<String> for StyleTag {
    fn from(tag: String) -> Self {
        Self(Cow::Owned(tag))
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named node kind and its style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeType {
    pub name: String,
    pub style: StyleTag,
}

/// A second registration of a name with a different style.
#[derive(Debug, Clone)]
struct StyleConflict {
    name: String,
    existing: StyleTag,
    requested: StyleTag,
}

/// Node types in registration order.
///
/// Conflicting registrations are recorded rather than rejected on the spot,
/// and surface as a composition error.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeCatalog {
    entries: Vec<NodeType>,
    conflicts: Vec<StyleConflict>,
}

impl NodeTypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node type. Repeating a name with the same style is a no-op.
    pub fn register(&mut self, name: impl Into<String>, style: impl Into<StyleTag>) -> &mut Self {
        let name = name.into();
        let style = style.into();
        match self.entries.iter().find(|e| e.name == name) {
            Some(existing) if existing.style == style => {}
            Some(existing) => {
                self.conflicts.push(StyleConflict {
                    existing: existing.style.clone(),
                    name,
                    requested: style,
                });
            }
            None => self.entries.push(NodeType { name, style }),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&NodeType> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeType> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check for recorded conflicts and names taken by the base vocabulary,
    /// then hand over the entries.
    pub(crate) fn into_validated(self) -> Result<Vec<NodeType>, ConfigError> {
        if let Some(conflict) = self.conflicts.into_iter().next() {
            return Err(ConfigError::ConflictingNodeStyle {
                name: conflict.name,
                existing: conflict.existing,
                requested: conflict.requested,
            });
        }
        if let Some(reserved) = self
            .entries
            .iter()
            .find(|e| SyntaxKind::from_name(&e.name).is_some())
        {
            return Err(ConfigError::ReservedNodeName {
                name: reserved.name.clone(),
            });
        }
        Ok(self.entries)
    }
}
