//! Grammar configuration stored as TOML.
//!
//! ```toml
//! [extensions.Citation]
//! enabled = false
//!
//! [extensions.PlainLink]
//! priority = 50
//!
//! [languages]
//! aliases = { rustlang = "rust" }
//! disabled = ["mermaid"]
//! ```
//!
//! Extensions not mentioned keep their standard priority and stay enabled.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use markdown_strata_syntax::{Grammar, GrammarBuilder, LanguageRegistry, Priority, preset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// A configuration that does not describe a valid grammar.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Unknown extension `{name}` in configuration")]
    UnknownExtension { name: String },

    #[error(transparent)]
    Grammar(#[from] markdown_strata_syntax::ConfigError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-extension settings, keyed by extension name.
    pub extensions: BTreeMap<String, ExtensionConfig>,
    pub languages: LanguagesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguagesConfig {
    /// Selectors to drop from the builtin table.
    pub disabled: Vec<String>,
    /// New selector to an existing one, e.g. `rustlang = "rust"`.
    pub aliases: BTreeMap<String, String>,
}

impl LanguagesConfig {
    /// The builtin language table with this configuration applied. Selectors
    /// are removed before aliases are added, so a disabled selector can be
    /// re-pointed at another language.
    pub fn registry(&self) -> Result<LanguageRegistry, markdown_strata_syntax::ConfigError> {
        let mut registry = LanguageRegistry::builtin();
        for selector in &self.disabled {
            if !registry.remove(selector) {
                warn!("disabled language selector `{selector}` is not registered");
            }
        }
        for (selector, existing) in &self.aliases {
            registry.alias(selector.clone(), existing)?;
        }
        Ok(registry)
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-strata");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn is_enabled(&self, extension: &str) -> bool {
        self.extensions
            .get(extension)
            .is_none_or(|settings| settings.enabled)
    }

    /// Compose the standard grammar with this configuration applied.
    pub fn build_grammar(&self) -> Result<Grammar, BuildError> {
        let mut slots = preset::standard_slots();
        for (name, settings) in &self.extensions {
            if !slots.contains(name) {
                return Err(BuildError::UnknownExtension { name: name.clone() });
            }
            if let Some(priority) = settings.priority {
                slots.set_priority(name, priority);
            }
        }
        slots.retain(|name| self.is_enabled(name));
        debug!("configured extensions: {slots:?}");

        let grammar = GrammarBuilder::new()
            .node_types(preset::default_node_types())
            .slots(slots)
            .resolver(self.languages.registry()?)
            .build()?;
        Ok(grammar)
    }
}
