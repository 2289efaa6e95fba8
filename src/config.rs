//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/yatree/yatree.toml`
//! 3. Explicit config file (`--config <FILE>`)
//! 4. Environment variables: `YATREE_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// When children returned by a producer are wrapped into view nodes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProducerPolicy {
    /// Wrap on first expansion; the producer runs again at that point.
    #[default]
    Deferred,
    /// Wrap at build time, like a concrete list.
    Eager,
}

impl fmt::Display for ProducerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProducerPolicy::Deferred => f.write_str("deferred"),
            ProducerPolicy::Eager => f.write_str("eager"),
        }
    }
}

impl FromStr for ProducerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deferred" => Ok(ProducerPolicy::Deferred),
            "eager" => Ok(ProducerPolicy::Eager),
            other => Err(format!("unknown producer policy: {other} (expected deferred|eager)")),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub children_key: Option<String>,
    pub label_key: Option<String>,
    pub collapse_by_default: Option<bool>,
    pub producer_policy: Option<ProducerPolicy>,
}

/// Per-tree settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Attribute holding a node's children (default: "children")
    pub children_key: String,
    /// Attribute shown as a node's label by renderers (default: "label")
    pub label_key: String,
    /// Initial collapsed state of every new view node (default: true)
    pub collapse_by_default: bool,
    /// When producer children are wrapped (default: deferred)
    pub producer_policy: ProducerPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            children_key: "children".into(),
            label_key: "label".into(),
            collapse_by_default: true,
            producer_policy: ProducerPolicy::default(),
        }
    }
}

/// Get the XDG config directory for yatree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "yatree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("yatree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            children_key: overlay
                .children_key
                .clone()
                .unwrap_or_else(|| self.children_key.clone()),
            label_key: overlay
                .label_key
                .clone()
                .unwrap_or_else(|| self.label_key.clone()),
            collapse_by_default: overlay
                .collapse_by_default
                .unwrap_or(self.collapse_by_default),
            producer_policy: overlay.producer_policy.unwrap_or(self.producer_policy),
        }
    }

    /// Reject settings the tree cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.children_key.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "children_key must not be empty".into(),
            });
        }
        if self.label_key.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "label_key must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, applied after the global one
    ///
    /// A missing explicit file is an error; a missing global file is not.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(
            global_config_path().as_deref(),
            config_file,
            Self::env_source(),
        )
    }

    /// Layered loading with every source given explicitly.
    ///
    /// `global` is skipped when it does not exist; `env` supplies the
    /// `YATREE_*` overrides (see [`Settings::env_source`]).
    pub fn load_from(
        global: Option<&Path>,
        config_file: Option<&Path>,
        env: Environment,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            debug!(path = %path.display(), "loading config file");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current, env)?;

        current.validate()?;
        Ok(current)
    }

    /// `YATREE_*` variables of the process environment.
    pub fn env_source() -> Environment {
        Environment::with_prefix("YATREE").try_parsing(true)
    }

    /// Apply environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("children_key") {
            settings.children_key = val;
        }
        if let Ok(val) = config.get_string("label_key") {
            settings.label_key = val;
        }
        if let Ok(val) = config.get_bool("collapse_by_default") {
            settings.collapse_by_default = val;
        }
        if let Ok(val) = config.get_string("producer_policy") {
            settings.producer_policy = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# yatree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/yatree/yatree.toml   (your baseline)
#   File:   yatree --config <FILE>          (per invocation)
#   Env:    YATREE_* environment variables  (explicit overrides)

# Attribute holding a node's children
# children_key = "children"

# Attribute shown as the node label
# label_key = "label"

# Start every node collapsed
# collapse_by_default = true

# When children returned by a producer are wrapped: "deferred" or "eager"
# producer_policy = "deferred"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_overlay_when_merging_then_keeps_base() {
        let base = Settings::default();
        assert_eq!(base.merge_with(&RawSettings::default()), base);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let overlay = RawSettings {
            children_key: Some("items".into()),
            producer_policy: Some(ProducerPolicy::Eager),
            ..RawSettings::default()
        };

        let merged = Settings::default().merge_with(&overlay);

        assert_eq!(merged.children_key, "items");
        assert_eq!(merged.label_key, "label");
        assert!(merged.collapse_by_default);
        assert_eq!(merged.producer_policy, ProducerPolicy::Eager);
    }

    #[test]
    fn given_blank_children_key_when_validating_then_errors() {
        let settings = Settings {
            children_key: "  ".into(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn given_policy_strings_when_parsing_then_case_insensitive() {
        assert_eq!("Eager".parse::<ProducerPolicy>(), Ok(ProducerPolicy::Eager));
        assert_eq!("deferred".parse::<ProducerPolicy>(), Ok(ProducerPolicy::Deferred));
        assert!("sometimes".parse::<ProducerPolicy>().is_err());
    }

    #[test]
    fn given_settings_when_serialized_then_template_keys_match() {
        let toml = Settings::default().to_toml().unwrap();
        for key in ["children_key", "label_key", "collapse_by_default", "producer_policy"] {
            assert!(toml.contains(key), "missing {key} in {toml}");
            assert!(Settings::template().contains(key));
        }
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
