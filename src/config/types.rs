use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Config file names searched for, in priority order
pub const CONFIG_FILE_NAMES: [&str; 2] = [".wiktparse.toml", "wiktparse.toml"];

/// Templates whose lines always trail a language block.
///
/// Entries are regex alternatives, which is how the `eo [1-9]OA` family is
/// covered by one name.
pub const DEFAULT_CATEGORY_TEMPLATES: &[&str] = &[
    "c",
    "C",
    "cat",
    "top",
    "topic",
    "topics",
    "categorize",
    "catlangname",
    "catlangcode",
    "cln",
    "zh-cat",
    "eo F",
    "eo [1-9]OA",
    "eo-categoryTOC",
    "eo BRO",
    "eo GCSE",
    "Universala Vortaro",
];

/// Templates that belong directly under the language heading
pub const DEFAULT_TOPLINE_TEMPLATES: &[&str] = &["LDL", "normalized", "hot word", "rfd"];

/// Decorative templates ignored when deciding whether a list line is a
/// single template call
pub const DEFAULT_SAFE_TEMPLATES: &[&str] = &[
    "anchor",
    "attention",
    "rfclarify",
    "rfd-sense",
    "rfv-sense",
    "tea room sense",
    "rfe",
    "wikipedia",
    "wp",
    "slim-wikipedia",
    "swp",
];

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Represents the complete configuration loaded from wiktparse.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sections: SectionsConfig,
    pub senses: SensesConfig,
}

/// `[sections]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SectionsConfig {
    pub category_templates: Vec<String>,
    pub topline_templates: Vec<String>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            category_templates: owned(DEFAULT_CATEGORY_TEMPLATES),
            topline_templates: owned(DEFAULT_TOPLINE_TEMPLATES),
        }
    }
}

/// `[senses]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SensesConfig {
    pub safe_templates: Vec<String>,
    /// Extra template names per item type, e.g. `syn = ["my-syn"]`.
    /// A name listed here overrides its built-in type.
    pub template_types: BTreeMap<String, Vec<String>>,
}

impl Default for SensesConfig {
    fn default() -> Self {
        Self {
            safe_templates: owned(DEFAULT_SAFE_TEMPLATES),
            template_types: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: path.display().to_string(),
        })?;
        let config = Self::from_toml(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Find the nearest config file, walking up from `start`
    pub fn discover(start: &Path) -> Option<PathBuf> {
        let mut dir = Some(start);
        while let Some(current) = dir {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    log::debug!("Found config file: {}", candidate.display());
                    return Some(candidate);
                }
            }
            dir = current.parent();
        }
        None
    }

    /// Explicit path wins; otherwise discover from `start` unless
    /// `no_config`; otherwise defaults.
    pub fn load_with_discovery(explicit: Option<&Path>, start: &Path, no_config: bool) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if no_config {
            return Ok(Self::default());
        }
        match Self::discover(start) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the TOML content
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// A template list produced an invalid regex
    #[error("Invalid {what} pattern: {source}")]
    InvalidPattern { what: &'static str, source: regex::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.sections.category_templates.iter().any(|t| t == "catlangname"));
        assert_eq!(config.sections.topline_templates.len(), 4);
        assert!(config.senses.template_types.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
[senses]
safe-templates = ["anchor"]

[senses.template-types]
syn = ["my-syn"]
"#,
        )
        .unwrap();
        assert_eq!(config.senses.safe_templates, vec!["anchor".to_string()]);
        assert_eq!(config.senses.template_types["syn"], vec!["my-syn".to_string()]);
        assert_eq!(config.sections, SectionsConfig::default());
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = Config::from_toml("[sections]\nbogus = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_discover_walks_up() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("wiktparse.toml"), "").unwrap();

        let found = Config::discover(&nested).unwrap();
        assert_eq!(found, temp_dir.path().join("wiktparse.toml"));

        fs::write(temp_dir.path().join(".wiktparse.toml"), "").unwrap();
        let found = Config::discover(&nested).unwrap();
        assert_eq!(found, temp_dir.path().join(".wiktparse.toml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = tempdir().unwrap();
        let err = Config::load(&temp_dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }
}
