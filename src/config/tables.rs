//! Lookup tables compiled from a [`Config`].
//!
//! Built once per configuration and shared read-only by every parse; the
//! default set lives in a process-wide `LazyLock`.

use super::types::{Config, ConfigError};
use crate::pos::ItemType;
use phf::phf_map;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Built-in template → item type table
pub static TEMPLATE_TYPES: phf::Map<&'static str, &'static str> = phf_map! {
    "syn" => "syn", "synonyms" => "syn", "syn-lite" => "syn", "seeSynonyms" => "syn",
    "syndiff" => "syn", "synsee" => "syn",

    "ant" => "ant", "antonyms" => "ant", "antonym" => "ant", "ant-lite" => "ant",

    "hyper" => "hyper", "hypernyms" => "hyper",
    "hypo" => "hypo", "hyponyms" => "hypo",
    "holo" => "holo", "holonyms" => "holo", "hol" => "holo",
    "mero" => "mero", "meronyms" => "mero",
    "troponyms" => "tropo",
    "comeronyms" => "comero",

    "cot" => "cot", "coord" => "cot", "coordinate terms" => "cot", "coordinate_terms" => "cot",
    "coord-lite" => "cot",

    "nearsyn" => "parasyn", "parasynonyms" => "parasyn", "parasyn" => "parasyn", "par" => "parasyn",
    "perfectives" => "perfect",
    "imperfectives" => "imperfect",
    "active-voice" => "active",
    "middle-voice" => "midvoice",
    "alti" => "alti", "inline alt forms" => "alti",
    "co" => "co", "coi" => "co", "collocation" => "co", "zh-co" => "co",

    "ux" => "ux", "usex" => "ux", "uxi" => "ux", "ux-lite" => "ux", "prefex" => "ux",
    "prefixusex" => "ux", "afex" => "ux", "sufex" => "ux", "suffixusex" => "ux",
    "affixusex" => "ux", "rfex" => "ux", "rfquotek" => "ux",
    "ja-x" => "ux", "ja-x-inline" => "ux", "ja-usex" => "ux", "ja-usex-inline" => "ux",
    "hi-x" => "ux", "hi-x-inline" => "ux", "hi-usex" => "ux", "hi-usex-inline" => "ux",
    "ko-x" => "ux", "ko-x-inline" => "ux", "ko-usex" => "ux", "ko-usex-inline" => "ux",
    "th-x" => "ux", "th-x-inline" => "ux", "th-usex" => "ux", "th-usex-inline" => "ux",
    "ur-x" => "ux", "ur-x-inline" => "ux", "ur-usex" => "ux", "ur-usex-inline" => "ux",
    "zh-x" => "ux", "zh-x-inline" => "ux", "zh-usex" => "ux", "zh-usex-inline" => "ux",
    "km-x" => "ux", "km-x-inline" => "ux", "km-usex" => "ux", "km-usex-inline" => "ux",
    "ne-x" => "ux", "ne-x-inline" => "ux", "ne-usex" => "ux", "ne-usex-inline" => "ux",

    "Q" => "quote", "quote" => "quote", "quotei" => "quote", "quote-book" => "quote",
    "quote-web" => "quote", "quote-text" => "quote", "quote-journal" => "quote",
    "quote-av" => "quote", "quote-song" => "quote", "quote-video game" => "quote",
    "quote-newsgroup" => "quote", "quote-news" => "quote", "quote-book-ur" => "quote",
    "quote-hansard" => "quote", "quote-lite" => "quote", "quote-mailing list" => "quote",
    "quote-us-patent" => "quote", "quote-wikipedia" => "quote", "grc-cite" => "quote",
    "seeCites" => "quote", "seemoreCites" => "quote", "seeMoreCites" => "quote",
    "rfquote" => "quote", "rfquote-sense" => "quote",

    "lb" => "sense", "lb-lite" => "sense", "senseid" => "sense", "defdate" => "sense",
    "rfc-sense" => "sense", "n-g" => "sense", "q" => "sense", "qualifier" => "sense",
    "gloss" => "sense", "ng" => "sense",
};

/// Compiled, immutable lookup data used by the section and list parsers
#[derive(Debug)]
pub struct Tables {
    pub(crate) categories: Regex,
    pub(crate) toplines: Regex,
    safe_templates: HashSet<String>,
    template_types: HashMap<String, ItemType>,
}

static DEFAULT_TABLES: LazyLock<Tables> =
    LazyLock::new(|| Tables::from_config(&Config::default()).expect("built-in tables must compile"));

impl Tables {
    /// Tables for the built-in configuration
    pub fn global() -> &'static Tables {
        &DEFAULT_TABLES
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let category_names = config.sections.category_templates.join("|");
        let categories = Regex::new(&format!(
            r"\{{\{{\s*(?:{category_names})\s*[|}}][^{{}}]*\}}*|\[\[\s*[cC]at(?:egory)?\s*:[^\]]*\]\]"
        ))
        .map_err(|source| ConfigError::InvalidPattern {
            what: "category template",
            source,
        })?;

        let topline_names = config.sections.topline_templates.join("|");
        let toplines = Regex::new(&format!(r"\{{\{{\s*({topline_names})\s*[|}}][^}}]*\}}*")).map_err(|source| {
            ConfigError::InvalidPattern {
                what: "topline template",
                source,
            }
        })?;

        let mut template_types: HashMap<String, ItemType> = TEMPLATE_TYPES
            .entries()
            .map(|(name, kind)| (name.to_string(), kind.parse().unwrap_or(ItemType::Unknown)))
            .collect();
        for (kind, names) in &config.senses.template_types {
            let item_type: ItemType = kind.parse().unwrap_or(ItemType::Unknown);
            for name in names {
                template_types.insert(name.clone(), item_type.clone());
            }
        }

        Ok(Self {
            categories,
            toplines,
            safe_templates: config.senses.safe_templates.iter().cloned().collect(),
            template_types,
        })
    }

    /// Item type a template name belongs to, if any
    pub fn template_type(&self, name: &str) -> Option<&ItemType> {
        self.template_types.get(name)
    }

    pub fn is_safe_template(&self, name: &str) -> bool {
        self.safe_templates.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let tables = Tables::global();
        assert_eq!(tables.template_type("syn"), Some(&ItemType::Syn));
        assert_eq!(tables.template_type("zh-usex-inline"), Some(&ItemType::Ux));
        assert_eq!(tables.template_type("coord"), Some(&ItemType::Cot));
        assert_eq!(tables.template_type("lb"), Some(&ItemType::Sense));
        assert_eq!(tables.template_type("en-noun"), None);
        assert!(tables.is_safe_template("wikipedia"));
    }

    #[test]
    fn test_config_extends_and_overrides() {
        let config = Config::from_toml(
            r#"
[senses.template-types]
syn = ["my-syn"]
rhymes = ["rhyme"]
quote = ["ux"]
"#,
        )
        .unwrap();
        let tables = Tables::from_config(&config).unwrap();
        assert_eq!(tables.template_type("my-syn"), Some(&ItemType::Syn));
        assert_eq!(tables.template_type("rhyme"), Some(&ItemType::Other("rhymes".to_string())));
        assert_eq!(tables.template_type("ux"), Some(&ItemType::Quote));
    }

    #[test]
    fn test_category_regex() {
        let tables = Tables::global();
        assert!(tables.categories.is_match("{{C|en|Trees}}"));
        assert!(tables.categories.is_match("{{eo 5OA}}"));
        assert!(tables.categories.is_match("[[ Category : en:Trees]]"));
        assert!(!tables.categories.is_match("{{cattle}}"));
        assert!(tables.toplines.is_match("{{hot word|en}}"));
    }

    #[test]
    fn test_invalid_category_pattern() {
        let mut config = Config::default();
        config.sections.category_templates.push("(".to_string());
        assert!(matches!(
            Tables::from_config(&config),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }
}
