use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;
use wiktparse_lib::config::{Config, ConfigError, Tables};
use wiktparse_lib::sections::parse_with;

#[test]
fn test_load_with_discovery() {
    let temp_dir = tempdir().unwrap();
    let pages = temp_dir.path().join("pages");
    fs::create_dir_all(&pages).unwrap();
    fs::write(
        temp_dir.path().join(".wiktparse.toml"),
        "[senses]\nsafe-templates = [\"anchor\"]\n",
    )
    .unwrap();

    let discovered = Config::load_with_discovery(None, &pages, false).unwrap();
    assert_eq!(discovered.senses.safe_templates, vec!["anchor".to_string()]);

    let defaults = Config::load_with_discovery(None, &pages, true).unwrap();
    assert_eq!(defaults, Config::default());

    let explicit = temp_dir.path().join("other.toml");
    fs::write(&explicit, "[sections]\ntopline-templates = [\"LDL\"]\n").unwrap();
    let config = Config::load_with_discovery(Some(&explicit), &pages, true).unwrap();
    assert_eq!(config.sections.topline_templates, vec!["LDL".to_string()]);
    assert_eq!(config.senses, Config::default().senses);
}

#[test]
fn test_custom_category_templates() {
    let config = Config::from_toml("[sections]\ncategory-templates = [\"mycat\"]\n").unwrap();
    let tables = Tables::from_config(&config).unwrap();
    let text = "==English==\n{{mycat|en|Trees}}\n\n===Noun===\n# tree\n";

    let doc = parse_with(text, "tree", &tables, None).unwrap();
    assert_eq!(doc.to_string(), "==English==\n\n===Noun===\n# tree\n\n{{mycat|en|Trees}}\n");

    let doc = parse_with(text, "tree", Tables::global(), None).unwrap();
    assert_eq!(doc.to_string(), text);
}

#[test]
fn test_invalid_template_pattern() {
    let config = Config::from_toml("[sections]\ntopline-templates = [\"rfd(\"]\n").unwrap();
    let err = Tables::from_config(&config).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { what: "topline template", .. }));
    assert!(err.to_string().starts_with("Invalid topline template pattern"));
}

#[test]
fn test_malformed_toml() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("wiktparse.toml");
    fs::write(&path, "[senses\n").unwrap();
    assert!(matches!(Config::load(&path), Err(ConfigError::ParseError(_))));
}
