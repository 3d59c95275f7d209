//! Shared CLI utility functions used across command handlers.

use anyhow::{Context, Result, bail};
use colored::*;
use std::io::Read;
use std::path::Path;

use wiktparse_lib::config::{Config, Tables};
use wiktparse_lib::exit_codes::exit;

/// A page read from disk or stdin
#[derive(Debug)]
pub struct Input {
    /// Path as given on the command line; `-` for stdin
    pub path: String,
    pub title: String,
    pub text: String,
}

/// Page title for a path: the explicit title, else the file stem
pub fn resolve_title(path: &str, title: Option<&str>) -> String {
    if let Some(title) = title {
        return title.to_string();
    }
    if path == "-" {
        return "stdin".to_string();
    }
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Read one input, `-` meaning stdin.
pub fn read_input(path: &str, title: Option<&str>) -> Result<Input> {
    let text = if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        text
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file {path}"))?
    };
    Ok(Input {
        path: path.to_string(),
        title: resolve_title(path, title),
        text,
    })
}

/// Read every input, rejecting a shared title for several pages.
pub fn read_inputs(paths: &[String], title: Option<&str>) -> Result<Vec<Input>> {
    if title.is_some() && paths.len() > 1 {
        bail!("--title can only be used with a single input");
    }
    if paths.iter().filter(|path| path.as_str() == "-").count() > 1 {
        bail!("stdin ('-') can only be read once");
    }
    paths.iter().map(|path| read_input(path, title)).collect()
}

/// Directory used for config discovery: the first input's directory
pub fn discovery_dir(paths: &[String]) -> &Path {
    paths
        .iter()
        .find(|path| path.as_str() != "-")
        .map(|path| Path::new(path.as_str()))
        .and_then(|path| path.parent())
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Load configuration and compile its tables, exiting on error.
pub fn load_tables_with_cli_error_handling(config_path: Option<&str>, no_config: bool, start: &Path) -> Tables {
    let result = Config::load_with_discovery(config_path.map(Path::new), start, no_config)
        .and_then(|config| Tables::from_config(&config));
    match result {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("{}: {}", "Config error".red().bold(), e);
            exit::tool_error();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_title() {
        assert_eq!(resolve_title("pages/tree.wiki", None), "tree");
        assert_eq!(resolve_title("pages/tree.wiki", Some("Tree")), "Tree");
        assert_eq!(resolve_title("-", None), "stdin");
    }

    #[test]
    fn test_discovery_dir() {
        assert_eq!(discovery_dir(&["a/b/c.wiki".to_string()]), Path::new("a/b"));
        assert_eq!(discovery_dir(&["c.wiki".to_string()]), Path::new("."));
        assert_eq!(discovery_dir(&["-".to_string()]), Path::new("."));
    }

    #[test]
    fn test_title_with_several_inputs_is_rejected() {
        let paths = vec!["a.wiki".to_string(), "b.wiki".to_string()];
        assert!(read_inputs(&paths, Some("x")).is_err());
    }
}
