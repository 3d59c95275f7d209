//! Handlers for the `sections` and `senses` commands.

use colored::*;
use serde::Serialize;

use wiktparse_lib::config::Tables;
use wiktparse_lib::diagnostics::LogEntry;
use wiktparse_lib::exit_codes::exit;
use wiktparse_lib::pos::{ListItem, ListTree, is_pos_title, parse_pos_with};
use wiktparse_lib::sections::{Document, Order, SectionId, parse_with};

use crate::cli_utils::{Input, discovery_dir, load_tables_with_cli_error_handling, read_input};
use crate::{InspectArgs, OutputFormat};

#[derive(Debug, Serialize)]
pub struct SectionInfo {
    pub path: String,
    pub level: usize,
    pub title: String,
    pub count: Option<String>,
    pub lines: usize,
    pub toplines: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SensesInfo<'a> {
    pub path: String,
    pub headlines: Vec<String>,
    pub senses: Vec<&'a ListItem>,
    pub footlines: Vec<String>,
    pub changes: Vec<String>,
}

fn load(args: &InspectArgs, config_path: Option<&str>, no_config: bool) -> (Input, Tables) {
    let input = match read_input(&args.path, args.title.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            exit::tool_error();
        }
    };
    let tables = load_tables_with_cli_error_handling(config_path, no_config, discovery_dir(&[args.path.clone()]));
    (input, tables)
}

/// Parse with a log attached so unsafe pages are still shown
fn parse_page(input: &Input, tables: &Tables) -> Document {
    let mut log: Vec<LogEntry> = Vec::new();
    let doc = parse_with(&input.text, &input.title, tables, Some(&mut log));
    for entry in &log {
        eprintln!("{}: {}", "warning".yellow().bold(), entry);
    }
    match doc {
        Some(doc) => doc,
        None => {
            eprintln!("{}: could not parse {}", "Error".red().bold(), input.path);
            exit::tool_error();
        }
    }
}

fn selected(doc: &Document, args: &InspectArgs, only_pos: bool) -> Vec<SectionId> {
    doc.walk(doc.root(), true, Order::DepthFirst)
        .into_iter()
        .filter(|&id| match &args.section {
            Some(title) => doc[id].title().trim() == title.trim(),
            None => !only_pos || is_pos_title(doc[id].title()),
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            exit::tool_error();
        }
    }
}

/// Print the section tree of a page.
pub fn handle_sections(args: &InspectArgs, config_path: Option<&str>, no_config: bool) {
    let (input, tables) = load(args, config_path, no_config);
    let doc = parse_page(&input, &tables);

    let infos: Vec<SectionInfo> = selected(&doc, args, false)
        .into_iter()
        .map(|id| {
            let section = &doc[id];
            SectionInfo {
                path: doc.path(id),
                level: section.level(),
                title: section.title().to_string(),
                count: section.count().map(str::to_string),
                lines: section.content().len(),
                toplines: section.toplines().to_vec(),
                categories: section.categories().to_vec(),
            }
        })
        .collect();

    if args.output_format == OutputFormat::Json {
        print_json(&infos);
        return;
    }
    for info in &infos {
        let indent = "  ".repeat(info.level.saturating_sub(2));
        let title = match &info.count {
            Some(count) => format!("{} {count}", info.title),
            None => info.title.clone(),
        };
        println!(
            "{indent}{} {} {}",
            format!("L{}", info.level).dimmed(),
            title.bold(),
            format!("({} lines)", info.lines).dimmed()
        );
        for line in info.toplines.iter().chain(&info.categories) {
            println!("{indent}  {}", line.cyan());
        }
    }
}

fn print_items(tree: &ListTree) {
    for (_, item) in tree.iter() {
        let indent = "  ".repeat(item.level().saturating_sub(1));
        println!(
            "{indent}{} {} {}",
            item.name().blue(),
            format!("[{}]", item.item_type()).yellow(),
            item.data().lines().next().unwrap_or("")
        );
    }
}

/// Print the classified definition lists of a page.
pub fn handle_senses(args: &InspectArgs, config_path: Option<&str>, no_config: bool) {
    let (input, tables) = load(args, config_path, no_config);
    let doc = parse_page(&input, &tables);

    let parses: Vec<_> = selected(&doc, args, true)
        .into_iter()
        .map(|id| (doc.path(id), parse_pos_with(&doc, id, &tables, None)))
        .collect();

    if args.output_format == OutputFormat::Json {
        let infos: Vec<SensesInfo<'_>> = parses
            .iter()
            .map(|(path, pos)| SensesInfo {
                path: path.clone(),
                headlines: pos.headlines.clone(),
                senses: pos.senses.iter().map(|(_, item)| item).collect(),
                footlines: pos.footlines.clone(),
                changes: pos.changes.iter().map(str::to_string).collect(),
            })
            .collect();
        print_json(&infos);
        return;
    }

    for (path, pos) in &parses {
        println!("{}", path.bold());
        if pos.senses.is_empty() {
            println!("  {}", "no definition list".dimmed());
            continue;
        }
        print_items(&pos.senses);
        if !pos.changes.is_empty() {
            println!("  {} {}", "would fix:".green(), pos.changelog());
        }
    }
}
