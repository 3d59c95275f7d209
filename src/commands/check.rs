//! Handler for the `check` and `fmt` commands.

use colored::*;
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use wiktparse_lib::config::Tables;
use wiktparse_lib::diagnostics::{ChangeLog, LogEntry};
use wiktparse_lib::exit_codes::exit;
use wiktparse_lib::fix_coordinator::fix_page;

use crate::cli_utils::{Input, discovery_dir, load_tables_with_cli_error_handling, read_inputs};
use crate::{CheckArgs, FixMode, OutputFormat};

/// Outcome of normalizing one input
#[derive(Debug, Serialize)]
pub struct PageReport {
    pub file: String,
    pub title: String,
    pub safe: bool,
    pub changed: bool,
    pub converged: bool,
    pub changes: ChangeLog,
    pub log: Vec<LogEntry>,
    #[serde(skip)]
    pub text: String,
}

impl PageReport {
    fn is_stdin(&self) -> bool {
        self.file == "-"
    }

    fn has_findings(&self) -> bool {
        self.changed || !self.safe || !self.log.is_empty()
    }
}

/// Normalize one page in memory, collecting its diagnostics
pub fn process_input(input: &Input, tables: &Tables) -> PageReport {
    let mut log: Vec<LogEntry> = Vec::new();
    let result = fix_page(&input.text, &input.title, tables, Some(&mut log));
    match result {
        Some(result) => PageReport {
            file: input.path.clone(),
            title: input.title.clone(),
            safe: result.safe,
            changed: result.text != input.text,
            converged: result.converged,
            changes: result.changes,
            log,
            text: result.text,
        },
        None => PageReport {
            file: input.path.clone(),
            title: input.title.clone(),
            safe: false,
            changed: false,
            converged: true,
            changes: ChangeLog::new(),
            log,
            text: input.text.clone(),
        },
    }
}

#[cfg(feature = "parallel")]
fn process_all(inputs: &[Input], tables: &Tables) -> Vec<PageReport> {
    inputs.par_iter().map(|input| process_input(input, tables)).collect()
}

#[cfg(not(feature = "parallel"))]
fn process_all(inputs: &[Input], tables: &Tables) -> Vec<PageReport> {
    inputs.iter().map(|input| process_input(input, tables)).collect()
}

fn print_diagnostics(report: &PageReport) {
    for entry in &report.log {
        println!(
            "{}: {} [{}] {}",
            report.file.blue().bold(),
            entry.kind.to_string().yellow(),
            entry.path,
            entry.line.lines().next().unwrap_or("")
        );
    }
    if !report.safe {
        println!(
            "{}: {} ends inside unclosed markup and was left unchanged",
            report.file.blue().bold(),
            "unsafe".red().bold()
        );
    }
    if !report.converged {
        println!(
            "{}: {} normalization did not settle",
            report.file.blue().bold(),
            "warning".yellow().bold()
        );
    }
}

/// Run the check/fmt command.
pub fn run_check(args: &CheckArgs, config_path: Option<&str>, no_config: bool) {
    let inputs = match read_inputs(&args.paths, args.title.as_deref()) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            exit::tool_error();
        }
    };
    let tables = load_tables_with_cli_error_handling(config_path, no_config, discovery_dir(&args.paths));

    let reports = process_all(&inputs, &tables);
    log::debug!("processed {} pages", reports.len());

    if args.fix_mode == FixMode::Format && !args.check {
        write_output(args, &reports);
    }

    if args.output_format == OutputFormat::Json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("{}: {}", "Error".red().bold(), e);
                exit::tool_error();
            }
        }
    } else if !writes_page_to_stdout(args, &reports) {
        print_text_report(args, &reports);
    }

    let changed = reports.iter().filter(|report| report.changed).count();
    let should_fail = match args.fix_mode {
        FixMode::Check => reports.iter().any(PageReport::has_findings),
        FixMode::Format => args.check && changed > 0,
    };
    if should_fail {
        exit::violations_found();
    }
}

/// `fmt` on stdin prints the page instead of a report
fn writes_page_to_stdout(args: &CheckArgs, reports: &[PageReport]) -> bool {
    args.fix_mode == FixMode::Format && !args.check && reports.iter().any(PageReport::is_stdin)
}

fn write_output(args: &CheckArgs, reports: &[PageReport]) {
    for report in reports {
        if report.is_stdin() {
            if args.output_format == OutputFormat::Text {
                print!("{}", report.text);
            }
            continue;
        }
        if !report.changed {
            continue;
        }
        if let Err(e) = std::fs::write(&report.file, &report.text) {
            eprintln!("{}: Failed to write {}: {}", "Error".red().bold(), report.file, e);
            exit::tool_error();
        }
    }
}

fn print_text_report(args: &CheckArgs, reports: &[PageReport]) {
    for report in reports {
        print_diagnostics(report);
        if args.quiet || !report.changed {
            continue;
        }
        let verb = match (args.fix_mode, args.check) {
            (FixMode::Format, false) => "Formatted",
            _ => "Would reformat",
        };
        println!("{} {}: {}", verb.green(), report.file.blue().bold(), report.changes.summary());
    }

    if args.quiet {
        return;
    }
    let changed = reports.iter().filter(|report| report.changed).count();
    let noun = if reports.len() == 1 { "page" } else { "pages" };
    if changed == 0 {
        println!("{} {} {noun}, no changes needed", "Checked".green(), reports.len());
    } else {
        println!(
            "{} {} {noun}, {} {}",
            "Checked".green(),
            reports.len(),
            changed,
            if args.fix_mode == FixMode::Format && !args.check {
                "formatted"
            } else {
                "would be reformatted"
            }
        );
    }
}
