mod cli_types;
pub use cli_types::{CheckArgs, FixMode, InspectArgs, OutputFormat};

mod cli_utils;
mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use wiktparse_lib::exit_codes::exit;

#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control colored output
    #[arg(long, global = true, default_value_t, value_enum)]
    color: Color,

    /// Path to configuration file
    #[arg(long, global = true, conflicts_with = "no_config")]
    config: Option<String>,

    /// Ignore all configuration files and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    /// Log what the parser does (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Report pages that need normalization and anomalies found while parsing
    Check(CheckArgs),
    /// Rewrite pages in normalized form
    Fmt(CheckArgs),
    /// Show the section tree of a page
    Sections(InspectArgs),
    /// Show the classified definition lists of a page
    Senses(InspectArgs),
}

#[derive(Clone, Default, ValueEnum)]
enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG still applies; -v only raises the floor
    let mut logger = env_logger::Builder::from_default_env();
    logger.format_timestamp(None).format_target(false);
    match cli.verbose {
        0 => {}
        1 => {
            logger.filter_level(LevelFilter::Debug);
        }
        _ => {
            logger.filter_level(LevelFilter::Trace);
        }
    }
    logger.init();

    match cli.color {
        Color::Always => colored::control::set_override(true),
        Color::Never => colored::control::set_override(false),
        Color::Auto => colored::control::unset_override(),
    }

    let config_path = if cli.no_config { None } else { cli.config.as_deref() };

    let result = std::panic::catch_unwind(|| match &cli.command {
        Commands::Check(args) => {
            let args = CheckArgs {
                fix_mode: FixMode::Check,
                ..args.clone()
            };
            commands::check::run_check(&args, config_path, cli.no_config);
        }
        Commands::Fmt(args) => {
            let args = CheckArgs {
                fix_mode: FixMode::Format,
                ..args.clone()
            };
            commands::check::run_check(&args, config_path, cli.no_config);
        }
        Commands::Sections(args) => commands::inspect::handle_sections(args, config_path, cli.no_config),
        Commands::Senses(args) => commands::inspect::handle_senses(args, config_path, cli.no_config),
    });
    if let Err(e) = result {
        eprintln!("[wiktparse panic handler] Uncaught panic: {e:?}");
        exit::tool_error();
    }
}
