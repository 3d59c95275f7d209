use clap::{Args, ValueEnum};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored when writing to a terminal
    #[default]
    Text,
    /// One JSON document on stdout
    Json,
}

/// Fix mode determines exit code behavior: Check exits 1 on findings, Format exits 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixMode {
    #[default]
    Check,
    Format,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Page files to process (use '-' for stdin)
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Page title; defaults to the file stem. Only valid with a single input
    #[arg(long)]
    pub title: Option<String>,

    /// Exit with code 1 if any page would be changed, without writing (fmt only)
    #[arg(long, help = "Exit with code 1 if any page would be changed (for CI)")]
    pub check: bool,

    /// Print diagnostics, but nothing else
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format for the report
    #[arg(long, short = 'o', default_value_t, value_enum)]
    pub output_format: OutputFormat,

    #[arg(skip)]
    pub fix_mode: FixMode,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Page file to inspect (use '-' for stdin)
    pub path: String,

    /// Page title; defaults to the file stem
    #[arg(long)]
    pub title: Option<String>,

    /// Only show sections with this title
    #[arg(long, short = 's')]
    pub section: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value_t, value_enum)]
    pub output_format: OutputFormat,
}
