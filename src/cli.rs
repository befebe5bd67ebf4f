use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::filter::{AssessmentBand, RelatedKind, TransportKind};
use crate::core::schema::CategoricalField;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
}

#[derive(Parser)]
#[command(name = "schoolscout")]
#[command(
    about = "A fast CLI for filtering Hong Kong primary-school records and cross-referenced articles"
)]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress notices and non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter the school table by multi-criteria selection
    Filter(FilterArgs),

    /// Show one school's detail view with related articles
    Show(ShowArgs),

    /// List distinct values of a categorical column
    Values(ValuesArgs),

    /// Initialize a schoolscout.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Parser, Debug)]
pub struct FilterArgs {
    /// School table CSV (defaults to the configured path)
    #[arg(long)]
    pub schools: Option<Utf8PathBuf>,

    /// Article table CSV (defaults to the configured path)
    #[arg(long)]
    pub articles: Option<Utf8PathBuf>,

    /// Case-insensitive substring to match in school names
    #[arg(long)]
    pub name: Option<String>,

    /// Keep only these regions (repeatable; empty = all)
    #[arg(long = "region", value_name = "VALUE")]
    pub regions: Vec<String>,

    /// Keep only these funding types (repeatable)
    #[arg(long = "funding", value_name = "VALUE")]
    pub funding_types: Vec<String>,

    /// Keep only these session types (repeatable)
    #[arg(long = "session", value_name = "VALUE")]
    pub session_types: Vec<String>,

    /// Keep only these student genders (repeatable)
    #[arg(long = "gender", value_name = "VALUE")]
    pub genders: Vec<String>,

    /// Keep only these religions (repeatable)
    #[arg(long = "religion", value_name = "VALUE")]
    pub religions: Vec<String>,

    /// Keep only these teaching languages (repeatable)
    #[arg(long = "language", value_name = "VALUE")]
    pub teaching_languages: Vec<String>,

    /// Keep only these school-net codes (repeatable)
    #[arg(long = "net", value_name = "CODE")]
    pub nets: Vec<String>,

    /// Require at least one of these related-secondary kinds (repeatable)
    #[arg(long = "related", value_enum)]
    pub related: Vec<RelatedKind>,

    /// Require at least one of these transport options (repeatable)
    #[arg(long = "transport", value_enum)]
    pub transport: Vec<TransportKind>,

    /// Band for Primary 1 test count per year
    #[arg(long, value_enum, default_value = "any")]
    pub g1_tests: AssessmentBand,

    /// Band for Primary 1 exam count per year
    #[arg(long, value_enum, default_value = "any")]
    pub g1_exams: AssessmentBand,

    /// Band for Primary 2-6 test count per year
    #[arg(long, value_enum, default_value = "any")]
    pub g26_tests: AssessmentBand,

    /// Band for Primary 2-6 exam count per year
    #[arg(long, value_enum, default_value = "any")]
    pub g26_exams: AssessmentBand,

    /// Require diverse learning assessment
    #[arg(long)]
    pub diverse_assessment: bool,

    /// Require a tutorial session
    #[arg(long)]
    pub tutorial: bool,

    /// Minimum percentage of teachers with a master's degree or above
    /// (0 = no constraint)
    #[arg(long, value_name = "PCT", default_value_t = 0.0)]
    pub min_masters: f64,

    /// Minimum percentage of teachers with 10+ years of seniority
    #[arg(long, value_name = "PCT", default_value_t = 0.0)]
    pub min_seniority: f64,

    /// Minimum percentage of teachers with special-education training
    #[arg(long, value_name = "PCT", default_value_t = 0.0)]
    pub min_sen_training: f64,

    /// Output format
    #[arg(long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Write the rendered output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,

    /// Copy the rendered output to the clipboard
    #[arg(long)]
    pub clipboard: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// School name (multiple words are joined with single spaces)
    #[arg(value_name = "NAME", required = true)]
    pub name: Vec<String>,

    /// School table CSV (defaults to the configured path)
    #[arg(long)]
    pub schools: Option<Utf8PathBuf>,

    /// Article table CSV (defaults to the configured path)
    #[arg(long)]
    pub articles: Option<Utf8PathBuf>,

    /// Emit JSON output (single-line)
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ValuesArgs {
    /// Categorical column to enumerate
    #[arg(value_enum)]
    pub field: CategoricalField,

    /// School table CSV (defaults to the configured path)
    #[arg(long)]
    pub schools: Option<Utf8PathBuf>,

    /// Article table CSV (defaults to the configured path)
    #[arg(long)]
    pub articles: Option<Utf8PathBuf>,

    /// Emit JSON output (single-line)
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
