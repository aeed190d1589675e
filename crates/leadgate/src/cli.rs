//! Clap derive structures for the `leadgate` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.
//! Only clap and clap_complete are used here so build.rs can include it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// leadgate -- check lead-capture submissions against existing records
#[derive(Debug, Parser)]
#[command(
    name = "leadgate",
    version,
    about = "Check demo bookings, course enrollments and contact inquiries before they are stored",
    long_about = "Runs form submissions through the booking and enrollment guard.\n\n\
        Submissions and existing records are JSON files. A rejected submission\n\
        prints its reason and exits with status 6.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "LEADGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "LEADGATE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Evaluate as if today were this date (YYYY-MM-DD, UTC)
    #[arg(long, env = "LEADGATE_TODAY", global = true, value_name = "DATE")]
    pub today: Option<String>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Demo bookings
    #[command(alias = "b")]
    Booking(BookingArgs),

    /// Course enrollments
    #[command(alias = "enrollment", alias = "e")]
    Enroll(EnrollArgs),

    /// Contact inquiries
    #[command(alias = "contact")]
    Inquiry(InquiryArgs),

    /// Custom project requests
    #[command(alias = "pitch")]
    Project(ProjectArgs),

    /// Quote the payable total for a course price
    Price(PriceArgs),

    /// List bookable time slots, optionally with remaining capacity
    Slots(SlotsArgs),

    /// Clean a JSON document of invalid UTF-8 and control characters
    Sanitize(SanitizeArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Submission checks ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Submission JSON file
    #[arg(long, short = 's', value_name = "FILE")]
    pub submission: PathBuf,

    /// Existing records JSON file (courses, bookings, enrollments, inquiries, projects)
    #[arg(long, short = 'r', value_name = "FILE")]
    pub records: Option<PathBuf>,

    /// On acceptance, store the record and write the records file back
    #[arg(long, requires = "records")]
    pub save: bool,
}

#[derive(Debug, Args)]
pub struct BookingArgs {
    #[command(subcommand)]
    pub command: BookingCommand,
}

#[derive(Debug, Subcommand)]
pub enum BookingCommand {
    /// Decide whether a demo booking may be accepted
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct EnrollArgs {
    #[command(subcommand)]
    pub command: EnrollCommand,
}

#[derive(Debug, Subcommand)]
pub enum EnrollCommand {
    /// Decide whether a course enrollment may be accepted, with pricing
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct InquiryArgs {
    #[command(subcommand)]
    pub command: InquiryCommand,
}

#[derive(Debug, Subcommand)]
pub enum InquiryCommand {
    /// Classify a contact inquiry (honeypot, session spam window, keywords)
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Decide whether a project request may be accepted
    Check(CheckArgs),
}

// ── Price ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PriceArgs {
    /// Course price, e.g. 199.00
    #[arg(long)]
    pub price: String,

    /// Platform fee (overrides config)
    #[arg(long)]
    pub fee: Option<String>,

    /// Tax rate as a fraction, e.g. 0.10 (overrides config)
    #[arg(long)]
    pub tax_rate: Option<String>,
}

// ── Slots ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SlotsArgs {
    /// Show occupancy for this date (YYYY-MM-DD)
    #[arg(long, requires = "records")]
    pub date: Option<String>,

    /// Existing records JSON file
    #[arg(long, short = 'r', value_name = "FILE")]
    pub records: Option<PathBuf>,
}

// ── Sanitize ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SanitizeArgs {
    /// Input file (read as raw bytes)
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: PathBuf,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (file + environment)
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
