//! Clap derive structures for the `vigil` CLI.
//!
//! Defines the complete command tree, global flags, and shared value enums.
//! This file must only depend on clap + clap_complete so build.rs can
//! compile it standalone for man-page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vigil -- operator console for AI video-monitoring alerts
#[derive(Debug, Parser)]
#[command(
    name = "vigil",
    version,
    about = "Triage AI video-monitoring alerts from the command line",
    long_about = "An operator console for AI video surveillance services.\n\n\
        Streams detected alerts live, ranks them for attention, and drives\n\
        the review lifecycle (confirm / dismiss / detailed review) along\n\
        with footage Q&A search, analytics, and monitoring control.",
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
    /// Service profile to use
    #[arg(long, short = 'p', env = "VIGIL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service base URL (overrides profile)
    #[arg(long, short = 's', env = "VIGIL_SERVER", global = true)]
    pub server: Option<String>,

    /// Path to an alternate config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Output format (defaults to the config's `defaults.output`)
    #[arg(long, short = 'o', env = "VIGIL_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (defaults to the profile's timeout)
    #[arg(long, env = "VIGIL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// Output format after config-default resolution.
    pub fn output(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    /// Color mode after config-default resolution.
    pub fn color(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Filter Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    Low,
    Med,
    High,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Confirmed,
    Dismissed,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and stream detected alerts
    #[command(alias = "a")]
    Alerts(AlertsArgs),

    /// Confirm, dismiss, or review an alert
    #[command(alias = "r")]
    Review(ReviewArgs),

    /// Search footage events and context (Q&A with --ask)
    Search(SearchArgs),

    /// Detection accuracy and per-type statistics
    Analytics(AnalyticsArgs),

    /// Inspect uploaded videos and processing progress
    #[command(alias = "vid")]
    Videos(VideosArgs),

    /// Control the monitoring pipeline
    #[command(alias = "mon")]
    Monitor(MonitorArgs),

    /// Upload a video for analysis
    Upload(UploadArgs),

    /// List monitoring presets
    UseCases,

    /// Check service liveness
    Health,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Alerts ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alerts in priority order
    #[command(alias = "ls")]
    List {
        /// Only this severity
        #[arg(long)]
        severity: Option<SeverityArg>,

        /// Only this review status
        #[arg(long)]
        status: Option<StatusArg>,

        /// Scope to one video session
        #[arg(long)]
        video: Option<String>,

        /// Max alerts to fetch from the service
        #[arg(long, short = 'l')]
        limit: Option<u32>,
    },

    /// Stream alerts live for a video session
    Watch {
        /// Video session id to watch
        video_id: String,
    },
}

// ── Review ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReviewArgs {
    #[command(subcommand)]
    pub command: ReviewCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReviewCommand {
    /// Confirm an alert as a genuine detection
    Confirm {
        /// Alert id
        id: String,
    },

    /// Dismiss an alert as a false positive
    Dismiss {
        /// Alert id
        id: String,
    },

    /// Submit a detailed review verdict
    Submit {
        /// Alert id
        id: String,

        /// The detection was correct (maps to confirmed)
        #[arg(long, conflicts_with = "incorrect")]
        correct: bool,

        /// The detection was wrong (maps to dismissed)
        #[arg(long)]
        incorrect: bool,

        /// Corrected severity
        #[arg(long)]
        severity: Option<SeverityArg>,

        /// Reviewer notes
        #[arg(long)]
        notes: Option<String>,
    },
}

// ── Search ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search query (free text)
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Q&A mode: answer a question about the footage
    #[arg(long)]
    pub ask: bool,

    /// Scope to one video session
    #[arg(long)]
    pub video: Option<String>,

    /// Max results
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

// ── Analytics ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Scope to one video session
    #[arg(long)]
    pub video: Option<String>,
}

// ── Videos ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VideosArgs {
    #[command(subcommand)]
    pub command: VideosCommand,
}

#[derive(Debug, Subcommand)]
pub enum VideosCommand {
    /// Show video session detail
    Show {
        /// Video session id
        id: String,
    },

    /// Show processing progress for a video
    Processing {
        /// Video session id
        id: String,
    },
}

// ── Monitor ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MonitorArgs {
    #[command(subcommand)]
    pub command: MonitorCommand,
}

#[derive(Debug, Subcommand)]
pub enum MonitorCommand {
    /// Start analysis for an uploaded video
    Start {
        /// Video session id
        video_id: String,

        /// Monitoring preset key (see `vigil use-cases`)
        #[arg(long)]
        use_case: Option<String>,

        /// Chunk duration in seconds
        #[arg(long)]
        chunk_seconds: Option<u32>,
    },

    /// Stop analysis for a video
    Stop {
        /// Video session id
        video_id: String,
    },

    /// Show pipeline queue and active jobs
    Status,
}

// ── Upload ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Path to the video file
    pub path: PathBuf,

    /// Monitoring preset key (see `vigil use-cases`)
    #[arg(long)]
    pub use_case: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the resolved configuration
    Show,

    /// Set a profile key (server, api_key, api_key_env, ca_cert,
    /// insecure, timeout, fetch_limit)
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
