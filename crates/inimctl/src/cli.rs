//! Clap derive structures for the `inimctl` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// inimctl -- control INIM alarm panels through INIM Cloud
#[derive(Debug, Parser)]
#[command(
    name = "inimctl",
    version,
    about = "Monitor and control INIM alarm panels via INIM Cloud",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "INIM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Panel id (optional when the account has a single panel)
    #[arg(long, short = 'd', env = "INIM_DEVICE", global = true)]
    pub device: Option<i64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "INIM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List panels on the account
    #[command(alias = "dev")]
    Devices,

    /// Show alarm state, areas and open zones of a panel
    #[command(alias = "st")]
    Status,

    /// List zones
    Zones(ListArgs),

    /// List areas
    Areas(ListArgs),

    /// List scenarios and the ones used for arm/disarm
    Scenarios,

    /// Arm using the configured or detected scenario
    Arm(ArmArgs),

    /// Disarm using the configured or detected scenario
    Disarm,

    /// Activate a scenario by id
    Scenario {
        /// Scenario id
        id: i64,
    },

    /// Bypass (exclude) a zone, or reinstate it
    Bypass {
        /// Zone id
        zone: i64,

        /// Reinstate the zone instead of bypassing it
        #[arg(long)]
        reinstate: bool,
    },

    /// Arm or disarm individual areas (needs a user code)
    Area(AreaArgs),

    /// Ask the panel to push fresh state to the cloud
    Poll,

    /// Poll continuously and print alarm events
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Include hidden zones and unconfigured areas
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct ArmArgs {
    #[arg(value_enum, default_value = "away")]
    pub mode: ArmMode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ArmMode {
    /// Total arm
    Away,
    /// Partial arm
    Home,
}

#[derive(Debug, Args)]
pub struct AreaArgs {
    #[command(subcommand)]
    pub command: AreaCommand,
}

#[derive(Debug, Subcommand)]
pub enum AreaCommand {
    /// Arm the given areas
    Arm {
        /// Area ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
    /// Disarm the given areas
    Disarm {
        /// Area ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Polling interval in seconds (overrides the profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,
    /// Show the current configuration (secrets redacted)
    Show,
    /// Print the config file path
    Path,
    /// Store the password or user code of a profile in the system keyring
    SetSecret {
        #[arg(value_enum)]
        kind: SecretArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SecretArg {
    Password,
    UserCode,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
