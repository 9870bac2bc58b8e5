//! CLI definitions for arblog
//!
//! This module contains the clap CLI structure definitions, separated from
//! main.rs so the command tree can be inspected from tests.

use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

/// Version string including the git commit the binary was built from.
#[cfg(not(feature = "release"))]
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ")"
);

/// Version string for release builds.
#[cfg(feature = "release")]
pub const LONG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build clap styles.
///
/// - Green: headers, usage, command names
/// - White: descriptions, placeholders (renders as light gray on dark terminals)
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "arblog")]
#[command(about = "[ Arbitration Log ] - mission statistics from the Warframe client log")]
#[command(
    long_about = "Arbitration Log (arblog) - Extract Arbitration mission statistics from EE.log.

arblog reads the game client's log in a single streaming pass, splits it into
Arbitration missions and reports duration, enemy spawns and shield drone
counts for the most recent valid missions.

QUICK START:
    arblog parse                         Parse the default EE.log
    arblog parse ~/EE.log --count 5      Show the last five missions
    arblog parse EE.log --json           Machine-readable output
    arblog config show                   Show current settings"
)]
#[command(version = LONG_VERSION)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Enable debug logging on stderr (ARBLOG_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a client log and report recent Arbitration missions
    #[command(long_about = "Parse a client log and report recent Arbitration missions.

Without FILE the path comes from the config (log.path), then the game's
default location <local data dir>/Warframe/EE.log; if neither exists the
path is read from stdin.

Missions shorter than --min seconds are excluded unless still in progress.

EXAMPLES:
    arblog parse                          Parse the default log
    arblog parse EE.log --count 5         Last five valid missions
    arblog parse EE.log --min 120         Ignore missions under two minutes
    arblog parse EE.log --json --quiet    JSON without progress output")]
    Parse(ParseArgs),

    /// Configuration management
    #[command(
        subcommand,
        long_about = "View and edit the arblog configuration file.

Configuration is stored in ~/.config/arblog/config.toml and holds the parse
defaults (count, minimum duration, chunk size) and the log location.

EXAMPLES:
    arblog config show          Display current configuration
    arblog config edit          Open config in $EDITOR
    arblog config path          Print the config file location"
    )]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: CompletionShell,
    },
}

/// Arguments of `arblog parse`.
#[derive(Args, Debug, Clone, Default)]
pub struct ParseArgs {
    /// Path to EE.log
    pub file: Option<PathBuf>,

    /// Number of most recent valid missions to show
    #[arg(long, short)]
    pub count: Option<usize>,

    /// Minimum mission duration in seconds (must be positive)
    #[arg(long, short)]
    pub min: Option<f64>,

    /// Bytes read per chunk
    #[arg(long, hide = true)]
    pub chunk_bytes: Option<usize>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    Show,
    /// Open configuration file in your default editor
    #[command(long_about = "Open the configuration file in your default editor.

Uses the $EDITOR environment variable (defaults to 'vi').
Config file location: ~/.config/arblog/config.toml

EXAMPLE:
    arblog config edit
    EDITOR=nano arblog config edit")]
    Edit,
    /// Print the configuration file path
    Path,
}
