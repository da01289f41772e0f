//! CLI argument parsing for chairgame

use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use crate::config::GameConfig;

/// chairgame - musical chairs with threads
#[derive(Parser, Debug)]
#[command(name = "cg")]
#[command(author, version, about = "Musical chairs: threads racing for a shrinking pool of seats", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Number of players (at least 2)
    #[arg(short, long)]
    pub players: Option<usize>,

    /// Seed for the music stop times
    #[arg(long)]
    pub seed: Option<u64>,

    /// Shortest music stretch in milliseconds
    #[arg(long)]
    pub stop_min_ms: Option<u64>,

    /// Longest music stretch in milliseconds
    #[arg(long)]
    pub stop_max_ms: Option<u64>,

    /// Pause after each race before chairs are reclaimed, in milliseconds
    #[arg(long)]
    pub grace_ms: Option<u64>,

    /// Do not print progress lines
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Override file settings with the flags that were given
    pub fn apply_to(&self, game: &mut GameConfig) {
        debug!(cli = ?self, "Cli::apply_to: called");
        if let Some(players) = self.players {
            game.players = players;
        }
        if let Some(seed) = self.seed {
            game.seed = Some(seed);
        }
        if let Some(ms) = self.stop_min_ms {
            game.stop_min_ms = ms;
        }
        if let Some(ms) = self.stop_max_ms {
            game.stop_max_ms = ms;
        }
        if let Some(ms) = self.grace_ms {
            game.grace_ms = ms;
        }
        if self.quiet {
            game.echo = false;
        }
    }
}
