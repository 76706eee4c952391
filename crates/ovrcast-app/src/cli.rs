use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ovrcast",
    version,
    about = "Rate MLB The Show cards from season stats and price them at their quick-sell floor"
)]
pub struct Cli {
    /// Base directory holding `config/` and `defaults/`.
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rate one or more players by name.
    Lookup(LookupArgs),
    /// Leaderboard of eligible players by liquidation value.
    Rank(RankArgs),
    /// Price an investment log at current floor values.
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LookupArgs {
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Match names exactly instead of case-insensitively.
    #[arg(long, default_value_t = false)]
    pub exact: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    /// Batters must exceed this many plate appearances.
    #[arg(long)]
    pub min_pa: Option<f64>,

    /// Pitchers must exceed this many innings pitched.
    #[arg(long)]
    pub min_ip: Option<f64>,

    /// One threshold for both archetypes; overrides --min-pa and --min-ip.
    #[arg(long)]
    pub min_volume: Option<f64>,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// CSV with columns player,quantity,unit_cost,recorded_at.
    pub log: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
