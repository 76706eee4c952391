// Subcommand handlers. Each one builds the run's snapshot from config and
// returns the rendered output; printing is left to the caller.

use std::time::Duration;

use anyhow::{Context, Result};
use ovrcast_baseball::ledger::{self, load_log};
use ovrcast_baseball::lookup::lookup_many;
use ovrcast_baseball::sources::{CsvMarketProvider, CsvStatsProvider, MarketProvider, NoMarket};
use ovrcast_baseball::{Eligibility, NameMatch, Snapshot};
use ovrcast_core::config::{self, Config, MarketSourceKind};
use ovrcast_market::ListingsClient;
use tracing::info;

use crate::cli::{Cli, Commands, LookupArgs, RankArgs, ReportArgs};
use crate::render;

/// Run a parsed command line and return what should go to stdout.
pub async fn run(cli: Cli) -> Result<String> {
    let config = config::load_config(cli.config_dir.as_deref()).context("failed to load configuration")?;
    info!(
        "config loaded: season {}, market source {:?}",
        config.season, config.market.source
    );

    let snapshot = load_snapshot(&config).await?;

    match cli.command {
        Commands::Lookup(args) => lookup(&snapshot, &args),
        Commands::Rank(args) => rank(&snapshot, &config, &args),
        Commands::Report(args) => report(&snapshot, &args),
    }
}

pub fn stats_provider(config: &Config) -> CsvStatsProvider {
    CsvStatsProvider {
        batting: config.resolve(&config.stats.batting),
        pitching: config.resolve(&config.stats.pitching),
    }
}

pub fn market_provider(config: &Config) -> Result<Box<dyn MarketProvider>> {
    let market = &config.market;
    let provider: Box<dyn MarketProvider> = match market.source {
        MarketSourceKind::Csv => {
            let path = market.path.as_deref().context("market.path is required for a csv source")?;
            Box::new(CsvMarketProvider {
                path: config.resolve(path),
            })
        }
        MarketSourceKind::Http => {
            let url = market.url.as_deref().context("market.url is required for an http source")?;
            let client = ListingsClient::new(url, market.max_pages, Duration::from_secs(market.timeout_secs))
                .context("failed to build listings client")?;
            Box::new(client)
        }
        MarketSourceKind::None => Box::new(NoMarket),
    };
    Ok(provider)
}

pub async fn load_snapshot(config: &Config) -> Result<Snapshot> {
    let stats = stats_provider(config);
    let market = market_provider(config)?;
    Snapshot::fetch(&stats, market.as_ref(), config.season)
        .await
        .context("failed to load season data")
}

/// Thresholds from config, overridden by flags. `--min-volume` sets both.
pub fn eligibility(config: &Config, args: &RankArgs) -> Eligibility {
    match args.min_volume {
        Some(volume) => Eligibility::uniform(volume),
        None => Eligibility {
            min_pa: args.min_pa.unwrap_or(config.ranking.min_pa),
            min_ip: args.min_ip.unwrap_or(config.ranking.min_ip),
        },
    }
}

fn lookup(snapshot: &Snapshot, args: &LookupArgs) -> Result<String> {
    let mode = if args.exact {
        NameMatch::Exact
    } else {
        NameMatch::CaseInsensitive
    };
    let outcomes = lookup_many(
        args.names.iter().map(String::as_str),
        snapshot.stats(),
        snapshot.market(),
        mode,
    );
    if args.json {
        Ok(render::to_json(&outcomes)?)
    } else {
        Ok(render::lookup_text(&outcomes))
    }
}

fn rank(snapshot: &Snapshot, config: &Config, args: &RankArgs) -> Result<String> {
    let eligibility = eligibility(config, args);
    let limit = args.limit.unwrap_or(config.ranking.limit);
    let entries = snapshot.rank(&eligibility, limit);
    if args.json {
        Ok(render::to_json(&entries)?)
    } else {
        Ok(render::ranking_text(&entries))
    }
}

fn report(snapshot: &Snapshot, args: &ReportArgs) -> Result<String> {
    let log = load_log(&args.log).with_context(|| format!("failed to read {}", args.log.display()))?;
    info!("loaded {} investment entries", log.len());
    let report = ledger::report(&log, snapshot);
    if args.json {
        Ok(render::to_json(&report)?)
    } else {
        Ok(render::report_text(&report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Fresh temp base dir per test, so parallel tests never share files.
    fn config(dir_name: &str) -> Config {
        let toml_text = "\
[season]
year = 2025
[stats]
batting = \"b.csv\"
pitching = \"p.csv\"
[market]
source = \"none\"
[ranking]
min_pa = 200
min_ip = 50.0
limit = 25
";
        let tmp = std::env::temp_dir().join(dir_name);
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(tmp.join("config")).unwrap();
        std::fs::write(tmp.join("config").join(config::CONFIG_FILE), toml_text).unwrap();
        config::load_config_from(&tmp).unwrap()
    }

    fn rank_args(argv: &[&str]) -> RankArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Rank(args) => args,
            other => panic!("expected rank, got {other:?}"),
        }
    }

    #[test]
    fn eligibility_defaults_from_config() {
        let e = eligibility(&config("ovrcast_app_eligibility_defaults"), &rank_args(&["ovrcast", "rank"]));
        assert_eq!(e, Eligibility { min_pa: 200.0, min_ip: 50.0 });
    }

    #[test]
    fn eligibility_flags_override() {
        let c = config("ovrcast_app_eligibility_flags");
        let e = eligibility(&c, &rank_args(&["ovrcast", "rank", "--min-ip", "100"]));
        assert_eq!(e, Eligibility { min_pa: 200.0, min_ip: 100.0 });

        let e = eligibility(
            &c,
            &rank_args(&["ovrcast", "rank", "--min-pa", "1", "--min-volume", "10"]),
        );
        assert_eq!(e, Eligibility::uniform(10.0));
    }

    #[test]
    fn stats_paths_resolve_against_base_dir() {
        let c = config("ovrcast_app_stats_paths");
        let provider = stats_provider(&c);
        assert_eq!(provider.batting, c.base_dir.join("b.csv"));
    }

    #[test]
    fn test_configs_do_not_share_a_dir() {
        let a = config("ovrcast_app_separate_a");
        let b = config("ovrcast_app_separate_b");
        assert_ne!(a.base_dir, b.base_dir);
        assert!(a.base_dir.join("config").join(config::CONFIG_FILE).exists());
    }

    #[test]
    fn lookup_requires_a_name() {
        assert!(Cli::try_parse_from(["ovrcast", "lookup"]).is_err());
    }
}
