// Configuration loading and parsing (config/ovrcast.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// File name of the main configuration file inside `config/`.
pub const CONFIG_FILE: &str = "ovrcast.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the relative data paths are resolved against.
    pub base_dir: PathBuf,
    pub season: u16,
    pub stats: StatsPaths,
    pub market: MarketConfig,
    pub ranking: RankingConfig,
}

impl Config {
    /// Resolve a configured path against the base directory. Absolute paths
    /// are returned unchanged.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }
}

// ---------------------------------------------------------------------------
// ovrcast.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire ovrcast.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    season: SeasonSection,
    stats: StatsPaths,
    market: MarketConfig,
    ranking: RankingConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct SeasonSection {
    year: u16,
}

/// Season statistics exports, one per archetype.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsPaths {
    pub batting: String,
    pub pitching: String,
}

/// Where marketplace listings come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSourceKind {
    /// A listings export on disk.
    Csv,
    /// The paged JSON listings API.
    Http,
    /// No marketplace data; every external floor is absent.
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    pub source: MarketSourceKind,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_pages() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

/// Batch ranking defaults. The eligibility thresholds are strict lower
/// bounds: a player must exceed them to be ranked.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    pub min_pa: f64,
    pub min_ip: f64,
    pub limit: usize,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/ovrcast.toml` relative to
/// `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        base_dir: base_dir.to_path_buf(),
        season: file.season.year,
        stats: file.stats,
        market: file.market,
        ranking: file.ranking,
    };

    validate(&config)?;
    debug!(path = %path.display(), "configuration loaded");

    Ok(config)
}

/// Seed `config/ovrcast.toml` from `defaults/ovrcast.toml` when it does not
/// exist yet. Returns the written path, or `None` when the user's file was
/// already there. An existing config file is never overwritten.
pub fn seed_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let default = base_dir.join("defaults").join(CONFIG_FILE);
    let copy_err = |what: &str, path: &Path, e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("{what} {}: {e}", path.display()),
    };

    let mut source = match std::fs::File::open(&default) {
        Ok(file) => file,
        Err(_) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "no config/{CONFIG_FILE} or defaults/{CONFIG_FILE} in {}; \
                     run from the project root or pass --config-dir",
                    base_dir.display()
                ),
            })
        }
    };

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| copy_err("failed to create", dir, e))?;
    }

    // create_new: a file that appears between the check and the open wins.
    let mut dest = match std::fs::OpenOptions::new().write(true).create_new(true).open(&target) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => return Err(copy_err("failed to create", &target, e)),
    };
    std::io::copy(&mut source, &mut dest).map_err(|e| copy_err("failed to write", &target, e))?;

    info!(path = %target.display(), "initialized config from defaults");
    Ok(Some(target))
}

/// Pick the base directory: an explicit one if given, otherwise the current
/// directory when it holds `config/` or `defaults/`, otherwise the platform
/// config directory.
pub fn locate_base_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if cwd.join("config").exists() || cwd.join("defaults").exists() {
        return Ok(cwd);
    }

    match directories::ProjectDirs::from("", "", "ovrcast") {
        Some(dirs) => Ok(dirs.config_dir().to_path_buf()),
        None => Ok(cwd),
    }
}

/// Locate the base directory, seed the config file if needed, then load.
pub fn load_config(explicit_dir: Option<&Path>) -> Result<Config, ConfigError> {
    let base = locate_base_dir(explicit_dir)?;
    seed_config_file(&base)?;
    load_config_from(&base)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.season == 0 {
        return Err(ConfigError::ValidationError {
            field: "season.year".into(),
            message: "must be greater than 0".into(),
        });
    }

    let stat_paths: &[(&str, &str)] = &[
        ("stats.batting", &config.stats.batting),
        ("stats.pitching", &config.stats.pitching),
    ];
    for (name, val) in stat_paths {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    let market = &config.market;
    match market.source {
        MarketSourceKind::Csv if market.path.as_deref().map_or(true, |p| p.trim().is_empty()) => {
            return Err(ConfigError::ValidationError {
                field: "market.path".into(),
                message: "required when market.source = \"csv\"".into(),
            });
        }
        MarketSourceKind::Http if market.url.as_deref().map_or(true, |u| u.trim().is_empty()) => {
            return Err(ConfigError::ValidationError {
                field: "market.url".into(),
                message: "required when market.source = \"http\"".into(),
            });
        }
        _ => {}
    }
    if market.max_pages == 0 {
        return Err(ConfigError::ValidationError {
            field: "market.max_pages".into(),
            message: "must be > 0".into(),
        });
    }

    let ranking = &config.ranking;
    let thresholds: &[(&str, f64)] = &[
        ("ranking.min_pa", ranking.min_pa),
        ("ranking.min_ip", ranking.min_ip),
    ];
    for (name, val) in thresholds {
        if !val.is_finite() || *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a non-negative number, got {val}"),
            });
        }
    }
    if ranking.limit == 0 {
        return Err(ConfigError::ValidationError {
            field: "ranking.limit".into(),
            message: "must be > 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
