use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::MarketConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "campustrade.toml",
    "campustrade.yaml",
    "campustrade.yml",
    "campustrade.json",
];

/// Load config from a specific path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<MarketConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./campustrade.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/campustrade/campustrade.{toml,yaml,yml,json}` (user-global)
///
/// Returns `MarketConfig::default()` when no file is found or the file fails
/// to parse; notification setup never blocks startup on config.
pub fn discover_and_load() -> MarketConfig {
    match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            match load_config(&path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                    MarketConfig::default()
                },
            }
        },
        None => {
            debug!("no config file found, using defaults");
            MarketConfig::default()
        },
    }
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<MarketConfig> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("toml")
        .to_ascii_lowercase();
    let cfg = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(raw)
            .map_err(|e| anyhow::anyhow!("invalid YAML in {}: {e}", path.display()))?,
        "json" => serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("invalid JSON in {}: {e}", path.display()))?,
        _ => toml::from_str(raw)
            .map_err(|e| anyhow::anyhow!("invalid TOML in {}: {e}", path.display()))?,
    };
    Ok(cfg)
}

/// First config file found in the standard locations.
fn find_config_file() -> Option<PathBuf> {
    let mut roots = vec![PathBuf::from(".")];
    if let Some(dirs) = directories::ProjectDirs::from("", "", "campustrade") {
        roots.push(dirs.config_dir().to_path_buf());
    }
    find_config_in(&roots)
}

/// First config file under the given roots.
///
/// Root order wins over filename order: every name is tried in an earlier
/// root before any name in a later one, so a project-local file always
/// shadows the user-global one.
fn find_config_in(roots: &[PathBuf]) -> Option<PathBuf> {
    for root in roots {
        for name in CONFIG_FILENAMES {
            let p = root.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }
    None
}
