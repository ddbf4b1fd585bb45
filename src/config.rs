use crate::error::{Result, TestRankError};
use crate::types::config::ScoringConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "testrank.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".testrank/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/testrank/config.toml";

/// Loads the scoring config for `root`, merging global, repo and local files
/// in that order. `explicit` replaces the repo file and must exist.
///
/// Returns `None` when no layer exists at all; callers fall back to
/// [`ScoringConfig::builtin`].
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<Option<ScoringConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, explicit, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    explicit: Option<&Path>,
    global_path: Option<&Path>,
) -> Result<Option<ScoringConfig>> {
    let repo_path = match explicit {
        Some(path) if !path.exists() => {
            return Err(TestRankError::PathNotFound(path.display().to_string()));
        }
        Some(path) => path.to_path_buf(),
        None => root.join(DEFAULT_CONFIG_FILE),
    };

    let mut merged = Value::Table(Map::new());
    let mut found = false;
    let local_path = root.join(DEFAULT_LOCAL_FILE);
    let layers = [global_path, Some(repo_path.as_path()), Some(local_path.as_path())];
    for path in layers.into_iter().flatten() {
        found |= merge_file_if_exists(&mut merged, path)?;
    }
    if !found {
        return Ok(None);
    }

    let cfg: ScoringConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| TestRankError::ConfigParse(e.to_string()))?;
    Ok(Some(cfg))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    debug!(path = %path.display(), "merged config file");
    Ok(true)
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| TestRankError::ConfigParse(format!("{}: {}", path.display(), e)))
}

/// Tables merge key by key; any other value, arrays included, is replaced.
fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
