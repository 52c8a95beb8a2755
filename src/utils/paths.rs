use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".budget_cadence";
const HOME_ENV: &str = "BUDGET_CADENCE_HOME";
const CONFIG_FILE: &str = "config.json";
const STORE_FILE: &str = "budgets.json";

/// Returns the application-specific data directory, defaulting to `~/.budget_cadence`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Uses `base` when provided, otherwise the default data directory.
pub fn resolve_base(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(app_data_dir)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn store_file_in(base: &Path) -> PathBuf {
    base.join(STORE_FILE)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling path used to stage atomic writes (`budgets.json` -> `budgets.json.tmp`).
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Stages `data` next to `path` and renames it into place.
pub fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
