use std::{env, io, path::PathBuf};

use directories::ProjectDirs;

const PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");
const ASSET_DIR_ENV: &str = "AGENT_ASSET_DIR";
const STORE_FILE: &str = "agent-store.sqlite";

/// Resolve the directory that holds the local store and config files.
///
/// `AGENT_ASSET_DIR` wins; debug builds fall back to `dev_assets/` at the
/// workspace root, release builds to the platform data directory.
pub fn asset_dir() -> PathBuf {
    if let Ok(custom_dir) = env::var(ASSET_DIR_ENV) {
        if !custom_dir.trim().is_empty() {
            return PathBuf::from(custom_dir);
        }
    }

    if cfg!(debug_assertions) {
        return PathBuf::from(PROJECT_ROOT).join("../../dev_assets");
    }

    ProjectDirs::from("ai", "logistics", "multi-domain-agent")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join("dev_assets"))
    // macOS → ~/Library/Application Support/multi-domain-agent
    // Linux → ~/.local/share/multi-domain-agent (respects XDG_DATA_HOME)
}

/// Like [`asset_dir`] but creates the directory when missing.
pub fn ensure_asset_dir() -> io::Result<PathBuf> {
    let path = asset_dir();
    if !path.exists() {
        std::fs::create_dir_all(&path)?;
        tracing::info!("Created asset directory: {}", path.display());
    }
    Ok(path)
}

pub fn store_path() -> PathBuf {
    asset_dir().join(STORE_FILE)
}

pub fn config_path() -> PathBuf {
    asset_dir().join("agent.toml")
}
