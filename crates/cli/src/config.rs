//! `narrator.toml` discovery and loading.

use std::path::{Path, PathBuf};

use {
    anyhow::Context,
    narrator_voice::TtsConfig,
    serde::{Deserialize, Serialize},
    tracing::{debug, warn},
};

/// Config file name, looked up in `./` then the user config dir.
const CONFIG_FILENAME: &str = "narrator.toml";

/// Database file name inside the data dir.
const DATABASE_FILENAME: &str = "narrator.db";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    pub tts: TtsConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file holding the sealed key. Defaults to the user data dir.
    pub database_path: Option<PathBuf>,
}

impl NarratorConfig {
    /// Database location: `--data-dir`, then the config value, then the
    /// platform data dir.
    pub fn database_path(&self, data_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
        if let Some(dir) = data_dir {
            return Ok(dir.join(DATABASE_FILENAME));
        }
        if let Some(ref path) = self.storage.database_path {
            return Ok(path.clone());
        }
        default_data_dir()
            .map(|dir| dir.join(DATABASE_FILENAME))
            .context("no home directory to place the database in; pass --data-dir")
    }
}

/// Load config from `path`.
pub fn load_config(path: &Path) -> anyhow::Result<NarratorConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load the explicit `--config` file, or discover one.
///
/// An explicit path must load. A discovered file that fails to parse is
/// reported and defaults are used.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<NarratorConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return Ok(NarratorConfig::default());
    };

    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            Ok(NarratorConfig::default())
        },
    }
}

fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }

    project_dirs()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
        .filter(|p| p.exists())
}

fn default_data_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().to_path_buf())
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "narrator")
}
