//! scriptaudit configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::persistence::{FileStorage, Persistence, DEFAULT_STORAGE_KEY};
use crate::rubric::Rubric;

/// Name of the config file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "scriptaudit.toml";

/// Where drafts and exports live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Directory holding the draft file.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Key of the draft; the file is `<storage_dir>/<storage_key>.json`.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Directory exports are written to.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".scriptaudit")
}
fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            storage_key: default_storage_key(),
            export_dir: default_export_dir(),
        }
    }
}

impl AuditConfig {
    /// Draft persistence backed by files in `storage_dir`.
    pub fn persistence(&self, rubric: Rubric) -> Persistence<FileStorage> {
        Persistence::with_key(
            FileStorage::new(&self.storage_dir),
            rubric,
            self.storage_key.clone(),
        )
    }

    /// Path of the draft file.
    pub fn draft_path(&self) -> PathBuf {
        FileStorage::new(&self.storage_dir).path_for(&self.storage_key)
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `scriptaudit.toml` in the current directory
/// 2. `~/.config/scriptaudit/config.toml`
///
/// Environment variable overrides: `SCRIPTAUDIT_STORAGE_DIR`, `SCRIPTAUDIT_EXPORT_DIR`.
pub fn load_config() -> Result<AuditConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AuditConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("fichier de configuration introuvable: {}", p.display());
        }
    } else {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("lecture de la configuration impossible: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("configuration invalide: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "config loaded");
            config
        }
        None => AuditConfig::default(),
    };

    if let Ok(dir) = std::env::var("SCRIPTAUDIT_STORAGE_DIR") {
        config.storage_dir = PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("SCRIPTAUDIT_EXPORT_DIR") {
        config.export_dir = PathBuf::from(dir);
    }

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<AuditConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("scriptaudit"))
}
