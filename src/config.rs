// Persistence of the last-used API key, domain and migration id.
//
// The file lives at `~/.outcomes-import.conf` unless overridden. The API key
// is only ever written back if the user already keeps one in the file, so a
// first run never leaves a secret on disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::json::null_as_default;

pub const CONFIG_FILE: &str = ".outcomes-import.conf";

/// Values remembered between runs. Missing or null fields read as
/// empty/zero.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    #[serde(deserialize_with = "null_as_default")]
    pub apikey: String,
    #[serde(deserialize_with = "null_as_default")]
    pub migration_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
}

/// Location of the config file in the user's home directory.
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(CONFIG_FILE))
}

/// Reads and writes a `Configuration` at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    /// Store backed by `default_path()`.
    pub fn from_home() -> Result<Self> {
        Ok(ConfigStore::new(default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored configuration. A missing file is `Ok(None)`; a file
    /// that is present but not valid JSON is an error.
    pub fn load(&self) -> Result<Option<Configuration>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };
        let cfg: Configuration = serde_json::from_str(&data)
            .with_context(|| format!("Config file json error in {}", self.path.display()))?;
        Ok(Some(cfg))
    }

    /// Overwrite the config file with `cfg`. The API key is blanked unless
    /// the file already existed with a non-empty key.
    pub fn save(&self, mut cfg: Configuration) -> Result<()> {
        let keep_key = self
            .load()?
            .map(|current| !current.apikey.is_empty())
            .unwrap_or(false);
        if !keep_key {
            cfg.apikey.clear();
        }

        let json = serde_json::to_string_pretty(&cfg).context("Failed to serialize config")?;
        write_private(&self.path, json.as_bytes())
            .with_context(|| format!("Error writing to {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "saved config");
        Ok(())
    }
}

/// Write `contents` so only the owner can read or write the file.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;

    // `mode` only applies on creation; tighten a pre-existing file too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
