//! On-disk key-value backend for settings.
//!
//! All keys live in one pretty-printed JSON object. Writes go to a temporary
//! file first and are renamed over the original.

use crate::error::CoreResult;
use crate::settings::KeyValueStore;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";
pub const LOG_FILE: &str = "flapattack.log";

/// Platform data directory for the game, created if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "flapattack").ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine data directory",
        )
    })?;
    let dir = dirs.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Full path for a file in the data directory.
pub fn data_path(filename: &str) -> io::Result<PathBuf> {
    Ok(data_dir()?.join(filename))
}

/// A JSON file holding string keys and values.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; a file that
    /// is not a JSON object of strings is treated as empty and replaced on the
    /// next write.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("{} is not a settings file ({}); starting empty", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    /// Open the default settings file in the data directory.
    pub fn open_default() -> CoreResult<Self> {
        Self::open(data_path(SETTINGS_FILE)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&self) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.commit()
    }

    fn remove(&mut self, key: &str) -> CoreResult<()> {
        if self.entries.remove(key).is_some() {
            self.commit()?;
        }
        Ok(())
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> CoreResult<()> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value.clone());
        }
        self.commit()
    }
}
