use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, TaggerError};

pub const COLUMN_CHOICES: [usize; 7] = [1, 2, 3, 4, 5, 6, 8];
const DEFAULT_COLUMNS: usize = 4;
const DEFAULT_THUMBNAIL_SIZE: u32 = 200;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub last_folder: Option<PathBuf>,
    pub columns: usize,
    pub thumbnail_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_folder: None,
            columns: DEFAULT_COLUMNS,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        }
    }
}

impl Settings {
    /// `<config dir>/dataset-tagger/settings.json`
    pub fn path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or(TaggerError::NoConfigDir)?;
        path.push("dataset-tagger");
        path.push("settings.json");
        Ok(path)
    }

    /// Loads the user's settings, falling back to defaults on any problem.
    pub fn load() -> Self {
        match Self::path().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("Using default settings: {}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings at {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| TaggerError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings.sanitized())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |source| TaggerError::SettingsIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_err)
    }

    /// The folder to reopen on start, if it still exists.
    pub fn restorable_folder(&self) -> Option<&Path> {
        self.last_folder.as_deref().filter(|folder| folder.is_dir())
    }

    fn sanitized(mut self) -> Self {
        if !COLUMN_CHOICES.contains(&self.columns) {
            self.columns = DEFAULT_COLUMNS;
        }
        self.thumbnail_size = self.thumbnail_size.clamp(64, 512);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().expect("tempdir");
        let settings = Settings::load_from(&dir.path().join("settings.json")).expect("load");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.columns, 4);
    }

    #[test]
    fn save_and_load_preserve_values() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            last_folder: Some(dir.path().to_path_buf()),
            columns: 6,
            thumbnail_size: 256,
        };
        settings.save_to(&path).expect("save");
        let loaded = Settings::load_from(&path).expect("load");
        assert_eq!(loaded, settings);
        assert_eq!(loaded.restorable_folder(), Some(dir.path()));
    }

    #[test]
    fn partial_file_fills_in_defaults_and_clamps() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "columns": 7, "thumbnail_size": 4096 }"#).expect("write");
        let loaded = Settings::load_from(&path).expect("load");
        assert_eq!(loaded.columns, 4);
        assert_eq!(loaded.thumbnail_size, 512);
        assert_eq!(loaded.last_folder, None);
    }

    #[test]
    fn garbage_is_a_format_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").expect("write");
        assert!(matches!(
            Settings::load_from(&path),
            Err(TaggerError::SettingsFormat(_))
        ));
    }

    #[test]
    fn vanished_folder_is_not_restored() {
        let settings = Settings {
            last_folder: Some(PathBuf::from("/definitely/not/here")),
            ..Settings::default()
        };
        assert_eq!(settings.restorable_folder(), None);
    }
}
