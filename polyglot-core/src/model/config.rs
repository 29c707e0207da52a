use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn default_true() -> bool {
    true
}

/// Root folders and editability flags supplied by the host.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CoreConfig {
    #[serde(default, alias = "gamePath")]
    pub game_path: Option<PathBuf>,

    #[serde(default, alias = "steamModsPath")]
    pub steam_mods_path: Option<PathBuf>,

    /// Zomboid user cache; `Workshop/` and `mods/` live under it.
    #[serde(default, alias = "cachePath")]
    pub cache_path: Option<PathBuf>,

    #[serde(default, alias = "gamePathEditable")]
    pub game_path_editable: bool,

    #[serde(default, alias = "steamModsPathEditable")]
    pub steam_mods_path_editable: bool,

    #[serde(default = "default_true", alias = "cachePathEditable")]
    pub cache_path_editable: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            game_path: None,
            steam_mods_path: None,
            cache_path: None,
            game_path_editable: false,
            steam_mods_path_editable: false,
            cache_path_editable: true,
        }
    }
}

impl CoreConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&data).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn game_root(&self) -> Option<PathBuf> {
        existing_dir(self.game_path.clone())
    }

    pub fn steam_mods_root(&self) -> Option<PathBuf> {
        existing_dir(self.steam_mods_path.clone())
    }

    pub fn workshop_root(&self) -> Option<PathBuf> {
        existing_dir(self.cache_path.as_ref().map(|p| p.join("Workshop")))
    }

    pub fn local_mods_root(&self) -> Option<PathBuf> {
        existing_dir(self.cache_path.as_ref().map(|p| p.join("mods")))
    }
}

fn existing_dir(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty() && p.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_fields_missing() {
        let cfg: CoreConfig = serde_json::from_str("{}").unwrap();
        assert!(cfg.game_path.is_none());
        assert!(!cfg.game_path_editable);
        assert!(!cfg.steam_mods_path_editable);
        assert!(cfg.cache_path_editable);
    }

    #[test]
    fn accepts_camel_case_keys() {
        let cfg: CoreConfig = serde_json::from_str(
            r#"{ "gamePath": "/games/pz", "cachePathEditable": false }"#,
        )
        .unwrap();
        assert_eq!(cfg.game_path, Some(PathBuf::from("/games/pz")));
        assert!(!cfg.cache_path_editable);
    }

    #[test]
    fn missing_roots_are_skipped() {
        let cfg = CoreConfig {
            game_path: Some(PathBuf::from("/definitely/not/here")),
            ..CoreConfig::default()
        };
        assert!(cfg.game_root().is_none());
        assert!(cfg.workshop_root().is_none());
    }
}
