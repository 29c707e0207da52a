//! Finds every `media/lua/shared/Translate` folder under the configured roots.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::model::config::CoreConfig;
use crate::model::source::{
    Source, PRIORITY_GAME, PRIORITY_LOCAL, PRIORITY_STEAM, PRIORITY_WORKSHOP,
};
use crate::model::version::SemanticVersion;

const TRANSLATE_DIR: &str = "media/lua/shared/Translate";
const COMMON_DIR: &str = "common";
pub const GAME_SOURCE_NAME: &str = "Game Files";

fn version_dir_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(?:\.\d+)*$").expect("static regex"))
}

fn build42_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"/42(?:\.\d+)*/media/lua/shared/Translate$").expect("static regex")
    })
}

/// Immediate subdirectories, sorted by name. Unreadable folders yield none.
fn list_directories(path: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Skipping {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Translate folders inside one mod (or game) folder: the legacy layout,
/// the `common/` layout, then any version-named subfolder.
pub fn find_translation_paths(folder: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();

    let legacy = folder.join(TRANSLATE_DIR);
    if legacy.exists() {
        found.push(legacy);
    }

    let common = folder.join(COMMON_DIR).join(TRANSLATE_DIR);
    if common.exists() {
        found.push(common);
    }

    for sub in list_directories(folder) {
        let name = folder_name(&sub);
        if name == COMMON_DIR || !version_dir_re().is_match(&name) {
            continue;
        }
        let versioned = sub.join(TRANSLATE_DIR);
        if versioned.exists() {
            found.push(versioned);
        }
    }

    found
}

/// Game build a mod's Translate folder targets.
///
/// `common/` layouts and `42[.x...]` folders are build 42; everything else,
/// including version folders such as `43`, is treated as build 41.
pub fn classify_translation_path(path: &Path) -> SemanticVersion {
    let normalized = path.to_string_lossy().replace('\\', "/");

    if normalized.contains("/common/media/lua/shared/Translate") || build42_re().is_match(&normalized)
    {
        SemanticVersion::parse("42")
    } else {
        SemanticVersion::parse("41")
    }
}

/// Collects sources from one root category.
struct Collector {
    sources: Vec<Source>,
}

impl Collector {
    fn add_mod(&mut self, mod_folder: &Path, editable: bool, priority: u8) {
        let mod_name = folder_name(mod_folder);
        for path in find_translation_paths(mod_folder) {
            let version = classify_translation_path(&path);
            let name = format!("{} [{}]", mod_name, version.major());
            self.sources
                .push(Source::new(name, version, path, editable, priority));
        }
    }

    /// `<steam>/<itemId>/mods/<ModName>`
    fn steam_mods(&mut self, root: &Path, editable: bool) {
        for item in list_directories(root) {
            let mods = item.join("mods");
            if mods.is_dir() {
                for mod_folder in list_directories(&mods) {
                    self.add_mod(&mod_folder, editable, PRIORITY_STEAM);
                }
            }
        }
    }

    /// `<cache>/Workshop/<Project>/Contents/mods/<ModName>`
    fn workshop_mods(&mut self, root: &Path, editable: bool) {
        for project in list_directories(root) {
            let mods = project.join("Contents").join("mods");
            if mods.is_dir() {
                for mod_folder in list_directories(&mods) {
                    self.add_mod(&mod_folder, editable, PRIORITY_WORKSHOP);
                }
            }
        }
    }

    /// `<cache>/mods/<ModName>`
    fn local_mods(&mut self, root: &Path, editable: bool) {
        for mod_folder in list_directories(root) {
            self.add_mod(&mod_folder, editable, PRIORITY_LOCAL);
        }
    }

    /// The game install is always build 42, whatever its layout.
    fn game_files(&mut self, root: &Path, editable: bool) {
        for path in find_translation_paths(root) {
            self.sources.push(Source::new(
                GAME_SOURCE_NAME,
                SemanticVersion::parse("42"),
                path,
                editable,
                PRIORITY_GAME,
            ));
        }
    }
}

/// Scans every configured root. The result is ordered by ascending priority.
pub fn discover(config: &CoreConfig) -> Vec<Source> {
    let mut collector = Collector {
        sources: Vec::new(),
    };

    if let Some(root) = config.steam_mods_root() {
        collector.steam_mods(&root, config.steam_mods_path_editable);
    }
    if let Some(root) = config.workshop_root() {
        collector.workshop_mods(&root, config.cache_path_editable);
    }
    if let Some(root) = config.local_mods_root() {
        collector.local_mods(&root, config.cache_path_editable);
    }
    if let Some(root) = config.game_root() {
        collector.game_files(&root, config.game_path_editable);
    }

    let mut sources = collector.sources;
    sources.sort_by_key(|s| s.priority);
    tracing::info!("Parsed sources: {}", sources.len());
    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(p: &str) -> u32 {
        classify_translation_path(Path::new(p)).major()
    }

    #[test]
    fn plain_mod_layout_is_41() {
        for name in ["BetterInventory", "some-mod-name", "mod_with_underscores"] {
            assert_eq!(classify(&format!("C:/Mods/{name}/media/lua/shared/Translate")), 41);
        }
    }

    #[test]
    fn common_layout_is_always_42() {
        assert_eq!(classify("C:/SomeFolder/MyMod/common/media/lua/shared/Translate"), 42);
        assert_eq!(classify("/mods/41/MyMod/common/media/lua/shared/Translate"), 42);
        assert_eq!(classify(r"C:\Games\PZ\common\media\lua\shared\Translate"), 42);
    }

    #[test]
    fn version_42_folders_are_42() {
        for version in ["42", "42.0", "42.10", "42.0.1", "42.78.123"] {
            assert_eq!(classify(&format!("/Mods/MyMod/{version}/media/lua/shared/Translate")), 42);
        }
    }

    #[test]
    fn other_version_folders_fold_to_41() {
        for version in ["41", "41.78", "43", "420", "142"] {
            assert_eq!(classify(&format!("/Mods/MyMod/{version}/media/lua/shared/Translate")), 41);
        }
    }
}
