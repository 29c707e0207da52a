use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::version::SemanticVersion;

/// Load priority of the game's own translation folder.
pub const PRIORITY_GAME: u8 = 0;
pub const PRIORITY_WORKSHOP: u8 = 1;
pub const PRIORITY_LOCAL: u8 = 2;
pub const PRIORITY_STEAM: u8 = 3;

/// One discovered `Translate` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub name: String,
    pub version: SemanticVersion,
    pub root: PathBuf,
    pub editable: bool,
    /// Lower loads and displays first.
    pub priority: u8,
}

impl Source {
    pub fn new(
        name: impl Into<String>,
        version: SemanticVersion,
        root: impl Into<PathBuf>,
        editable: bool,
        priority: u8,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            root: root.into(),
            editable,
            priority,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.root.display())
    }
}
