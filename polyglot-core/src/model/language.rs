use serde::Serialize;

use super::charset::Charset;
use super::version::SemanticVersion;
use super::version_map::VersionedValueMap;

/// A translation language and the charsets its files use per game version.
#[derive(Debug, Clone)]
pub struct Language {
    code: String,
    display_name: String,
    charsets: VersionedValueMap<Charset>,
}

impl Language {
    /// Creates a language with UTF-8 bound at version `0`, the fallback every
    /// language ends its charset list with.
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        let mut charsets = VersionedValueMap::new();
        charsets.put(SemanticVersion::parse("0"), Charset::utf8());
        Self {
            code: code.into(),
            display_name: display_name.into(),
            charsets,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_charset(&mut self, version: SemanticVersion, charset: Charset) {
        self.charsets.put(version, charset);
    }

    /// The charset bound to exactly `version`.
    pub fn charset(&self, version: &SemanticVersion) -> Option<Charset> {
        self.charsets.get(version).copied()
    }

    /// Charsets to try, in order, when reading a file of `version`.
    pub fn charsets_down_from(&self, version: &SemanticVersion) -> Vec<Charset> {
        self.charsets.get_down_from(version)
    }

    pub fn charsets(&self) -> &VersionedValueMap<Charset> {
        &self.charsets
    }

    pub fn summary(&self) -> LanguageSummary {
        LanguageSummary {
            code: self.code.clone(),
            display_name: self.display_name.clone(),
            charsets: self
                .charsets
                .iter()
                .map(|(v, c)| (v.original().to_string(), c.name().to_string()))
                .collect(),
        }
    }
}

/// Serializable view of a [`Language`] for the host.
#[derive(Debug, Serialize)]
pub struct LanguageSummary {
    pub code: String,
    pub display_name: String,
    pub charsets: Vec<(String, String)>,
}
