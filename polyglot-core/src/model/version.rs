use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A `major.minor.patch` game version.
///
/// Parsing never fails: missing components default to 0 and components
/// that are not numbers parse as 0 (`"42.x"` is `42.0.0`). Ordering,
/// equality and hashing look at the numeric triple only, so `"42"` and
/// `"42.0.0"` are the same version.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    major: u32,
    minor: u32,
    patch: u32,
    original: String,
}

impl SemanticVersion {
    pub fn parse(version: &str) -> Self {
        let mut parts = version.split('.');
        let mut next = || parts.next().map(parse_component).unwrap_or(0);

        let major = next();
        let minor = next();
        let patch = next();

        Self {
            major,
            minor,
            patch,
            original: version.to_string(),
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    /// The string this version was parsed from.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// `major.minor.patch` with every component spelled out.
    pub fn canonical(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }

    fn triple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }
}

fn parse_component(s: &str) -> u32 {
    s.parse().unwrap_or(0)
}

impl From<&str> for SemanticVersion {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for SemanticVersion {}

impl Hash for SemanticVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.triple().hash(state);
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn missing_components_default_to_zero() {
        let v = SemanticVersion::parse("42");
        assert_eq!((v.major(), v.minor(), v.patch()), (42, 0, 0));
        assert_eq!(v.original(), "42");
        assert_eq!(v.canonical(), "42.0.0");
    }

    #[test]
    fn non_numeric_components_parse_as_zero() {
        let v = SemanticVersion::parse("42.x");
        assert_eq!((v.major(), v.minor(), v.patch()), (42, 0, 0));

        let v = SemanticVersion::parse("beta.3.rc");
        assert_eq!((v.major(), v.minor(), v.patch()), (0, 3, 0));

        let v = SemanticVersion::parse("");
        assert_eq!((v.major(), v.minor(), v.patch()), (0, 0, 0));
    }

    #[test]
    fn ordering_matches_numeric_tuples() {
        let cases = [
            ("41", "42", Ordering::Less),
            ("42.10", "42.9", Ordering::Greater),
            ("42.3.1", "42.3", Ordering::Greater),
            ("1.2.3", "1.2.3", Ordering::Equal),
            ("9.9.9", "10", Ordering::Less),
        ];
        for (a, b, expected) in cases {
            assert_eq!(
                SemanticVersion::parse(a).cmp(&SemanticVersion::parse(b)),
                expected,
                "{a} vs {b}"
            );
        }
    }

    #[test]
    fn equality_and_hash_ignore_formatting() {
        let a = SemanticVersion::parse("42");
        let b = SemanticVersion::parse("42.0.0");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn display_keeps_original_text() {
        assert_eq!(SemanticVersion::parse("42.3").to_string(), "42.3");
    }
}
