use std::collections::{BTreeMap, HashMap};

use super::version::SemanticVersion;

/// Values keyed by [`SemanticVersion`], ordered by version.
///
/// A second index keyed by the version's canonical string backs the
/// exact-match operations (`remove`, `contains_key`).
#[derive(Debug, Clone)]
pub struct VersionedValueMap<V> {
    by_version: BTreeMap<SemanticVersion, V>,
    by_key: HashMap<String, SemanticVersion>,
}

impl<V> Default for VersionedValueMap<V> {
    fn default() -> Self {
        Self {
            by_version: BTreeMap::new(),
            by_key: HashMap::new(),
        }
    }
}

impl<V> VersionedValueMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the value stored for `version`, returning the
    /// previous one.
    pub fn put(&mut self, version: SemanticVersion, value: V) -> Option<V> {
        let previous = self.by_version.remove(&version);
        self.by_key.insert(version.canonical(), version.clone());
        self.by_version.insert(version, value);
        previous
    }

    pub fn get(&self, version: &SemanticVersion) -> Option<&V> {
        self.by_version.get(version)
    }

    pub fn remove(&mut self, version: &SemanticVersion) -> Option<V> {
        let stored = self.by_key.remove(&version.canonical())?;
        self.by_version.remove(&stored)
    }

    pub fn contains_key(&self, version: &SemanticVersion) -> bool {
        self.by_key.contains_key(&version.canonical())
    }

    pub fn len(&self) -> usize {
        self.by_version.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_version.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_version.clear();
        self.by_key.clear();
    }

    /// Stored versions in ascending order.
    pub fn versions(&self) -> impl Iterator<Item = &SemanticVersion> {
        self.by_version.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SemanticVersion, &V)> {
        self.by_version.iter()
    }

    /// Highest stored entry at or below `version`.
    pub fn floor(&self, version: &SemanticVersion) -> Option<(&SemanticVersion, &V)> {
        self.by_version.range(..=version.clone()).next_back()
    }
}

impl<V: PartialEq + Clone> VersionedValueMap<V> {
    /// Values of every stored version `<= version`, highest version first.
    ///
    /// A value already emitted for a higher version is not repeated.
    pub fn get_down_from(&self, version: &SemanticVersion) -> Vec<V> {
        let mut out: Vec<V> = Vec::new();
        for value in self.by_version.range(..=version.clone()).rev().map(|(_, v)| v) {
            if !out.contains(value) {
                out.push(value.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> SemanticVersion {
        SemanticVersion::parse(s)
    }

    fn sample() -> VersionedValueMap<&'static str> {
        let mut map = VersionedValueMap::new();
        map.put(v("41"), "Value 41");
        map.put(v("42.9"), "Value 42.9");
        map.put(v("42.3"), "Value 42.3");
        map.put(v("40.1"), "Value 40.1");
        map.put(v("43.0"), "Value 43.0");
        map
    }

    #[test]
    fn exact_lookup_only() {
        let map = sample();
        assert_eq!(map.get(&v("42.3")), Some(&"Value 42.3"));
        assert_eq!(map.get(&v("41.0.0")), Some(&"Value 41"));
        assert_eq!(map.get(&v("42.5")), None);
    }

    #[test]
    fn down_from_between_versions() {
        assert_eq!(
            sample().get_down_from(&v("42.5")),
            vec!["Value 42.3", "Value 41", "Value 40.1"]
        );
    }

    #[test]
    fn down_from_above_and_below_everything() {
        let map = sample();
        assert_eq!(
            map.get_down_from(&v("50.0")),
            vec!["Value 43.0", "Value 42.9", "Value 42.3", "Value 41", "Value 40.1"]
        );
        assert!(map.get_down_from(&v("30.0")).is_empty());
    }

    #[test]
    fn down_from_is_inclusive() {
        assert_eq!(
            sample().get_down_from(&v("41")),
            vec!["Value 41", "Value 40.1"]
        );
    }

    #[test]
    fn duplicate_values_keep_highest_occurrence() {
        let mut map = sample();
        map.put(v("42.4"), "Value 41");
        let down = map.get_down_from(&v("50"));
        assert_eq!(
            down,
            vec!["Value 43.0", "Value 42.9", "Value 41", "Value 42.3", "Value 40.1"]
        );
        assert_eq!(down.len(), 5);
    }

    #[test]
    fn remove_contains_and_size() {
        let mut map = sample();
        assert_eq!(map.len(), 5);
        assert!(map.contains_key(&v("42.3")));
        assert!(!map.contains_key(&v("99.99")));

        map.put(v("44.0"), "Value 44.0");
        assert_eq!(map.len(), 6);
        assert_eq!(map.remove(&v("44")), Some("Value 44.0"));
        assert_eq!(map.len(), 5);
        assert_eq!(map.remove(&v("44")), None);

        map.clear();
        assert!(map.is_empty());
        assert!(!map.contains_key(&v("41")));
    }

    #[test]
    fn put_overwrites_same_numeric_version() {
        let mut map = VersionedValueMap::new();
        assert_eq!(map.put(v("42"), 1), None);
        assert_eq!(map.put(v("42.0"), 2), Some(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&v("42")), Some(&2));
    }

    #[test]
    fn floor_finds_nearest_lower() {
        let map = sample();
        assert_eq!(map.floor(&v("42.5")).map(|(_, val)| *val), Some("Value 42.3"));
        assert_eq!(map.floor(&v("39")), None);
    }
}
