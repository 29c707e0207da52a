use std::collections::HashMap;

use crate::model::charset::Charset;
use crate::model::language::Language;
use crate::model::version::SemanticVersion;

/// Charsets the game ships each language in, for builds 41 and 42.
const BUILTIN: &[(&str, &str, &str, &str)] = &[
    // code, display name, build 41, build 42
    ("AR", "Espanol (AR) - Argentina Spanish", "Cp1252", "Cp1252"),
    ("CA", "Catalan", "ISO-8859-15", "ISO-8859-15"),
    ("CH", "Traditional Chinese", "UTF-8", "UTF-8"),
    ("CN", "Simplified Chinese", "UTF-8", "UTF-8"),
    ("CS", "Czech", "Cp1250", "Cp1250"),
    ("DA", "Danish", "Cp1252", "UTF-8"),
    ("DE", "Deutsch - German", "Cp1252", "UTF-8"),
    ("EN", "English", "UTF-8", "UTF-8"),
    ("ES", "Espanol (ES) - Spanish", "Cp1252", "UTF-8"),
    ("FI", "Finnish", "Cp1252", "UTF-8"),
    ("FR", "Francais - French", "Cp1252", "UTF-8"),
    ("HU", "Hungarian", "Cp1250", "UTF-8"),
    ("ID", "Indonesia", "UTF-8", "UTF-8"),
    ("IT", "Italiano", "Cp1252", "UTF-8"),
    ("JP", "Japanese", "UTF-8", "UTF-8"),
    ("KO", "Korean", "UTF-16", "UTF-16"),
    ("NL", "Nederlands - Dutch", "Cp1252", "UTF-8"),
    ("NO", "Norsk - Norwegian", "Cp1252", "UTF-8"),
    ("PH", "Tagalog - Filipino", "UTF-8", "UTF-8"),
    ("PL", "Polish", "Cp1250", "UTF-8"),
    ("PT", "Portuguese", "Cp1252", "UTF-8"),
    ("PTBR", "Brazilian Portuguese", "Cp1252", "UTF-8"),
    ("RO", "Romanian", "UTF-8", "UTF-8"),
    ("RU", "Russian", "Cp1251", "UTF-8"),
    ("TH", "Thai", "UTF-8", "UTF-8"),
    ("TR", "Turkish", "Cp1254", "UTF-8"),
    ("UA", "Ukrainian", "Cp1251", "UTF-8"),
];

/// Registry of known languages.
///
/// Written while language descriptors are discovered, read-only after.
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    languages: HashMap<String, Language>,
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageCatalog {
    /// A catalog holding the built-in 41/42 table.
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        for &(code, name, cs41, cs42) in BUILTIN {
            for (build, charset_name) in [("41", cs41), ("42", cs42)] {
                match Charset::for_name(charset_name) {
                    Ok(charset) => {
                        catalog.add_language_charset(code, SemanticVersion::parse(build), charset, name)
                    }
                    Err(e) => tracing::warn!("Built-in charset for {code} unavailable: {e}"),
                }
            }
        }
        catalog
    }

    pub fn empty() -> Self {
        Self {
            languages: HashMap::new(),
        }
    }

    /// Binds `charset` to `version` for `code`, creating the language on first
    /// sight. The display name is only taken when the language is created.
    pub fn add_language_charset(
        &mut self,
        code: &str,
        version: SemanticVersion,
        charset: Charset,
        display_name: &str,
    ) {
        self.languages
            .entry(code.to_string())
            .or_insert_with(|| Language::new(code, display_name))
            .set_charset(version, charset);
    }

    pub fn get_language(&self, code: &str) -> Option<&Language> {
        self.languages.get(code)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Every code, `EN` first and the rest alphabetically.
    pub fn all_language_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.languages.keys().cloned().collect();
        codes.sort_by(|a, b| (a != "EN", a).cmp(&(b != "EN", b)));
        codes
    }

    /// Languages in [`all_language_codes`](Self::all_language_codes) order.
    pub fn languages(&self) -> Vec<&Language> {
        self.all_language_codes()
            .iter()
            .filter_map(|code| self.languages.get(code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> SemanticVersion {
        SemanticVersion::parse(s)
    }

    #[test]
    fn builtin_table_is_loaded() {
        let catalog = LanguageCatalog::new();
        assert_eq!(catalog.len(), 27);

        let ru = catalog.get_language("RU").unwrap();
        assert_eq!(ru.display_name(), "Russian");
        assert_eq!(ru.charset(&v("41")).unwrap().name(), "windows-1251");
        assert_eq!(ru.charset(&v("42")), Some(Charset::utf8()));

        let ko = catalog.get_language("KO").unwrap();
        assert_eq!(ko.charset(&v("42")), Some(Charset::utf16()));

        let ca = catalog.get_language("CA").unwrap();
        assert_eq!(ca.charset(&v("41")).unwrap().name(), "ISO-8859-15");
    }

    #[test]
    fn fallback_order_for_legacy_language() {
        let catalog = LanguageCatalog::new();
        let ru = catalog.get_language("RU").unwrap();
        let cp1251 = Charset::for_name("Cp1251").unwrap();

        assert_eq!(ru.charsets_down_from(&v("42")), vec![Charset::utf8(), cp1251]);
        assert_eq!(ru.charsets_down_from(&v("41")), vec![cp1251, Charset::utf8()]);
    }

    #[test]
    fn en_sorts_first() {
        let codes = LanguageCatalog::new().all_language_codes();
        assert_eq!(codes[0], "EN");
        assert_eq!(codes[1], "AR");
        assert_eq!(codes.last().map(String::as_str), Some("UA"));

        let catalog = LanguageCatalog::new();
        let ordered: Vec<&str> = catalog.languages().into_iter().map(|l| l.code()).collect();
        assert_eq!(ordered, codes);
        assert!(!catalog.is_empty());
        assert!(LanguageCatalog::empty().is_empty());
    }

    #[test]
    fn add_keeps_first_display_name_and_is_idempotent() {
        let mut catalog = LanguageCatalog::empty();
        let cp1250 = Charset::for_name("Cp1250").unwrap();

        catalog.add_language_charset("EO", v("41"), cp1250, "Esperanto");
        catalog.add_language_charset("EO", v("41"), cp1250, "Renamed");
        catalog.add_language_charset("EO", v("42"), Charset::utf8(), "Renamed");

        let eo = catalog.get_language("EO").unwrap();
        assert_eq!(eo.display_name(), "Esperanto");
        assert_eq!(eo.charsets().len(), 3);
        assert_eq!(eo.charset(&v("41")), Some(cp1250));
    }
}
