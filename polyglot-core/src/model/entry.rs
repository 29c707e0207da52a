use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::charset::Charset;
use super::source::Source;
use super::translation_type::TranslationType;

/// Stable handle of a [`TranslationEntry`] inside a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub usize);

/// Stable handle of a [`Variant`] inside a corpus. Never reused after delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub usize);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry#{}", self.0)
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "variant#{}", self.0)
    }
}

/// All variants sharing one translation key.
#[derive(Debug, Clone)]
pub struct TranslationEntry {
    pub id: EntryId,
    pub key: String,
    pub(crate) variants: Vec<VariantId>,
}

impl TranslationEntry {
    pub(crate) fn new(id: EntryId, key: String) -> Self {
        Self {
            id,
            key,
            variants: Vec::new(),
        }
    }

    pub fn variants(&self) -> &[VariantId] {
        &self.variants
    }
}

/// One (source, language, type) rendition of a key's text.
#[derive(Debug, Clone)]
pub struct Variant {
    pub id: VariantId,
    pub entry: EntryId,
    pub key: String,
    pub source: Arc<Source>,
    pub language: String,
    pub translation_type: TranslationType,
    original_text: String,
    edited_text: String,
    /// What the language/source pairing says the file should be in.
    pub supposed_charset: Option<Charset>,
    /// What actually decoded the file.
    pub used_charset: Option<Charset>,
}

impl Variant {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: VariantId,
        entry: EntryId,
        key: String,
        source: Arc<Source>,
        language: String,
        translation_type: TranslationType,
        text: String,
        supposed_charset: Option<Charset>,
        used_charset: Option<Charset>,
    ) -> Self {
        Self {
            id,
            entry,
            key,
            source,
            language,
            translation_type,
            original_text: text.clone(),
            edited_text: text,
            supposed_charset,
            used_charset,
        }
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn edited_text(&self) -> &str {
        &self.edited_text
    }

    pub fn is_changed(&self) -> bool {
        self.edited_text != self.original_text
    }

    pub fn charset_mismatch(&self) -> bool {
        matches!(
            (self.supposed_charset, self.used_charset),
            (Some(supposed), Some(used)) if supposed != used
        )
    }

    /// Charset the file is read and rewritten with on save.
    // TODO: saving re-encodes with the detected charset even when it differs
    // from the supposed one; decide which of the two should win.
    pub fn write_charset(&self) -> Charset {
        self.used_charset
            .or(self.supposed_charset)
            .unwrap_or_else(Charset::utf8)
    }

    /// Charset a brand-new file for this variant is created in.
    pub fn create_charset(&self) -> Charset {
        self.supposed_charset
            .or(self.used_charset)
            .unwrap_or_else(Charset::utf8)
    }

    pub(crate) fn set_edited_text(&mut self, text: String) {
        self.edited_text = text;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.original_text = self.edited_text.clone();
    }

    pub fn view(&self) -> VariantView {
        VariantView {
            id: self.id,
            entry: self.entry,
            key: self.key.clone(),
            source: self.source.name.clone(),
            editable: self.source.editable,
            language: self.language.clone(),
            translation_type: self.translation_type,
            original_text: self.original_text.clone(),
            edited_text: self.edited_text.clone(),
            changed: self.is_changed(),
            supposed_charset: self.supposed_charset,
            used_charset: self.used_charset,
            charset_mismatch: self.charset_mismatch(),
        }
    }
}

/// Serializable snapshot of a [`Variant`] for the host.
#[derive(Debug, Clone, Serialize)]
pub struct VariantView {
    pub id: VariantId,
    pub entry: EntryId,
    pub key: String,
    pub source: String,
    pub editable: bool,
    pub language: String,
    #[serde(rename = "type")]
    pub translation_type: TranslationType,
    pub original_text: String,
    pub edited_text: String,
    pub changed: bool,
    pub supposed_charset: Option<Charset>,
    pub used_charset: Option<Charset>,
    pub charset_mismatch: bool,
}
