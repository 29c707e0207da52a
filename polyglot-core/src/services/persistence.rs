//! Writes variant edits back into their table files, leaving every other
//! line untouched.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::charset::Charset;
use crate::model::entry::{Variant, VariantId};
use crate::parsers::translation::split_lines;
use crate::services::corpus::TranslationCorpus;
use crate::services::rebuild::{self, LineEnding};

/// `<source>/<LANG>/<Type>_<LANG>.txt`
pub fn file_path(variant: &Variant) -> PathBuf {
    variant
        .source
        .root
        .join(&variant.language)
        .join(variant.translation_type.file_name(&variant.language))
}

fn read_lines(path: &Path, charset: Charset) -> Result<(Vec<String>, LineEnding)> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let text = charset.decode(&bytes).ok_or_else(|| Error::Decode {
        path: path.to_path_buf(),
        tried: charset.name().to_string(),
    })?;
    Ok((split_lines(&text), LineEnding::detect(&text)))
}

fn write_lines(path: &Path, lines: &[String], ending: LineEnding, charset: Charset) -> Result<()> {
    let text = rebuild::join_lines(lines, ending);
    let bytes = charset.encode(&text).ok_or_else(|| {
        Error::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("text is not representable in {}", charset.name()),
            ),
        )
    })?;
    fs::write(path, bytes).map_err(|e| Error::io(path, e))
}

fn create_skeleton(path: &Path, variant: &Variant) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    let skeleton = rebuild::skeleton(variant.translation_type, &variant.language);
    write_lines(
        path,
        &split_lines(&skeleton),
        LineEnding::Lf,
        variant.create_charset(),
    )?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

fn write_variant(variant: &Variant) -> Result<()> {
    let path = file_path(variant);
    if !path.exists() {
        create_skeleton(&path, variant)?;
    }

    let charset = variant.write_charset();
    let (mut lines, ending) = read_lines(&path, charset)?;
    rebuild::upsert(&mut lines, &variant.key, variant.edited_text());
    write_lines(&path, &lines, ending, charset)
}

/// Writes the variant's edited text to its file and marks it saved.
///
/// On failure the variant stays dirty so the host can retry.
pub fn save_variant(corpus: &mut TranslationCorpus, id: VariantId) -> Result<()> {
    let variant = corpus.variant(id).ok_or(Error::UnknownVariant(id))?;

    if let Err(e) = write_variant(variant) {
        tracing::warn!("Failed to save {} ({}): {}", variant.key, variant.source.name, e);
        return Err(e);
    }

    tracing::debug!("Saved {} to {}", variant.key, file_path(variant).display());
    corpus.mark_saved(id)
}

/// Removes the key's lines from the file. Returns whether the file changed.
fn erase_variant(variant: &Variant) -> Result<bool> {
    let path = file_path(variant);
    if !path.exists() {
        return Ok(false);
    }

    let charset = variant.write_charset();
    let (mut lines, ending) = read_lines(&path, charset)?;
    if !rebuild::remove_key(&mut lines, &variant.key) {
        return Ok(false);
    }
    write_lines(&path, &lines, ending, charset)?;
    Ok(true)
}

/// Removes the variant from its file and from the corpus.
///
/// A missing file or key is not an error. If the file cannot be rewritten
/// the variant is kept.
pub fn delete_variant(corpus: &mut TranslationCorpus, id: VariantId) -> Result<()> {
    let variant = corpus.variant(id).ok_or(Error::UnknownVariant(id))?;

    match erase_variant(variant) {
        Ok(changed) => {
            if !changed {
                tracing::debug!("{} not present in {}", variant.key, file_path(variant).display());
            }
        }
        Err(e) => {
            tracing::warn!("Failed to delete {} ({}): {}", variant.key, variant.source.name, e);
            return Err(e);
        }
    }

    corpus.remove_variant(id)?;
    Ok(())
}

#[derive(Debug, Default, Serialize)]
pub struct SaveReport {
    pub saved: Vec<VariantId>,
    pub failed: Vec<SaveFailure>,
}

#[derive(Debug, Serialize)]
pub struct SaveFailure {
    pub variant: VariantId,
    pub message: String,
}

/// Saves every dirty variant. Failures are collected, not fatal.
pub fn save_all(corpus: &mut TranslationCorpus) -> SaveReport {
    let mut report = SaveReport::default();

    for id in corpus.dirty_variants() {
        match save_variant(corpus, id) {
            Ok(()) => report.saved.push(id),
            Err(e) => report.failed.push(SaveFailure {
                variant: id,
                message: e.to_string(),
            }),
        }
    }

    tracing::info!(
        "Saved {} variants, {} failed",
        report.saved.len(),
        report.failed.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::model::language::Language;
    use crate::model::source::Source;
    use crate::model::translation_type::TranslationType;
    use crate::model::version::SemanticVersion;

    #[test]
    fn file_path_is_derived_from_source_language_and_type() {
        let source = Arc::new(Source::new(
            "Mod [42]",
            SemanticVersion::parse("42"),
            "/mods/Mod/common/media/lua/shared/Translate",
            true,
            2,
        ));
        let lang = Language::new("RU", "Russian");
        let mut corpus = TranslationCorpus::new();
        let entry = corpus.get_or_create_entry("IGUI_Key");
        let id = corpus
            .add_variant(entry, source, &lang, TranslationType::IgUi, "x", None)
            .unwrap();

        assert_eq!(
            file_path(corpus.variant(id).unwrap()),
            PathBuf::from("/mods/Mod/common/media/lua/shared/Translate/RU/IG_UI_RU.txt")
        );
    }
}
