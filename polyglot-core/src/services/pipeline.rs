//! Loads language descriptors and translation tables from discovered sources.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::model::charset::{self, Charset};
use crate::model::source::Source;
use crate::model::translation_type::TranslationType;
use crate::parsers::descriptor::{self, DESCRIPTOR_FILE};
use crate::parsers::translation::TranslationFileParser;
use crate::services::catalog::LanguageCatalog;
use crate::services::corpus::TranslationCorpus;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub files: usize,
    pub pairs: usize,
    pub undecodable: Vec<PathBuf>,
    pub mismatches: usize,
}

fn sorted_children(path: &Path, want_dirs: bool) -> Vec<PathBuf> {
    let mut children: Vec<PathBuf> = match fs::read_dir(path) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| if want_dirs { p.is_dir() } else { p.is_file() })
            .collect(),
        Err(e) => {
            tracing::debug!("Skipping {}: {}", path.display(), e);
            Vec::new()
        }
    };
    children.sort();
    children
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Registers the charset each source's `language.txt` files declare.
///
/// Returns how many descriptors were accepted.
pub fn load_languages(catalog: &mut LanguageCatalog, sources: &[Arc<Source>]) -> usize {
    let mut registered = 0;

    for source in sources {
        for dir in sorted_children(&source.root, true) {
            let Some(code) = file_name(&dir) else { continue };
            let path = dir.join(DESCRIPTOR_FILE);
            if !path.is_file() {
                continue;
            }

            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", path.display(), e);
                    continue;
                }
            };
            let Some(content) = Charset::utf8().decode(&bytes) else {
                tracing::warn!("Rejected {}: not valid UTF-8", path.display());
                continue;
            };

            match descriptor::parse(&content) {
                Ok(d) => {
                    catalog.add_language_charset(code, source.version.clone(), d.charset, &d.text);
                    registered += 1;
                }
                Err(e) => tracing::warn!("Rejected {}: {}", path.display(), e),
            }
        }
    }

    tracing::info!("Registered {} language descriptors", registered);
    registered
}

/// Reads every `<Type>_<LANG>.txt` of every source into `corpus`.
///
/// Sources are read in the order given; unknown languages and types are
/// skipped. Per-item events are replaced by a single
/// [`CorpusEvent::Reloaded`](crate::services::corpus::CorpusEvent::Reloaded).
pub fn load_corpus(
    corpus: &mut TranslationCorpus,
    catalog: &LanguageCatalog,
    sources: &[Arc<Source>],
) -> LoadReport {
    let mut report = LoadReport::default();
    corpus.begin_bulk();

    for source in sources {
        for dir in sorted_children(&source.root, true) {
            let Some(language) = file_name(&dir).and_then(|code| catalog.get_language(code))
            else {
                continue;
            };

            for path in sorted_children(&dir, false) {
                let Some(translation_type) = file_name(&path)
                    .and_then(|name| TranslationType::from_file_name(name, language.code()))
                else {
                    continue;
                };

                let mut parser = TranslationFileParser::open(&path, language, source);
                report.files += 1;
                let used = parser.used_charset();
                if used.is_none() {
                    tracing::debug!(
                        "Could not decode {} (tried {})",
                        parser.path().display(),
                        charset::describe(parser.tried_charsets())
                    );
                    report.undecodable.push(parser.path().to_path_buf());
                }

                for pair in parser.by_ref() {
                    let entry = corpus.get_or_create_entry(&pair.key);
                    match corpus.add_variant(
                        entry,
                        Arc::clone(source),
                        language,
                        translation_type,
                        &pair.value,
                        used,
                    ) {
                        Ok(id) => {
                            report.pairs += 1;
                            if corpus.variant(id).is_some_and(|v| v.charset_mismatch()) {
                                report.mismatches += 1;
                            }
                        }
                        Err(e) => tracing::warn!("Failed to add {}: {}", pair.key, e),
                    }
                }
                parser.close();
            }
        }
    }

    corpus.end_bulk();
    tracing::info!(
        "Loaded {} pairs from {} files ({} undecodable)",
        report.pairs,
        report.files,
        report.undecodable.len()
    );
    report
}
