use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::charset::Charset;
use crate::model::config::CoreConfig;
use crate::model::entry::VariantId;
use crate::model::source::Source;
use crate::model::translation_type::TranslationType;
use crate::services::catalog::LanguageCatalog;
use crate::services::corpus::TranslationCorpus;
use crate::services::discovery;
use crate::services::persistence::{self, SaveReport};
use crate::services::pipeline::{self, LoadReport};

/// Everything one editing session works on.
#[derive(Debug)]
pub struct Workspace {
    config: CoreConfig,
    catalog: LanguageCatalog,
    sources: Arc<[Arc<Source>]>,
    corpus: TranslationCorpus,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}

impl Workspace {
    pub fn new(config: CoreConfig) -> Self {
        Self {
            config,
            catalog: LanguageCatalog::new(),
            sources: Arc::from(Vec::new()),
            corpus: TranslationCorpus::new(),
        }
    }

    /// Replaces the config and reloads sources, languages and corpus.
    pub fn init(&mut self, config: CoreConfig) -> LoadReport {
        self.config = config;
        self.catalog = LanguageCatalog::new();
        self.rescan();
        self.load_languages();
        self.load_corpus()
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn corpus(&self) -> &TranslationCorpus {
        &self.corpus
    }

    pub fn corpus_mut(&mut self) -> &mut TranslationCorpus {
        &mut self.corpus
    }

    /// Rediscovers sources. Snapshots handed out earlier stay valid.
    pub fn rescan(&mut self) -> usize {
        let found: Vec<Arc<Source>> = discovery::discover(&self.config)
            .into_iter()
            .map(Arc::new)
            .collect();
        self.sources = Arc::from(found);
        self.sources.len()
    }

    pub fn sources(&self) -> Arc<[Arc<Source>]> {
        Arc::clone(&self.sources)
    }

    /// First source with this name, in priority order.
    pub fn source_by_name(&self, name: &str) -> Option<Arc<Source>> {
        self.sources.iter().find(|s| s.name == name).cloned()
    }

    pub fn load_languages(&mut self) -> usize {
        pipeline::load_languages(&mut self.catalog, &self.sources)
    }

    /// Discards the current corpus and reads every source again.
    pub fn load_corpus(&mut self) -> LoadReport {
        self.corpus.clear();
        pipeline::load_corpus(&mut self.corpus, &self.catalog, &self.sources)
    }

    /// Adds a variant that is not backed by a file line yet.
    ///
    /// Its charsets are the language's binding for the source version, or
    /// UTF-8 when there is none.
    pub fn add_variant(
        &mut self,
        key: &str,
        source_name: &str,
        language_code: &str,
        type_name: &str,
        text: &str,
    ) -> Result<VariantId> {
        let source = self
            .source_by_name(source_name)
            .ok_or_else(|| Error::UnknownSource(source_name.to_string()))?;
        let language = self
            .catalog
            .get_language(language_code)
            .ok_or_else(|| Error::UnknownLanguage(language_code.to_string()))?;
        let translation_type = TranslationType::from_name(type_name)
            .ok_or_else(|| Error::UnknownTranslationType(type_name.to_string()))?;

        let charset = language
            .charset(&source.version)
            .unwrap_or_else(Charset::utf8);
        let entry = self.corpus.get_or_create_entry(key);
        self.corpus
            .add_variant(entry, source, language, translation_type, text, Some(charset))
    }

    pub fn save_variant(&mut self, id: VariantId) -> Result<()> {
        persistence::save_variant(&mut self.corpus, id)
    }

    pub fn delete_variant(&mut self, id: VariantId) -> Result<()> {
        persistence::delete_variant(&mut self.corpus, id)
    }

    pub fn save_all(&mut self) -> SaveReport {
        persistence::save_all(&mut self.corpus)
    }
}
