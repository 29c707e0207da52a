#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Init,
    SourcesScan,
    SourcesList,
    LanguagesList,
    CorpusLoad,
    EntriesList,
    EntryGetOrCreate,
    EntryGet,
    VariantAdd,
    VariantSetText,
    VariantReset,
    VariantSave,
    VariantDelete,
    CorpusSaveAll,
    CorpusDirty,
    RunQa,
    DetectEncoding,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "init" => Command::Init,
            "sources.scan" => Command::SourcesScan,
            "sources.list" => Command::SourcesList,
            "languages.list" => Command::LanguagesList,
            "corpus.load" => Command::CorpusLoad,
            "entries.list" => Command::EntriesList,
            "entry.get_or_create" => Command::EntryGetOrCreate,
            "entry.get" => Command::EntryGet,
            "variant.add" => Command::VariantAdd,
            "variant.set_text" => Command::VariantSetText,
            "variant.reset" => Command::VariantReset,
            "variant.save" => Command::VariantSave,
            "variant.delete" => Command::VariantDelete,
            "corpus.save_all" => Command::CorpusSaveAll,
            "corpus.dirty" => Command::CorpusDirty,
            "run_qa" => Command::RunQa,
            "encoding.detect" | "detect_encoding" => Command::DetectEncoding,
            _ => Command::Unknown,
        }
    }
}
