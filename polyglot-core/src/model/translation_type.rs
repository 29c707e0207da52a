use std::fmt;

use serde::{Serialize, Serializer};

/// Category of a translation file, taken from its `<Type>_<LANG>.txt` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TranslationType {
    Attributes,
    BodyParts,
    Challenge,
    ContextMenu,
    DynamicRadio,
    Entity,
    EvolvedRecipeName,
    Farming,
    Fluids,
    GameSound,
    IgUi,
    ItemName,
    Items,
    MakeUp,
    Moodles,
    Moveables,
    MultiStageBuild,
    PrintMedia,
    PrintText,
    RadioData,
    Recipes,
    RecordedMedia,
    Sandbox,
    Stash,
    SurvivalGuide,
    SurvivorNames,
    Tooltip,
    Ui,
}

impl TranslationType {
    pub const ALL: [TranslationType; 28] = [
        TranslationType::Attributes,
        TranslationType::BodyParts,
        TranslationType::Challenge,
        TranslationType::ContextMenu,
        TranslationType::DynamicRadio,
        TranslationType::Entity,
        TranslationType::EvolvedRecipeName,
        TranslationType::Farming,
        TranslationType::Fluids,
        TranslationType::GameSound,
        TranslationType::IgUi,
        TranslationType::ItemName,
        TranslationType::Items,
        TranslationType::MakeUp,
        TranslationType::Moodles,
        TranslationType::Moveables,
        TranslationType::MultiStageBuild,
        TranslationType::PrintMedia,
        TranslationType::PrintText,
        TranslationType::RadioData,
        TranslationType::Recipes,
        TranslationType::RecordedMedia,
        TranslationType::Sandbox,
        TranslationType::Stash,
        TranslationType::SurvivalGuide,
        TranslationType::SurvivorNames,
        TranslationType::Tooltip,
        TranslationType::Ui,
    ];

    /// The file-name prefix used by the game.
    pub fn name(self) -> &'static str {
        match self {
            TranslationType::Attributes => "Attributes",
            TranslationType::BodyParts => "BodyParts",
            TranslationType::Challenge => "Challenge",
            TranslationType::ContextMenu => "ContextMenu",
            TranslationType::DynamicRadio => "DynamicRadio",
            TranslationType::Entity => "Entity",
            TranslationType::EvolvedRecipeName => "EvolvedRecipeName",
            TranslationType::Farming => "Farming",
            TranslationType::Fluids => "Fluids",
            TranslationType::GameSound => "GameSound",
            TranslationType::IgUi => "IG_UI",
            TranslationType::ItemName => "ItemName",
            TranslationType::Items => "Items",
            TranslationType::MakeUp => "MakeUp",
            TranslationType::Moodles => "Moodles",
            TranslationType::Moveables => "Moveables",
            TranslationType::MultiStageBuild => "MultiStageBuild",
            TranslationType::PrintMedia => "Print_Media",
            TranslationType::PrintText => "Print_Text",
            TranslationType::RadioData => "RadioData",
            TranslationType::Recipes => "Recipes",
            TranslationType::RecordedMedia => "Recorded_Media",
            TranslationType::Sandbox => "Sandbox",
            TranslationType::Stash => "Stash",
            TranslationType::SurvivalGuide => "SurvivalGuide",
            TranslationType::SurvivorNames => "SurvivorNames",
            TranslationType::Tooltip => "Tooltip",
            TranslationType::Ui => "UI",
        }
    }

    /// Case-sensitive lookup by file-name prefix.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Parses `<Type>_<code>.txt`; `None` if the suffix or the type is wrong.
    pub fn from_file_name(file_name: &str, language_code: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".txt")?;
        let type_name = stem.strip_suffix(language_code)?.strip_suffix('_')?;
        Self::from_name(type_name)
    }

    /// `<Type>_<code>.txt`
    pub fn file_name(self, language_code: &str) -> String {
        format!("{}_{}.txt", self.name(), language_code)
    }
}

impl fmt::Display for TranslationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TranslationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
