pub mod charset;
pub mod config;
pub mod entry;
pub mod language;
pub mod source;
pub mod translation_type;
pub mod version;
pub mod version_map;
