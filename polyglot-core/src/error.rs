//! Error types for the translation corpus engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::entry::{EntryId, VariantId};

/// The error type for corpus engine operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File system failure on a specific path.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// None of the candidate charsets could decode the file.
    #[error("could not decode {path} with any of [{tried}]")]
    Decode { path: PathBuf, tried: String },

    /// A `language.txt` line is not of the form `key=value,`.
    #[error("invalid descriptor line: {0}")]
    InvalidDescriptorLine(String),

    /// A mandatory `language.txt` key is absent.
    #[error("descriptor is missing required key `{0}`")]
    MissingDescriptorField(&'static str),

    /// The charset name is not known to the encoding tables.
    #[error("unknown charset: {0}")]
    UnknownCharset(String),

    #[error("unknown entry: {0}")]
    UnknownEntry(EntryId),

    #[error("unknown variant: {0}")]
    UnknownVariant(VariantId),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("unknown source: {0}")]
    UnknownSource(String),

    #[error("unknown translation type: {0}")]
    UnknownTranslationType(String),

    /// Configuration could not be read or parsed.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
