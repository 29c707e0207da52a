use std::fmt;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// A text encoding a translation file can be stored in.
///
/// Decoding is strict: a malformed byte sequence is an error, never a
/// replacement character.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Charset(&'static Encoding);

impl Charset {
    pub fn utf8() -> Self {
        Charset(UTF_8)
    }

    /// Little-endian UTF-16, the byte order the `utf-16` label resolves to.
    pub fn utf16() -> Self {
        Charset(UTF_16LE)
    }

    /// Resolves a charset name such as `Cp1252`, `UTF-8` or `ISO-8859-15`.
    pub fn for_name(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        let encoding = Encoding::for_label_no_replacement(trimmed.as_bytes())
            .ok_or_else(|| Error::UnknownCharset(trimmed.to_string()))?;
        Ok(Charset(encoding))
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.0
    }

    fn is_utf16(&self) -> bool {
        self.0 == UTF_16LE || self.0 == UTF_16BE
    }

    /// Decodes the whole buffer, or `None` if it is not valid in this charset.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        self.decode_detecting(bytes).map(|(text, _)| text)
    }

    /// Like [`decode`](Self::decode), also returning the charset that
    /// actually applied. For UTF-16 a BOM picks the byte order, so a
    /// big-endian file read through the `UTF-16` label reports `UTF-16BE`
    /// and is written back big-endian.
    pub fn decode_detecting(&self, bytes: &[u8]) -> Option<(String, Charset)> {
        let (encoding, body) = if self.is_utf16() {
            match Encoding::for_bom(bytes) {
                Some((bom, len)) if bom == UTF_16LE || bom == UTF_16BE => (bom, &bytes[len..]),
                _ => (self.0, bytes),
            }
        } else {
            (self.0, bytes)
        };

        encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .map(|text| (text.into_owned(), Charset(encoding)))
    }

    /// Encodes `text`, or `None` if it contains characters this charset
    /// cannot represent.
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        if self.is_utf16() {
            // encoding_rs only encodes to ASCII-compatible targets
            let little = self.0 == UTF_16LE;
            let mut out = Vec::with_capacity(2 + text.len() * 2);
            for unit in std::iter::once(0xFEFF).chain(text.encode_utf16()) {
                if little {
                    out.extend_from_slice(&unit.to_le_bytes());
                } else {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
            }
            return Some(out);
        }

        let (bytes, _, had_errors) = self.0.encode(text);
        if had_errors {
            None
        } else {
            Some(bytes.into_owned())
        }
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Charset({})", self.name())
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Charset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Comma-separated charset names, for log lines and error messages.
pub fn describe(charsets: &[Charset]) -> String {
    charsets
        .iter()
        .map(Charset::name)
        .collect::<Vec<_>>()
        .join(", ")
}
