//! Parser for a language folder's `language.txt`.
//!
//! ```text
//! /* header comment */
//! # line comment
//! VERSION = 1,
//! text = Russian,
//! charset = Cp1251,
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::charset::Charset;

pub const DESCRIPTOR_FILE: &str = "language.txt";

/// What a `language.txt` declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDescriptor {
    pub text: String,
    pub charset: Charset,
}

fn block_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("static regex"))
}

fn strip_comments(content: &str) -> String {
    let without_blocks = block_comment_re().replace_all(content, "");
    without_blocks
        .split('\n')
        .filter(|line| !line.trim().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses a descriptor. Any malformed line rejects the whole file.
pub fn parse(content: &str) -> Result<LanguageDescriptor> {
    let stripped = strip_comments(content);

    let mut text: Option<String> = None;
    let mut charset: Option<String> = None;

    for raw in stripped.split('\n') {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let body = line
            .strip_suffix(',')
            .filter(|b| b.matches('=').count() == 1)
            .ok_or_else(|| Error::InvalidDescriptorLine(line.to_string()))?;

        let (key, value) = body
            .split_once('=')
            .ok_or_else(|| Error::InvalidDescriptorLine(line.to_string()))?;

        match key.trim() {
            "text" => text = Some(value.trim().to_string()),
            "charset" => charset = Some(value.trim().to_string()),
            _ => {}
        }
    }

    let text = text.ok_or(Error::MissingDescriptorField("text"))?;
    let charset = charset.ok_or(Error::MissingDescriptorField("charset"))?;

    Ok(LanguageDescriptor {
        text,
        charset: Charset::for_name(&charset)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_game_descriptor() {
        let content = "VERSION = 1,\ntext = Russian,\ncharset = Cp1251,\n";
        let d = parse(content).unwrap();
        assert_eq!(d.text, "Russian");
        assert_eq!(d.charset, Charset::for_name("windows-1251").unwrap());
    }

    #[test]
    fn strips_block_and_line_comments() {
        let content = "/* multi\n line = header */\n# note = here\n  text=Deutsch - German,\r\ncharset=UTF-8,\n\n";
        let d = parse(content).unwrap();
        assert_eq!(d.text, "Deutsch - German");
        assert_eq!(d.charset, Charset::utf8());
    }

    #[test]
    fn invalid_line_rejects_whole_file() {
        let content = "text = Russian,\ncharset = Cp1251\n";
        assert!(matches!(parse(content), Err(Error::InvalidDescriptorLine(_))));

        let content = "text = Russian,\nno equals here,\ncharset = Cp1251,\n";
        assert!(matches!(parse(content), Err(Error::InvalidDescriptorLine(_))));

        let content = "text = a = b,\ncharset = Cp1251,\n";
        assert!(matches!(parse(content), Err(Error::InvalidDescriptorLine(_))));
    }

    #[test]
    fn required_keys() {
        assert!(matches!(
            parse("charset = UTF-8,\n"),
            Err(Error::MissingDescriptorField("text"))
        ));
        assert!(matches!(
            parse("text = English,\n"),
            Err(Error::MissingDescriptorField("charset"))
        ));
    }

    #[test]
    fn unknown_charset_fails_parse() {
        assert!(matches!(
            parse("text = Elvish,\ncharset = Tengwar-8,\n"),
            Err(Error::UnknownCharset(_))
        ));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let d = parse("text = English,\nazerty = false,\ncharset = UTF-8,\n").unwrap();
        assert_eq!(d.text, "English");
    }
}
