//! Reader for `<Type>_<LANG>.txt` translation tables.
//!
//! The format is a Lua table literal:
//!
//! ```text
//! UI_EN = {
//!     -- comment
//!     UI_Key = "value",
//!     UI_Long = "first part " ..
//!         "second part",
//! }
//! ```
//!
//! Parsing is line oriented and forgiving: anything that does not look
//! like `key = "value"` is skipped and never aborts the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::model::charset::{self, Charset};
use crate::model::language::Language;
use crate::model::source::Source;

const CONTINUATION: &str = "..";

/// A key/value read from the file, with the 1-based lines it spanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pair {
    pub key: String,
    pub value: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Splits on `\n`, `\r\n` and lone `\r`. A trailing terminator does not
/// produce an extra empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => lines.push(std::mem::take(&mut current)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Text strictly between the first and last `"`, if there are two.
fn between_quotes(s: &str) -> Option<&str> {
    let first = s.find('"')?;
    let last = s.rfind('"')?;
    (last > first).then(|| &s[first + 1..last])
}

/// Line-by-line state machine turning table lines into [`Pair`]s.
#[derive(Debug)]
pub struct Tokenizer<I> {
    lines: I,
    line_no: usize,
    multiline: bool,
    key: String,
    value: String,
    start_line: usize,
}

impl<I, S> Tokenizer<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            line_no: 0,
            multiline: false,
            key: String::new(),
            value: String::new(),
            start_line: 0,
        }
    }

    fn emit(&mut self) -> Pair {
        self.multiline = false;
        Pair {
            key: self.key.clone(),
            value: std::mem::take(&mut self.value),
            start_line: self.start_line,
            end_line: self.line_no,
        }
    }

    /// Handles the first line of an entry.
    fn begin(&mut self, trimmed: &str) -> Option<Pair> {
        if !trimmed.contains('=') || !trimmed.contains('"') {
            return None;
        }

        let (key, rest) = trimmed.split_once('=')?;
        let value_part = rest.trim();
        if !value_part.contains('"') {
            return None;
        }

        self.start_line = self.line_no;
        self.key = key.trim().to_string();
        self.value.clear();

        if trimmed.ends_with(CONTINUATION) {
            let value_part = value_part[..value_part.len() - CONTINUATION.len()].trim();
            if let Some(inner) = between_quotes(value_part) {
                self.value.push_str(inner);
            } else if let Some(first) = value_part.find('"') {
                self.value.push_str(&value_part[first + 1..]);
            }
            self.multiline = true;
            return None;
        }

        let inner = between_quotes(value_part)?;
        self.value.push_str(inner);
        Some(self.emit())
    }

    /// Handles a line while a `..` continuation is open.
    fn continue_value(&mut self, trimmed: &str) -> Option<Pair> {
        let Some(first) = trimmed.find('"') else {
            self.multiline = false;
            return None;
        };

        if trimmed.ends_with(CONTINUATION) {
            let fragment = trimmed[first + 1..trimmed.len() - CONTINUATION.len()].trim_end();
            let fragment = fragment.strip_suffix('"').unwrap_or(fragment);
            self.value.push_str(fragment);
            return None;
        }

        match between_quotes(trimmed) {
            Some(inner) => {
                self.value.push_str(inner);
                Some(self.emit())
            }
            None => {
                self.multiline = false;
                None
            }
        }
    }
}

impl<I, S> Iterator for Tokenizer<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Pair;

    fn next(&mut self) -> Option<Pair> {
        while let Some(line) = self.lines.next() {
            self.line_no += 1;
            let trimmed = line.as_ref().trim();

            if trimmed.is_empty() || trimmed.starts_with("--") {
                self.multiline = false;
                continue;
            }

            let pair = if self.multiline {
                self.continue_value(trimmed)
            } else {
                self.begin(trimmed)
            };

            if pair.is_some() {
                return pair;
            }
        }
        None
    }
}

/// Decodes `bytes` with the first charset that accepts them, returning the
/// charset that applied (a UTF-16 BOM settles the byte order).
///
/// Any charset that decodes without error wins, even if a later one
/// would produce the intended text; byte-compatible legacy charsets can
/// therefore yield readable-but-wrong characters.
pub fn decode_with_fallback(bytes: &[u8], candidates: &[Charset]) -> Option<(String, Charset)> {
    candidates
        .iter()
        .find_map(|cs| cs.decode_detecting(bytes))
}

/// One translation file, fully decoded at construction and read as a
/// single-pass sequence of [`Pair`]s.
#[derive(Debug)]
pub struct TranslationFileParser {
    path: PathBuf,
    tokenizer: Tokenizer<std::vec::IntoIter<String>>,
    used_charset: Option<Charset>,
    tried: Vec<Charset>,
    closed: bool,
}

impl TranslationFileParser {
    /// Reads `path` using the charsets `language` declares at or below the
    /// source's version, newest first. An unreadable file yields no pairs.
    pub fn open(path: &Path, language: &Language, source: &Source) -> Self {
        Self::with_charsets(path, language.charsets_down_from(&source.version))
    }

    pub fn with_charsets(path: &Path, candidates: Vec<Charset>) -> Self {
        let decoded = match fs::read(path) {
            Ok(bytes) => decode_with_fallback(&bytes, &candidates),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        };

        let (lines, used_charset) = match decoded {
            Some((text, cs)) => (split_lines(&text), Some(cs)),
            None => {
                tracing::warn!(
                    "Failed to decode {} with any available charset [{}]",
                    path.display(),
                    charset::describe(&candidates)
                );
                (Vec::new(), None)
            }
        };

        Self {
            path: path.to_path_buf(),
            tokenizer: Tokenizer::new(lines.into_iter()),
            used_charset,
            tried: candidates,
            closed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The charset that decoded the file, `None` if none did.
    pub fn used_charset(&self) -> Option<Charset> {
        self.used_charset
    }

    /// Candidate charsets in the order they were tried.
    pub fn tried_charsets(&self) -> &[Charset] {
        &self.tried
    }

    /// Stops iteration. Calling it again has no effect.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Iterator for TranslationFileParser {
    type Item = Pair;

    fn next(&mut self) -> Option<Pair> {
        if self.closed {
            return None;
        }
        self.tokenizer.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str]) -> Vec<(String, String)> {
        Tokenizer::new(lines.iter())
            .map(|p| (p.key, p.value))
            .collect()
    }

    fn kv(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn simple_key_value() {
        assert_eq!(parse(&[r#"key1 = "value1""#]), vec![kv("key1", "value1")]);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let lines = ["-- This is a comment", "", r#"key2 = "value2""#, "   ", "-- Another comment"];
        assert_eq!(parse(&lines), vec![kv("key2", "value2")]);
    }

    #[test]
    fn multiple_pairs_in_a_table() {
        let lines = [
            "UI_EN = {",
            r#"    keyA = "A value","#,
            r#"    keyB = "B value","#,
            "}",
        ];
        assert_eq!(parse(&lines), vec![kv("keyA", "A value"), kv("keyB", "B value")]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let lines = ["notAKeyValue", "keyC = valueWithoutQuotes", r#"keyD = "validValue""#];
        assert_eq!(parse(&lines), vec![kv("keyD", "validValue")]);
    }

    #[test]
    fn multiline_concatenation() {
        let lines = [
            r#"multi = "first " .."#,
            r#""second " .."#,
            r#""third""#,
        ];
        assert_eq!(parse(&lines), vec![kv("multi", "first second third")]);
    }

    #[test]
    fn multiline_with_trailing_comma_and_indent() {
        let lines = [
            r#"    Long = "This is the first line " .."#,
            r#"        "and this is the second line " .."#,
            r#"        "and this is the last line","#,
            r#"    Next = "n","#,
        ];
        assert_eq!(
            parse(&lines),
            vec![
                kv("Long", "This is the first line and this is the second line and this is the last line"),
                kv("Next", "n"),
            ]
        );
    }

    #[test]
    fn comment_inside_multiline_resets_state() {
        let lines = [
            r#"broken = "start " .."#,
            "-- interrupted",
            r#""orphan""#,
            r#"after = "ok""#,
        ];
        assert_eq!(parse(&lines), vec![kv("after", "ok")]);
    }

    #[test]
    fn quoteless_continuation_resets_state() {
        let lines = [r#"broken = "start " .."#, "}", r#"after = "ok""#];
        assert_eq!(parse(&lines), vec![kv("after", "ok")]);
    }

    #[test]
    fn single_quote_on_first_line_of_multiline() {
        let lines = [r#"k = "open .."#, r#""close""#];
        assert_eq!(parse(&lines), vec![kv("k", "openclose")]);
    }

    #[test]
    fn splits_on_first_equals_only() {
        assert_eq!(parse(&[r#"k = "a = b","#]), vec![kv("k", "a = b")]);
    }

    #[test]
    fn value_keeps_inner_quotes() {
        assert_eq!(
            parse(&[r#"k = "say "hi" now","#]),
            vec![kv("k", r#"say "hi" now"#)]
        );
    }

    #[test]
    fn records_line_spans() {
        let lines = ["T = {", r#"a = "x" .."#, r#""y","#, r#"b = "z","#, "}"];
        let pairs: Vec<Pair> = Tokenizer::new(lines.iter()).collect();
        assert_eq!((pairs[0].start_line, pairs[0].end_line), (2, 3));
        assert_eq!((pairs[1].start_line, pairs[1].end_line), (4, 4));
    }

    #[test]
    fn split_lines_handles_all_terminators() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn fallback_picks_first_charset_that_decodes() {
        let cp1252 = Charset::for_name("Cp1252").unwrap();
        let bytes = b"key1 = \"value1\xFC\"";
        let (text, used) =
            decode_with_fallback(bytes, &[Charset::utf8(), cp1252]).unwrap();
        assert_eq!(used, cp1252);
        assert!(text.ends_with("value1ü\""));

        assert!(decode_with_fallback(&[0xFF], &[Charset::utf8(), Charset::utf16()]).is_none());
    }

    #[test]
    fn file_parser_reads_lazily_and_closes_idempotently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UI_EN.txt");
        fs::write(&path, "UI_EN = {\n    A = \"a\",\n    B = \"b\",\n}\n").unwrap();

        let mut parser = TranslationFileParser::with_charsets(&path, vec![Charset::utf8()]);
        assert_eq!(parser.path(), path.as_path());
        assert_eq!(parser.used_charset(), Some(Charset::utf8()));
        assert_eq!(parser.tried_charsets(), &[Charset::utf8()]);

        let first = parser.next().unwrap();
        assert_eq!((first.key.as_str(), first.value.as_str()), ("A", "a"));
        assert_eq!((first.start_line, first.end_line), (2, 2));

        parser.close();
        parser.close();
        assert!(parser.is_closed());
        assert_eq!(parser.next(), None);
    }

    #[test]
    fn file_parser_reports_fallback_charset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UI_FR.txt");
        fs::write(&path, b"k = \"caf\xE9\",\n").unwrap();
        let cp1252 = Charset::for_name("Cp1252").unwrap();

        let parser = TranslationFileParser::with_charsets(&path, vec![Charset::utf8(), cp1252]);
        assert_eq!(parser.used_charset(), Some(cp1252));
        let pairs: Vec<Pair> = parser.collect();
        assert_eq!(pairs[0].value, "café");
    }

    #[test]
    fn unreadable_file_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let mut parser = TranslationFileParser::with_charsets(&path, vec![Charset::utf8()]);
        assert_eq!(parser.used_charset(), None);
        assert_eq!(parser.tried_charsets(), &[Charset::utf8()]);
        assert_eq!(parser.next(), None);
        assert!(!parser.is_closed());
    }

    #[test]
    fn fallback_reports_big_endian_utf16() {
        let bytes = [0xFE, 0xFF, 0, b'k', 0, b'=', 0, b'"', 0, b'v', 0, b'"'];
        let (text, used) = decode_with_fallback(&bytes, &[Charset::utf16()]).unwrap();
        assert_eq!(text, "k=\"v\"");
        assert_eq!(used.name(), "UTF-16BE");
    }
}
