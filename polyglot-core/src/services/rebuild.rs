use crate::model::translation_type::TranslationType;

/// Line terminator a file is written back with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// CRLF if the text contains any, LF otherwise.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Joins lines, terminating every one of them.
pub fn join_lines(lines: &[String], ending: LineEnding) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 2).sum());
    for line in lines {
        out.push_str(line);
        out.push_str(ending.as_str());
    }
    out
}

/// Minimal content of a table file that does not exist yet.
pub fn skeleton(translation_type: TranslationType, language: &str) -> String {
    format!("{}_{} = {{\n}}", translation_type.name(), language)
}

/// The single line a saved value is written as.
pub fn canonical_line(key: &str, text: &str) -> String {
    format!("    {key} = \"{text}\",")
}

fn closes_value(trimmed: &str) -> bool {
    trimmed.ends_with(',') || trimmed.ends_with('}')
}

/// Inclusive 0-based range of lines holding `key`'s value.
///
/// The key line must read `<key> =` once trimmed; `<key>=` without the
/// space is not found, so saving such a key appends a second line.
///
/// A value left open on its first line runs until the next line ending in
/// `,` or `}`. A bare `}` closes the table, not the value, so the span stops
/// just above it.
pub fn find_key_span(lines: &[String], key: &str) -> Option<(usize, usize)> {
    let prefix = format!("{key} =");
    let start = lines
        .iter()
        .position(|line| line.trim().starts_with(&prefix))?;

    if closes_value(lines[start].trim()) {
        return Some((start, start));
    }

    for (i, line) in lines.iter().enumerate().skip(start + 1) {
        let trimmed = line.trim();
        if trimmed == "}" {
            return Some((start, i - 1));
        }
        if closes_value(trimmed) {
            return Some((start, i));
        }
    }

    Some((start, lines.len() - 1))
}

pub fn replace_span(lines: &mut Vec<String>, span: (usize, usize), line: String) {
    lines.drain(span.0..=span.1);
    lines.insert(span.0, line);
}

pub fn remove_span(lines: &mut Vec<String>, span: (usize, usize)) {
    lines.drain(span.0..=span.1);
}

/// Inserts before the last `}` line, or appends when there is none.
pub fn insert_entry(lines: &mut Vec<String>, line: String) {
    match lines.iter().rposition(|l| l.trim() == "}") {
        Some(i) => lines.insert(i, line),
        None => lines.push(line),
    }
}

/// Writes `text` under `key`: replaces the existing span or inserts a new
/// line.
pub fn upsert(lines: &mut Vec<String>, key: &str, text: &str) {
    let line = canonical_line(key, text);
    match find_key_span(lines, key) {
        Some(span) => replace_span(lines, span, line),
        None => insert_entry(lines, line),
    }
}

/// Removes `key`'s span. Returns whether anything was removed.
pub fn remove_key(lines: &mut Vec<String>, key: &str) -> bool {
    match find_key_span(lines, key) {
        Some(span) => {
            remove_span(lines, span);
            true
        }
        None => false,
    }
}
