use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::charset::Charset;

#[derive(Debug, Serialize)]
pub struct CandidateCheck {
    pub charset: Charset,
    pub decodes: bool,
}

/// Statistical guess plus a strict decode check of each candidate.
///
/// Only reported to the host; the parser never consults the guess.
#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub bom: Option<String>,
    pub candidates: Vec<CandidateCheck>,
}

pub fn detect_from_file(path: &Path, candidates: &[Charset]) -> Result<EncodingDetectionResult> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(detect(&bytes, candidates))
}

pub fn detect(bytes: &[u8], candidates: &[Charset]) -> EncodingDetectionResult {
    let bom = Encoding::for_bom(bytes).map(|(enc, _)| enc.name().to_string());

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    EncodingDetectionResult {
        best: bom.clone().unwrap_or_else(|| encoding.name().to_string()),
        confidence: if bom.is_some() {
            0.99
        } else {
            estimate_confidence(bytes, encoding)
        },
        bom,
        candidates: candidates
            .iter()
            .map(|&charset| CandidateCheck {
                charset,
                decodes: charset.decode(bytes).is_some(),
            })
            .collect(),
    }
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_bom_and_candidate_decodes() {
        let cp1252 = Charset::for_name("Cp1252").unwrap();
        let result = detect(b"\xEF\xBB\xBFUI_EN = {\n}", &[Charset::utf8(), cp1252]);
        assert_eq!(result.best, "UTF-8");
        assert_eq!(result.bom.as_deref(), Some("UTF-8"));
        assert!(result.candidates.iter().all(|c| c.decodes));
    }

    #[test]
    fn invalid_utf8_marks_candidate() {
        let cp1252 = Charset::for_name("Cp1252").unwrap();
        let result = detect(b"k = \"caf\xE9\",", &[Charset::utf8(), cp1252]);
        assert!(result.bom.is_none());
        assert!(!result.candidates[0].decodes);
        assert!(result.candidates[1].decodes);
    }
}
