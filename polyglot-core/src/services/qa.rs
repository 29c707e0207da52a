use serde::Serialize;

use crate::model::entry::VariantId;
use crate::services::corpus::TranslationCorpus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaIssue {
    pub variant: VariantId,
    pub key: String,
    pub code: String,
    pub message: String,
}

pub fn run(corpus: &TranslationCorpus) -> Vec<QaIssue> {
    let mut issues: Vec<QaIssue> = Vec::new();

    for v in corpus.variants() {
        let mut push = |code: &str, message: String| {
            issues.push(QaIssue {
                variant: v.id,
                key: v.key.clone(),
                code: code.to_string(),
                message,
            })
        };

        if let (Some(supposed), Some(used)) = (v.supposed_charset, v.used_charset) {
            if supposed != used {
                push(
                    "CHARSET_MISMATCH",
                    format!("file decoded as {used}, expected {supposed}"),
                );
            }
        }

        if v.supposed_charset.is_none() {
            push(
                "SUPPOSED_CHARSET_MISSING",
                format!("{} has no charset for version {}", v.language, v.source.version),
            );
        }

        if v.edited_text().trim().is_empty() {
            push("EMPTY_TEXT", "text is empty".to_string());
        }

        if v.is_changed() && !v.source.editable {
            push(
                "EDITED_READ_ONLY_SOURCE",
                format!("{} is not editable", v.source.name),
            );
        }
    }

    issues
}
