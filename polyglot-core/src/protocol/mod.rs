use std::path::PathBuf;

use serde::Serialize;
use serde_json::{json, Value};

use crate::model::config::CoreConfig;
use crate::model::entry::{EntryId, VariantId};
use crate::model::translation_type::TranslationType;
use crate::model::version::SemanticVersion;
use crate::services::workspace::Workspace;
use crate::services::{encoding, qa};

mod command;
use command::Command;

type Reply = Result<Value, String>;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value, events: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload,
        "events": events
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>, events: Value) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into(),
        "events": events
    })
    .to_string()
}

fn to_json<T: Serialize>(value: &T) -> Reply {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn require_str<'a>(payload: &'a Value, field: &str) -> Result<&'a str, String> {
    payload
        .get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("payload.{field} is required"))
}

fn require_index(payload: &Value, field: &str) -> Result<usize, String> {
    payload
        .get(field)
        .and_then(|v| v.as_u64())
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| format!("payload.{field} must be a non-negative integer"))
}

fn variant_id(payload: &Value) -> Result<VariantId, String> {
    require_index(payload, "variant").map(VariantId)
}

#[derive(Debug, Serialize)]
struct EntrySummary<'a> {
    id: EntryId,
    key: &'a str,
    #[serde(rename = "type")]
    translation_type: Option<TranslationType>,
    variants: usize,
    changed: usize,
}

/// One connected host. Holds the workspace between requests.
#[derive(Debug, Default)]
pub struct Session {
    workspace: Workspace,
}

impl Session {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Handles one request line and returns one response line.
    pub fn handle(&mut self, input: &str) -> String {
        let req: Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(_) => {
                return json!({
                    "status": "error",
                    "message": "invalid json"
                })
                .to_string();
            }
        };

        let id = get_id(&req);
        let cmd_str = get_cmd(&req);
        let payload = get_payload(&req);

        let reply = self.dispatch(Command::from(cmd_str), payload);
        let events = self.workspace.corpus_mut().drain_events();
        let events = serde_json::to_value(events).unwrap_or(Value::Array(Vec::new()));

        match reply {
            Ok(payload) => ok(id, payload, events),
            Err(message) => err(id, message, events),
        }
    }

    fn dispatch(&mut self, cmd: Command, payload: &Value) -> Reply {
        match cmd {
            Command::Ping => Ok(json!({ "message": "polyglot-core alive" })),
            Command::Init => self.init(payload),
            Command::SourcesScan => {
                self.workspace.rescan();
                self.sources()
            }
            Command::SourcesList => self.sources(),
            Command::LanguagesList => {
                let languages: Vec<_> = self
                    .workspace
                    .catalog()
                    .languages()
                    .into_iter()
                    .map(|l| l.summary())
                    .collect();
                Ok(json!({ "languages": to_json(&languages)? }))
            }
            Command::CorpusLoad => {
                let report = self.workspace.load_corpus();
                Ok(json!({ "report": to_json(&report)? }))
            }
            Command::EntriesList => self.entries_list(),
            Command::EntryGetOrCreate => {
                let key = require_str(payload, "key")?;
                let entry = self.workspace.corpus_mut().get_or_create_entry(key);
                Ok(json!({ "entry": entry }))
            }
            Command::EntryGet => self.entry_get(payload),
            Command::VariantAdd => {
                let key = require_str(payload, "key")?;
                let source = require_str(payload, "source")?;
                let language = require_str(payload, "language")?;
                let type_name = require_str(payload, "type")?;
                let text = payload.get("text").and_then(|v| v.as_str()).unwrap_or("");
                let id = self
                    .workspace
                    .add_variant(key, source, language, type_name, text)
                    .map_err(|e| e.to_string())?;
                self.variant_view(id)
            }
            Command::VariantSetText => {
                let id = variant_id(payload)?;
                let text = payload
                    .get("text")
                    .and_then(|v| v.as_str())
                    .ok_or("payload.text must be a string")?;
                self.workspace
                    .corpus_mut()
                    .set_edited_text(id, text)
                    .map_err(|e| e.to_string())?;
                self.variant_view(id)
            }
            Command::VariantReset => {
                let id = variant_id(payload)?;
                self.workspace
                    .corpus_mut()
                    .reset(id)
                    .map_err(|e| e.to_string())?;
                self.variant_view(id)
            }
            Command::VariantSave => {
                let id = variant_id(payload)?;
                self.workspace.save_variant(id).map_err(|e| e.to_string())?;
                self.variant_view(id)
            }
            Command::VariantDelete => {
                let id = variant_id(payload)?;
                self.workspace.delete_variant(id).map_err(|e| e.to_string())?;
                Ok(json!({ "deleted": id }))
            }
            Command::CorpusSaveAll => {
                let report = self.workspace.save_all();
                Ok(json!({ "report": to_json(&report)? }))
            }
            Command::CorpusDirty => {
                let dirty = self.workspace.corpus().dirty_variants();
                Ok(json!({ "variants": dirty }))
            }
            Command::RunQa => {
                let issues = qa::run(self.workspace.corpus());
                Ok(json!({ "issues": to_json(&issues)? }))
            }
            Command::DetectEncoding => self.detect_encoding(payload),
            Command::Unknown => Err("unknown command".to_string()),
        }
    }

    fn init(&mut self, payload: &Value) -> Reply {
        let config: CoreConfig = if payload.is_null() {
            CoreConfig::default()
        } else {
            serde_json::from_value(payload.clone()).map_err(|e| format!("invalid config: {e}"))?
        };

        let report = self.workspace.init(config);
        Ok(json!({
            "sources": self.workspace.sources().len(),
            "languages": self.workspace.catalog().len(),
            "report": to_json(&report)?
        }))
    }

    fn sources(&self) -> Reply {
        let sources: Vec<_> = self.workspace.sources().iter().map(|s| (**s).clone()).collect();
        Ok(json!({ "sources": to_json(&sources)? }))
    }

    fn entries_list(&self) -> Reply {
        let corpus = self.workspace.corpus();
        let entries: Vec<EntrySummary> = corpus
            .entries()
            .map(|e| EntrySummary {
                id: e.id,
                key: &e.key,
                translation_type: corpus.translation_type(e.id),
                variants: corpus.entry_variants(e.id).len(),
                changed: corpus.changed_variants(e.id).len(),
            })
            .collect();
        Ok(json!({ "entries": to_json(&entries)? }))
    }

    fn entry_get(&self, payload: &Value) -> Reply {
        let corpus = self.workspace.corpus();
        let entry = match payload.get("key").and_then(|v| v.as_str()) {
            Some(key) => corpus
                .entry_by_key(key)
                .ok_or_else(|| format!("unknown key: {key}"))?,
            None => {
                let id = EntryId(require_index(payload, "entry")?);
                corpus
                    .entry(id)
                    .ok_or_else(|| crate::Error::UnknownEntry(id).to_string())?
            }
        };

        let variants: Vec<_> = corpus
            .entry_variants(entry.id)
            .into_iter()
            .map(|v| v.view())
            .collect();
        Ok(json!({
            "id": entry.id,
            "key": entry.key,
            "type": to_json(&corpus.translation_type(entry.id))?,
            "variants": to_json(&variants)?
        }))
    }

    fn variant_view(&self, id: VariantId) -> Reply {
        let variant = self
            .workspace
            .corpus()
            .variant(id)
            .ok_or_else(|| crate::Error::UnknownVariant(id).to_string())?;
        Ok(json!({
            "variant": to_json(&variant.view())?,
            "dirty": self.workspace.corpus().is_dirty(id)
        }))
    }

    fn detect_encoding(&self, payload: &Value) -> Reply {
        let path = PathBuf::from(require_str(payload, "path")?);

        let candidates = match payload.get("language").and_then(|v| v.as_str()) {
            Some(code) => {
                let language = self
                    .workspace
                    .catalog()
                    .get_language(code)
                    .ok_or_else(|| crate::Error::UnknownLanguage(code.to_string()).to_string())?;
                let version = payload
                    .get("version")
                    .and_then(|v| v.as_str())
                    .map(SemanticVersion::parse)
                    .unwrap_or_else(|| SemanticVersion::parse("42"));
                language.charsets_down_from(&version)
            }
            None => Vec::new(),
        };

        let result = encoding::detect_from_file(&path, &candidates).map_err(|e| e.to_string())?;
        to_json(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(session: &mut Session, line: &str) -> Value {
        serde_json::from_str(&session.handle(line)).unwrap()
    }

    #[test]
    fn ping_and_unknown() {
        let mut session = Session::default();
        let resp = call(&mut session, r#"{"id":1,"cmd":"ping"}"#);
        assert_eq!(resp["status"], "ok");
        assert_eq!(resp["id"], 1);

        let resp = call(&mut session, r#"{"id":2,"cmd":"nope"}"#);
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["message"], "unknown command");

        let resp = call(&mut session, "not json");
        assert_eq!(resp["message"], "invalid json");
    }

    #[test]
    fn entry_creation_reports_event() {
        let mut session = Session::default();
        let resp = call(
            &mut session,
            r#"{"id":"a","cmd":"entry.get_or_create","payload":{"key":"UI_Hello"}}"#,
        );
        assert_eq!(resp["payload"]["entry"], 0);
        assert_eq!(resp["events"][0]["event"], "entry_created");
        assert_eq!(resp["events"][0]["key"], "UI_Hello");

        let resp = call(
            &mut session,
            r#"{"id":"b","cmd":"entry.get_or_create","payload":{"key":"UI_Hello"}}"#,
        );
        assert_eq!(resp["events"], json!([]));

        let resp = call(&mut session, r#"{"id":"c","cmd":"entry.get","payload":{"key":"UI_Hello"}}"#);
        assert_eq!(resp["payload"]["key"], "UI_Hello");
        assert_eq!(resp["payload"]["variants"], json!([]));
    }

    #[test]
    fn corpus_load_reports_one_reload_event() {
        let mut session = Session::default();
        call(
            &mut session,
            r#"{"id":1,"cmd":"entry.get_or_create","payload":{"key":"UI_Old"}}"#,
        );
        let resp = call(&mut session, r#"{"id":2,"cmd":"corpus.load"}"#);
        assert_eq!(resp["status"], "ok");
        assert_eq!(
            resp["events"],
            json!([{ "event": "reloaded", "entries": 0, "variants": 0 }])
        );

        let resp = call(&mut session, r#"{"id":3,"cmd":"entry.get","payload":{"entry":0}}"#);
        assert_eq!(resp["message"], "unknown entry: entry#0");
    }

    #[test]
    fn missing_fields_are_reported() {
        let mut session = Session::default();
        let resp = call(&mut session, r#"{"id":1,"cmd":"variant.set_text","payload":{}}"#);
        assert_eq!(resp["status"], "error");

        let resp = call(
            &mut session,
            r#"{"id":1,"cmd":"variant.reset","payload":{"variant":7}}"#,
        );
        assert_eq!(resp["message"], "unknown variant: variant#7");

        let resp = call(
            &mut session,
            r#"{"id":1,"cmd":"variant.add","payload":{"key":"k","source":"Nope","language":"EN","type":"UI"}}"#,
        );
        assert_eq!(resp["message"], "unknown source: Nope");
    }

    #[test]
    fn languages_list_starts_with_english() {
        let mut session = Session::default();
        let resp = call(&mut session, r#"{"id":1,"cmd":"languages.list"}"#);
        assert_eq!(resp["payload"]["languages"][0]["code"], "EN");
    }
}
