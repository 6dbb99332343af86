//! Model-response normalization.
//!
//! Turns free-form model output into a [`CheckResult`]. The JSON object is
//! recovered by a short chain of parse strategies, the verdict is clamped to
//! the four known labels, and model-cited sources are filtered through the
//! allow-list. When none survive, the retriever's evidence is used instead.
//!
//! Every function here is total: any input string produces a result.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use medlens_core::{AllowList, CheckResult, EvidenceItem, Verdict, MAX_SOURCES};

/// Leading/trailing code-fence markers, optionally tagged `json`.
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?im)^```(?:json)?\s*|\s*```$").unwrap());

type JsonObject = Map<String, Value>;
type ParseStrategy = fn(&str) -> Option<JsonObject>;

/// Tried in order; the first one yielding a JSON object wins.
const STRATEGIES: &[ParseStrategy] = &[parse_direct, parse_unfenced, parse_braced];

fn parse_object(text: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn parse_direct(text: &str) -> Option<JsonObject> {
    parse_object(text)
}

fn parse_unfenced(text: &str) -> Option<JsonObject> {
    let unfenced = FENCE_RE.replace_all(text, "");
    parse_object(unfenced.trim())
}

fn parse_braced(text: &str) -> Option<JsonObject> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    parse_object(&text[start..=end])
}

/// Recover a JSON object from model output, or an empty object if nothing parses.
pub fn recover_object(raw: &str) -> JsonObject {
    let text = raw.trim();
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(text))
        .unwrap_or_default()
}

fn extract_verdict(obj: &JsonObject) -> Verdict {
    match obj.get("verdict") {
        Some(Value::String(label)) => Verdict::parse(label),
        Some(Value::Bool(true)) => Verdict::True,
        Some(Value::Bool(false)) => Verdict::False,
        _ => Verdict::Uncertain,
    }
}

/// Empty values (`null`, `false`, zero, `[]`, `{}`) read as no reason.
fn extract_reason(obj: &JsonObject) -> String {
    match obj.get("reason") {
        Some(Value::String(reason)) => reason.clone(),
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(Value::Array(items)) if items.is_empty() => String::new(),
        Some(Value::Object(map)) if map.is_empty() => String::new(),
        Some(other) => other.to_string(),
    }
}

fn source_from_value(value: &Value) -> Option<EvidenceItem> {
    let entry = value.as_object()?;
    let url = entry.get("url")?.as_str()?;
    let title = entry.get("title").and_then(Value::as_str).unwrap_or_default();
    Some(EvidenceItem::new(title, url))
}

/// Normalizes raw model text against a fixed allow-list.
#[derive(Debug, Clone, Default)]
pub struct ResponseNormalizer {
    allow: AllowList,
}

impl ResponseNormalizer {
    pub fn new(allow: AllowList) -> Self {
        Self { allow }
    }

    pub fn normalize(&self, raw: &str, fallback: &[EvidenceItem]) -> CheckResult {
        let obj = recover_object(raw);

        let cited = match obj.get("sources") {
            Some(Value::Array(items)) => self
                .allow
                .filter_evidence(items.iter().filter_map(source_from_value), MAX_SOURCES),
            _ => Vec::new(),
        };
        let sources = if cited.is_empty() {
            fallback.to_vec()
        } else {
            cited
        };

        CheckResult::new(extract_verdict(&obj), extract_reason(&obj), sources)
    }
}

/// Normalize against the trusted allow-list.
pub fn normalize(raw: &str, fallback: &[EvidenceItem]) -> CheckResult {
    ResponseNormalizer::default().normalize(raw, fallback)
}
