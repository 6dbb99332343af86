//! Voice catalog and input shaping for speech synthesis.

use serde::Serialize;

/// Voices offered by the OpenAI speech endpoint, with their presented gender.
pub const VOICES: &[(&str, &str)] = &[
    ("alloy", "Neutral"),
    ("echo", "Male"),
    ("fable", "Neutral"),
    ("onyx", "Male"),
    ("nova", "Female"),
    ("shimmer", "Female"),
];

/// The voices are multilingual; this is the accent they are tuned for.
const VOICE_LOCALE: &str = "en-US";

/// Longer input is cut before synthesis.
pub const MAX_INPUT_CHARS: usize = 4000;

/// One `/voices` entry. Field names follow the edge-tts voice list so
/// existing clients can read it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
    #[serde(rename = "ShortName")]
    pub short_name: &'static str,
    #[serde(rename = "Gender")]
    pub gender: &'static str,
    #[serde(rename = "Locale")]
    pub locale: &'static str,
    pub default: bool,
}

fn is_known(voice: &str) -> bool {
    VOICES.iter().any(|(name, _)| *name == voice)
}

/// The requested voice if it is in the catalog, else `default`.
pub fn pick_voice<'a>(requested: Option<&'a str>, default: &'a str) -> &'a str {
    match requested.map(str::trim) {
        Some(voice) if is_known(voice) => voice,
        _ => default,
    }
}

/// Trim and cut to [`MAX_INPUT_CHARS`] characters, never splitting a code point.
pub fn truncate_input(text: &str) -> &str {
    let text = text.trim();
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn voice_catalog(default: &str) -> Vec<VoiceInfo> {
    VOICES
        .iter()
        .map(|&(short_name, gender)| VoiceInfo {
            short_name,
            gender,
            locale: VOICE_LOCALE,
            default: short_name == default,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_voice_is_kept() {
        assert_eq!(pick_voice(Some("onyx"), "nova"), "onyx");
        assert_eq!(pick_voice(Some(" echo "), "nova"), "echo");
    }

    #[test]
    fn unknown_or_missing_voice_falls_back() {
        assert_eq!(pick_voice(Some("hi-IN-SwaraNeural"), "nova"), "nova");
        assert_eq!(pick_voice(None, "nova"), "nova");
        assert_eq!(pick_voice(Some(""), "alloy"), "alloy");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let long = "é".repeat(MAX_INPUT_CHARS + 10);
        let cut = truncate_input(&long);
        assert_eq!(cut.chars().count(), MAX_INPUT_CHARS);
        assert_eq!(truncate_input("  short  "), "short");
    }

    #[test]
    fn catalog_marks_default() {
        let catalog = voice_catalog("nova");
        assert_eq!(catalog.len(), VOICES.len());
        assert_eq!(catalog.iter().filter(|v| v.default).count(), 1);
        assert!(catalog.iter().any(|v| v.short_name == "nova" && v.default));
    }

    #[test]
    fn catalog_uses_edge_tts_field_names() {
        let entry = serde_json::to_value(&voice_catalog("nova")[4]).unwrap();
        assert_eq!(
            entry,
            serde_json::json!({ "ShortName": "nova", "Gender": "Female", "Locale": "en-US", "default": true })
        );
    }
}
