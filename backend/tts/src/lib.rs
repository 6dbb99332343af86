pub mod engine;
pub mod mock;
pub mod voices;

pub use engine::{AudioFormat, OpenAiTts, TtsError, TtsProvider, TtsRequest};
pub use mock::MockTts;
pub use voices::{pick_voice, truncate_input, voice_catalog, VoiceInfo, MAX_INPUT_CHARS, VOICES};
