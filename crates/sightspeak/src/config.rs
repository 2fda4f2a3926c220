use sightspeak_tts::Voice;

/// Runtime configuration, conventionally sourced from the environment.
///
/// The library itself never reads credentials on its own; frontends call
/// [`Config::from_env`] and hand the keys to the converter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key (`GEMINI_API_KEY`)
    pub gemini_api_key: Option<String>,
    /// FPT.AI API key (`FPT_API_KEY`)
    pub fpt_api_key: Option<String>,
    /// TTS voice (`SIGHTSPEAK_VOICE`)
    pub voice: Voice,
    /// Log level (`RUST_LOG`)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            fpt_api_key: None,
            voice: Voice::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary lookup. Used by tests.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            gemini_api_key: get("GEMINI_API_KEY").filter(|k| !k.is_empty()),
            fpt_api_key: get("FPT_API_KEY").filter(|k| !k.is_empty()),
            voice: get("SIGHTSPEAK_VOICE")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            log_level: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}
