//! The record handed back from a conversion.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Outcome of one image-to-speech conversion.
///
/// Errors are folded into the record rather than raised, so callers branch
/// on [`success`](Self::success). When `success` is true, `audio_path`
/// points at a file that was just written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub success: bool,
    /// Populated when `success` is false.
    pub error: Option<String>,
    /// Text the vision model produced, verbatim. Also present on failures
    /// where analysis succeeded but synthesis did not.
    pub text_result: Option<String>,
    /// Local path the audio was written to.
    pub audio_path: Option<PathBuf>,
    /// Remote URL the audio was served from.
    pub audio_url: Option<String>,
    /// Voice identifier the synthesis used.
    pub voice_used: Option<String>,
}

impl ConversionResult {
    pub(crate) fn completed(
        text: String,
        audio_path: PathBuf,
        audio_url: String,
        voice: String,
    ) -> Self {
        Self {
            success: true,
            error: None,
            text_result: Some(text),
            audio_path: Some(audio_path),
            audio_url: Some(audio_url),
            voice_used: Some(voice),
        }
    }

    pub(crate) fn failed(err: &ConvertError, text: Option<String>) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            text_result: text,
            audio_path: None,
            audio_url: None,
            voice_used: None,
        }
    }
}
