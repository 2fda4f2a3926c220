//! FPT.AI TTS provider.
//!
//! Implements speech synthesis via the FPT.AI `hmi/tts/v5` API. Synthesis
//! is asynchronous on the provider side: the submit call returns a URL that
//! starts serving the rendered audio once it is ready.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::voice::Voice;

const DEFAULT_BASE_URL: &str = "https://api.fpt.ai";

/// Fixed delay between readiness checks on the audio URL.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A synthesis job accepted by the provider.
#[derive(Debug, Clone)]
pub struct SynthesisJob {
    /// URL that will serve the rendered audio once ready.
    pub audio_url: String,
    /// Provider-side request id, when reported.
    pub request_id: Option<String>,
}

/// Envelope of the submit endpoint response.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "async")]
    async_url: Option<String>,
    error: Option<i64>,
    message: Option<String>,
    request_id: Option<String>,
}

/// FPT.AI TTS client.
pub struct FptTts {
    client: Client,
    api_key: String,
    base_url: String,
    /// Playback speed, "-3".."3". Empty means provider default.
    speed: String,
}

impl FptTts {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            speed: String::new(),
        }
    }

    pub fn with_speed(mut self, speed: impl Into<String>) -> Self {
        self.speed = speed.into();
        self
    }

    /// Point the client at a different host. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Submit text for synthesis with the given voice.
    ///
    /// The text goes as the raw UTF-8 request body; voice and speed ride in
    /// headers, per the provider's contract.
    pub async fn request_synthesis(&self, text: &str, voice: &Voice) -> Result<SynthesisJob> {
        info!(
            "[TTS/FPT] Requesting synthesis of {} chars with voice={}",
            text.chars().count(),
            voice
        );
        let url = format!("{}/hmi/tts/v5", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .header("voice", voice.as_str())
            .header("speed", &self.speed)
            .body(text.to_owned())
            .send()
            .await
            .context("FPT TTS request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("FPT TTS error {status}: {body}");
        }

        let parsed: SubmitResponse = resp
            .json()
            .await
            .context("FPT TTS response was not valid JSON")?;

        let code = parsed.error.unwrap_or(0);
        if code != 0 {
            bail!(
                "FPT TTS rejected the request (error {code}): {}",
                parsed.message.unwrap_or_default()
            );
        }
        let Some(audio_url) = parsed.async_url else {
            bail!("no audio URL in TTS response");
        };

        debug!("[TTS/FPT] Audio URL: {audio_url}");
        Ok(SynthesisJob {
            audio_url,
            request_id: parsed.request_id,
        })
    }

    /// Fetch the rendered audio, polling until it is ready.
    ///
    /// The audio URL serves an error status until rendering finishes. Checks
    /// once immediately, then at a fixed interval while `wait_budget` allows.
    /// Returns `Ok(None)` when the budget runs out; the synthesis request is
    /// never resubmitted.
    pub async fn download_when_ready(
        &self,
        audio_url: &str,
        wait_budget: Duration,
    ) -> Result<Option<Bytes>> {
        let deadline = Instant::now() + wait_budget;
        loop {
            let resp = self
                .client
                .get(audio_url)
                .send()
                .await
                .context("audio download request failed")?;

            if resp.status().is_success() {
                let bytes = resp.bytes().await.context("failed to read audio body")?;
                info!("[TTS/FPT] Downloaded {} bytes of audio", bytes.len());
                return Ok(Some(bytes));
            }

            let status = resp.status();
            if Instant::now() + POLL_INTERVAL > deadline {
                debug!("[TTS/FPT] Wait budget exhausted, last status {status}");
                return Ok(None);
            }
            debug!("[TTS/FPT] Audio not ready yet ({status}), retrying");
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
