//! Gemini vision client.
//!
//! Sends an image plus an instruction prompt to the `generateContent`
//! endpoint and returns the model's text reply.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Client for the Gemini `generateContent` vision endpoint.
pub struct GeminiVision {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiVision {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different host. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Describe an image from raw bytes.
    ///
    /// Returns the model's reply text, trimmed. An empty reply is an error:
    /// the caller feeds this text into speech synthesis, and the provider
    /// rejects empty input anyway.
    pub async fn describe_image(
        &self,
        image_bytes: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String> {
        info!(
            "[Vision] Describing {} byte image via Gemini {}",
            image_bytes.len(),
            self.model
        );
        let b64 = STANDARD.encode(image_bytes);
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [
                { "inlineData": { "mimeType": mime_type, "data": b64 } },
                { "text": prompt }
            ]}]
        });
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Gemini vision request failed")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("Gemini vision error {status}: {body}");
        }
        let json: serde_json::Value = resp.json().await?;
        let text = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();
        if text.is_empty() {
            bail!("Gemini vision returned no text");
        }
        debug!("[Vision] Got {} chars of analysis text", text.len());
        Ok(text)
    }
}
