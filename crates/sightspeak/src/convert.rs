//! The converter facade: one linear pipeline from an image on disk to a
//! spoken rendition on disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use sightspeak_tts::{FptTts, Voice};
use sightspeak_vision::{GeminiVision, image_mime_type};

use crate::config::Config;
use crate::error::ConvertError;
use crate::result::ConversionResult;

/// Default wait budget for the provider to render audio, in seconds.
pub const DEFAULT_WAIT_SECS: u64 = 10;

/// Default analysis instruction: classify the image as a document (full
/// OCR, reformatted, no summarizing) or a scene (short overall
/// description). Vietnamese, matching the voices the synthesis side offers.
pub const DEFAULT_PROMPT: &str = "\
Bạn là trợ lý hỗ trợ người khiếm thị.
Hãy phân loại ảnh thành một trong hai loại:
- [Tài liệu]: Nếu bức ảnh là tài liệu/trang giấy → OCR toàn bộ nội dung và format lại nội dung đó cho hoàn chỉnh, chỉnh chu và ngăn nắp, không tóm tắt.
- [Ngữ cảnh]: Nếu bức ảnh là cảnh vật/bối cảnh → chỉ cần miêu tả tóm tắt tổng thể.
Trả kết quả theo format:
Thể loại: [Tài liệu hoặc Ngữ cảnh]
Nội dung: <nội dung tương ứng>";

/// Image-to-speech converter.
///
/// Holds the two provider clients plus the mutable voice and prompt
/// settings. Single-owner by construction: `convert` borrows `&self`, the
/// setters `&mut self`, so reconfiguring mid-conversion does not compile.
pub struct Converter {
    vision: GeminiVision,
    tts: FptTts,
    voice: Voice,
    prompt: String,
}

impl Converter {
    /// Build a converter from the two provider keys.
    ///
    /// Keys are not validated here; the providers reject bad ones on first
    /// use and the error lands in the conversion result.
    pub fn new(gemini_api_key: impl Into<String>, fpt_api_key: impl Into<String>) -> Self {
        Self::from_clients(GeminiVision::new(gemini_api_key), FptTts::new(fpt_api_key))
    }

    /// Build from preconfigured provider clients (custom model, base URL).
    pub fn from_clients(vision: GeminiVision, tts: FptTts) -> Self {
        Self {
            vision,
            tts,
            voice: Voice::default(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    /// Build from env-sourced configuration. Fails when either key is
    /// missing; frontends report that before any conversion runs.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let gemini_key = config
            .gemini_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY is not set"))?;
        let fpt_key = config
            .fpt_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("FPT_API_KEY is not set"))?;
        Ok(Self::new(gemini_key, fpt_key).with_voice(config.voice.clone()))
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }

    /// Replace the voice used by subsequent conversions. Pass-through: no
    /// validation against the known set.
    pub fn set_voice(&mut self, voice: Voice) {
        self.voice = voice;
    }

    /// Replace the analysis instruction sent to the vision model.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    /// Run the full pipeline: image → analysis text → synthesized audio
    /// written to `output_path`. Never returns `Err`; every failure folds
    /// into the result record, and a failed run leaves no output file.
    pub async fn convert(
        &self,
        image_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        wait_secs: u64,
    ) -> ConversionResult {
        let image_path = image_path.as_ref();
        let output_path = output_path.as_ref();

        let text = match self.analyze(image_path).await {
            Ok(text) => text,
            Err(err) => {
                warn!("Conversion failed during analysis: {err}");
                return ConversionResult::failed(&err, None);
            }
        };

        match self.synthesize_to_file(&text, output_path, wait_secs).await {
            Ok(audio_url) => {
                info!("Conversion complete: {}", output_path.display());
                ConversionResult::completed(
                    text,
                    output_path.to_path_buf(),
                    audio_url,
                    self.voice.as_str().to_string(),
                )
            }
            Err(err) => {
                warn!("Conversion failed during synthesis: {err}");
                ConversionResult::failed(&err, Some(text))
            }
        }
    }

    /// Stage 1: read the image and get the analysis text. No network call
    /// is made for a missing file.
    async fn analyze(&self, image_path: &Path) -> Result<String, ConvertError> {
        if !image_path.is_file() {
            return Err(ConvertError::ImageNotFound(image_path.to_path_buf()));
        }
        let image_bytes =
            tokio::fs::read(image_path)
                .await
                .map_err(|source| ConvertError::ImageRead {
                    path: image_path.to_path_buf(),
                    source,
                })?;
        let mime_type = image_mime_type(image_path);
        self.vision
            .describe_image(&image_bytes, mime_type, &self.prompt)
            .await
            .map_err(ConvertError::Vision)
    }

    /// Stages 2-4: synthesize, wait for the rendered audio, write it out.
    /// Returns the remote audio URL.
    async fn synthesize_to_file(
        &self,
        text: &str,
        output_path: &Path,
        wait_secs: u64,
    ) -> Result<String, ConvertError> {
        let job = self
            .tts
            .request_synthesis(text, &self.voice)
            .await
            .map_err(ConvertError::Tts)?;

        let audio = self
            .tts
            .download_when_ready(&job.audio_url, Duration::from_secs(wait_secs))
            .await
            .map_err(ConvertError::Download)?
            .ok_or(ConvertError::Timeout(wait_secs))?;

        write_audio(output_path, &audio).await?;
        Ok(job.audio_url)
    }
}

/// Write the audio bytes, creating parent directories as needed. A failed
/// write removes the partial file.
async fn write_audio(path: &Path, audio: &[u8]) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConvertError::AudioWrite {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
    }
    if let Err(source) = tokio::fs::write(path, audio).await {
        let _ = tokio::fs::remove_file(path).await;
        return Err(ConvertError::AudioWrite {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Mock, ServerGuard};

    const GEMINI_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";
    const FPT_PATH: &str = "/hmi/tts/v5";
    const AUDIO_PATH: &str = "/audio/out.wav";

    fn converter_for(server: &ServerGuard) -> Converter {
        Converter::from_clients(
            GeminiVision::new("gk").with_base_url(server.url()),
            FptTts::new("fk").with_base_url(server.url()),
        )
    }

    fn temp_out(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sightspeak-{}-{}.wav", tag, uuid::Uuid::new_v4()))
    }

    fn temp_image(tag: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "sightspeak-{}-{}.jpg",
            tag,
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, b"fake-jpeg-bytes").unwrap();
        path
    }

    async fn mock_vision_ok(server: &mut ServerGuard, text: &str) -> Mock {
        server
            .mock("POST", GEMINI_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "candidates": [{ "content": { "parts": [{ "text": text }] } }]
                })
                .to_string(),
            )
            .create_async()
            .await
    }

    async fn mock_tts_ok(server: &mut ServerGuard) -> Mock {
        let audio_url = format!("{}{}", server.url(), AUDIO_PATH);
        server
            .mock("POST", FPT_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({ "async": audio_url, "error": 0, "message": "Success" })
                    .to_string(),
            )
            .create_async()
            .await
    }

    async fn mock_audio_ready(server: &mut ServerGuard) -> Mock {
        server
            .mock("GET", AUDIO_PATH)
            .with_status(200)
            .with_header("content-type", "audio/wav")
            .with_body(vec![82u8, 73, 70, 70, 0, 0])
            .create_async()
            .await
    }

    #[tokio::test]
    async fn missing_image_makes_no_network_calls() {
        let mut server = mockito::Server::new_async().await;
        let vision = server
            .mock("POST", GEMINI_PATH)
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let tts = server.mock("POST", FPT_PATH).expect(0).create_async().await;

        let out = temp_out("missing");
        let result = converter_for(&server)
            .convert("/definitely/not/here.jpg", &out, 0)
            .await;

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("not found"));
        assert!(!out.exists());
        vision.assert_async().await;
        tts.assert_async().await;
    }

    #[tokio::test]
    async fn vision_failure_skips_tts() {
        let mut server = mockito::Server::new_async().await;
        let _vision = server
            .mock("POST", GEMINI_PATH)
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;
        let tts = server.mock("POST", FPT_PATH).expect(0).create_async().await;

        let image = temp_image("vision-fail");
        let out = temp_out("vision-fail");
        let result = converter_for(&server).convert(&image, &out, 0).await;

        assert!(!result.success);
        let msg = result.error.unwrap();
        assert!(msg.contains("vision analysis failed"), "got: {msg}");
        assert!(!out.exists());
        tts.assert_async().await;
        let _ = std::fs::remove_file(image);
    }

    #[tokio::test]
    async fn successful_pipeline_writes_audio_file() {
        let mut server = mockito::Server::new_async().await;
        let text = "Thể loại: [Ngữ cảnh]\nNội dung: một con mèo trên thảm";
        let _vision = mock_vision_ok(&mut server, text).await;
        let _tts = mock_tts_ok(&mut server).await;
        let _audio = mock_audio_ready(&mut server).await;

        let image = temp_image("ok");
        let out = temp_out("ok");
        let result = converter_for(&server).convert(&image, &out, 5).await;

        assert!(result.success, "error: {:?}", result.error);
        assert_eq!(result.text_result.as_deref(), Some(text));
        assert_eq!(result.voice_used.as_deref(), Some("banmai"));
        assert_eq!(
            result.audio_url.as_deref(),
            Some(format!("{}{}", server.url(), AUDIO_PATH).as_str())
        );
        let written = std::fs::metadata(&out).unwrap();
        assert!(written.len() > 0);
        let _ = std::fs::remove_file(image);
        let _ = std::fs::remove_file(out);
    }

    #[tokio::test]
    async fn timeout_leaves_no_output_file() {
        let mut server = mockito::Server::new_async().await;
        let _vision = mock_vision_ok(&mut server, "some text").await;
        let _tts = mock_tts_ok(&mut server).await;
        let _audio = server
            .mock("GET", AUDIO_PATH)
            .with_status(404)
            .expect_at_least(1)
            .create_async()
            .await;

        let image = temp_image("timeout");
        let out = temp_out("timeout");
        let result = converter_for(&server).convert(&image, &out, 0).await;

        assert!(!result.success);
        let msg = result.error.unwrap();
        assert!(msg.contains("not ready"), "got: {msg}");
        // Analysis had already succeeded, so the text survives the failure.
        assert_eq!(result.text_result.as_deref(), Some("some text"));
        assert!(!out.exists());
        let _ = std::fs::remove_file(image);
    }

    #[tokio::test]
    async fn set_voice_reaches_the_tts_request() {
        let mut server = mockito::Server::new_async().await;
        let _vision = mock_vision_ok(&mut server, "đọc thử").await;
        let audio_url = format!("{}{}", server.url(), AUDIO_PATH);
        let tts = server
            .mock("POST", FPT_PATH)
            .match_header("voice", "lannhi")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({ "async": audio_url, "error": 0 }).to_string(),
            )
            .create_async()
            .await;
        let _audio = mock_audio_ready(&mut server).await;

        let image = temp_image("voice");
        let out = temp_out("voice");
        let mut converter = converter_for(&server);
        converter.set_voice(Voice::Lannhi);
        let result = converter.convert(&image, &out, 5).await;

        assert!(result.success, "error: {:?}", result.error);
        assert_eq!(result.voice_used.as_deref(), Some("lannhi"));
        tts.assert_async().await;
        let _ = std::fs::remove_file(image);
        let _ = std::fs::remove_file(out);
    }

    #[tokio::test]
    async fn set_prompt_reaches_the_vision_request() {
        let mut server = mockito::Server::new_async().await;
        let vision = server
            .mock("POST", GEMINI_PATH)
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{ "parts": [
                    {},
                    { "text": "chỉ đọc tiêu đề" }
                ]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "candidates": [{ "content": { "parts": [{ "text": "tiêu đề" }] } }]
                })
                .to_string(),
            )
            .create_async()
            .await;
        let _tts = mock_tts_ok(&mut server).await;
        let _audio = mock_audio_ready(&mut server).await;

        let image = temp_image("prompt");
        let out = temp_out("prompt");
        let mut converter = converter_for(&server);
        converter.set_prompt("chỉ đọc tiêu đề");
        let result = converter.convert(&image, &out, 5).await;

        assert!(result.success, "error: {:?}", result.error);
        vision.assert_async().await;
        let _ = std::fs::remove_file(image);
        let _ = std::fs::remove_file(out);
    }
}
