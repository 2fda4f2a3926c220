//! Image-to-speech conversion pipeline.
//!
//! Chains a Gemini vision/OCR call into FPT.AI speech synthesis: read an
//! image, describe or transcribe it, synthesize the text, download the
//! rendered audio to disk.

pub mod config;
pub mod convert;
pub mod error;
pub mod result;

pub use config::Config;
pub use convert::{Converter, DEFAULT_PROMPT, DEFAULT_WAIT_SECS};
pub use error::ConvertError;
pub use result::ConversionResult;
pub use sightspeak_tts::Voice;
