pub mod gemini;
pub mod mime;

pub use gemini::GeminiVision;
pub use mime::image_mime_type;
