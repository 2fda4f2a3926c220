//! Image MIME type detection.
//!
//! The vision endpoint wants an explicit MIME type alongside the inline
//! image data; callers hand us a path, so we go by extension.

use std::path::Path;

/// Detect an image MIME type by file extension.
///
/// Unknown or missing extensions fall back to `image/jpeg`, the most common
/// case for camera captures without a proper suffix.
pub fn image_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "bmp"          => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "heic"         => "image/heic",

        _              => "image/jpeg",
    }
}
